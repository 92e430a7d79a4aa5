//! Dingo - Rainbow Six Siege profile tracker
//!
//! Architecture:
//! - Redis (or an in-process map) as the cache store
//! - Reqwest for the stats API
//! - wkhtmltoimage for profile banners
//! - Teloxide for the Telegram front end

mod config;
mod entity;
mod error;
mod plugins;
mod prelude;
mod render;
mod state;
mod store;
mod sv;
mod upstream;
mod utils;

use std::env;

use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{config::Config, plugins::App, prelude::*, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "dingo=debug,teloxide=info,reqwest=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env()?;

  info!("Starting Dingo v{}", env!("CARGO_PKG_VERSION"));
  info!(
    "Season {}, banners from {}",
    config.season,
    config.profile_template().display()
  );

  let app_state = Arc::new(AppState::new(config).await?);

  let mut app = App::new();
  match env::var("TELOXIDE_TOKEN") {
    Ok(token) if !token.trim().is_empty() => {
      app = app.register(plugins::telegram::Plugin::new(token.trim()));
    }
    _ => warn!("TELOXIDE_TOKEN not set, Telegram bot disabled"),
  }

  if app.is_empty() {
    warn!("No services registered, nothing to do");
    return Ok(());
  }

  app.run(app_state).await;

  tokio::signal::ctrl_c().await?;
  info!("Shutting down");

  Ok(())
}

use std::path::PathBuf;

use crate::{
  config::Config,
  prelude::*,
  render::{RenderEngine, WkHtml},
  store::{CacheStore, MemoryStore, Namespace, RedisStore},
  sv,
  upstream::{SiegeApi, Upstream},
};

pub struct Services<'a> {
  pub tracker: sv::Tracker<'a>,
  pub link: sv::Link<'a>,
}

pub struct AppState {
  pub config: Config,
  pub ns: Namespace,
  pub store: Arc<dyn CacheStore>,
  pub api: Arc<dyn Upstream>,
  pub renderer: Arc<dyn RenderEngine>,
  template: PathBuf,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let store: Arc<dyn CacheStore> = match &config.redis_url {
      Some(url) => {
        info!("Connecting to Redis...");
        Arc::new(
          RedisStore::connect(url)
            .await
            .context("Failed to connect to Redis")?,
        )
      }
      None => {
        warn!("REDIS_URL not set, cache is kept in memory");
        Arc::new(MemoryStore::new())
      }
    };

    let api = SiegeApi::new(&config.api_url, config.fetch_timeout)
      .context("Failed to build HTTP client")?;
    let renderer =
      WkHtml::profile_banner(&config.wkhtmltoimage, config.render_timeout);

    Ok(Self::with_parts(config, store, Arc::new(api), Arc::new(renderer)))
  }

  pub fn with_parts(
    config: Config,
    store: Arc<dyn CacheStore>,
    api: Arc<dyn Upstream>,
    renderer: Arc<dyn RenderEngine>,
  ) -> Self {
    let ns = Namespace::new([&config.cache_prefix, &config.siege_prefix]);
    let template = config.profile_template();
    Self { config, ns, store, api, renderer, template }
  }

  pub fn sv(&self) -> Services<'_> {
    let store = self.store.as_ref();
    let api = self.api.as_ref();
    let ns = &self.ns;

    Services {
      tracker: sv::Tracker::new(
        sv::Profile::new(store, api, ns, self.config.profile_ttl),
        sv::Operators::new(store, api, ns, self.config.operator_ttl),
        sv::History::new(store, ns),
        sv::Render::new(
          store,
          self.renderer.as_ref(),
          ns,
          self.config.render_ttl,
          &self.template,
        ),
        self.config.season,
      ),
      link: sv::Link::new(store, ns),
    }
  }

  pub fn is_admin(&self, user_id: i64) -> bool {
    self.config.admins.contains(&user_id)
  }
}

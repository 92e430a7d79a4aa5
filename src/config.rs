use std::{collections::HashSet, env, path::PathBuf};

use crate::prelude::*;

#[derive(Debug, Clone)]
pub struct Config {
  /// Telegram ids allowed to run owner commands
  pub admins: HashSet<i64>,
  pub redis_url: Option<String>,
  /// Root namespace shared by every key this process writes
  pub cache_prefix: String,
  pub siege_prefix: String,
  pub api_url: String,
  pub season: u32,

  pub profile_ttl: Duration,
  pub operator_ttl: Duration,
  pub render_ttl: Duration,
  pub fetch_timeout: Duration,
  pub render_timeout: Duration,

  pub wkhtmltoimage: PathBuf,
  pub resources: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      admins: HashSet::new(),
      redis_url: None,
      cache_prefix: String::from("dingo"),
      siege_prefix: String::from("r6"),
      api_url: String::from("https://d.lu.je/siege"),
      season: 7,

      profile_ttl: Duration::from_secs(2 * 60),
      operator_ttl: Duration::from_secs(30 * 60),
      render_ttl: Duration::from_secs(30 * 60),
      fetch_timeout: Duration::from_secs(10),
      render_timeout: Duration::from_secs(30),

      wkhtmltoimage: PathBuf::from("wkhtmltoimage"),
      resources: PathBuf::from("Resources/"),
    }
  }
}

fn var(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn duration(key: &str, default: Duration) -> anyhow::Result<Duration> {
  match var(key) {
    Some(raw) => humantime::parse_duration(raw.trim())
      .with_context(|| format!("{key} must be a duration like `30m`")),
    None => Ok(default),
  }
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let defaults = Self::default();

    let admins: HashSet<i64> = var("ADMIN_IDS")
      .unwrap_or_default()
      .split(',')
      .filter(|s| !s.trim().is_empty())
      .map(|id| id.trim().parse().context("Invalid admin id format"))
      .collect::<anyhow::Result<_>>()?;

    let season = match var("SIEGE_SEASON") {
      Some(raw) => raw.trim().parse().context("SIEGE_SEASON must be u32")?,
      None => defaults.season,
    };

    Ok(Self {
      admins,
      redis_url: var("REDIS_URL"),
      cache_prefix: var("CACHE_PREFIX").unwrap_or(defaults.cache_prefix),
      siege_prefix: var("SIEGE_PREFIX").unwrap_or(defaults.siege_prefix),
      api_url: var("SIEGE_API").unwrap_or(defaults.api_url),
      season,

      profile_ttl: duration("PROFILE_TTL", defaults.profile_ttl)?,
      operator_ttl: duration("OPERATOR_TTL", defaults.operator_ttl)?,
      render_ttl: duration("RENDER_TTL", defaults.render_ttl)?,
      fetch_timeout: duration("FETCH_TIMEOUT", defaults.fetch_timeout)?,
      render_timeout: duration("RENDER_TIMEOUT", defaults.render_timeout)?,

      wkhtmltoimage: var("WKHTMLTOIMAGE")
        .map(PathBuf::from)
        .unwrap_or(defaults.wkhtmltoimage),
      resources: var("RESOURCES")
        .map(PathBuf::from)
        .unwrap_or(defaults.resources),
    })
  }

  /// Document the profile banner is rendered from.
  pub fn profile_template(&self) -> PathBuf {
    self.resources.join("profile").join("slider.html")
  }
}

use std::path::Path;

use serde::Serialize;

use crate::{
  entity::{Account, KillStats, ProfileData, Rank, SeasonHistory},
  prelude::*,
  render::RenderEngine,
  store::{CacheStore, Namespace},
  utils::Fnv1a,
};

/// Ratings closer together than this share a rendered banner.
pub const MMR_GRANULARITY: u32 = 50;

/// Cookie the profile page reads its data from.
const PAYLOAD_COOKIE: &str = "profile";

/// Identity of a rendered banner.
///
/// Only fields visible on the banner feed the key, so snapshots differing
/// in anything else reuse the cached image.
pub fn render_key(
  account: &Account,
  profile: &ProfileData,
  history: &SeasonHistory,
) -> u64 {
  let mmr = history.current / MMR_GRANULARITY * MMR_GRANULARITY;
  Fnv1a::new()
    .field(account.as_str())
    .field(history.rank().name())
    .field(mmr.to_string())
    .field(profile.avatar())
    .field(profile.time_played())
    .finish()
}

#[derive(Serialize)]
struct RankView {
  name: &'static str,
  color: String,
  threshold: u32,
}

impl From<Rank> for RankView {
  fn from(rank: Rank) -> Self {
    Self {
      name: rank.name(),
      color: format!("#{:06x}", rank.color()),
      threshold: rank.threshold(),
    }
  }
}

#[derive(Serialize)]
struct RatioView {
  kd: f64,
  win_percent: f64,
  matches: u32,
}

impl From<&KillStats> for RatioView {
  fn from(stats: &KillStats) -> Self {
    Self {
      kd: stats.kd(),
      win_percent: stats.win_percent(),
      matches: stats.matches(),
    }
  }
}

/// Everything the banner page needs, shipped as one cookie.
#[derive(Serialize)]
struct Payload<'a> {
  profile: &'a ProfileData,
  history: &'a SeasonHistory,
  rank: RankView,
  minimum: RankView,
  below: RankView,
  above: RankView,
  general: RatioView,
  ranked: RatioView,
}

impl<'a> Payload<'a> {
  fn new(profile: &'a ProfileData, history: &'a SeasonHistory) -> Self {
    Self {
      profile,
      history,
      rank: history.rank().into(),
      minimum: history.minimum_rank().into(),
      below: history.rank_below_minimum().into(),
      above: history.rank_above_maximum().into(),
      general: (&profile.general.stats).into(),
      ranked: (&profile.ranked.stats).into(),
    }
  }
}

pub struct Render<'a> {
  store: &'a dyn CacheStore,
  engine: &'a dyn RenderEngine,
  ns: &'a Namespace,
  ttl: Duration,
  template: &'a Path,
}

impl<'a> Render<'a> {
  pub fn new(
    store: &'a dyn CacheStore,
    engine: &'a dyn RenderEngine,
    ns: &'a Namespace,
    ttl: Duration,
    template: &'a Path,
  ) -> Self {
    Self { store, engine, ns, ttl, template }
  }

  /// Banner image of `account`, reusing a cached render with the same key.
  ///
  /// Nothing is written unless the engine succeeds.
  pub async fn get(
    &self,
    account: &Account,
    profile: Option<&ProfileData>,
    history: Option<&SeasonHistory>,
    recache: bool,
  ) -> Result<Vec<u8>> {
    let profile =
      profile.ok_or(Error::Precondition("render without profile"))?;
    let history =
      history.ok_or(Error::Precondition("render without history"))?;

    let code = render_key(account, profile, history);
    let key = self.ns.render(account, code);

    if !recache
      && let Some(b64) = self.store.get_string(&key).await?
      && !b64.trim().is_empty()
    {
      debug!("Render cache hit for `{account}` ({code:016x})");
      return utils::decode_bytes(&b64);
    }

    info!("Rendering banner of `{account}` ({code:016x})");
    let payload = utils::to_base64(&Payload::new(profile, history))?;
    let bytes =
      self.engine.render(self.template, &[(PAYLOAD_COOKIE, payload)]).await?;

    let encoded = utils::encode_bytes(&bytes);
    self.store.set_string_ex(&key, &encoded, self.ttl).await?;

    Ok(bytes)
  }

  /// Drops every cached render of `account`, returning how many were removed.
  pub async fn clear(&self, account: &Account) -> Result<usize> {
    let mut removed = 0;
    for key in self.store.keys(&self.ns.renders(account)).await? {
      if self.store.delete(&key).await? {
        removed += 1;
      }
    }
    info!("Cleared {removed} renders of `{account}`");
    Ok(removed)
  }
}

use crate::{
  entity::{Account, ProfileData},
  prelude::*,
  store::{CacheStore, Namespace},
  upstream::Upstream,
};

pub struct Profile<'a> {
  store: &'a dyn CacheStore,
  api: &'a dyn Upstream,
  ns: &'a Namespace,
  ttl: Duration,
}

impl<'a> Profile<'a> {
  pub fn new(
    store: &'a dyn CacheStore,
    api: &'a dyn Upstream,
    ns: &'a Namespace,
    ttl: Duration,
  ) -> Self {
    Self { store, api, ns, ttl }
  }

  /// Current profile of `account`, served from cache unless `recache` is set
  /// or the cached copy expired.
  pub async fn get(
    &self,
    account: &Account,
    recache: bool,
  ) -> Result<ProfileData> {
    let key = self.ns.profile(account);

    if !recache
      && let Some(b64) = self.store.get_string(&key).await?
      && !b64.trim().is_empty()
    {
      debug!("Profile cache hit for `{account}`");
      return utils::from_base64(&b64);
    }

    info!("Fetching profile of `{account}`");
    let profile = self.api.profile(account).await?;

    let encoded = utils::to_base64(&profile)?;
    self.store.set_string_ex(&key, &encoded, self.ttl).await?;

    Ok(profile)
  }
}

//! Client for the third-party game statistics API.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
  entity::{Account, Operator, ProfileData},
  prelude::*,
};

pub type OperatorMap = HashMap<String, Option<Operator>>;

#[async_trait]
pub trait Upstream: Send + Sync {
  async fn profile(&self, account: &Account) -> Result<ProfileData>;

  /// Operator statistics keyed by operator name. The API reports operators
  /// it has no data for as `null`.
  async fn operators(&self, account: &Account) -> Result<OperatorMap>;
}

pub struct SiegeApi {
  client: Client,
  base: String,
}

impl SiegeApi {
  pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("dingo/", env!("CARGO_PKG_VERSION")))
      .timeout(timeout)
      .build()?;

    Ok(Self { client, base: base.into().trim_end_matches('/').to_string() })
  }

  async fn fetch<T: DeserializeOwned>(
    &self,
    endpoint: &str,
    account: &Account,
  ) -> Result<T> {
    let url = format!("{}/{endpoint}", self.base);
    debug!("GET {url} username={account}");

    let value = self
      .client
      .get(&url)
      .query(&[("username", account.as_str())])
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    Ok(value)
  }
}

#[async_trait]
impl Upstream for SiegeApi {
  async fn profile(&self, account: &Account) -> Result<ProfileData> {
    self.fetch("profile.php", account).await
  }

  async fn operators(&self, account: &Account) -> Result<OperatorMap> {
    self.fetch("operators.php", account).await
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use super::*;

  /// Canned upstream counting how often each endpoint is hit.
  #[derive(Default)]
  pub struct FakeApi {
    pub profiles: DashMap<Account, ProfileData>,
    pub operators: DashMap<Account, OperatorMap>,
    pub profile_calls: AtomicUsize,
    pub operator_calls: AtomicUsize,
  }

  impl FakeApi {
    pub fn with_profile(self, account: &Account, profile: ProfileData) -> Self {
      self.profiles.insert(account.clone(), profile);
      self
    }

    pub fn profile_calls(&self) -> usize {
      self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn operator_calls(&self) -> usize {
      self.operator_calls.load(Ordering::SeqCst)
    }
  }

  fn not_found(account: &Account) -> Error {
    Error::InvalidArgs(format!("no such account `{account}`"))
  }

  #[async_trait]
  impl Upstream for FakeApi {
    async fn profile(&self, account: &Account) -> Result<ProfileData> {
      self.profile_calls.fetch_add(1, Ordering::SeqCst);
      self
        .profiles
        .get(account)
        .map(|p| p.clone())
        .ok_or_else(|| not_found(account))
    }

    async fn operators(&self, account: &Account) -> Result<OperatorMap> {
      self.operator_calls.fetch_add(1, Ordering::SeqCst);
      Ok(self.operators.get(account).map(|o| o.clone()).unwrap_or_default())
    }
  }

  #[tokio::test]
  async fn unreachable_api_is_an_upstream_error() {
    let api =
      SiegeApi::new("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();
    let res = api.profile(&Account::new("Alice").unwrap()).await;
    assert!(matches!(res, Err(Error::Upstream(_))));
  }
}

use crate::{
  entity::{Account, Operator},
  prelude::*,
  store::{CacheStore, Namespace},
  upstream::{OperatorMap, Upstream},
};

pub struct Operators<'a> {
  store: &'a dyn CacheStore,
  api: &'a dyn Upstream,
  ns: &'a Namespace,
  ttl: Duration,
}

impl<'a> Operators<'a> {
  pub fn new(
    store: &'a dyn CacheStore,
    api: &'a dyn Upstream,
    ns: &'a Namespace,
    ttl: Duration,
  ) -> Self {
    Self { store, api, ns, ttl }
  }

  /// Operator statistics of `account`.
  ///
  /// The cache is a hash of individually encoded operators. An empty hash
  /// counts as "not cached", so an account the API reports no operators for
  /// is refetched on every call rather than pinned to an empty result.
  /// Operators the API returns as `null` are passed through to the caller
  /// but never written to the cache.
  pub async fn get(
    &self,
    account: &Account,
    recache: bool,
  ) -> Result<OperatorMap> {
    let key = self.ns.operators(account);

    if !recache {
      let cached = self.store.get_hash(&key).await?;
      if !cached.is_empty() {
        debug!("Operator cache hit for `{account}` ({})", cached.len());
        return cached
          .into_iter()
          .map(|(name, b64)| -> Result<(String, Option<Operator>)> {
            let op = utils::from_base64(&b64)?;
            Ok((name, Some(op)))
          })
          .collect();
      }
    }

    info!("Fetching operators of `{account}`");
    let operators = self.api.operators(account).await?;

    let encoded = operators
      .iter()
      .filter_map(|(name, op)| op.as_ref().map(|op| (name, op)))
      .map(|(name, op)| -> Result<(String, String)> {
        Ok((name.clone(), utils::to_base64(op)?))
      })
      .collect::<Result<HashMap<_, _>>>()?;

    self.store.set_hash_ex(&key, &encoded, self.ttl).await?;

    Ok(operators)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    store::{MemoryStore, tests::BrokenExpiry},
    upstream::tests::FakeApi,
  };

  fn op(name: &str, kills: u32) -> Operator {
    let mut op = Operator { name: name.into(), ..Default::default() };
    op.stats.kills = kills;
    op
  }

  #[tokio::test]
  async fn caches_non_null_operators() {
    let alice = Account::new("alice").unwrap();
    let api = FakeApi::default();
    api.operators.insert(
      alice.clone(),
      HashMap::from([
        ("ash".to_string(), Some(op("Ash", 10))),
        ("recruit".to_string(), None),
      ]),
    );
    let store = MemoryStore::new();
    let ns = Namespace::new(["test"]);
    let sv = Operators::new(&store, &api, &ns, Duration::from_secs(1800));

    let fetched = sv.get(&alice, false).await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert!(fetched["recruit"].is_none());

    let stored = store.get_hash(&ns.operators(&alice)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored.contains_key("ash"));

    let cached = sv.get(&alice, false).await.unwrap();
    assert_eq!(api.operator_calls(), 1);
    assert_eq!(cached.len(), 1);
    assert_eq!(cached["ash"].as_ref().unwrap().stats.kills, 10);
  }

  #[tokio::test]
  async fn empty_result_is_never_trusted() {
    let alice = Account::new("alice").unwrap();
    let api = FakeApi::default();
    let store = MemoryStore::new();
    let ns = Namespace::new(["test"]);
    let sv = Operators::new(&store, &api, &ns, Duration::from_secs(1800));

    assert!(sv.get(&alice, false).await.unwrap().is_empty());
    assert_eq!(store.len(), 0);

    assert!(sv.get(&alice, false).await.unwrap().is_empty());
    assert_eq!(api.operator_calls(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn cached_operators_expire_without_separate_expiry_call() {
    let alice = Account::new("alice").unwrap();
    let api = FakeApi::default();
    api.operators.insert(
      alice.clone(),
      HashMap::from([("ash".to_string(), Some(op("Ash", 10)))]),
    );
    let store = BrokenExpiry::default();
    let ns = Namespace::new(["test"]);
    let sv = Operators::new(&store, &api, &ns, Duration::from_secs(1800));

    sv.get(&alice, false).await.unwrap();
    sv.get(&alice, false).await.unwrap();
    assert_eq!(api.operator_calls(), 1);

    time::advance(Duration::from_secs(1801)).await;
    assert!(store.get_hash(&ns.operators(&alice)).await.unwrap().is_empty());
    sv.get(&alice, false).await.unwrap();
    assert_eq!(api.operator_calls(), 2);
  }

  #[tokio::test]
  async fn recache_replaces_stale_entries() {
    let alice = Account::new("alice").unwrap();
    let api = FakeApi::default();
    api.operators.insert(
      alice.clone(),
      HashMap::from([("ash".to_string(), Some(op("Ash", 1)))]),
    );
    let store = MemoryStore::new();
    let ns = Namespace::new(["test"]);
    let sv = Operators::new(&store, &api, &ns, Duration::from_secs(1800));
    sv.get(&alice, false).await.unwrap();

    api.operators.insert(
      alice.clone(),
      HashMap::from([("thermite".to_string(), Some(op("Thermite", 4)))]),
    );
    sv.get(&alice, true).await.unwrap();

    let stored = store.get_hash(&ns.operators(&alice)).await.unwrap();
    assert_eq!(stored.keys().collect::<Vec<_>>(), ["thermite"]);
  }
}

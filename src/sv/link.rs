use crate::{
  entity::Account,
  prelude::*,
  store::{CacheStore, Namespace},
};

/// Chat user to game account bindings. Links never expire.
pub struct Link<'a> {
  store: &'a dyn CacheStore,
  ns: &'a Namespace,
}

impl<'a> Link<'a> {
  pub fn new(store: &'a dyn CacheStore, ns: &'a Namespace) -> Self {
    Self { store, ns }
  }

  pub async fn link(&self, user_id: i64, account: &Account) -> Result<()> {
    self.store.set_string(&self.ns.link(user_id), account.as_str()).await?;
    info!("Linked user {user_id} to `{account}`");
    Ok(())
  }

  pub async fn linked(&self, user_id: i64) -> Result<Option<Account>> {
    let stored = self.store.get_string(&self.ns.link(user_id)).await?;
    match stored {
      Some(name) if !name.trim().is_empty() => Account::new(name).map(Some),
      _ => Ok(None),
    }
  }
}

#[cfg(test)]
mod tests {
  use tokio_test::assert_err;

  use super::*;
  use crate::store::MemoryStore;

  #[tokio::test]
  async fn links_round_trip() {
    let store = MemoryStore::new();
    let ns = Namespace::new(["test"]);
    let sv = Link::new(&store, &ns);

    assert_eq!(sv.linked(42).await.unwrap(), None);

    sv.link(42, &Account::new(" Alice ").unwrap()).await.unwrap();
    let alice = Account::new("alice").unwrap();
    assert_eq!(sv.linked(42).await.unwrap(), Some(alice));

    sv.link(42, &Account::new("bob").unwrap()).await.unwrap();
    let bob = Account::new("bob").unwrap();
    assert_eq!(sv.linked(42).await.unwrap(), Some(bob));
    assert_eq!(sv.linked(7).await.unwrap(), None);
  }

  #[tokio::test]
  async fn corrupt_link_is_an_error() {
    let store = MemoryStore::new();
    let ns = Namespace::new(["test"]);
    let sv = Link::new(&store, &ns);

    store.set_string(&ns.link(42), "").await.unwrap();
    assert_eq!(sv.linked(42).await.unwrap(), None);

    store.set_string(&ns.link(42), "bob:*").await.unwrap();
    assert_err!(sv.linked(42).await);
  }
}

use redis::{ErrorKind, RedisError};
use tokio::time::Instant;

use super::CacheStore;
use crate::prelude::*;

#[derive(Debug, Clone)]
enum Value {
  String(String),
  Hash(HashMap<String, String>),
}

#[derive(Debug, Clone)]
struct Entry {
  value: Value,
  expires_at: Option<Instant>,
}

impl Entry {
  fn new(value: Value, ttl: Option<Duration>) -> Self {
    Self { value, expires_at: ttl.map(|ttl| Instant::now() + ttl) }
  }

  fn is_expired(&self, now: Instant) -> bool {
    self.expires_at.is_some_and(|at| at <= now)
  }
}

fn wrong_type() -> Error {
  RedisError::from((
    ErrorKind::TypeError,
    "WRONGTYPE Operation against a key holding the wrong kind of value",
  ))
  .into()
}

/// In-process store for running without Redis.
///
/// Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryStore {
  entries: DashMap<String, Entry>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn live(&self, key: &str) -> Option<Value> {
    let now = Instant::now();
    self.entries.remove_if(key, |_, entry| entry.is_expired(now));
    self.entries.get(key).map(|entry| entry.value.clone())
  }

  fn put_string(&self, key: &str, value: &str, ttl: Option<Duration>) {
    let entry = Entry::new(Value::String(value.to_string()), ttl);
    self.entries.insert(key.to_string(), entry);
  }

  fn put_hash(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
    ttl: Option<Duration>,
  ) {
    if entries.is_empty() {
      self.entries.remove(key);
    } else {
      let entry = Entry::new(Value::Hash(entries.clone()), ttl);
      self.entries.insert(key.to_string(), entry);
    }
  }

  pub fn len(&self) -> usize {
    let now = Instant::now();
    self.entries.retain(|_, entry| !entry.is_expired(now));
    self.entries.len()
  }
}

#[async_trait]
impl CacheStore for MemoryStore {
  async fn get_string(&self, key: &str) -> Result<Option<String>> {
    match self.live(key) {
      Some(Value::String(value)) => Ok(Some(value)),
      Some(Value::Hash(_)) => Err(wrong_type()),
      None => Ok(None),
    }
  }

  async fn set_string(&self, key: &str, value: &str) -> Result<()> {
    self.put_string(key, value, None);
    Ok(())
  }

  async fn set_string_ex(
    &self,
    key: &str,
    value: &str,
    ttl: Duration,
  ) -> Result<()> {
    self.put_string(key, value, Some(ttl));
    Ok(())
  }

  async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
    let now = Instant::now();
    if let Some(mut entry) = self.entries.get_mut(key)
      && !entry.is_expired(now)
    {
      entry.expires_at = Some(now + ttl);
    }
    Ok(())
  }

  async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>> {
    match self.live(key) {
      Some(Value::Hash(entries)) => Ok(entries),
      Some(Value::String(_)) => Err(wrong_type()),
      None => Ok(HashMap::new()),
    }
  }

  async fn set_hash(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
  ) -> Result<()> {
    self.put_hash(key, entries, None);
    Ok(())
  }

  async fn set_hash_ex(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
    ttl: Duration,
  ) -> Result<()> {
    self.put_hash(key, entries, Some(ttl));
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<bool> {
    let now = Instant::now();
    Ok(
      self
        .entries
        .remove(key)
        .is_some_and(|(_, entry)| !entry.is_expired(now)),
    )
  }

  async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
    let now = Instant::now();
    let matches = |key: &str| match pattern.strip_suffix('*') {
      Some(prefix) => key.starts_with(prefix),
      None => key == pattern,
    };

    Ok(
      self
        .entries
        .iter()
        .filter(|entry| !entry.is_expired(now) && matches(entry.key()))
        .map(|entry| entry.key().clone())
        .collect(),
    )
  }
}

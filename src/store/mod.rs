//! Key-value cache store the tracker keeps its state in.

mod memory;
mod namespace;
mod redis;

pub use memory::MemoryStore;
pub use namespace::Namespace;
pub use self::redis::RedisStore;

use crate::prelude::*;

/// Operations the tracker needs from its backing store.
///
/// Writes are last-writer-wins per key. Keys are scoped per account by
/// [`Namespace`], so accounts never contend on a key; concurrent updates
/// of the *same* account are not serialized.
#[async_trait]
pub trait CacheStore: Send + Sync {
  async fn get_string(&self, key: &str) -> Result<Option<String>>;

  /// Stores `value`, clearing any expiry previously set on `key`.
  async fn set_string(&self, key: &str, value: &str) -> Result<()>;

  /// Stores `value` and its expiry in one write, so a failure never leaves
  /// the value behind without a deadline.
  async fn set_string_ex(
    &self,
    key: &str,
    value: &str,
    ttl: Duration,
  ) -> Result<()>;

  /// No-op when `key` does not exist.
  async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()>;

  /// Empty when `key` does not exist.
  async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>>;

  /// Replaces the whole hash. An empty map leaves `key` absent.
  async fn set_hash(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
  ) -> Result<()>;

  /// [`CacheStore::set_hash`] with an expiry, applied atomically.
  async fn set_hash_ex(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
    ttl: Duration,
  ) -> Result<()>;

  async fn delete(&self, key: &str) -> Result<bool>;

  /// Keys matching a glob `pattern`; only a trailing `*` is portable.
  async fn keys(&self, pattern: &str) -> Result<Vec<String>>;
}

use redis::{Cmd, Pipeline, aio::MultiplexedConnection};

use super::CacheStore;
use crate::prelude::*;

const SCAN_BATCH: usize = 100;

/// Redis-backed store sharing one multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
  conn: MultiplexedConnection,
}

impl RedisStore {
  pub async fn connect(url: &str) -> Result<Self> {
    let client = redis::Client::open(url)?;
    let conn = client.get_multiplexed_tokio_connection().await?;
    info!("Connected to redis");
    Ok(Self { conn })
  }
}

fn millis(ttl: Duration) -> u64 {
  ttl.as_millis().clamp(1, u64::MAX as u128) as u64
}

fn set_string_cmd(key: &str, value: &str, ttl: Option<Duration>) -> Cmd {
  let mut cmd = redis::cmd("SET");
  cmd.arg(key).arg(value);
  if let Some(ttl) = ttl {
    cmd.arg("PX").arg(millis(ttl));
  }
  cmd
}

/// Replaces the hash at `key` in one transaction. An empty map only deletes,
/// so the key stays absent and no expiry is set.
fn set_hash_pipe(
  key: &str,
  entries: &HashMap<String, String>,
  ttl: Option<Duration>,
) -> Pipeline {
  let mut pipe = redis::pipe();
  pipe.atomic().cmd("DEL").arg(key).ignore();

  if !entries.is_empty() {
    let cmd = pipe.cmd("HSET").arg(key);
    for (field, value) in entries {
      cmd.arg(field).arg(value);
    }
    cmd.ignore();

    if let Some(ttl) = ttl {
      pipe.cmd("PEXPIRE").arg(key).arg(millis(ttl)).ignore();
    }
  }

  pipe
}

#[async_trait]
impl CacheStore for RedisStore {
  async fn get_string(&self, key: &str) -> Result<Option<String>> {
    let mut conn = self.conn.clone();
    let value: Option<String> =
      redis::cmd("GET").arg(key).query_async(&mut conn).await?;
    Ok(value)
  }

  async fn set_string(&self, key: &str, value: &str) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () =
      set_string_cmd(key, value, None).query_async(&mut conn).await?;
    Ok(())
  }

  async fn set_string_ex(
    &self,
    key: &str,
    value: &str,
    ttl: Duration,
  ) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () =
      set_string_cmd(key, value, Some(ttl)).query_async(&mut conn).await?;
    Ok(())
  }

  async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: i64 = redis::cmd("PEXPIRE")
      .arg(key)
      .arg(millis(ttl))
      .query_async(&mut conn)
      .await?;
    Ok(())
  }

  async fn get_hash(&self, key: &str) -> Result<HashMap<String, String>> {
    let mut conn = self.conn.clone();
    let entries: HashMap<String, String> =
      redis::cmd("HGETALL").arg(key).query_async(&mut conn).await?;
    Ok(entries)
  }

  async fn set_hash(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
  ) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () =
      set_hash_pipe(key, entries, None).query_async(&mut conn).await?;
    Ok(())
  }

  async fn set_hash_ex(
    &self,
    key: &str,
    entries: &HashMap<String, String>,
    ttl: Duration,
  ) -> Result<()> {
    let mut conn = self.conn.clone();
    let _: () =
      set_hash_pipe(key, entries, Some(ttl)).query_async(&mut conn).await?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<bool> {
    let mut conn = self.conn.clone();
    let removed: i64 =
      redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
    Ok(removed > 0)
  }

  async fn keys(&self, pattern: &str) -> Result<Vec<String>> {
    let mut conn = self.conn.clone();
    let mut cursor = 0u64;
    let mut keys = Vec::new();

    loop {
      let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
        .arg(cursor)
        .arg("MATCH")
        .arg(pattern)
        .arg("COUNT")
        .arg(SCAN_BATCH)
        .query_async(&mut conn)
        .await?;

      keys.extend(batch);
      if next == 0 {
        break;
      }
      cursor = next;
    }

    Ok(keys)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Command names and arguments of a packed RESP request, in order.
  fn words(packed: Vec<u8>) -> Vec<String> {
    String::from_utf8_lossy(&packed)
      .split("\r\n")
      .filter(|part| !part.is_empty())
      .filter(|part| !part.starts_with(['*', '$']))
      .map(str::to_string)
      .collect()
  }

  #[test]
  fn string_ttl_travels_with_the_write() {
    let ttl = Duration::from_secs(120);
    assert_eq!(
      words(set_string_cmd("k", "v", Some(ttl)).get_packed_command()),
      ["SET", "k", "v", "PX", "120000"]
    );
    assert_eq!(
      words(set_string_cmd("k", "v", None).get_packed_command()),
      ["SET", "k", "v"]
    );
  }

  #[test]
  fn sub_millisecond_ttl_rounds_up() {
    assert_eq!(millis(Duration::from_micros(10)), 1);
  }

  #[test]
  fn hash_replace_is_one_transaction_with_expiry() {
    let entries = HashMap::from([("sea".to_string(), "7".to_string())]);
    let pipe = set_hash_pipe("h", &entries, Some(Duration::from_secs(2)));

    assert_eq!(
      words(pipe.get_packed_pipeline()),
      [
        "MULTI", "DEL", "h", "HSET", "h", "sea", "7", "PEXPIRE", "h", "2000",
        "EXEC"
      ]
    );
  }

  #[test]
  fn empty_hash_only_deletes() {
    let ttl = Some(Duration::from_secs(2));
    let pipe = set_hash_pipe("h", &HashMap::new(), ttl);
    assert_eq!(
      words(pipe.get_packed_pipeline()),
      ["MULTI", "DEL", "h", "EXEC"]
    );
  }

  /// Runs against a live server when `REDIS_URL` is set.
  #[tokio::test]
  async fn live_round_trip() {
    let Ok(url) = std::env::var("REDIS_URL") else {
      return;
    };
    let store = RedisStore::connect(&url).await.unwrap();
    let key = format!("dingo-test:{}", std::process::id());

    store.set_hash(&key, &HashMap::new()).await.unwrap();
    assert!(store.get_hash(&key).await.unwrap().is_empty());
    assert!(store.keys(&key).await.unwrap().is_empty());

    let entries = HashMap::from([("a".to_string(), "1".to_string())]);
    store
      .set_hash_ex(&key, &entries, Duration::from_secs(60))
      .await
      .unwrap();
    assert_eq!(store.get_hash(&key).await.unwrap(), entries);

    store.set_hash(&key, &HashMap::new()).await.unwrap();
    assert!(store.get_hash(&key).await.unwrap().is_empty());

    store
      .set_string_ex(&key, "v", Duration::from_secs(60))
      .await
      .unwrap();
    assert_eq!(store.get_string(&key).await.unwrap().as_deref(), Some("v"));
    assert!(store.delete(&key).await.unwrap());
    assert!(!store.delete(&key).await.unwrap());
  }
}

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Serialize, de::DeserializeOwned};

use crate::prelude::*;

/// Encodes a value as base64 of its JSON form.
///
/// Every value the tracker keeps in the cache store, and the payload handed
/// to the renderer, goes through this pair so that each entry decodes on its
/// own without any schema outside the value itself.
pub fn to_base64<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  let bytes = json::to_vec(value)?;
  Ok(STANDARD.encode(bytes))
}

pub fn from_base64<T: DeserializeOwned>(b64: &str) -> Result<T> {
  let bytes = STANDARD.decode(b64.trim())?;
  Ok(json::from_slice(&bytes)?)
}

pub fn encode_bytes(bytes: &[u8]) -> String {
  STANDARD.encode(bytes)
}

pub fn decode_bytes(b64: &str) -> Result<Vec<u8>> {
  Ok(STANDARD.decode(b64.trim())?)
}

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a over a sequence of fields.
///
/// Fields are separated by a 0x1f unit separator so that `("ab", "c")` and
/// `("a", "bc")` hash differently.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a(u64);

impl Fnv1a {
  pub fn new() -> Self {
    Self(FNV_OFFSET)
  }

  fn write(&mut self, bytes: &[u8]) {
    for &byte in bytes {
      self.0 ^= byte as u64;
      self.0 = self.0.wrapping_mul(FNV_PRIME);
    }
  }

  pub fn field(mut self, value: impl AsRef<[u8]>) -> Self {
    self.write(value.as_ref());
    self.write(&[0x1f]);
    self
  }

  pub fn finish(self) -> u64 {
    self.0
  }
}

impl Default for Fnv1a {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fnv1a_matches_reference_vectors() {
    // reference values for the bare algorithm, without separators
    let mut empty = Fnv1a::new();
    empty.write(b"");
    assert_eq!(empty.finish(), 0xcbf29ce484222325);

    let mut a = Fnv1a::new();
    a.write(b"a");
    assert_eq!(a.finish(), 0xaf63dc4c8601ec8c);
  }

  #[test]
  fn fnv1a_field_boundaries_matter() {
    let left = Fnv1a::new().field("ab").field("c").finish();
    let right = Fnv1a::new().field("a").field("bc").finish();
    assert_ne!(left, right);
  }

  #[test]
  fn base64_rejects_garbage() {
    let res: Result<HashMap<String, u32>> = from_base64("not base64 at all!");
    assert!(matches!(res, Err(Error::Codec(_))));

    let res: Result<HashMap<String, u32>> = from_base64(&encode_bytes(b"{"));
    assert!(matches!(res, Err(Error::Codec(_))));
  }
}

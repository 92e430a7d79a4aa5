//! Error types for the profile tracker

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Network, HTTP status or body decode failure talking to the stats API.
  #[error("Upstream error: {0}")]
  Upstream(#[from] reqwest::Error),

  #[error("Cache store error: {0}")]
  CacheStore(#[from] redis::RedisError),

  /// A stored or outgoing payload could not be encoded or decoded.
  #[error("Codec error: {0}")]
  Codec(String),

  #[error("Render error: {0}")]
  Render(String),

  #[error("Precondition failed: {0}")]
  Precondition(&'static str),

  #[error("No profile available")]
  NoProfile,

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("{0}")]
  InvalidArgs(String),
}

impl From<json::Error> for Error {
  fn from(err: json::Error) -> Self {
    Error::Codec(format!("json: {err}"))
  }
}

impl From<base64::DecodeError> for Error {
  fn from(err: base64::DecodeError) -> Self {
    Error::Codec(format!("base64: {err}"))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

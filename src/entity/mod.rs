pub mod history;
pub mod operator;
pub mod profile;
pub mod rank;

use std::fmt;

pub use history::{HistoryEvent, SeasonHistory};
pub use operator::Operator;
pub use profile::{KillStats, ProfileData};
pub use rank::Rank;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Game account name, case-folded the way the stats API expects it.
///
/// Names end up as a segment of store keys and of SCAN patterns, so the key
/// separator and glob metacharacters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Account(String);

impl Account {
  pub fn new(name: impl AsRef<str>) -> Result<Self> {
    let name = name.as_ref().trim();
    if name.is_empty() {
      return Err(Error::InvalidArgs("Account name is empty".into()));
    }
    let reserved = |c: char| {
      matches!(c, ':' | '*' | '?' | '[' | ']' | '\\')
        || c.is_whitespace()
        || c.is_control()
    };
    if let Some(bad) = name.chars().find(|&c| reserved(c)) {
      return Err(Error::InvalidArgs(format!(
        "Account name must not contain `{}`",
        bad.escape_default()
      )));
    }
    Ok(Self(name.to_lowercase()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for Account {
  type Error = Error;

  fn try_from(name: String) -> Result<Self> {
    Self::new(name)
  }
}

impl From<Account> for String {
  fn from(account: Account) -> Self {
    account.0
  }
}

impl fmt::Display for Account {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

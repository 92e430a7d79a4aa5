use std::fmt::Display;

use crate::entity::Account;

const SEPARATOR: char = ':';

/// Builds hierarchical store keys under a fixed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
  root: String,
}

impl Namespace {
  pub fn new<I, S>(segments: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Display,
  {
    Self { root: join(segments) }
  }

  pub fn combine<I, S>(&self, segments: I) -> String
  where
    I: IntoIterator<Item = S>,
    S: Display,
  {
    let tail = join(segments);
    match (self.root.is_empty(), tail.is_empty()) {
      (true, _) => tail,
      (_, true) => self.root.clone(),
      _ => format!("{}{SEPARATOR}{tail}", self.root),
    }
  }

  fn account(&self, account: &Account, leaf: &str) -> String {
    self.combine(["profiles", account.as_str(), leaf])
  }

  pub fn profile(&self, account: &Account) -> String {
    self.account(account, "b64")
  }

  pub fn operators(&self, account: &Account) -> String {
    self.account(account, "operators")
  }

  pub fn history(&self, account: &Account) -> String {
    self.account(account, "history")
  }

  pub fn render(&self, account: &Account, code: u64) -> String {
    format!("{}{SEPARATOR}{code}", self.account(account, "render"))
  }

  /// Pattern matching every render variant of `account`.
  pub fn renders(&self, account: &Account) -> String {
    format!("{}{SEPARATOR}*", self.account(account, "render"))
  }

  pub fn link(&self, user_id: i64) -> String {
    self.combine(["links".to_string(), user_id.to_string()])
  }
}

fn join<I, S>(segments: I) -> String
where
  I: IntoIterator<Item = S>,
  S: Display,
{
  segments
    .into_iter()
    .map(|s| s.to_string())
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(&SEPARATOR.to_string())
}

use super::{History, Operators, Profile, Render};
use crate::{
  entity::{Account, HistoryEvent, ProfileData, SeasonHistory},
  prelude::*,
  upstream::OperatorMap,
};

/// Outcome of one pass of the update pipeline.
#[derive(Debug, Clone)]
pub struct TrackedProfile {
  pub account: Account,
  pub profile: ProfileData,
  pub operators: OperatorMap,
  pub history: SeasonHistory,
  pub events: Vec<HistoryEvent>,
}

/// Runs profile, operators and history in order, then renders on demand.
pub struct Tracker<'a> {
  pub profile: Profile<'a>,
  pub operators: Operators<'a>,
  pub history: History<'a>,
  pub render: Render<'a>,
  season: u32,
}

impl<'a> Tracker<'a> {
  pub fn new(
    profile: Profile<'a>,
    operators: Operators<'a>,
    history: History<'a>,
    render: Render<'a>,
    season: u32,
  ) -> Self {
    Self { profile, operators, history, render, season }
  }

  /// `force` bypasses both fetch caches. Stages run strictly in sequence
  /// since each consumes the output of the previous one.
  pub async fn update(
    &self,
    account: &Account,
    force: bool,
  ) -> Result<TrackedProfile> {
    let profile = self.profile.get(account, force).await?;
    let operators = self.operators.get(account, force).await?;
    let update =
      self.history.update(account, self.season, Some(&profile)).await?;

    Ok(TrackedProfile {
      account: account.clone(),
      profile,
      operators,
      history: update.history,
      events: update.events,
    })
  }

  pub async fn render(
    &self,
    tracked: &TrackedProfile,
    force: bool,
  ) -> Result<Vec<u8>> {
    self
      .render
      .get(
        &tracked.account,
        Some(&tracked.profile),
        Some(&tracked.history),
        force,
      )
      .await
  }
}

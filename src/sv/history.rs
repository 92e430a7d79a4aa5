use crate::{
  entity::{Account, HistoryEvent, ProfileData, SeasonHistory},
  prelude::*,
  store::{CacheStore, Namespace},
};

/// Result of folding one snapshot into the season history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryUpdate {
  pub history: SeasonHistory,
  /// Empty unless an existing history of the same season was merged
  pub events: Vec<HistoryEvent>,
}

pub struct History<'a> {
  store: &'a dyn CacheStore,
  ns: &'a Namespace,
}

impl<'a> History<'a> {
  pub fn new(store: &'a dyn CacheStore, ns: &'a Namespace) -> Self {
    Self { store, ns }
  }

  pub async fn get(&self, account: &Account) -> Result<Option<SeasonHistory>> {
    let fields = self.store.get_hash(&self.ns.history(account)).await?;
    SeasonHistory::from_fields(&fields)
  }

  /// Folds `profile` into the stored history of `season`.
  ///
  /// A stored history from another season is discarded and a new baseline
  /// is seeded from the snapshot. Callers must not run this concurrently
  /// for one account; the last write wins.
  pub async fn update(
    &self,
    account: &Account,
    season: u32,
    profile: Option<&ProfileData>,
  ) -> Result<HistoryUpdate> {
    let profile = profile.ok_or(Error::NoProfile)?;

    let update = match self.get(account).await? {
      Some(previous) if previous.season == season => {
        merge(&previous, profile)
      }
      stale => {
        if let Some(stale) = stale {
          info!(
            "Discarding season {} history of `{account}` for season {season}",
            stale.season
          );
        }
        HistoryUpdate {
          history: SeasonHistory::seed(season, profile),
          events: Vec::new(),
        }
      }
    };

    let key = self.ns.history(account);
    self.store.set_hash(&key, &update.history.to_fields()).await?;

    for event in &update.events {
      debug!("History event for `{account}`: {event:?}");
    }

    Ok(update)
  }
}

fn merge(previous: &SeasonHistory, profile: &ProfileData) -> HistoryUpdate {
  let current = previous.merge(profile);
  let mut events = Vec::new();

  if current.maximum_rank() > previous.maximum_rank() {
    events.push(HistoryEvent::SeasonHigh { previous: *previous, current });
  }

  if current.rank() != previous.rank() {
    events.push(HistoryEvent::RankChange { previous: *previous, current });
  }

  HistoryUpdate { history: current, events }
}

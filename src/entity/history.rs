use serde::{Deserialize, Serialize};

use super::{ProfileData, Rank};
use crate::prelude::*;

/// Rating history of one account for one season.
///
/// Replaced wholesale on every update so the previous value stays available
/// for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonHistory {
  pub season: u32,
  pub minimum: u32,
  pub maximum: u32,
  pub average: u32,
  pub current: u32,
}

impl SeasonHistory {
  /// Fresh baseline for `season` taken from a snapshot's current rating.
  pub fn seed(season: u32, profile: &ProfileData) -> Self {
    Self {
      season,
      minimum: profile.mmr(),
      maximum: profile.mmr(),
      average: profile.average_mmr(),
      current: profile.mmr(),
    }
  }

  /// Widens the season bounds with a newer snapshot.
  pub fn merge(&self, profile: &ProfileData) -> Self {
    Self {
      season: self.season,
      minimum: self.minimum.min(profile.mmr()),
      maximum: self.maximum.max(profile.best_mmr()),
      average: profile.average_mmr(),
      current: profile.mmr(),
    }
  }

  pub fn rank(&self) -> Rank {
    Rank::classify(self.current)
  }

  pub fn minimum_rank(&self) -> Rank {
    Rank::classify(self.minimum)
  }

  pub fn maximum_rank(&self) -> Rank {
    Rank::classify(self.maximum)
  }

  pub fn rank_below_minimum(&self) -> Rank {
    Rank::next_below(self.minimum)
  }

  pub fn rank_above_maximum(&self) -> Rank {
    Rank::next_above(self.maximum)
  }

  // Field names follow the hash layout used by earlier deployments.
  const SEASON: &'static str = "sea";
  const MINIMUM: &'static str = "min";
  const AVERAGE: &'static str = "avg";
  const MAXIMUM: &'static str = "max";
  const CURRENT: &'static str = "now";

  pub fn to_fields(&self) -> HashMap<String, String> {
    [
      (Self::SEASON, self.season),
      (Self::MINIMUM, self.minimum),
      (Self::AVERAGE, self.average),
      (Self::MAXIMUM, self.maximum),
      (Self::CURRENT, self.current),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
  }

  /// Decodes a stored hash. An empty hash means nothing is stored.
  pub fn from_fields(fields: &HashMap<String, String>) -> Result<Option<Self>> {
    if fields.is_empty() {
      return Ok(None);
    }

    let field = |name: &str| -> Result<u32> {
      fields
        .get(name)
        .ok_or_else(|| Error::Codec(format!("history is missing `{name}`")))?
        .parse()
        .map_err(|err| Error::Codec(format!("history `{name}`: {err}")))
    };

    Ok(Some(Self {
      season: field(Self::SEASON)?,
      minimum: field(Self::MINIMUM)?,
      average: field(Self::AVERAGE)?,
      maximum: field(Self::MAXIMUM)?,
      current: field(Self::CURRENT)?,
    }))
  }
}

/// Raised while merging a new snapshot into the season history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
  /// The season maximum reached a higher tier than before.
  SeasonHigh { previous: SeasonHistory, current: SeasonHistory },
  /// The current tier moved, in either direction.
  RankChange { previous: SeasonHistory, current: SeasonHistory },
}

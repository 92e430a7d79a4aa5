use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Kill/death/win counters shared by mode and operator statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KillStats {
  #[serde(default)]
  pub kills: u32,
  #[serde(default)]
  pub deaths: u32,
  #[serde(default)]
  pub headshots: u32,
  #[serde(default)]
  pub wins: u32,
  #[serde(default)]
  pub losses: u32,
  #[serde(default, rename = "total_xp")]
  pub total_experience: u64,
  #[serde(default)]
  pub melee_kills: u32,
  #[serde(default, rename = "dbnos")]
  pub down_not_outs: u32,
  #[serde(default)]
  pub blind_kills: u32,
  #[serde(default)]
  pub time_played: String,
}

impl KillStats {
  pub fn kd(&self) -> f64 {
    ratio(self.kills, self.deaths)
  }

  pub fn matches(&self) -> u32 {
    self.wins.saturating_add(self.losses)
  }

  pub fn win_percent(&self) -> f64 {
    ratio(self.wins, self.matches())
  }
}

fn ratio(num: u32, den: u32) -> f64 {
  if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Statistics for one play mode (overall, casual or ranked).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeStats {
  #[serde(flatten)]
  pub stats: KillStats,
  #[serde(default, rename = "kills-match")]
  pub kills_per_match: f64,
  #[serde(default, rename = "kills-min")]
  pub kills_per_minute: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Links {
  pub url: String,
  pub avatar: String,
  /// Rank icon
  #[serde(default)]
  pub rank: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
  #[serde(default)]
  pub level: u32,
  #[serde(default)]
  pub mmr: u32,
  #[serde(default)]
  pub best_mmr: u32,
  #[serde(default, rename = "avg_seasonal_mmr")]
  pub average_mmr: u32,
  /// Rank label as the stats site spells it
  #[serde(default)]
  pub rank: String,
  #[serde(default)]
  pub time_played: String,
}

/// Profile snapshot as returned by the stats API.
///
/// Never mutated after fetch; a refresh replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
  pub name: String,
  pub link: Links,
  pub meta: Meta,
  /// Most played operators mapped to their icon URL
  #[serde(default)]
  pub top_operators: HashMap<String, String>,
  #[serde(default)]
  pub general: ModeStats,
  #[serde(default)]
  pub casual: ModeStats,
  #[serde(default)]
  pub ranked: ModeStats,
}

impl ProfileData {
  pub fn mmr(&self) -> u32 {
    self.meta.mmr
  }

  pub fn best_mmr(&self) -> u32 {
    self.meta.best_mmr
  }

  pub fn average_mmr(&self) -> u32 {
    self.meta.average_mmr
  }

  pub fn avatar(&self) -> &str {
    &self.link.avatar
  }

  pub fn time_played(&self) -> &str {
    &self.meta.time_played
  }
}

use serde::{Deserialize, Serialize};

use super::KillStats;

/// Per-operator statistics of one account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operator {
  #[serde(default)]
  pub name: String,
  #[serde(default, rename = "img")]
  pub image_url: String,
  /// Attack or defence
  #[serde(default)]
  pub team: String,
  #[serde(flatten)]
  pub stats: KillStats,
  #[serde(default, rename = "kills-match")]
  pub kills_per_match: f64,
  #[serde(default, rename = "kills-min")]
  pub kills_per_minute: f64,
  #[serde(default)]
  pub operator_stat: u32,
}

impl Operator {
  pub fn is_recruit(&self) -> bool {
    self.image_url.ends_with("recruit.png")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;

  #[test]
  fn decodes_operator_map_with_nulls() {
    let doc = json::json!({
      "ash": {
        "name": "Ash",
        "img": "https://cdn.example/ash.png",
        "team": "atk",
        "kills": 120,
        "deaths": 80,
        "total_xp": 50000,
        "kills-match": 1.2
      },
      "recruit": null
    });

    let ops: HashMap<String, Option<Operator>> = json::from_value(doc).unwrap();
    let ash = ops["ash"].as_ref().unwrap();

    assert_eq!(ash.name, "Ash");
    assert_eq!(ash.stats.kills, 120);
    assert_eq!(ash.stats.total_experience, 50000);
    assert_eq!(ash.kills_per_match, 1.2);
    assert!(!ash.is_recruit());
    assert!(ops["recruit"].is_none());
  }
}

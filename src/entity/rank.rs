use std::fmt;

use serde::{Deserialize, Serialize};

/// Ranked tier, ordered from lowest to highest.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Rank {
  Unranked,

  CopperV,
  CopperIV,
  CopperIII,
  CopperII,
  CopperI,

  BronzeV,
  BronzeIV,
  BronzeIII,
  BronzeII,
  BronzeI,

  SilverV,
  SilverIV,
  SilverIII,
  SilverII,
  SilverI,

  GoldIII,
  GoldII,
  GoldI,

  PlatinumIII,
  PlatinumII,
  PlatinumI,

  Diamond,
  Champion,
}

/// Minimum rating of every tier, in declaration order.
///
/// `BronzeIII` and `BronzeII` share the 1900 boundary. When thresholds tie the
/// tier declared last wins, so no rating classifies as `BronzeIII`; it is only
/// ever reported as the tier above a `BronzeIV` rating.
const TIERS: [(Rank, u32); 24] = [
  (Rank::Unranked, 0),
  (Rank::CopperV, 1),
  (Rank::CopperIV, 1200),
  (Rank::CopperIII, 1300),
  (Rank::CopperII, 1400),
  (Rank::CopperI, 1500),
  (Rank::BronzeV, 1600),
  (Rank::BronzeIV, 1700),
  (Rank::BronzeIII, 1900),
  (Rank::BronzeII, 1900),
  (Rank::BronzeI, 2000),
  (Rank::SilverV, 2100),
  (Rank::SilverIV, 2200),
  (Rank::SilverIII, 2300),
  (Rank::SilverII, 2400),
  (Rank::SilverI, 2500),
  (Rank::GoldIII, 2600),
  (Rank::GoldII, 2800),
  (Rank::GoldI, 3000),
  (Rank::PlatinumIII, 3200),
  (Rank::PlatinumII, 3600),
  (Rank::PlatinumI, 4000),
  (Rank::Diamond, 4400),
  (Rank::Champion, 5000),
];

/// Index into `TIERS` of the bracket holding `mmr`.
fn bracket(mmr: u32) -> usize {
  TIERS.iter().rposition(|&(_, min)| mmr >= min).unwrap_or(0)
}

impl Rank {
  /// Highest tier whose threshold is at or below `mmr`.
  pub fn classify(mmr: u32) -> Rank {
    TIERS[bracket(mmr)].0
  }

  /// Tier immediately above the bracket holding `mmr`, saturating at
  /// `Champion`.
  pub fn next_above(mmr: u32) -> Rank {
    let idx = bracket(mmr);
    let floor = TIERS[idx].1;

    TIERS[idx + 1..]
      .iter()
      .find(|&&(_, min)| min > floor)
      .map(|&(rank, _)| rank)
      .unwrap_or(Rank::Champion)
  }

  /// Tier immediately below the bracket holding `mmr`, saturating at
  /// `CopperV`.
  pub fn next_below(mmr: u32) -> Rank {
    let idx = bracket(mmr).saturating_sub(1).max(1);
    TIERS[idx].0
  }

  pub fn threshold(self) -> u32 {
    TIERS
      .iter()
      .find(|&&(rank, _)| rank == self)
      .map(|&(_, min)| min)
      .unwrap_or_default()
  }

  pub fn is_ranked(self) -> bool {
    self != Rank::Unranked
  }

  /// Display color of the rank band as `0xRRGGBB`.
  pub fn color(self) -> u32 {
    use Rank::*;

    match self {
      Unranked => 0x000000,
      CopperV | CopperIV | CopperIII | CopperII | CopperI => 0xac1e13,
      BronzeV | BronzeIV | BronzeIII | BronzeII | BronzeI => 0xe0aa63,
      SilverV | SilverIV | SilverIII | SilverII | SilverI => 0xc5c5c5,
      GoldIII | GoldII | GoldI => 0xe5ce1b,
      PlatinumIII | PlatinumII | PlatinumI => 0x2abdc0,
      Diamond => 0xa791ec,
      Champion => 0x941355,
    }
  }

  pub fn name(self) -> &'static str {
    use Rank::*;

    match self {
      Unranked => "Unranked",
      CopperV => "Copper V",
      CopperIV => "Copper IV",
      CopperIII => "Copper III",
      CopperII => "Copper II",
      CopperI => "Copper I",
      BronzeV => "Bronze V",
      BronzeIV => "Bronze IV",
      BronzeIII => "Bronze III",
      BronzeII => "Bronze II",
      BronzeI => "Bronze I",
      SilverV => "Silver V",
      SilverIV => "Silver IV",
      SilverIII => "Silver III",
      SilverII => "Silver II",
      SilverI => "Silver I",
      GoldIII => "Gold III",
      GoldII => "Gold II",
      GoldI => "Gold I",
      PlatinumIII => "Platinum III",
      PlatinumII => "Platinum II",
      PlatinumI => "Platinum I",
      Diamond => "Diamond",
      Champion => "Champion",
    }
  }
}

impl fmt::Display for Rank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_is_ordered() {
    for pair in TIERS.windows(2) {
      assert!(pair[0].0 < pair[1].0);
      assert!(pair[0].1 <= pair[1].1);
    }
  }

  #[test]
  fn classify_brackets() {
    assert_eq!(Rank::classify(0), Rank::Unranked);
    assert_eq!(Rank::classify(1), Rank::CopperV);
    assert_eq!(Rank::classify(1199), Rank::CopperV);
    assert_eq!(Rank::classify(1200), Rank::CopperIV);
    assert_eq!(Rank::classify(2150), Rank::SilverV);
    assert_eq!(Rank::classify(2599), Rank::SilverI);
    assert_eq!(Rank::classify(2650), Rank::GoldIII);
    assert_eq!(Rank::classify(4999), Rank::Diamond);
    assert_eq!(Rank::classify(5000), Rank::Champion);
    assert_eq!(Rank::classify(u32::MAX), Rank::Champion);
  }

  #[test]
  fn shared_threshold_resolves_to_later_tier() {
    assert_eq!(Rank::classify(1899), Rank::BronzeIV);
    assert_eq!(Rank::classify(1900), Rank::BronzeII);
    assert_eq!(Rank::classify(1999), Rank::BronzeII);
    assert_eq!(Rank::next_above(1750), Rank::BronzeIII);
    assert_eq!(Rank::next_below(1950), Rank::BronzeIII);
  }

  #[test]
  fn classify_is_monotonic() {
    let mut previous = Rank::classify(0);
    for mmr in (0..6000).step_by(7) {
      let rank = Rank::classify(mmr);
      assert!(rank >= previous, "{mmr} classified below {previous}");
      previous = rank;
    }
  }

  #[test]
  fn neighbours() {
    assert_eq!(Rank::next_above(0), Rank::CopperV);
    assert_eq!(Rank::next_above(2150), Rank::SilverIV);
    assert_eq!(Rank::next_above(4500), Rank::Champion);
    assert_eq!(Rank::next_above(7000), Rank::Champion);

    assert_eq!(Rank::next_below(2150), Rank::BronzeI);
    assert_eq!(Rank::next_below(6000), Rank::Diamond);
    assert_eq!(Rank::next_below(500), Rank::CopperV);
    assert_eq!(Rank::next_below(0), Rank::CopperV);
  }

  #[test]
  fn colors_follow_bands() {
    assert_eq!(Rank::CopperIII.color(), Rank::CopperV.color());
    assert_eq!(Rank::SilverI.color(), 0xc5c5c5);
    assert_ne!(Rank::SilverI.color(), Rank::GoldIII.color());
    assert_eq!(Rank::Champion.color(), 0x941355);
    assert_eq!(Rank::Unranked.color(), 0);
  }

  #[test]
  fn threshold_lookup() {
    assert_eq!(Rank::GoldIII.threshold(), 2600);
    assert_eq!(Rank::Unranked.threshold(), 0);
    assert_eq!(Rank::GoldII.to_string(), "Gold II");
  }
}

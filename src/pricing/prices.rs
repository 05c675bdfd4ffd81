//! Parsed price tables for one region.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One usage bracket of a tiered price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// Units consumed at this rate; `None` for the open-ended last tier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<f64>,
    /// Price per unit.
    pub rate: f64,
}

impl Tier {
    /// Bracket covering `count` units.
    #[must_use]
    pub const fn bounded(count: f64, rate: f64) -> Self {
        Self {
            count: Some(count),
            rate,
        }
    }

    /// Open-ended final bracket.
    #[must_use]
    pub const fn open(rate: f64) -> Self {
        Self { count: None, rate }
    }
}

/// Level key (e.g. a cache size in GB) -> hourly rate.
pub type Levels = BTreeMap<String, f64>;

/// Price tables of one region, keyed by the caller's cost labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionPrices {
    /// Flat per-unit rates.
    pub simple: HashMap<String, f64>,
    /// Tier lists, ascending by count with the open tier last.
    pub tiered: HashMap<String, Vec<Tier>>,
    /// Leveled rates.
    pub levels: HashMap<String, Levels>,
}

impl RegionPrices {
    /// Flat rate for `label`.
    #[must_use]
    pub fn simple_rate(&self, label: &str) -> Option<f64> {
        self.simple.get(label).copied()
    }

    /// Tiers for `label`.
    #[must_use]
    pub fn tiers(&self, label: &str) -> Option<&[Tier]> {
        self.tiered.get(label).map(Vec::as_slice)
    }

    /// Level rates for `label`.
    #[must_use]
    pub fn level_rates(&self, label: &str) -> Option<&Levels> {
        self.levels.get(label)
    }

    /// Overlay `other` on top of `self`; `other` wins per label.
    pub fn merge(&mut self, other: Self) {
        self.simple.extend(other.simple);
        self.tiered.extend(other.tiered);
        self.levels.extend(other.levels);
    }
}

/// Region code -> prices, as produced by one catalog load.
pub type PricingData = HashMap<String, Arc<RegionPrices>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_later_source_wins() {
        let mut base = RegionPrices::default();
        base.simple.insert("storage".into(), 0.25);
        base.simple.insert("pitr.backup".into(), 0.2);

        let mut overlay = RegionPrices::default();
        overlay.simple.insert("storage".into(), 0.3);
        overlay.tiered.insert("REST-Calls".into(), vec![Tier::open(1.0)]);

        base.merge(overlay);

        assert_eq!(base.simple_rate("storage"), Some(0.3));
        assert_eq!(base.simple_rate("pitr.backup"), Some(0.2));
        assert_eq!(base.tiers("REST-Calls"), Some(&[Tier::open(1.0)][..]));
        assert!(base.level_rates("Cache").is_none());
    }

    #[test]
    fn test_open_tier_serializes_without_count() {
        let json = serde_json::to_string(&Tier::open(0.5)).unwrap();
        assert_eq!(json, r#"{"rate":0.5}"#);
    }
}

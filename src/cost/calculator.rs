//! Pure cost evaluators for the three price shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pricing::{Levels, Tier};

/// Name of the line item [`with_total`] adds.
pub const TOTAL: &str = "total";

/// Cost of one line item over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetail {
    /// Usage within the window.
    pub usage: f64,
    /// Unit of `usage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Effective price per unit of usage.
    pub rate: f64,
    /// `usage * rate`.
    pub subtotal: f64,
    /// `subtotal` normalized to one hour.
    pub subtotal1h: f64,
}

/// Line item name -> detail, for one window.
pub type Calculation = BTreeMap<String, CalculationDetail>;

#[allow(clippy::cast_precision_loss)]
fn hourly(subtotal: f64, seconds: u64) -> f64 {
    if seconds == 0 {
        return 0.0;
    }
    subtotal * 3600.0 / seconds as f64
}

fn detail(usage: f64, rate: f64, subtotal: f64, seconds: u64, unit: Option<&str>) -> CalculationDetail {
    CalculationDetail {
        usage,
        unit: unit.map(str::to_owned),
        rate,
        subtotal,
        subtotal1h: hourly(subtotal, seconds),
    }
}

/// Flat rate: `subtotal = usage * rate`.
#[must_use]
pub fn simple_calc(usage: f64, rate: f64, seconds: u64, unit: Option<&str>) -> CalculationDetail {
    detail(usage, rate, usage * rate, seconds, unit)
}

/// Tiered rate: usage fills the tiers in order, each at its own rate.
///
/// The reported rate is the effective average; with zero usage it is the
/// first tier's rate, so idle resources still show a unit price.
#[must_use]
pub fn tiered_calc(usage: f64, tiers: &[Tier], seconds: u64, unit: Option<&str>) -> CalculationDetail {
    let mut remaining = usage;
    let mut subtotal = 0.0;

    for tier in tiers {
        if remaining <= 0.0 {
            break;
        }
        let consumed = tier.count.map_or(remaining, |count| remaining.min(count));
        subtotal += consumed * tier.rate;
        remaining -= consumed;
    }

    let rate = if usage > 0.0 {
        subtotal / usage
    } else {
        tiers.first().map_or(0.0, |tier| tier.rate)
    };

    detail(usage, rate, subtotal, seconds, unit)
}

/// Leveled rate: every item is a level key (e.g. a cache size) billed per
/// hour at that level's rate.
///
/// Usage is the sum of the item sizes times the window's hours. Items
/// without a price contribute usage but no cost.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn levels_calc<I: AsRef<str>>(
    items: &[I],
    levels: &Levels,
    seconds: u64,
    unit: Option<&str>,
) -> CalculationDetail {
    let hours = seconds as f64 / 3600.0;
    let mut usage = 0.0;
    let mut subtotal = 0.0;

    for item in items {
        let key = item.as_ref();
        match key.trim().parse::<f64>() {
            Ok(size) => usage += size * hours,
            Err(_) => tracing::warn!(level = %key, "non-numeric level"),
        }
        match levels.get(key) {
            Some(rate) => subtotal += rate * hours,
            None => tracing::warn!(level = %key, "no price for level"),
        }
    }

    let rate = if usage > 0.0 { subtotal / usage } else { 0.0 };
    detail(usage, rate, subtotal, seconds, unit)
}

/// Add a [`TOTAL`] line summing every other item's subtotals.
#[must_use]
pub fn with_total(mut calculation: Calculation) -> Calculation {
    calculation.remove(TOTAL);
    let (subtotal, subtotal1h) = calculation
        .values()
        .fold((0.0, 0.0), |(s, h), d| (s + d.subtotal, h + d.subtotal1h));

    calculation.insert(
        TOTAL.to_owned(),
        CalculationDetail {
            usage: 0.0,
            unit: None,
            rate: 0.0,
            subtotal,
            subtotal1h,
        },
    );
    calculation
}

//! Turn raw line items into simple, tiered and leveled price tables.
//!
//! Line item names are free text. Tiered names carry the bracket size
//! (`"API Calls Number of up to 333 million"`, `"Delivered Logs for first 10TB"`)
//! and leveled names end in one or two numeric tokens that form a decimal
//! (`"Caching Memory Size 13 5"` is level `13.5`). Names that do not fit these
//! patterns mean the vendor's format drifted, and fail the whole load.

use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::PricingSourceConfig;
use crate::core::PricingError;
use crate::pricing::document::{LineItem, PricingDocument};
use crate::pricing::prices::{Levels, RegionPrices, Tier};
use crate::pricing::regions::{is_ignored, region_code, ANY_REGION};

/// Line items of one region, ordered by name.
pub type LineItems<'a> = BTreeMap<&'a str, &'a LineItem>;

static TIER_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\s+\d+)*)\s*([A-Za-z]+)?").expect("tier amount pattern is valid")
});

/// Multiplier for a magnitude word or byte unit following a tier amount.
fn magnitude(word: &str) -> Option<f64> {
    let exp = match word.to_ascii_lowercase().as_str() {
        "thousand" => return Some(1000f64.powi(1)),
        "million" => return Some(1000f64.powi(2)),
        "billion" => return Some(1000f64.powi(3)),
        "trillion" => return Some(1000f64.powi(4)),
        "quadrillion" => return Some(1000f64.powi(5)),
        "quintillion" => return Some(1000f64.powi(6)),
        "kb" => 1,
        "mb" => 2,
        "gb" => 3,
        "tb" => 4,
        "pb" => 5,
        "eb" => 6,
        _ => return None,
    };
    Some(1024f64.powi(exp))
}

fn parse_price(name: &str, item: &LineItem) -> Result<f64, PricingError> {
    item.price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
        .ok_or_else(|| PricingError::InvalidPrice {
            name: name.to_owned(),
            price: item.price.clone(),
        })
}

fn is_numeric_token(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit() || b == b'.')
}

/// Size of the bracket named by `rest` (the name with its label prefix
/// removed). `None` for the open-ended `"over"` tier.
pub fn tier_count(name: &str, rest: &str) -> Result<Option<f64>, PricingError> {
    if rest
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("over"))
    {
        return Ok(None);
    }

    let malformed = || PricingError::MalformedName {
        name: name.to_owned(),
    };
    let caps = TIER_AMOUNT.captures(rest).ok_or_else(malformed)?;
    let digits: String = caps[1].split_whitespace().collect();
    let amount: f64 = digits.parse().map_err(|_| malformed())?;
    let multiplier = caps
        .get(2)
        .and_then(|word| magnitude(word.as_str()))
        .unwrap_or(1.0);

    Ok(Some(amount * multiplier))
}

/// Level key from the trailing numeric tokens of `rest`: the last one or two
/// of its final two tokens, joined with a decimal point.
#[must_use]
pub fn level_key(rest: &str) -> Option<String> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    let tail = &tokens[tokens.len().saturating_sub(2)..];
    let numeric: Vec<&str> = tail.iter().copied().filter(|t| is_numeric_token(t)).collect();

    if numeric.is_empty() {
        None
    } else {
        Some(numeric.join("."))
    }
}

/// Rates for line items whose name exactly matches a configured name.
pub fn parse_simple(
    items: &LineItems<'_>,
    labels: &HashMap<String, String>,
) -> Result<HashMap<String, f64>, PricingError> {
    let mut out = HashMap::new();
    for (name, label) in labels {
        if let Some(item) = items.get(name.as_str()) {
            out.insert(label.clone(), parse_price(name, item)?);
        }
    }
    Ok(out)
}

/// Tier lists for every configured prefix, sorted ascending by count with
/// the open-ended tier last.
///
/// Rates are assumed to be non-increasing as the brackets grow; the parser
/// does not check it.
pub fn parse_tiered(
    items: &LineItems<'_>,
    labels: &HashMap<String, String>,
) -> Result<HashMap<String, Vec<Tier>>, PricingError> {
    let mut out = HashMap::new();
    for (prefix, label) in labels {
        let mut tiers = Vec::new();
        for (name, item) in items {
            let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                continue;
            };
            tiers.push(Tier {
                count: tier_count(name, rest)?,
                rate: parse_price(name, item)?,
            });
        }

        tiers.sort_by(|a, b| match (a.count, b.count) {
            (Some(x), Some(y)) => x.total_cmp(&y).then(b.rate.total_cmp(&a.rate)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.rate.total_cmp(&a.rate),
        });

        let open = tiers.iter().filter(|t| t.count.is_none()).count();
        if !tiers.is_empty() && open != 1 {
            tracing::warn!(%prefix, open, "tiered price without exactly one open-ended tier");
        }

        out.insert(label.clone(), tiers);
    }
    Ok(out)
}

/// Level rates for every configured prefix.
pub fn parse_levels(
    items: &LineItems<'_>,
    labels: &HashMap<String, String>,
) -> Result<HashMap<String, Levels>, PricingError> {
    let mut out = HashMap::new();
    for (prefix, label) in labels {
        let mut levels = Levels::new();
        for (name, item) in items {
            let Some(rest) = name.strip_prefix(prefix.as_str()) else {
                continue;
            };
            let key = level_key(rest).ok_or_else(|| PricingError::MalformedName {
                name: (*name).to_owned(),
            })?;
            levels.insert(key, parse_price(name, item)?);
        }
        out.insert(label.clone(), levels);
    }
    Ok(out)
}

/// Parse every region of one document with one source's label tables.
///
/// Items of the `"Any"` pseudo-region apply to every region unless the
/// region lists the same name itself. Unknown region names are logged and
/// skipped.
pub fn parse_document(
    doc: &PricingDocument,
    source: &PricingSourceConfig,
) -> Result<HashMap<String, RegionPrices>, PricingError> {
    let shared = doc.regions.get(ANY_REGION);
    let mut out = HashMap::new();

    for (region_name, region_items) in &doc.regions {
        if is_ignored(region_name) {
            continue;
        }
        let Some(code) = region_code(region_name) else {
            tracing::warn!(region = %region_name, url = %source.url, "unknown region in pricing");
            continue;
        };

        let items: LineItems<'_> = shared
            .into_iter()
            .flatten()
            .chain(region_items)
            .map(|(name, item)| (name.as_str(), item))
            .collect();

        out.insert(
            code.to_owned(),
            RegionPrices {
                simple: parse_simple(&items, &source.simple)?,
                tiered: parse_tiered(&items, &source.tiered)?,
                levels: parse_levels(&items, &source.levels)?,
            },
        );
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(&'static str, &'static str)]) -> Vec<(&'static str, LineItem)> {
        pairs
            .iter()
            .map(|(name, price)| (*name, LineItem::new(*price)))
            .collect()
    }

    fn labels(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_tier_count_words_and_units() {
        assert_eq!(tier_count("x", " up to 333 million").unwrap(), Some(333_000_000.0));
        assert_eq!(tier_count("x", " Next 19 billion").unwrap(), Some(19_000_000_000.0));
        assert_eq!(tier_count("x", " for the first 10000").unwrap(), Some(10_000.0));
        assert_eq!(
            tier_count("x", " for first 10TB").unwrap(),
            Some(10.0 * 1024f64.powi(4))
        );
        assert_eq!(tier_count("x", " first 10 000 units").unwrap(), Some(10_000.0));
        assert_eq!(tier_count("x", " Over 20 billion").unwrap(), None);
        assert_eq!(tier_count("x", " messages OVER 1 billion").unwrap(), None);
    }

    #[test]
    fn test_tier_count_without_digits_is_malformed() {
        let err = tier_count("API Calls lots", " lots").unwrap_err();
        assert_eq!(
            err,
            PricingError::MalformedName {
                name: "API Calls lots".into()
            }
        );
    }

    #[test]
    fn test_level_key() {
        assert_eq!(level_key(" 0 5").as_deref(), Some("0.5"));
        assert_eq!(level_key(" 118").as_deref(), Some("118"));
        assert_eq!(level_key(" 13 5").as_deref(), Some("13.5"));
        assert_eq!(level_key(" large").as_deref(), None);
    }

    #[test]
    fn test_parse_tiered_sorted_with_open_tier_last() {
        let raw = items(&[
            ("API Calls Number of Request Over 20 billion", "0.0000018100"),
            ("API Calls Number of Request Next 667 million", "0.0000033600"),
            ("API Calls Number of up to 333 million", "0.0000035000"),
            ("API Calls Number of Request Next 19 billion", "0.0000028600"),
            ("WebSocket Connection Minutes", "0.0000003000"),
        ]);
        let map: LineItems<'_> = raw.iter().map(|(n, i)| (*n, i)).collect();

        let out = parse_tiered(&map, &labels(&[("API Calls", "REST-Calls")])).unwrap();
        let tiers = &out["REST-Calls"];

        assert_eq!(
            tiers,
            &vec![
                Tier::bounded(333_000_000.0, 0.000_003_5),
                Tier::bounded(667_000_000.0, 0.000_003_36),
                Tier::bounded(19_000_000_000.0, 0.000_002_86),
                Tier::open(0.000_001_81),
            ]
        );
    }

    #[test]
    fn test_parse_levels() {
        let raw = items(&[
            ("Caching Memory Size 0 5", "0.0200000000"),
            ("Caching Memory Size 118", "1.9000000000"),
            ("Caching Memory Size 13 5", "0.2500000000"),
        ]);
        let map: LineItems<'_> = raw.iter().map(|(n, i)| (*n, i)).collect();

        let out = parse_levels(&map, &labels(&[("Caching Memory Size", "Cache")])).unwrap();
        let cache = &out["Cache"];

        assert_eq!(cache.len(), 3);
        assert_eq!(cache["0.5"], 0.02);
        assert_eq!(cache["118"], 1.9);
        assert_eq!(cache["13.5"], 0.25);
    }

    #[test]
    fn test_parse_simple_exact_match_only() {
        let raw = items(&[
            ("WebSocket Connection Minutes", "0.0000003000"),
            ("WebSocket Connection Minutes Extra", "9"),
        ]);
        let map: LineItems<'_> = raw.iter().map(|(n, i)| (*n, i)).collect();

        let out = parse_simple(
            &map,
            &labels(&[("WebSocket Connection Minutes", "Socket-Minutes")]),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out["Socket-Minutes"], 0.000_000_3);
    }

    #[test]
    fn test_invalid_price_fails() {
        let raw = items(&[("Key", "n/a")]);
        let map: LineItems<'_> = raw.iter().map(|(n, i)| (*n, i)).collect();

        let err = parse_simple(&map, &labels(&[("Key", "key")])).unwrap_err();
        assert!(matches!(err, PricingError::InvalidPrice { .. }));
    }
}

//! Tests for usage summaries feeding the cost evaluators

use cost_scout::cost::{simple_calc, summarize_series, tiered_calc, with_total, Calculation, Window, TOTAL};
use cost_scout::pricing::Tier;

#[test]
fn test_series_summary_feeds_calculator() {
    // five-minute samples over a full day, 10 requests each, every other sample idle
    let samples: Vec<f64> = (0..288).map(|i| if i % 2 == 0 { 0.0 } else { 10.0 }).collect();
    let summary = summarize_series(&samples, 300);

    assert_eq!(summary.last.count, 1);
    assert_eq!(summary.avg1h.count, 12);
    assert_eq!(summary.avg1d.count, 288);
    assert_eq!(summary.avg1w.count, 288);
    assert_eq!(summary.avg1d.sum, 1_440.0);
    assert_eq!(summary.avg1d.average_non_zero, 10.0);

    let tiers = [Tier::bounded(1_000.0, 0.01), Tier::open(0.005)];
    let day = tiered_calc(summary[Window::Avg1d].sum, &tiers, Window::Avg1d.seconds(), None);
    assert!((day.subtotal - (10.0 + 440.0 * 0.005)).abs() < 1e-9);
    assert!((day.subtotal1h - day.subtotal / 24.0).abs() < 1e-12);
}

#[test]
fn test_total_serializes_with_items() {
    let mut calc = Calculation::new();
    calc.insert("Storage".into(), simple_calc(2.0, 0.25, 3_600, Some("GB")));
    let calc = with_total(calc);

    let json = serde_json::to_value(&calc).unwrap();
    assert_eq!(json["Storage"]["unit"], "GB");
    assert_eq!(json[TOTAL]["subtotal"], 0.5);
    assert!(json[TOTAL].get("unit").is_none());
}

//! Cost windows and pricing evaluators.

pub mod calculator;
pub mod usage;
pub mod window;

pub use calculator::{
    levels_calc, simple_calc, tiered_calc, with_total, Calculation, CalculationDetail, TOTAL,
};
pub use usage::{summarize, summarize_series, MetricSummary};
pub use window::{calculate_for_all_windows, Calculations, Window};

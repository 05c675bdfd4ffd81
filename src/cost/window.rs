//! The four lookback windows costs are reported for.

use std::ops::Index;

use serde::{Deserialize, Serialize};

/// Lookback window over which usage is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Window {
    /// Most recent 5 minutes.
    Last,
    /// Last hour.
    Avg1h,
    /// Last day.
    Avg1d,
    /// Last week.
    Avg1w,
}

impl Window {
    /// Every window, shortest first.
    pub const ALL: [Self; 4] = [Self::Last, Self::Avg1h, Self::Avg1d, Self::Avg1w];

    /// Window length in seconds.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        match self {
            Self::Last => 300,
            Self::Avg1h => 3_600,
            Self::Avg1d => 86_400,
            Self::Avg1w => 604_800,
        }
    }

    /// Report label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last => "last",
            Self::Avg1h => "avg1h",
            Self::Avg1d => "avg1d",
            Self::Avg1w => "avg1w",
        }
    }
}

/// One value per window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calculations<T> {
    /// Most recent 5 minutes.
    pub last: T,
    /// Last hour.
    pub avg1h: T,
    /// Last day.
    pub avg1d: T,
    /// Last week.
    pub avg1w: T,
}

impl<T> Calculations<T> {
    /// Value for `window`.
    pub const fn get(&self, window: Window) -> &T {
        match window {
            Window::Last => &self.last,
            Window::Avg1h => &self.avg1h,
            Window::Avg1d => &self.avg1d,
            Window::Avg1w => &self.avg1w,
        }
    }

    /// Values paired with their window, shortest first.
    pub fn iter(&self) -> impl Iterator<Item = (Window, &T)> {
        Window::ALL.into_iter().map(move |window| (window, self.get(window)))
    }

    /// Apply `f` to every value.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Calculations<U> {
        Calculations {
            last: f(self.last),
            avg1h: f(self.avg1h),
            avg1d: f(self.avg1d),
            avg1w: f(self.avg1w),
        }
    }
}

impl<T> Index<Window> for Calculations<T> {
    type Output = T;

    fn index(&self, window: Window) -> &T {
        self.get(window)
    }
}

/// Call `f` once per window with the window and its length in seconds.
pub fn calculate_for_all_windows<T>(mut f: impl FnMut(Window, u64) -> T) -> Calculations<T> {
    Calculations {
        last: f(Window::Last, Window::Last.seconds()),
        avg1h: f(Window::Avg1h, Window::Avg1h.seconds()),
        avg1d: f(Window::Avg1d, Window::Avg1d.seconds()),
        avg1w: f(Window::Avg1w, Window::Avg1w.seconds()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_each_window_once() {
        let mut seen = Vec::new();
        let out = calculate_for_all_windows(|window, seconds| {
            seen.push(window.label());
            seconds
        });

        assert_eq!(seen, ["last", "avg1h", "avg1d", "avg1w"]);
        assert_eq!(out[Window::Last], 300);
        assert_eq!(out[Window::Avg1h], 3_600);
        assert_eq!(out[Window::Avg1d], 86_400);
        assert_eq!(out[Window::Avg1w], 604_800);
    }

    #[test]
    fn test_serializes_by_label() {
        let out = calculate_for_all_windows(|window, _| window.label().len());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["avg1d"], 5);
        assert_eq!(serde_json::to_value(Window::Avg1w).unwrap(), "avg1w");
    }
}

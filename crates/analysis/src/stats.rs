//! Descriptive statistics over category histograms
//!
//! Derives a weighted sum and mean from cell counts. Derived values live in
//! dedicated fields, never as keys beside the categories, so the numeric
//! whitelist is fixed before any derived value exists.

use serde::Serialize;
use std::collections::BTreeMap;

/// Cell counts per category code. Keys are decimal strings, plus the
/// `"nodata"` sentinel for empty zones.
pub type CategoryHistogram = BTreeMap<String, u64>;

/// A category histogram augmented with derived statistics.
///
/// Serializes flat: category counts inline beside `sum` and `mean`, e.g.
/// `{"0": 10, "3": 5, "7": 2, "sum": 29, "mean": 4.142857142857143}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyStats {
    /// Raw cell counts per category code
    #[serde(flatten)]
    pub categories: CategoryHistogram,
    /// Σ category_value × count over numeric categories
    pub sum: i64,
    /// `sum` divided by the cell count of non-zero numeric categories;
    /// zero when that count is zero
    pub mean: f64,
}

/// Augment a histogram with its weighted sum and mean.
///
/// Only keys that parse as integers participate: the `"nodata"` sentinel is
/// excluded from both the sum and the denominator. Category `0` ("never
/// planted") contributes nothing to the sum by arithmetic and is excluded
/// from the mean denominator, so the mean describes planted cells only.
pub fn describe(categories: CategoryHistogram) -> FrequencyStats {
    let mut sum = 0i64;
    let mut planted_cells = 0u64;

    for (key, &count) in &categories {
        let Ok(code) = key.parse::<i64>() else {
            continue;
        };
        sum += code * count as i64;
        if code != 0 {
            planted_cells += count;
        }
    }

    let mean = if planted_cells == 0 {
        0.0
    } else {
        sum as f64 / planted_cells as f64
    };

    FrequencyStats {
        categories,
        sum,
        mean,
    }
}

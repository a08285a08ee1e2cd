//! Reference-range types shared by the catalog and the classifier.

use serde::{Deserialize, Serialize};

use crate::patient::Panel;

/// A reference range resolved for one test and one patient's demographics.
///
/// Invariants (enforced when a catalog is loaded):
/// - `low <= high`
/// - `critical_low`, when present, is `<= low`
/// - `critical_high`, when present, is `>= high`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    /// Catalog display name, e.g. `"Hemoglobin"`.
    pub test: String,
    /// Normalized lookup key, e.g. `"hemoglobin"`.
    pub key: String,
    pub panel: Panel,
    pub unit: String,
    pub low: f64,
    pub high: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_high: Option<f64>,
}

impl ReferenceRange {
    /// True when `value` lies inside the closed normal band.
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Render the normal band as `"low-high unit"`, e.g. `"13.5-17.5 g/dL"`.
    pub fn display(&self) -> String {
        if self.unit.is_empty() {
            format!("{}-{}", self.low, self.high)
        } else {
            format!("{}-{} {}", self.low, self.high, self.unit)
        }
    }
}

/// Proportional-distance cutoffs that bucket an out-of-band value.
///
/// The distance is `|value - edge| / |edge|` for the nearest normal-band
/// edge. A distance up to and including `mild_max` is mild, up to and
/// including `moderate_max` is moderate, anything beyond is severe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityCutoffs {
    pub mild_max: f64,
    pub moderate_max: f64,
}

impl Default for SeverityCutoffs {
    fn default() -> Self {
        Self {
            mild_max: 0.25,
            moderate_max: 0.50,
        }
    }
}

/// Normalize a free-text test name into a catalog lookup key.
///
/// Trims, lowercases, and collapses every run of whitespace, `-` and `_`
/// into a single `_`, so `" Total Cholesterol "`, `"total-cholesterol"` and
/// `"Total_Cholesterol"` all map to `"total_cholesterol"`.
pub fn normalize_test_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;

    for ch in name.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !key.is_empty() {
            key.push('_');
        }
        pending_separator = false;
        key.extend(ch.to_lowercase());
    }

    key
}

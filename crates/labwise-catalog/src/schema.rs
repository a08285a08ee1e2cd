//! Catalog configuration schema.
//!
//! A `CatalogConfig` is deserialized from TOML and holds the severity
//! cutoffs, every test's reference bands, and the medication lab-effect
//! profiles. Field-level invariants are checked by `TomlCatalog` after
//! parsing, not here.

use serde::{Deserialize, Serialize};

use labwise_contracts::{
    patient::{Gender, Panel},
    pattern::MedicationEffect,
    range::SeverityCutoffs,
};

/// A demographic override of a test's normal band.
///
/// Example in TOML:
/// ```toml
/// variants = [
///     { gender = "male", low = 13.5, high = 17.5 },
///     { gender = "female", low = 12.0, high = 15.5 },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandVariant {
    pub gender: Gender,
    pub low: f64,
    pub high: f64,

    /// Falls back to the test-level threshold when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_low: Option<f64>,

    /// Falls back to the test-level threshold when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_high: Option<f64>,
}

/// One test in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEntry {
    /// Display name; its normalized form is the lookup key.
    pub name: String,

    pub panel: Panel,

    pub unit: String,

    /// Default normal band, used when no variant matches.
    pub low: f64,
    pub high: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_low: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_high: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<BandVariant>,
}

/// The top-level structure deserialized from a TOML catalog file.
///
/// Example:
/// ```toml
/// [severity]
/// mild_max = 0.25
/// moderate_max = 0.50
///
/// [[tests]]
/// name = "Potassium"
/// panel = "KFT"
/// unit = "mEq/L"
/// low = 3.5
/// high = 5.0
/// critical_low = 2.5
/// critical_high = 6.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub severity: SeverityCutoffs,

    pub tests: Vec<TestEntry>,

    #[serde(default)]
    pub medication_effects: Vec<MedicationEffect>,
}

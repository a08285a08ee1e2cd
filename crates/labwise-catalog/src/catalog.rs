//! TOML-driven reference catalog implementation.
//!
//! `TomlCatalog` loads a `CatalogConfig` from a TOML string or file,
//! validates it, indexes it by normalized test name, and implements the
//! `ReferenceCatalog` trait from labwise-core.
//!
//! Resolution algorithm:
//!
//! 1. Normalize the requested name and look it up exactly. Unknown → `None`.
//! 2. If a variant matches the patient's gender, use its band; otherwise use
//!    the test's default band.
//! 3. Critical thresholds come from the variant when it sets them, otherwise
//!    from the test entry.

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    path::Path,
    sync::{Arc, OnceLock},
};

use tracing::debug;

use labwise_contracts::{
    error::{LabError, LabResult},
    patient::{Gender, Panel},
    pattern::MedicationEffect,
    range::{normalize_test_name, ReferenceRange, SeverityCutoffs},
};
use labwise_core::traits::ReferenceCatalog;

use crate::schema::{CatalogConfig, TestEntry};

/// The catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../data/reference_ranges.toml");

static BUILTIN: OnceLock<Result<Arc<TomlCatalog>, String>> = OnceLock::new();

/// The process-wide built-in catalog.
///
/// Parsed and validated on first use, then shared read-only.
pub fn builtin() -> LabResult<Arc<TomlCatalog>> {
    BUILTIN
        .get_or_init(|| {
            TomlCatalog::from_toml_str(BUILTIN_CATALOG)
                .map(Arc::new)
                .map_err(|e| e.to_string())
        })
        .clone()
        .map_err(|reason| LabError::ConfigError { reason })
}

/// A `ReferenceCatalog` implementation backed by a TOML document.
///
/// ```rust,ignore
/// use labwise_catalog::TomlCatalog;
///
/// let catalog = TomlCatalog::from_file(Path::new("catalogs/site.toml"))?;
/// ```
#[derive(Debug)]
pub struct TomlCatalog {
    config: CatalogConfig,
    index: HashMap<String, usize>,
}

impl TomlCatalog {
    /// Parse `s` as TOML and build a validated catalog.
    ///
    /// Returns `LabError::ConfigError` if the TOML is malformed, does not
    /// match `CatalogConfig`, or violates a band invariant.
    pub fn from_toml_str(s: &str) -> LabResult<Self> {
        let config: CatalogConfig = toml::from_str(s).map_err(|e| LabError::ConfigError {
            reason: format!("failed to parse catalog TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a TOML catalog.
    pub fn from_file(path: &Path) -> LabResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| LabError::ConfigError {
            reason: format!("failed to read catalog file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate `config` and index it.
    pub fn from_config(config: CatalogConfig) -> LabResult<Self> {
        validate(&config)?;

        let index = config
            .tests
            .iter()
            .enumerate()
            .map(|(i, t)| (normalize_test_name(&t.name), i))
            .collect();

        debug!(
            tests = config.tests.len(),
            medication_effects = config.medication_effects.len(),
            "reference catalog loaded"
        );

        Ok(Self { config, index })
    }

    pub fn entry(&self, test_name: &str) -> Option<&TestEntry> {
        self.index
            .get(&normalize_test_name(test_name))
            .map(|&i| &self.config.tests[i])
    }

    pub fn medication_effects(&self) -> &[MedicationEffect] {
        &self.config.medication_effects
    }

    /// Entries grouped by panel, in panel order and then declaration order.
    pub fn by_panel(&self) -> BTreeMap<Panel, Vec<&TestEntry>> {
        let mut panels: BTreeMap<Panel, Vec<&TestEntry>> = BTreeMap::new();
        for entry in &self.config.tests {
            panels.entry(entry.panel).or_default().push(entry);
        }
        panels
    }
}

impl ReferenceCatalog for TomlCatalog {
    fn resolve(&self, test_name: &str, gender: Gender) -> Option<ReferenceRange> {
        let entry = self.entry(test_name)?;
        let variant = entry.variants.iter().find(|v| v.gender == gender);

        let (low, high, critical_low, critical_high) = match variant {
            Some(v) => (
                v.low,
                v.high,
                v.critical_low.or(entry.critical_low),
                v.critical_high.or(entry.critical_high),
            ),
            None => (entry.low, entry.high, entry.critical_low, entry.critical_high),
        };

        Some(ReferenceRange {
            test: entry.name.clone(),
            key: normalize_test_name(&entry.name),
            panel: entry.panel,
            unit: entry.unit.clone(),
            low,
            high,
            critical_low,
            critical_high,
        })
    }

    fn severity_cutoffs(&self) -> SeverityCutoffs {
        self.config.severity
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

fn config_error(reason: String) -> LabError {
    LabError::ConfigError { reason }
}

fn check_band(
    test: &str,
    scope: &str,
    low: f64,
    high: f64,
    critical_low: Option<f64>,
    critical_high: Option<f64>,
) -> LabResult<()> {
    let all = [Some(low), Some(high), critical_low, critical_high];
    if all.iter().flatten().any(|v| !v.is_finite()) {
        return Err(config_error(format!("test '{test}' ({scope}): thresholds must be finite")));
    }
    if low > high {
        return Err(config_error(format!(
            "test '{test}' ({scope}): low {low} is above high {high}"
        )));
    }
    if let Some(c) = critical_low {
        if c > low {
            return Err(config_error(format!(
                "test '{test}' ({scope}): critical_low {c} lies inside the normal band {low}-{high}"
            )));
        }
    }
    if let Some(c) = critical_high {
        if c < high {
            return Err(config_error(format!(
                "test '{test}' ({scope}): critical_high {c} lies inside the normal band {low}-{high}"
            )));
        }
    }
    Ok(())
}

fn validate(config: &CatalogConfig) -> LabResult<()> {
    let cutoffs = config.severity;
    if !(cutoffs.mild_max > 0.0 && cutoffs.mild_max <= cutoffs.moderate_max)
        || !cutoffs.moderate_max.is_finite()
    {
        return Err(config_error(format!(
            "severity cutoffs must satisfy 0 < mild_max <= moderate_max, got {} and {}",
            cutoffs.mild_max, cutoffs.moderate_max
        )));
    }

    let mut keys = HashSet::new();
    for entry in &config.tests {
        let key = normalize_test_name(&entry.name);
        if key.is_empty() {
            return Err(config_error("test with an empty name".to_string()));
        }
        if !keys.insert(key) {
            return Err(config_error(format!("duplicate test '{}'", entry.name)));
        }

        check_band(
            &entry.name,
            "default",
            entry.low,
            entry.high,
            entry.critical_low,
            entry.critical_high,
        )?;

        let mut genders = HashSet::new();
        for v in &entry.variants {
            if !genders.insert(v.gender) {
                return Err(config_error(format!(
                    "test '{}' has more than one {} variant",
                    entry.name, v.gender
                )));
            }
            check_band(
                &entry.name,
                v.gender.as_str(),
                v.low,
                v.high,
                v.critical_low.or(entry.critical_low),
                v.critical_high.or(entry.critical_high),
            )?;
        }
    }

    for effect in &config.medication_effects {
        if effect.medication.trim().is_empty() {
            return Err(config_error("medication effect with an empty medication".to_string()));
        }
        if !keys.contains(&normalize_test_name(&effect.test)) {
            return Err(config_error(format!(
                "medication effect for '{}' references unknown test '{}'",
                effect.medication, effect.test
            )));
        }
    }

    Ok(())
}

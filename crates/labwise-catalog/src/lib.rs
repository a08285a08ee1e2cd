//! # labwise-catalog
//!
//! A TOML-driven reference range catalog for the Labwise engine.
//!
//! ## Overview
//!
//! This crate provides [`TomlCatalog`], which implements the
//! [`ReferenceCatalog`](labwise_core::traits::ReferenceCatalog) trait.
//! Tests are declared in a TOML document together with the severity cutoffs
//! and the medication lab-effect profiles. A built-in catalog is embedded
//! and exposed through [`builtin`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use labwise_catalog::builtin;
//!
//! let catalog = builtin()?;
//! // Pass `catalog` to `labwise_core::Analyzer::new(...)`.
//! ```
//!
//! ## Matching
//!
//! Lookup is exact on the normalized test name. There is no fuzzy matching:
//! `"Hgb"` does not resolve to `"Hemoglobin"`.

pub mod catalog;
pub mod schema;

pub use catalog::{builtin, TomlCatalog};
pub use schema::{BandVariant, CatalogConfig, TestEntry};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use labwise_contracts::{
        error::LabError,
        patient::{Gender, Panel},
        range::SeverityCutoffs,
    };
    use labwise_core::traits::ReferenceCatalog;

    use crate::{builtin, TomlCatalog};

    fn expect_config_error(toml: &str, needle: &str) {
        match TomlCatalog::from_toml_str(toml) {
            Err(LabError::ConfigError { reason }) => {
                assert!(reason.contains(needle), "expected '{needle}' in reason, got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── 1. built-in catalog ───────────────────────────────────────────────────

    #[test]
    fn builtin_catalog_loads_every_panel() {
        let catalog = builtin().unwrap();
        let panels = catalog.by_panel();

        assert_eq!(panels.len(), Panel::ALL.len());
        assert_eq!(panels[&Panel::Cbc].len(), 9);
        assert_eq!(panels[&Panel::Lft].len(), 8);
        assert_eq!(panels[&Panel::Kft].len(), 7);
        assert_eq!(panels[&Panel::Lipid].len(), 5);
        assert_eq!(panels[&Panel::Thyroid].len(), 5);
        assert_eq!(panels[&Panel::Glucose].len(), 3);
        assert!(!catalog.medication_effects().is_empty());
    }

    #[test]
    fn builtin_is_shared() {
        let a = builtin().unwrap();
        let b = builtin().unwrap();
        assert!(std::sync::Arc::ptr_eq(&a, &b));
    }

    // ── 2. lookup ─────────────────────────────────────────────────────────────

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let catalog = builtin().unwrap();

        let r = catalog.resolve("  hemoglobin ", Gender::Male).unwrap();
        assert_eq!(r.test, "Hemoglobin");
        assert_eq!(r.key, "hemoglobin");

        let r = catalog.resolve("total cholesterol", Gender::Female).unwrap();
        assert_eq!(r.test, "Total_Cholesterol");
    }

    #[test]
    fn unknown_test_is_not_found() {
        let catalog = builtin().unwrap();
        assert!(catalog.resolve("XYZ123", Gender::Male).is_none());
        assert!(catalog.resolve("Hgb", Gender::Male).is_none());
    }

    #[test]
    fn gender_variant_is_selected() {
        let catalog = builtin().unwrap();

        let male = catalog.resolve("Hemoglobin", Gender::Male).unwrap();
        let female = catalog.resolve("Hemoglobin", Gender::Female).unwrap();
        assert_eq!((male.low, male.high), (13.5, 17.5));
        assert_eq!((female.low, female.high), (12.0, 15.5));

        // Variant inherits the test-level critical thresholds.
        assert_eq!(female.critical_low, Some(7.0));
        assert_eq!(female.critical_high, Some(20.0));
    }

    #[test]
    fn default_band_when_no_variant_matches() {
        let toml = r#"
            [[tests]]
            name = "Ferritin"
            panel = "CBC"
            unit = "ng/mL"
            low = 24.0
            high = 336.0
            variants = [ { gender = "female", low = 11.0, high = 307.0 } ]
        "#;
        let catalog = TomlCatalog::from_toml_str(toml).unwrap();

        let male = catalog.resolve("Ferritin", Gender::Male).unwrap();
        assert_eq!((male.low, male.high), (24.0, 336.0));
        let female = catalog.resolve("ferritin", Gender::Female).unwrap();
        assert_eq!((female.low, female.high), (11.0, 307.0));
    }

    #[test]
    fn severity_defaults_when_section_absent() {
        let toml = r#"
            [[tests]]
            name = "BUN"
            panel = "KFT"
            unit = "mg/dL"
            low = 7.0
            high = 20.0
        "#;
        let catalog = TomlCatalog::from_toml_str(toml).unwrap();
        assert_eq!(catalog.severity_cutoffs(), SeverityCutoffs::default());
        assert!(catalog.medication_effects().is_empty());
    }

    // ── 3. validation ─────────────────────────────────────────────────────────

    #[test]
    fn inverted_band_is_rejected() {
        expect_config_error(
            r#"
            [[tests]]
            name = "BUN"
            panel = "KFT"
            unit = "mg/dL"
            low = 20.0
            high = 7.0
            "#,
            "above high",
        );
    }

    #[test]
    fn critical_inside_band_is_rejected() {
        expect_config_error(
            r#"
            [[tests]]
            name = "Potassium"
            panel = "KFT"
            unit = "mEq/L"
            low = 3.5
            high = 5.0
            critical_low = 4.0
            "#,
            "critical_low",
        );
    }

    #[test]
    fn inherited_critical_is_checked_against_variant_band() {
        expect_config_error(
            r#"
            [[tests]]
            name = "Hemoglobin"
            panel = "CBC"
            unit = "g/dL"
            low = 13.5
            high = 17.5
            critical_high = 20.0
            variants = [ { gender = "male", low = 13.5, high = 21.0 } ]
            "#,
            "critical_high",
        );
    }

    #[test]
    fn duplicate_tests_are_rejected() {
        expect_config_error(
            r#"
            [[tests]]
            name = "Total_Cholesterol"
            panel = "Lipid"
            unit = "mg/dL"
            low = 125.0
            high = 200.0

            [[tests]]
            name = "total cholesterol"
            panel = "Lipid"
            unit = "mg/dL"
            low = 125.0
            high = 200.0
            "#,
            "duplicate",
        );
    }

    #[test]
    fn unordered_cutoffs_are_rejected() {
        expect_config_error(
            r#"
            [severity]
            mild_max = 0.6
            moderate_max = 0.3

            [[tests]]
            name = "BUN"
            panel = "KFT"
            unit = "mg/dL"
            low = 7.0
            high = 20.0
            "#,
            "severity cutoffs",
        );
    }

    #[test]
    fn medication_effect_must_reference_known_test() {
        expect_config_error(
            r#"
            [[tests]]
            name = "BUN"
            panel = "KFT"
            unit = "mg/dL"
            low = 7.0
            high = 20.0

            [[medication_effects]]
            medication = "lisinopril"
            test = "Potassium"
            direction = "high"
            note = "raises potassium"
            "#,
            "unknown test",
        );
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        expect_config_error("this is not valid toml ][[[", "failed to parse catalog TOML");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = TomlCatalog::from_file(std::path::Path::new("/nonexistent/catalog.toml"));
        assert!(matches!(result, Err(LabError::ConfigError { .. })));
    }
}

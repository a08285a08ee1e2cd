//! Result verifier for the Labwise report boundary.
//!
//! `ResultSchemaVerifier` implements the `ResultVerifier` trait from
//! `labwise-core`. Verification runs in three phases:
//!
//! 1. **Structural**: the serialized result is validated against
//!    [`result_schema`](crate::schema::result_schema) with `jsonschema`.
//! 2. **Semantic**: the built-in invariant checks run in order.
//! 3. **Custom**: checks registered with `register_check` run in
//!    registration order.
//!
//! All failures are collected before returning.

use tracing::{debug, warn};

use labwise_contracts::{
    classified::SeverityTier,
    error::{LabError, LabResult},
    result::AnalysisResult,
    verify::{VerificationFailure, VerificationReport},
};
use labwise_core::traits::ResultVerifier;

use crate::schema::result_schema;

/// A caller-supplied check. Returns `Some(message)` on failure.
pub type CustomCheckFn = Box<dyn Fn(&AnalysisResult) -> Option<String> + Send + Sync>;

type BuiltinCheck = (&'static str, fn(&AnalysisResult) -> Option<String>);

const BUILTIN_CHECKS: [BuiltinCheck; 5] = [
    ("summary-partition", check_summary_partition),
    ("critical-list", check_critical_list),
    ("abnormal-list", check_abnormal_list),
    ("tier-colors", check_tier_colors),
    ("direction-consistency", check_direction_consistency),
];

fn check_summary_partition(result: &AnalysisResult) -> Option<String> {
    let s = &result.results_summary;
    if s.normal_count + s.abnormal_count + s.critical_count != s.total_tests {
        return Some(format!(
            "normal {} + abnormal {} + critical {} does not equal total {}",
            s.normal_count, s.abnormal_count, s.critical_count, s.total_tests
        ));
    }
    if s.total_tests != result.all_results.len() {
        return Some(format!(
            "total_tests {} but {} classified values",
            s.total_tests,
            result.all_results.len()
        ));
    }
    None
}

fn check_critical_list(result: &AnalysisResult) -> Option<String> {
    let expected = result.results_summary.critical_count;
    let classified = result
        .all_results
        .iter()
        .filter(|v| v.severity == SeverityTier::Critical)
        .count();
    if result.critical_values.len() != expected || classified != expected {
        return Some(format!(
            "critical_count {} but {} listed and {} classified critical",
            expected,
            result.critical_values.len(),
            classified
        ));
    }
    None
}

fn check_abnormal_list(result: &AnalysisResult) -> Option<String> {
    let expected = result.results_summary.abnormal_count;
    let classified = result
        .all_results
        .iter()
        .filter(|v| v.severity.is_abnormal())
        .count();
    if result.abnormalities.len() != expected || classified != expected {
        return Some(format!(
            "abnormal_count {} but {} listed and {} classified abnormal",
            expected,
            result.abnormalities.len(),
            classified
        ));
    }
    None
}

fn check_tier_colors(result: &AnalysisResult) -> Option<String> {
    let classified = result
        .all_results
        .iter()
        .map(|v| (&v.test, v.severity, v.color));
    let listed = result
        .abnormalities
        .iter()
        .map(|a| (&a.test, a.severity, a.color));

    classified
        .chain(listed)
        .find(|(_, tier, color)| tier.color() != *color)
        .map(|(test, tier, color)| {
            format!(
                "'{}' is {:?} but colored {}; expected {}",
                test,
                tier,
                color.as_str(),
                tier.color().as_str()
            )
        })
}

fn check_direction_consistency(result: &AnalysisResult) -> Option<String> {
    result
        .all_results
        .iter()
        .find(|v| (v.severity == SeverityTier::Normal) != v.direction.is_none())
        .map(|v| format!("'{}' has severity {:?} with direction {:?}", v.test, v.severity, v.direction))
}

/// The Labwise result verifier.
#[derive(Default)]
pub struct ResultSchemaVerifier {
    custom_checks: Vec<(String, CustomCheckFn)>,
}

impl ResultSchemaVerifier {
    /// Create a verifier with only the built-in checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom check under `name`.
    ///
    /// Registering the same name twice replaces the previous check and keeps
    /// its position.
    pub fn register_check(&mut self, name: impl Into<String>, f: CustomCheckFn) {
        let name = name.into();
        match self.custom_checks.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = f,
            None => self.custom_checks.push((name, f)),
        }
    }
}

impl ResultVerifier for ResultSchemaVerifier {
    fn verify(&self, result: &AnalysisResult) -> LabResult<VerificationReport> {
        let mut failures: Vec<VerificationFailure> = Vec::new();

        let payload = serde_json::to_value(result).map_err(|e| LabError::VerificationFailed {
            reason: format!("result could not be serialized: {e}"),
        })?;

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        match jsonschema::validator_for(&result_schema()) {
            Ok(validator) => {
                for error in validator.iter_errors(&payload) {
                    let message = format!("JSON Schema violation at {}: {}", error.instance_path, error);
                    warn!(%message, "structural validation failure");
                    failures.push(VerificationFailure {
                        check_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
            Err(e) => {
                let message = format!("invalid JSON Schema document: {e}");
                warn!(%message, "schema compilation failure");
                failures.push(VerificationFailure {
                    check_id: "json-schema".to_string(),
                    message,
                });
            }
        }

        // ── Phase 2: built-in invariants ──────────────────────────────────────
        for (check_id, check) in BUILTIN_CHECKS {
            debug!(check_id, "evaluating result check");
            if let Some(message) = check(result) {
                warn!(check_id, %message, "result check failed");
                failures.push(VerificationFailure {
                    check_id: check_id.to_string(),
                    message,
                });
            }
        }

        // ── Phase 3: custom checks ────────────────────────────────────────────
        for (check_id, check) in &self.custom_checks {
            debug!(check_id = %check_id, "evaluating custom result check");
            if let Some(message) = check(result) {
                warn!(check_id = %check_id, %message, "custom result check failed");
                failures.push(VerificationFailure {
                    check_id: check_id.clone(),
                    message,
                });
            }
        }

        Ok(VerificationReport {
            passed: failures.is_empty(),
            failures,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! The Labwise analyzer: the deterministic result aggregator.
//!
//! One call to `analyze()` runs the full pipeline over one request:
//!
//!   Validate → Resolve + Classify (per value) → Metrics → Patterns → Tally
//!
//! Request-level problems (empty list, missing age) fail before anything is
//! classified. Per-value problems (unknown test, unusable number) are
//! recorded on the result and never abort the batch.

use std::sync::Arc;

use tracing::{debug, info, warn};

use labwise_contracts::{
    classified::{ClassifiedSet, ClassifiedValue, SeverityTier},
    error::{LabError, LabResult},
    patient::{AnalyzeRequest, LabReading, LabValueInput, PatientContext},
    result::{
        Abnormality, AnalysisResult, CriticalValue, RejectedValue, ResultsSummary,
        UnrecognizedValue,
    },
};

use crate::{
    classifier::classify_value,
    metrics::calculate_metrics,
    traits::{PatternRecognizer, ReferenceCatalog},
};

/// Oldest age accepted as plausible input.
pub const MAX_PATIENT_AGE: u32 = 130;

/// Validate the request-level fields and build the patient context.
///
/// Fails fast on an absent, negative, fractional or implausible age and on
/// an empty value list.
pub fn validate_request(request: &AnalyzeRequest) -> LabResult<PatientContext> {
    let raw_age = request
        .patient_age
        .ok_or_else(|| LabError::validation("patient_age is required"))?;

    if !raw_age.is_finite() || raw_age < 0.0 || raw_age.fract() != 0.0 {
        return Err(LabError::validation(format!(
            "patient_age {raw_age} must be a whole number of years"
        )));
    }
    if raw_age > f64::from(MAX_PATIENT_AGE) {
        return Err(LabError::validation(format!(
            "patient_age {raw_age} exceeds the plausible maximum of {MAX_PATIENT_AGE}"
        )));
    }
    let age = raw_age as u32;

    if request.lab_values.is_empty() {
        return Err(LabError::validation("lab_values must contain at least one value"));
    }

    Ok(PatientContext {
        age,
        gender: request.patient_gender,
        medications: request
            .current_medications
            .iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect(),
    })
}

/// Tally tiers over the classified values.
pub fn summarize(values: &[ClassifiedValue]) -> ResultsSummary {
    let mut summary = ResultsSummary {
        total_tests: values.len(),
        ..ResultsSummary::default()
    };
    for v in values {
        match v.severity {
            SeverityTier::Normal => summary.normal_count += 1,
            SeverityTier::Critical => summary.critical_count += 1,
            _ => summary.abnormal_count += 1,
        }
    }
    summary
}

/// Runs analyses against a shared catalog and pattern recognizer.
///
/// Holds no per-request state; one analyzer may serve concurrent callers.
pub struct Analyzer {
    catalog: Arc<dyn ReferenceCatalog>,
    recognizer: Box<dyn PatternRecognizer>,
}

impl Analyzer {
    pub fn new(catalog: Arc<dyn ReferenceCatalog>, recognizer: Box<dyn PatternRecognizer>) -> Self {
        Self { catalog, recognizer }
    }

    /// Analyze one request.
    ///
    /// # Errors
    ///
    /// Returns `LabError::Validation` when the request is structurally
    /// unusable. Every other problem is reported inside the result.
    pub fn analyze(&self, request: &AnalyzeRequest) -> LabResult<AnalysisResult> {
        let patient = validate_request(request)?;
        Ok(self.analyze_validated(request, &patient))
    }

    /// Analyze a request whose patient context was already built by
    /// [`validate_request`]. The request-level checks are not repeated.
    pub fn analyze_validated(&self, request: &AnalyzeRequest, patient: &PatientContext) -> AnalysisResult {
        debug!(
            age = patient.age,
            gender = %patient.gender,
            values = request.lab_values.len(),
            medications = patient.medications.len(),
            "analysis starting"
        );

        let cutoffs = self.catalog.severity_cutoffs();
        let mut classified: Vec<ClassifiedValue> = Vec::with_capacity(request.lab_values.len());
        let mut unrecognized = Vec::new();
        let mut rejected = Vec::new();

        // ── Classification, in input order ───────────────────────────────────
        for input in &request.lab_values {
            let Some(range) = self.catalog.resolve(&input.test_name, patient.gender) else {
                warn!(test = %input.test_name, "test not in reference catalog; excluded");
                unrecognized.push(unrecognized_value(input));
                continue;
            };

            if range.panel != input.panel {
                debug!(
                    test = %input.test_name,
                    submitted = %input.panel,
                    catalog = %range.panel,
                    "panel tag differs from catalog"
                );
            }
            if !input.unit.trim().is_empty() && !input.unit.trim().eq_ignore_ascii_case(&range.unit) {
                warn!(
                    test = %input.test_name,
                    submitted = %input.unit,
                    expected = %range.unit,
                    "unit differs from catalog; value classified as submitted"
                );
            }

            match classify_value(input, &range, cutoffs) {
                Ok(value) => {
                    debug!(
                        test = %value.test,
                        value = value.value,
                        severity = ?value.severity,
                        "value classified"
                    );
                    classified.push(value);
                }
                Err(err) => {
                    warn!(test = %input.test_name, error = %err, "value rejected");
                    let reason = match err {
                        LabError::InvalidValue { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    rejected.push(RejectedValue {
                        test: input.test_name.clone(),
                        reason,
                    });
                }
            }
        }

        // ── Cross-value computation ──────────────────────────────────────────
        let set = ClassifiedSet::new(classified);
        let calculated_metrics = calculate_metrics(&set, patient);
        let pattern_findings = self.recognizer.recognize(&set, patient);

        // ── Assembly ─────────────────────────────────────────────────────────
        let all_results = set.into_inner();
        let results_summary = summarize(&all_results);

        let critical_values: Vec<CriticalValue> = all_results
            .iter()
            .filter(|v| v.severity == SeverityTier::Critical)
            .map(CriticalValue::from)
            .collect();
        let abnormalities: Vec<Abnormality> = all_results
            .iter()
            .filter(|v| v.severity.is_abnormal())
            .map(Abnormality::from)
            .collect();

        info!(
            total = results_summary.total_tests,
            normal = results_summary.normal_count,
            abnormal = results_summary.abnormal_count,
            critical = results_summary.critical_count,
            patterns = pattern_findings.len(),
            unrecognized = unrecognized.len(),
            rejected = rejected.len(),
            "analysis complete"
        );

        AnalysisResult {
            results_summary,
            critical_values,
            abnormalities,
            calculated_metrics,
            pattern_findings,
            all_results,
            unrecognized_values: unrecognized,
            rejected_values: rejected,
        }
    }
}

fn unrecognized_value(input: &LabValueInput) -> UnrecognizedValue {
    UnrecognizedValue {
        test: input.test_name.clone(),
        value: match input.value {
            Some(LabReading::Number(v)) if v.is_finite() => Some(v),
            _ => None,
        },
        unit: input.unit.clone(),
        panel: input.panel,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

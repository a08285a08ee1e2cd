//! The report envelope and the end-to-end pipeline.
//!
//! ```text
//! Request → Analyzer → Verify → Digest → Narrate → AnalysisReport
//! ```
//!
//! The narrator is reachable only after verification passes. A failing
//! narrator never discards the structured result; its sections degrade to
//! the fallback text with the error noted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use labwise_contracts::{
    error::{LabError, LabResult},
    patient::{AnalyzeRequest, Gender, PatientContext},
    result::{AnalysisResult, Narrative},
};
use labwise_core::{
    analyzer::validate_request,
    traits::{NarrativeGenerator, ResultVerifier},
    Analyzer,
};

use crate::{digest::result_digest, narrative::fallback_narrative};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub age: u32,
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<String>,
}

impl From<&PatientContext> for PatientInfo {
    fn from(p: &PatientContext) -> Self {
        Self {
            age: p.age,
            gender: p.gender,
            medications: p.medications.clone(),
        }
    }
}

/// One analysis as delivered to a caller.
///
/// The structured result is flattened into the top level so the document
/// reads as a single object. `result_digest` covers only that structured
/// part; the id, date and narrative sections vary between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_id: Uuid,
    pub analysis_date: DateTime<Utc>,
    pub patient_info: PatientInfo,
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub result_digest: String,
    pub detailed_analysis: String,
    pub physician_summary: String,
}

/// Verify `result`, digest it, and attach a narrative.
///
/// Returns `LabError::VerificationFailed` without calling `narrator` when
/// any check fails.
pub fn build_report(
    result: AnalysisResult,
    patient: &PatientContext,
    verifier: &dyn ResultVerifier,
    narrator: &dyn NarrativeGenerator,
) -> LabResult<AnalysisReport> {
    let verification = verifier.verify(&result)?;
    if !verification.passed {
        let reason = verification
            .failures
            .iter()
            .map(|f| format!("[{}] {}", f.check_id, f.message))
            .collect::<Vec<_>>()
            .join("; ");
        warn!(failures = verification.failures.len(), "result rejected before narration");
        return Err(LabError::VerificationFailed { reason });
    }

    let digest = result_digest(&result)?;

    let narrative = match narrator.generate(&result, patient) {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "narrative generator failed; using fallback text");
            let fallback = fallback_narrative(&result);
            Narrative {
                detailed_analysis: format!("{e}. Structured results available. {}", fallback.detailed_analysis),
                physician_summary: fallback.physician_summary,
            }
        }
    };

    let report = AnalysisReport {
        report_id: Uuid::new_v4(),
        analysis_date: Utc::now(),
        patient_info: PatientInfo::from(patient),
        result,
        result_digest: digest,
        detailed_analysis: narrative.detailed_analysis,
        physician_summary: narrative.physician_summary,
    };

    info!(
        report_id = %report.report_id,
        digest = %report.result_digest,
        "analysis report built"
    );

    Ok(report)
}

/// Analyzer, verifier and narrator wired into one call.
pub struct ReportPipeline {
    analyzer: Analyzer,
    verifier: Box<dyn ResultVerifier>,
    narrator: Box<dyn NarrativeGenerator>,
}

impl ReportPipeline {
    pub fn new(
        analyzer: Analyzer,
        verifier: Box<dyn ResultVerifier>,
        narrator: Box<dyn NarrativeGenerator>,
    ) -> Self {
        Self { analyzer, verifier, narrator }
    }

    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Analyze `request` and wrap the result in a report.
    pub fn run(&self, request: &AnalyzeRequest) -> LabResult<AnalysisReport> {
        let patient = validate_request(request)?;
        let result = self.analyzer.analyze_validated(request, &patient);
        build_report(result, &patient, self.verifier.as_ref(), self.narrator.as_ref())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Deterministic narrative used when no external generator is configured,
//! and as the degraded text when the configured one fails.

use labwise_contracts::{
    error::LabResult,
    patient::PatientContext,
    result::{AnalysisResult, Narrative},
};
use labwise_core::traits::NarrativeGenerator;

pub const ANALYSIS_NOTICE: &str = "This decision support system provides insights for clinical review and does not constitute medical diagnosis or treatment directives.";

pub const SUMMARY_NOTICE: &str = "This summary provides decision support insights based on available data and does not constitute a definitive diagnosis.";

/// Template narrator built only from the structured result.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackNarrator;

impl NarrativeGenerator for FallbackNarrator {
    fn generate(&self, result: &AnalysisResult, _patient: &PatientContext) -> LabResult<Narrative> {
        Ok(fallback_narrative(result))
    }
}

fn counts_sentence(result: &AnalysisResult) -> String {
    let s = &result.results_summary;
    format!(
        "{} of {} classified tests fall outside the reference range ({} critical).",
        s.abnormal_count + s.critical_count,
        s.total_tests,
        s.critical_count
    )
}

pub fn fallback_narrative(result: &AnalysisResult) -> Narrative {
    let mut detailed = vec!["Basic analysis complete.".to_string(), counts_sentence(result)];
    if !result.pattern_findings.is_empty() {
        let names: Vec<&str> = result.pattern_findings.iter().map(|f| f.name.as_str()).collect();
        detailed.push(format!("Patterns noted: {}.", names.join(", ")));
    }
    detailed.push(ANALYSIS_NOTICE.to_string());

    let opening = if !result.critical_values.is_empty() {
        let listed: Vec<String> = result
            .critical_values
            .iter()
            .map(|c| format!("{} {} {}", c.test, c.value, c.unit))
            .collect();
        format!(
            "Decision support analysis: critical values warrant prompt physician review ({}).",
            listed.join(", ")
        )
    } else if !result.abnormalities.is_empty() {
        "Decision support analysis: findings warrant physician review.".to_string()
    } else {
        "Decision support analysis: all classified values are within reference ranges.".to_string()
    };

    Narrative {
        detailed_analysis: detailed.join(" "),
        physician_summary: format!("{} {}", opening, SUMMARY_NOTICE),
    }
}

#[cfg(test)]
mod tests {
    use labwise_contracts::result::AnalysisResult;

    use super::{fallback_narrative, ANALYSIS_NOTICE, SUMMARY_NOTICE};
    use crate::test_support::{analyze, request};

    #[test]
    fn critical_values_lead_the_summary() {
        let result = analyze(&request(45, "male", &[("Hemoglobin", 6.5, "CBC"), ("MCV", 85.0, "CBC")])).unwrap();
        let n = fallback_narrative(&result);

        assert!(n.physician_summary.starts_with(
            "Decision support analysis: critical values warrant prompt physician review (Hemoglobin 6.5 g/dL)."
        ));
        assert!(n.physician_summary.ends_with(SUMMARY_NOTICE));
        assert!(n.detailed_analysis.contains("1 of 2 classified tests"));
        assert!(n.detailed_analysis.contains("Patterns noted: normocytic anemia."));
        assert!(n.detailed_analysis.ends_with(ANALYSIS_NOTICE));
    }

    #[test]
    fn all_normal_wording() {
        let n = fallback_narrative(&AnalysisResult::default());
        assert!(n.physician_summary.contains("all classified values are within reference ranges"));
        assert!(!n.detailed_analysis.contains("Patterns noted"));
    }
}

//! Prompt context for an external narrative generator.
//!
//! Renders the structured result as plain text. The text only restates what
//! the engine computed; a generator built on it must not introduce new
//! classifications.

use labwise_contracts::{
    patient::PatientContext,
    result::AnalysisResult,
};

/// Wording constraints passed to every generator.
pub const LANGUAGE_RULES: [&str; 4] = [
    "Never state diagnoses. Use \"suggestive of\", \"raises concern for\", \"may be consistent with\" or \"warrants evaluation for\".",
    "Never give treatment orders. Use \"clinician review recommended\" or \"consideration of\".",
    "Keep the severity wording of each value exactly as given below.",
    "Connect findings to the patient's age, gender and medications.",
];

fn medications_line(patient: &PatientContext) -> String {
    if patient.medications.is_empty() {
        "None reported".to_string()
    } else {
        patient.medications.join(", ")
    }
}

/// Text context for the detailed analysis section.
pub fn analysis_prompt(result: &AnalysisResult, patient: &PatientContext) -> String {
    let mut lines = vec![
        format!(
            "Clinical decision support review of lab results for a {} year old {}.",
            patient.age, patient.gender
        ),
        format!("Current medications: {}", medications_line(patient)),
        String::new(),
    ];

    lines.push("CRITICAL VALUES:".to_string());
    if result.critical_values.is_empty() {
        lines.push("None".to_string());
    }
    for c in &result.critical_values {
        lines.push(format!("- {}: {} {} (Ref: {})", c.test, c.value, c.unit, c.reference_range));
    }
    lines.push(String::new());

    lines.push("ABNORMAL VALUES:".to_string());
    if result.abnormalities.is_empty() {
        lines.push("All other values within normal range".to_string());
    }
    for a in &result.abnormalities {
        lines.push(format!(
            "- {}: {} {} (Ref: {}) - {}",
            a.test, a.value, a.unit, a.reference_range, a.label
        ));
    }
    lines.push(String::new());

    let metrics = &result.calculated_metrics;
    if !metrics.is_empty() {
        lines.push("CALCULATED METRICS:".to_string());
        if let (Some(egfr), Some(interp)) = (metrics.egfr, &metrics.egfr_interpretation) {
            lines.push(format!("- eGFR: {} mL/min/1.73m² ({}: {})", egfr, interp.stage, interp.description));
        }
        if let Some(ratios) = &metrics.cholesterol_ratios {
            for (name, value) in ratios {
                lines.push(format!("- {}: {}", name, value));
            }
        }
        if let Some(risk) = &metrics.cardiac_risk {
            lines.push(format!("- Cardiac risk: {:?} (from {} {})", risk.risk, risk.basis, risk.value));
        }
        lines.push(String::new());
    }

    if !result.pattern_findings.is_empty() {
        lines.push("PATTERN FINDINGS:".to_string());
        for f in &result.pattern_findings {
            let evidence: Vec<String> = f
                .evidence
                .iter()
                .map(|e| format!("{} {} {}", e.test, e.value, e.unit))
                .collect();
            let mut line = format!("- {} [{:?}]: {}", f.name, f.qualifier, evidence.join(", "));
            if let Some(note) = &f.note {
                line.push_str(&format!(" ({})", note));
            }
            lines.push(line);
        }
        lines.push(String::new());
    }

    let tests: Vec<&str> = result.all_results.iter().map(|v| v.test.as_str()).collect();
    lines.push(format!("ALL TESTS PROVIDED: {}", tests.join(", ")));
    if !result.unrecognized_values.is_empty() {
        let names: Vec<&str> = result.unrecognized_values.iter().map(|u| u.test.as_str()).collect();
        lines.push(format!("NOT INTERPRETED (unknown test): {}", names.join(", ")));
    }
    lines.push(String::new());

    lines.push("LANGUAGE RULES:".to_string());
    for (i, rule) in LANGUAGE_RULES.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, rule));
    }

    lines.join("\n")
}

/// Text context for the short physician summary, built from the detailed
/// analysis the generator already produced.
pub fn summary_prompt(patient: &PatientContext, detailed_analysis: &str) -> String {
    [
        "Write a physician summary of at most 150 words.".to_string(),
        "This is clinical decision support, not a diagnosis or treatment directive.".to_string(),
        String::new(),
        format!("Patient: {} year old {}", patient.age, patient.gender),
        format!("Medications: {}", medications_line(patient)),
        String::new(),
        "Analysis:".to_string(),
        detailed_analysis.to_string(),
    ]
    .join("\n")
}

//! Cross-check of abnormal values against the patient's medications.
//!
//! A medication entry matches a profile when any of its words equals the
//! profile's generic name, ignoring case. `"Lisinopril 10 mg daily"` matches
//! `lisinopril`. A finding is emitted only when the affected test is present
//! and deviates in the profiled direction. Findings are advisory and never
//! change a classification.

use std::collections::HashSet;

use labwise_contracts::{
    classified::{ClassifiedSet, Direction},
    patient::PatientContext,
    pattern::{EvidenceItem, MedicationEffect, PatternFinding, Qualifier},
    range::normalize_test_name,
};

use crate::recognizer::PatternRule;

pub struct MedicationCrossCheck {
    effects: Vec<MedicationEffect>,
}

impl MedicationCrossCheck {
    pub fn new(effects: Vec<MedicationEffect>) -> Self {
        Self { effects }
    }
}

fn tokens(medication: &str) -> HashSet<String> {
    medication
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

impl PatternRule for MedicationCrossCheck {
    fn id(&self) -> &str {
        "medication-cross-check"
    }

    fn required_tests(&self) -> &[&str] {
        &[]
    }

    fn evaluate(&self, values: &ClassifiedSet, patient: &PatientContext) -> Vec<PatternFinding> {
        let mut findings = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();

        for medication in &patient.medications {
            let words = tokens(medication);

            for effect in &self.effects {
                let generic = effect.medication.to_lowercase();
                if !words.contains(&generic) {
                    continue;
                }

                let key = normalize_test_name(&effect.test);
                let Some(value) = values.get(&key) else {
                    continue;
                };
                let matches = match effect.direction {
                    Direction::Low => value.is_low(),
                    Direction::High => value.is_high(),
                };
                if !matches || !seen.insert((generic.clone(), key)) {
                    continue;
                }

                findings.push(PatternFinding {
                    name: format!("{} effect on {}", generic, value.range.test),
                    evidence: vec![EvidenceItem::from(value)],
                    qualifier: Qualifier::Advisory,
                    note: Some(format!(
                        "{} is {} while taking {}: {}",
                        value.range.test,
                        value.label,
                        medication.trim(),
                        effect.note
                    )),
                });
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use labwise_catalog::builtin;
    use labwise_contracts::{patient::Gender, pattern::Qualifier};

    use super::MedicationCrossCheck;
    use crate::recognizer::PatternRule;
    use crate::rules::fixtures::{classify, patient};

    fn rule() -> MedicationCrossCheck {
        MedicationCrossCheck::new(builtin().unwrap().medication_effects().to_vec())
    }

    #[test]
    fn matching_medication_and_direction_fires() {
        let values = classify(Gender::Male, &[("Potassium", 5.8), ("Creatinine", 1.0)]);
        let findings = rule().evaluate(&values, &patient(Gender::Male, &["Lisinopril 10 mg daily"]));

        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.name, "lisinopril effect on Potassium");
        assert_eq!(f.qualifier, Qualifier::Advisory);
        assert_eq!(f.evidence[0].test, "Potassium");
        assert!(f.note.as_deref().unwrap().contains("Lisinopril 10 mg daily"));
    }

    #[test]
    fn opposite_direction_or_normal_value_is_silent() {
        let ctx = patient(Gender::Female, &["furosemide"]);

        let high = classify(Gender::Female, &[("Potassium", 5.5)]);
        assert!(rule().evaluate(&high, &ctx).is_empty());

        let normal = classify(Gender::Female, &[("Potassium", 4.2)]);
        assert!(rule().evaluate(&normal, &ctx).is_empty());

        let low = classify(Gender::Female, &[("Potassium", 3.0)]);
        assert_eq!(rule().evaluate(&low, &ctx).len(), 1);
    }

    #[test]
    fn duplicate_medication_entries_report_once() {
        let values = classify(Gender::Male, &[("ALT", 120.0)]);
        let ctx = patient(Gender::Male, &["atorvastatin", "Atorvastatin 40mg"]);
        assert_eq!(rule().evaluate(&values, &ctx).len(), 1);
    }

    #[test]
    fn partial_word_does_not_match() {
        let values = classify(Gender::Male, &[("TSH", 8.0)]);
        let ctx = patient(Gender::Male, &["lithiumcarbonate"]);
        assert!(rule().evaluate(&values, &ctx).is_empty());
    }
}

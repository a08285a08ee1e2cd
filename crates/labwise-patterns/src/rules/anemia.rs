//! Anemia subtyping by red cell size.

use labwise_contracts::{
    classified::{ClassifiedSet, ClassifiedValue},
    patient::PatientContext,
    pattern::PatternFinding,
};

use crate::recognizer::PatternRule;
use crate::rules::finding;

const HEMOGLOBIN: &str = "hemoglobin";
const MCV: &str = "mcv";
const MCH: &str = "mch";
const MCHC: &str = "mchc";

/// Low hemoglobin subtyped by MCV into microcytic, normocytic, or
/// macrocytic anemia.
pub struct AnemiaSubtypeRule;

impl PatternRule for AnemiaSubtypeRule {
    fn id(&self) -> &str {
        "anemia-subtype"
    }

    fn required_tests(&self) -> &[&str] {
        &[HEMOGLOBIN, MCV]
    }

    fn evaluate(&self, values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
        let (Some(hgb), Some(mcv)) = (values.get(HEMOGLOBIN), values.get(MCV)) else {
            return vec![];
        };
        if !hgb.is_low() {
            return vec![];
        }

        let (name, mut note) = if mcv.is_low() {
            (
                "microcytic anemia",
                "small red cells; iron studies help distinguish iron deficiency from other causes".to_string(),
            )
        } else if mcv.is_high() {
            (
                "macrocytic anemia",
                "large red cells; vitamin B12 and folate levels help characterize the cause".to_string(),
            )
        } else {
            (
                "normocytic anemia",
                "normal red cell size; reticulocyte count helps separate blood loss from underproduction"
                    .to_string(),
            )
        };

        let indices: Vec<&ClassifiedValue> =
            [MCH, MCHC].iter().filter_map(|k| values.get(k)).collect();
        if indices.iter().any(|v| v.is_low()) {
            note.push_str("; hypochromic indices");
        }

        let mut evidence = vec![hgb, mcv];
        evidence.extend(indices);

        vec![finding(name, &evidence, &[hgb], Some(note))]
    }
}

#[cfg(test)]
mod tests {
    use labwise_contracts::{
        classified::SeverityTier,
        patient::{Gender, PatientContext},
        pattern::Qualifier,
    };

    use super::AnemiaSubtypeRule;
    use crate::recognizer::PatternRule;
    use crate::rules::fixtures::{classify, patient};

    fn ctx() -> PatientContext {
        patient(Gender::Female, &[])
    }

    #[test]
    fn low_mcv_gives_microcytic() {
        let values = classify(Gender::Female, &[("Hemoglobin", 9.5), ("MCV", 72.0), ("MCH", 22.0)]);
        let findings = AnemiaSubtypeRule.evaluate(&values, &ctx());

        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.name, "microcytic anemia");
        assert_eq!(f.qualifier, Qualifier::Possible);
        assert_eq!(f.evidence.len(), 3);
        assert!(f.note.as_deref().unwrap().contains("hypochromic"));
    }

    #[test]
    fn high_mcv_gives_macrocytic() {
        let values = classify(Gender::Male, &[("Hemoglobin", 10.0), ("MCV", 112.0)]);
        let findings = AnemiaSubtypeRule.evaluate(&values, &ctx());
        assert_eq!(findings[0].name, "macrocytic anemia");
        assert!(!findings[0].note.as_deref().unwrap().contains("hypochromic"));
    }

    #[test]
    fn critical_hemoglobin_with_normal_mcv_is_marked_normocytic() {
        let values = classify(Gender::Male, &[("Hemoglobin", 6.5), ("MCV", 85.0)]);
        assert_eq!(values.get("hemoglobin").unwrap().severity, SeverityTier::Critical);

        let findings = AnemiaSubtypeRule.evaluate(&values, &ctx());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "normocytic anemia");
        assert_eq!(findings[0].qualifier, Qualifier::Marked);
    }

    #[test]
    fn normal_hemoglobin_does_not_fire() {
        let values = classify(Gender::Female, &[("Hemoglobin", 13.0), ("MCV", 72.0)]);
        assert!(AnemiaSubtypeRule.evaluate(&values, &ctx()).is_empty());
    }
}

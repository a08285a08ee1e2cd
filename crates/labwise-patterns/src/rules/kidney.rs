//! BUN to creatinine ratio.

use labwise_contracts::{
    classified::ClassifiedSet,
    patient::PatientContext,
    pattern::PatternFinding,
};

use crate::recognizer::PatternRule;
use crate::rules::{finding, round1};

const BUN: &str = "bun";
const CREATININE: &str = "creatinine";

/// Ratios above this point toward a prerenal cause.
const PRERENAL_RATIO: f64 = 20.0;

pub struct AzotemiaRule;

impl PatternRule for AzotemiaRule {
    fn id(&self) -> &str {
        "azotemia"
    }

    fn required_tests(&self) -> &[&str] {
        &[BUN, CREATININE]
    }

    fn evaluate(&self, values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
        let (Some(bun), Some(creatinine)) = (values.get(BUN), values.get(CREATININE)) else {
            return vec![];
        };
        if !bun.is_high() || creatinine.value <= 0.0 {
            return vec![];
        }

        let ratio = bun.value / creatinine.value;
        let name = if ratio > PRERENAL_RATIO {
            "prerenal azotemia pattern"
        } else if creatinine.is_high() {
            "intrinsic renal pattern"
        } else {
            return vec![];
        };

        vec![finding(
            name,
            &[bun, creatinine],
            &[bun, creatinine],
            Some(format!("BUN/creatinine ratio {}", round1(ratio))),
        )]
    }
}

#[cfg(test)]
mod tests {
    use labwise_contracts::{patient::Gender, pattern::Qualifier};

    use super::AzotemiaRule;
    use crate::recognizer::PatternRule;
    use crate::rules::fixtures::{classify, patient};

    fn evaluate(bun: f64, creatinine: f64) -> Vec<labwise_contracts::pattern::PatternFinding> {
        let values = classify(Gender::Male, &[("BUN", bun), ("Creatinine", creatinine)]);
        AzotemiaRule.evaluate(&values, &patient(Gender::Male, &[]))
    }

    #[test]
    fn high_ratio_reads_prerenal() {
        let findings = evaluate(40.0, 1.2);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "prerenal azotemia pattern");
        assert_eq!(findings[0].note.as_deref(), Some("BUN/creatinine ratio 33.3"));
        assert_eq!(findings[0].qualifier, Qualifier::Marked);
    }

    #[test]
    fn both_high_with_low_ratio_reads_intrinsic() {
        let findings = evaluate(60.0, 4.0);
        assert_eq!(findings[0].name, "intrinsic renal pattern");
    }

    #[test]
    fn normal_bun_does_not_fire() {
        assert!(evaluate(15.0, 1.0).is_empty());
        assert!(evaluate(15.0, 2.5).is_empty());
    }
}

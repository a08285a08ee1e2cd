//! Liver injury pattern from aminotransferases, ALP and bilirubin.
//!
//! The R factor compares ALT and ALP as multiples of their upper limits:
//!
//! ```text
//! R = (ALT / ULN_ALT) / (ALP / ULN_ALP)
//! ```
//!
//! When only one side is elevated the pattern follows that side. When both
//! are elevated, R >= 5 reads hepatocellular, R <= 2 cholestatic, and
//! anything between is mixed.

use labwise_contracts::{
    classified::{ClassifiedSet, ClassifiedValue},
    patient::PatientContext,
    pattern::PatternFinding,
};

use crate::recognizer::PatternRule;
use crate::rules::{finding, round1};

const ALT: &str = "alt";
const AST: &str = "ast";
const ALP: &str = "alp";
const BILIRUBIN_TOTAL: &str = "bilirubin_total";

const R_HEPATOCELLULAR: f64 = 5.0;
const R_CHOLESTATIC: f64 = 2.0;
const DE_RITIS_NOTABLE: f64 = 2.0;

pub const HEPATOCELLULAR: &str = "hepatocellular pattern";
pub const CHOLESTATIC: &str = "cholestatic pattern";
pub const MIXED: &str = "mixed hepatocellular-cholestatic pattern";
pub const ISOLATED_BILIRUBIN: &str = "isolated hyperbilirubinemia";

pub struct LiverInjuryRule;

fn r_factor(alt: &ClassifiedValue, alp: &ClassifiedValue) -> Option<f64> {
    let alt_x = alt.times_upper_limit()?;
    let alp_x = alp.times_upper_limit()?;
    if alp_x > 0.0 {
        Some(alt_x / alp_x)
    } else {
        None
    }
}

impl PatternRule for LiverInjuryRule {
    fn id(&self) -> &str {
        "liver-injury"
    }

    fn required_tests(&self) -> &[&str] {
        &[ALT, AST, ALP, BILIRUBIN_TOTAL]
    }

    fn evaluate(&self, values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
        let (Some(alt), Some(ast), Some(alp), Some(bili)) = (
            values.get(ALT),
            values.get(AST),
            values.get(ALP),
            values.get(BILIRUBIN_TOTAL),
        ) else {
            return vec![];
        };

        let aminos_high = alt.is_high() || ast.is_high();
        let alp_high = alp.is_high();
        let evidence = [alt, ast, alp, bili];

        if !aminos_high && !alp_high {
            if bili.is_high() {
                return vec![finding(
                    ISOLATED_BILIRUBIN,
                    &evidence,
                    &[bili],
                    Some("bilirubin elevated with normal aminotransferases and ALP".to_string()),
                )];
            }
            return vec![];
        }

        let r = r_factor(alt, alp);
        let (name, driving): (&str, Vec<&ClassifiedValue>) = match (aminos_high, alp_high, r) {
            (true, false, _) => (HEPATOCELLULAR, vec![alt, ast]),
            (false, true, _) => (CHOLESTATIC, vec![alp]),
            (_, _, Some(r)) if r >= R_HEPATOCELLULAR => (HEPATOCELLULAR, vec![alt, ast, alp]),
            (_, _, Some(r)) if r <= R_CHOLESTATIC => (CHOLESTATIC, vec![alt, ast, alp]),
            _ => (MIXED, vec![alt, ast, alp]),
        };

        let mut notes = Vec::new();
        if let Some(r) = r {
            notes.push(format!("R factor {}", round1(r)));
        }
        if alt.value > 0.0 {
            let de_ritis = ast.value / alt.value;
            if de_ritis > DE_RITIS_NOTABLE {
                notes.push(format!("AST/ALT ratio {} exceeds 2", round1(de_ritis)));
            }
        }
        if bili.is_high() {
            notes.push(format!("bilirubin {}", bili.label));
        }

        vec![finding(name, &evidence, &driving, Some(notes.join("; ")))]
    }
}

#[cfg(test)]
mod tests {
    use labwise_contracts::{
        patient::{Gender, PatientContext},
        pattern::Qualifier,
    };

    use super::{LiverInjuryRule, CHOLESTATIC, HEPATOCELLULAR, ISOLATED_BILIRUBIN, MIXED};
    use crate::recognizer::PatternRule;
    use crate::rules::fixtures::{classify, patient};

    fn ctx() -> PatientContext {
        patient(Gender::Male, &[])
    }

    fn panel(alt: f64, ast: f64, alp: f64, bili: f64) -> Vec<String> {
        let values = classify(
            Gender::Male,
            &[("ALT", alt), ("AST", ast), ("ALP", alp), ("Bilirubin_Total", bili)],
        );
        LiverInjuryRule
            .evaluate(&values, &ctx())
            .into_iter()
            .map(|f| f.name)
            .collect()
    }

    #[test]
    fn elevated_aminotransferases_with_normal_alp_is_hepatocellular() {
        let values = classify(
            Gender::Male,
            &[("ALT", 300.0), ("AST", 250.0), ("ALP", 100.0), ("Bilirubin_Total", 0.8)],
        );
        let findings = LiverInjuryRule.evaluate(&values, &ctx());

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, HEPATOCELLULAR);
        assert_eq!(findings[0].qualifier, Qualifier::Marked);
        assert_eq!(findings[0].evidence.len(), 4);
        assert!(findings.iter().all(|f| f.name != CHOLESTATIC));
    }

    #[test]
    fn elevated_alp_alone_is_cholestatic() {
        assert_eq!(panel(30.0, 25.0, 400.0, 2.0), vec![CHOLESTATIC]);
    }

    #[test]
    fn both_elevated_split_by_r_factor() {
        // R = (600/56) / (160/147) ≈ 9.8
        assert_eq!(panel(600.0, 200.0, 160.0, 0.8), vec![HEPATOCELLULAR]);
        // R = (250/56) / (200/147) ≈ 3.3
        assert_eq!(panel(250.0, 150.0, 200.0, 0.8), vec![MIXED]);
        // R = (150/56) / (300/147) ≈ 1.3
        assert_eq!(panel(150.0, 90.0, 300.0, 0.8), vec![CHOLESTATIC]);
    }

    #[test]
    fn bilirubin_alone_is_reported_separately() {
        assert_eq!(panel(30.0, 25.0, 100.0, 2.5), vec![ISOLATED_BILIRUBIN]);
    }

    #[test]
    fn normal_panel_has_no_finding() {
        assert!(panel(30.0, 25.0, 100.0, 0.8).is_empty());
    }

    #[test]
    fn high_de_ritis_ratio_is_noted() {
        let values = classify(
            Gender::Male,
            &[("ALT", 80.0), ("AST", 200.0), ("ALP", 100.0), ("Bilirubin_Total", 0.8)],
        );
        let findings = LiverInjuryRule.evaluate(&values, &ctx());
        assert!(findings[0].note.as_deref().unwrap().contains("AST/ALT ratio 2.5"));
    }
}

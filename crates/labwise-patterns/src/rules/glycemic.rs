use labwise_contracts::{
    classified::ClassifiedSet,
    patient::PatientContext,
    pattern::{PatternFinding, Qualifier},
};

use crate::recognizer::PatternRule;
use crate::rules::finding;

const FASTING_GLUCOSE: &str = "fasting_glucose";
const HBA1C: &str = "hba1c";

/// Diabetic-range thresholds (mg/dL and %).
const FG_DIABETIC: f64 = 126.0;
const HBA1C_DIABETIC: f64 = 6.5;

/// Fasting glucose read together with HbA1c.
///
/// Both markers at or above their diabetic thresholds give a diabetic-range
/// finding. Any other elevation above the reference band gives a
/// prediabetic-range finding, with a note when one marker alone reaches the
/// diabetic threshold.
pub struct GlycemicRule;

impl PatternRule for GlycemicRule {
    fn id(&self) -> &str {
        "glycemic-status"
    }

    fn required_tests(&self) -> &[&str] {
        &[FASTING_GLUCOSE, HBA1C]
    }

    fn evaluate(&self, values: &ClassifiedSet, _patient: &PatientContext) -> Vec<PatternFinding> {
        let (Some(fg), Some(a1c)) = (values.get(FASTING_GLUCOSE), values.get(HBA1C)) else {
            return vec![];
        };

        let fg_diabetic = fg.value >= FG_DIABETIC;
        let a1c_diabetic = a1c.value >= HBA1C_DIABETIC;

        if fg_diabetic && a1c_diabetic {
            let mut f = finding(
                "diabetic-range glycemia",
                &[fg, a1c],
                &[fg, a1c],
                Some("fasting glucose and HbA1c both at or above diabetic thresholds".to_string()),
            );
            f.qualifier = f.qualifier.max(Qualifier::Likely);
            return vec![f];
        }

        if !fg.is_high() && !a1c.is_high() {
            return vec![];
        }

        let note = if fg_diabetic {
            "fasting glucose reaches the diabetic threshold while HbA1c does not; repeat testing resolves discordance"
        } else if a1c_diabetic {
            "HbA1c reaches the diabetic threshold while fasting glucose does not; repeat testing resolves discordance"
        } else {
            "glycemic markers above range but below diabetic thresholds"
        };

        vec![finding(
            "prediabetic-range glycemia",
            &[fg, a1c],
            &[fg, a1c],
            Some(note.to_string()),
        )]
    }
}

//! Derived clinical indices computed over the classified set.
//!
//! Every metric is a pure function of a fixed set of inputs. When any input is
//! missing or unusable the metric is skipped and omitted from the output; no
//! default or partial value is ever substituted.

use std::collections::BTreeMap;

use tracing::debug;

use labwise_contracts::{
    classified::{ClassifiedSet, Color},
    metrics::{CalculatedMetrics, CardiacRisk, EgfrInterpretation, RiskTier},
    patient::{Gender, PatientContext},
};

pub const CREATININE: &str = "creatinine";
pub const TOTAL_CHOLESTEROL: &str = "total_cholesterol";
pub const LDL: &str = "ldl";
pub const HDL: &str = "hdl";
pub const TRIGLYCERIDES: &str = "triglycerides";

pub const TC_HDL_RATIO: &str = "TC_HDL_Ratio";
pub const LDL_HDL_RATIO: &str = "LDL_HDL_Ratio";
pub const TG_HDL_RATIO: &str = "TG_HDL_Ratio";

/// eGFR stage table, highest lower bound first.
const EGFR_STAGES: &[(u32, &str, &str, Color)] = &[
    (90, "Normal", "Normal kidney function", Color::Green),
    (60, "Stage 1-2", "Mild kidney dysfunction", Color::Yellow),
    (30, "Stage 3", "Moderate kidney dysfunction", Color::Orange),
    (15, "Stage 4", "Severe kidney dysfunction", Color::Red),
    (0, "Stage 5", "Kidney failure", Color::Red),
];

/// TC/HDL cutoffs: below the first is low risk, below the second moderate.
const TC_HDL_CUTOFFS: (f64, f64) = (3.5, 5.0);

/// LDL/HDL cutoffs, used only when TC/HDL is unavailable.
const LDL_HDL_CUTOFFS: (f64, f64) = (2.5, 3.5);

/// LDL at or above this level (mg/dL) is high risk irrespective of ratios.
const LDL_HIGH_RISK: f64 = 190.0;

/// Estimate GFR with the CKD-EPI 2009 creatinine equation (mL/min/1.73m²).
///
/// No race coefficient is applied. Returns `None` when `creatinine` is not
/// a positive finite number.
pub fn estimate_egfr(creatinine: f64, age: u32, gender: Gender) -> Option<u32> {
    if !creatinine.is_finite() || creatinine <= 0.0 {
        return None;
    }

    let (kappa, alpha, gender_factor) = match gender {
        Gender::Female => (0.7, -0.329, 1.018),
        Gender::Male => (0.9, -0.411, 1.0),
    };

    let scaled = creatinine / kappa;
    let egfr = 141.0
        * scaled.min(1.0).powf(alpha)
        * scaled.max(1.0).powf(-1.209)
        * 0.993_f64.powf(f64::from(age))
        * gender_factor;

    Some(egfr.round() as u32)
}

/// Map an eGFR value onto its stage.
pub fn interpret_egfr(egfr: u32) -> EgfrInterpretation {
    let (_, stage, description, color) = EGFR_STAGES
        .iter()
        .find(|(min, ..)| egfr >= *min)
        .copied()
        .unwrap_or(EGFR_STAGES[EGFR_STAGES.len() - 1]);

    EgfrInterpretation {
        stage: stage.to_string(),
        description: description.to_string(),
        color,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Lipid ratios over HDL. Each ratio needs both operands and a non-zero HDL.
///
/// A ratio that overflows to infinity is omitted.
pub fn cholesterol_ratios(values: &ClassifiedSet) -> BTreeMap<String, f64> {
    let mut ratios = BTreeMap::new();

    let hdl = match values.value_of(HDL) {
        Some(h) if h != 0.0 => h,
        Some(_) => {
            debug!("HDL is zero; cholesterol ratios skipped");
            return ratios;
        }
        None => return ratios,
    };

    for (numerator, name) in [
        (TOTAL_CHOLESTEROL, TC_HDL_RATIO),
        (LDL, LDL_HDL_RATIO),
        (TRIGLYCERIDES, TG_HDL_RATIO),
    ] {
        let Some(n) = values.value_of(numerator) else {
            continue;
        };
        let ratio = round2(n / hdl);
        if ratio.is_finite() {
            ratios.insert(name.to_string(), ratio);
        } else {
            debug!(ratio = name, numerator = n, hdl, "ratio is not finite; skipped");
        }
    }

    ratios
}

fn tier_for(ratio: f64, (low, moderate): (f64, f64)) -> RiskTier {
    if ratio < low {
        RiskTier::Low
    } else if ratio < moderate {
        RiskTier::Moderate
    } else {
        RiskTier::High
    }
}

/// Cardiac-risk tier from TC/HDL, falling back to LDL/HDL.
///
/// An LDL at or above 190 mg/dL raises the tier to `High` on its own.
pub fn assess_cardiac_risk(ratios: &BTreeMap<String, f64>, ldl: Option<f64>) -> Option<CardiacRisk> {
    let from_ratio = if let Some(&r) = ratios.get(TC_HDL_RATIO) {
        Some((tier_for(r, TC_HDL_CUTOFFS), TC_HDL_RATIO, r))
    } else {
        ratios
            .get(LDL_HDL_RATIO)
            .map(|&r| (tier_for(r, LDL_HDL_CUTOFFS), LDL_HDL_RATIO, r))
    };

    let (risk, basis, value) = match (from_ratio, ldl) {
        (Some((RiskTier::High, basis, value)), _) => (RiskTier::High, basis, value),
        (_, Some(l)) if l >= LDL_HIGH_RISK => (RiskTier::High, "LDL", l),
        (Some(found), _) => found,
        (None, _) => return None,
    };

    Some(CardiacRisk {
        risk,
        color: risk.color(),
        basis: basis.to_string(),
        value,
    })
}

/// Compute every metric whose inputs are present.
pub fn calculate_metrics(values: &ClassifiedSet, patient: &PatientContext) -> CalculatedMetrics {
    let mut metrics = CalculatedMetrics::default();

    match values.value_of(CREATININE) {
        Some(creatinine) => match estimate_egfr(creatinine, patient.age, patient.gender) {
            Some(egfr) => {
                metrics.egfr = Some(egfr);
                metrics.egfr_interpretation = Some(interpret_egfr(egfr));
            }
            None => debug!(creatinine, "non-positive creatinine; eGFR skipped"),
        },
        None => debug!("creatinine absent; eGFR skipped"),
    }

    let ratios = cholesterol_ratios(values);
    metrics.cardiac_risk = assess_cardiac_risk(&ratios, values.value_of(LDL));
    if metrics.cardiac_risk.is_none() {
        debug!("no lipid inputs for cardiac risk; skipped");
    }
    if !ratios.is_empty() {
        metrics.cholesterol_ratios = Some(ratios);
    }

    metrics
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use labwise_contracts::{
        classified::{ClassifiedSet, ClassifiedValue, Color, SeverityTier},
        metrics::RiskTier,
        patient::{Gender, Panel, PatientContext},
        range::ReferenceRange,
    };

    use super::*;

    fn value(key: &str, v: f64) -> ClassifiedValue {
        let range = ReferenceRange {
            test: key.to_string(),
            key: key.to_string(),
            panel: Panel::Lipid,
            unit: "mg/dL".to_string(),
            low: 0.0,
            high: 1000.0,
            critical_low: None,
            critical_high: None,
        };
        ClassifiedValue {
            test: key.to_string(),
            key: key.to_string(),
            value: v,
            unit: "mg/dL".to_string(),
            panel: Panel::Lipid,
            reference_range: range.display(),
            severity: SeverityTier::Normal,
            direction: None,
            label: "normal".to_string(),
            color: Color::Green,
            range,
        }
    }

    fn patient(age: u32, gender: Gender) -> PatientContext {
        PatientContext {
            age,
            gender,
            medications: vec![],
        }
    }

    // ── eGFR ────────────────────────────────────────────────────────────────

    #[test]
    fn egfr_for_middle_aged_male() {
        assert_eq!(estimate_egfr(1.2, 45, Gender::Male), Some(73));
    }

    #[test]
    fn egfr_applies_female_coefficients() {
        assert_eq!(estimate_egfr(0.8, 30, Gender::Female), Some(99));
        assert_eq!(estimate_egfr(0.6, 30, Gender::Female), Some(122));
    }

    #[test]
    fn egfr_rejects_non_positive_creatinine() {
        assert_eq!(estimate_egfr(0.0, 45, Gender::Male), None);
        assert_eq!(estimate_egfr(-1.0, 45, Gender::Male), None);
        assert_eq!(estimate_egfr(f64::NAN, 45, Gender::Male), None);
    }

    #[test]
    fn egfr_stages() {
        assert_eq!(interpret_egfr(99).stage, "Normal");
        assert_eq!(interpret_egfr(90).color, Color::Green);
        assert_eq!(interpret_egfr(73).stage, "Stage 1-2");
        assert_eq!(interpret_egfr(55).stage, "Stage 3");
        assert_eq!(interpret_egfr(25).color, Color::Red);
        assert_eq!(interpret_egfr(11).description, "Kidney failure");
    }

    #[test]
    fn metrics_include_staged_egfr_when_creatinine_present() {
        let values = ClassifiedSet::new(vec![value(CREATININE, 1.2)]);
        let metrics = calculate_metrics(&values, &patient(45, Gender::Male));

        assert_eq!(metrics.egfr, Some(73));
        let interp = metrics.egfr_interpretation.unwrap();
        assert_eq!(interp.stage, "Stage 1-2");
        assert_eq!(interp.color, Color::Yellow);
    }

    #[test]
    fn egfr_omitted_without_creatinine() {
        let values = ClassifiedSet::new(vec![value(HDL, 50.0)]);
        let metrics = calculate_metrics(&values, &patient(45, Gender::Male));
        assert!(metrics.egfr.is_none());
        assert!(metrics.egfr_interpretation.is_none());
    }

    // ── Cholesterol ratios ──────────────────────────────────────────────────

    #[test]
    fn ratios_round_to_two_decimals() {
        let values = ClassifiedSet::new(vec![
            value(TOTAL_CHOLESTEROL, 200.0),
            value(LDL, 130.0),
            value(HDL, 45.0),
            value(TRIGLYCERIDES, 150.0),
        ]);
        let ratios = cholesterol_ratios(&values);

        assert_eq!(ratios[TC_HDL_RATIO], 4.44);
        assert_eq!(ratios[LDL_HDL_RATIO], 2.89);
        assert_eq!(ratios[TG_HDL_RATIO], 3.33);
    }

    #[test]
    fn ratios_omitted_when_hdl_zero_or_absent() {
        let zero = ClassifiedSet::new(vec![value(TOTAL_CHOLESTEROL, 200.0), value(HDL, 0.0)]);
        assert!(cholesterol_ratios(&zero).is_empty());

        let absent = ClassifiedSet::new(vec![value(TOTAL_CHOLESTEROL, 200.0)]);
        assert!(cholesterol_ratios(&absent).is_empty());

        let metrics = calculate_metrics(&zero, &patient(50, Gender::Female));
        assert!(metrics.cholesterol_ratios.is_none());
        assert!(metrics.cardiac_risk.is_none());
    }

    #[test]
    fn only_computable_ratios_are_reported() {
        let values = ClassifiedSet::new(vec![value(LDL, 100.0), value(HDL, 50.0)]);
        let ratios = cholesterol_ratios(&values);
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[LDL_HDL_RATIO], 2.0);
    }

    #[test]
    fn overflowing_ratios_are_omitted() {
        let huge = ClassifiedSet::new(vec![
            value(TOTAL_CHOLESTEROL, 1e307),
            value(LDL, 130.0),
            value(HDL, 1.0),
        ]);
        let ratios = cholesterol_ratios(&huge);
        assert!(!ratios.contains_key(TC_HDL_RATIO));
        assert_eq!(ratios[LDL_HDL_RATIO], 130.0);

        let tiny_hdl = ClassifiedSet::new(vec![value(TOTAL_CHOLESTEROL, 200.0), value(HDL, 1e-310)]);
        assert!(cholesterol_ratios(&tiny_hdl).is_empty());

        let metrics = calculate_metrics(&tiny_hdl, &patient(50, Gender::Male));
        assert!(metrics.cholesterol_ratios.is_none());
        assert!(metrics.cardiac_risk.is_none());
    }

    // ── Cardiac risk ────────────────────────────────────────────────────────

    fn ratios(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn cardiac_risk_tiers_from_tc_hdl() {
        let low = assess_cardiac_risk(&ratios(&[(TC_HDL_RATIO, 3.2)]), None).unwrap();
        assert_eq!(low.risk, RiskTier::Low);
        assert_eq!(low.color, Color::Green);

        let moderate = assess_cardiac_risk(&ratios(&[(TC_HDL_RATIO, 3.5)]), None).unwrap();
        assert_eq!(moderate.risk, RiskTier::Moderate);

        let high = assess_cardiac_risk(&ratios(&[(TC_HDL_RATIO, 5.0)]), None).unwrap();
        assert_eq!(high.risk, RiskTier::High);
        assert_eq!(high.basis, TC_HDL_RATIO);
    }

    #[test]
    fn cardiac_risk_falls_back_to_ldl_hdl() {
        let risk = assess_cardiac_risk(&ratios(&[(LDL_HDL_RATIO, 3.0)]), Some(120.0)).unwrap();
        assert_eq!(risk.risk, RiskTier::Moderate);
        assert_eq!(risk.basis, LDL_HDL_RATIO);
    }

    #[test]
    fn very_high_ldl_raises_risk() {
        let risk = assess_cardiac_risk(&ratios(&[(TC_HDL_RATIO, 3.0)]), Some(195.0)).unwrap();
        assert_eq!(risk.risk, RiskTier::High);
        assert_eq!(risk.basis, "LDL");
        assert_eq!(risk.value, 195.0);
    }

    #[test]
    fn cardiac_risk_absent_without_lipids() {
        assert!(assess_cardiac_risk(&BTreeMap::new(), None).is_none());
        assert!(assess_cardiac_risk(&BTreeMap::new(), Some(120.0)).is_none());
    }
}

//! Built-in pattern rules.
//!
//! Each rule reads values by catalog key from the `ClassifiedSet`. Absence is
//! handled by the registry through `required_tests`, so `evaluate` may look
//! those keys up without re-checking. Optional supporting tests are looked up
//! with `ClassifiedSet::get` and cited only when present.

pub mod anemia;
pub mod glycemic;
pub mod kidney;
pub mod liver;
pub mod medication;
pub mod thyroid;

use labwise_contracts::{
    classified::{ClassifiedValue, SeverityTier},
    pattern::{EvidenceItem, PatternFinding, Qualifier},
};

/// Most severe tier among `values`; `Normal` when empty.
pub(crate) fn strongest(values: &[&ClassifiedValue]) -> SeverityTier {
    values
        .iter()
        .map(|v| v.severity)
        .max()
        .unwrap_or(SeverityTier::Normal)
}

/// Build a finding whose qualifier follows the most severe `driving` value.
pub(crate) fn finding(
    name: &str,
    evidence: &[&ClassifiedValue],
    driving: &[&ClassifiedValue],
    note: Option<String>,
) -> PatternFinding {
    PatternFinding {
        name: name.to_string(),
        evidence: evidence.iter().map(|v| EvidenceItem::from(*v)).collect(),
        qualifier: Qualifier::from_severity(strongest(driving)),
        note,
    }
}

pub(crate) fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

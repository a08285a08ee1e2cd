//! Cross-test pattern findings and medication lab-effect profiles.

use serde::{Deserialize, Serialize};

use crate::classified::{ClassifiedValue, Direction, SeverityTier};

/// How strongly a finding is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    /// Informational note linking a finding to a medication.
    Advisory,
    Possible,
    Likely,
    Marked,
}

impl Qualifier {
    /// Qualifier implied by the most severe value driving a pattern.
    pub fn from_severity(tier: SeverityTier) -> Self {
        match tier {
            SeverityTier::Normal | SeverityTier::MildAbnormal => Qualifier::Possible,
            SeverityTier::ModerateAbnormal => Qualifier::Likely,
            SeverityTier::SevereAbnormal | SeverityTier::Critical => Qualifier::Marked,
        }
    }
}

/// One lab value cited as support for a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceItem {
    pub test: String,
    pub value: f64,
    pub unit: String,
    pub severity: SeverityTier,
    pub label: String,
}

impl From<&ClassifiedValue> for EvidenceItem {
    fn from(v: &ClassifiedValue) -> Self {
        Self {
            test: v.test.clone(),
            value: v.value,
            unit: v.unit.clone(),
            severity: v.severity,
            label: v.label.clone(),
        }
    }
}

/// A named cross-test signature detected in one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFinding {
    pub name: String,
    pub evidence: Vec<EvidenceItem>,
    pub qualifier: Qualifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A known effect of a medication on one lab test.
///
/// Example in TOML:
/// ```toml
/// [[medication_effects]]
/// medication = "lisinopril"
/// test = "Potassium"
/// direction = "high"
/// note = "ACE inhibitors reduce potassium excretion"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationEffect {
    /// Lowercase generic name matched against medication tokens.
    pub medication: String,
    /// Catalog test name the medication affects.
    pub test: String,
    pub direction: Direction,
    pub note: String,
}

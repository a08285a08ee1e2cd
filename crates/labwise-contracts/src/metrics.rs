//! Derived-metric output types.
//!
//! Every metric carries both its number and its categorical interpretation so
//! downstream consumers never re-derive thresholds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classified::Color;

/// Staged interpretation of an eGFR value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgfrInterpretation {
    pub stage: String,
    pub description: String,
    pub color: Color,
}

/// Categorical cardiac-risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub fn color(self) -> Color {
        match self {
            RiskTier::Low => Color::Green,
            RiskTier::Moderate => Color::Yellow,
            RiskTier::High => Color::Red,
        }
    }
}

/// Cardiac-risk judgment and the input it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardiacRisk {
    pub risk: RiskTier,
    pub color: Color,
    /// Ratio name the tier was read from, e.g. `"TC_HDL_Ratio"`, or
    /// `"LDL"` when a very high LDL decided it.
    pub basis: String,
    /// Value of the basis.
    pub value: f64,
}

/// The `calculated_metrics` block of an analysis result.
///
/// Each field is present only when all of its inputs were supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculatedMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egfr: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub egfr_interpretation: Option<EgfrInterpretation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol_ratios: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardiac_risk: Option<CardiacRisk>,
}

impl CalculatedMetrics {
    pub fn is_empty(&self) -> bool {
        self.egfr.is_none() && self.cholesterol_ratios.is_none() && self.cardiac_risk.is_none()
    }
}

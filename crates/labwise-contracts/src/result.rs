//! The engine's output contract.

use serde::{Deserialize, Serialize};

use crate::{
    classified::{ClassifiedValue, Color, Direction, SeverityTier},
    metrics::CalculatedMetrics,
    patient::Panel,
    pattern::PatternFinding,
};

/// Tier counts over every classified value.
///
/// `normal_count + abnormal_count + critical_count == total_tests`.
/// Unrecognized and rejected values are not part of `total_tests`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    pub total_tests: usize,
    pub normal_count: usize,
    pub abnormal_count: usize,
    pub critical_count: usize,
}

/// Entry of the `critical_values` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalValue {
    pub test: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: String,
}

impl From<&ClassifiedValue> for CriticalValue {
    fn from(v: &ClassifiedValue) -> Self {
        Self {
            test: v.test.clone(),
            value: v.value,
            unit: v.unit.clone(),
            reference_range: v.reference_range.clone(),
        }
    }
}

/// Entry of the `abnormalities` list (mild, moderate or severe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Abnormality {
    pub test: String,
    pub value: f64,
    pub unit: String,
    pub reference_range: String,
    pub severity: SeverityTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    pub label: String,
    pub color: Color,
}

impl From<&ClassifiedValue> for Abnormality {
    fn from(v: &ClassifiedValue) -> Self {
        Self {
            test: v.test.clone(),
            value: v.value,
            unit: v.unit.clone(),
            reference_range: v.reference_range.clone(),
            severity: v.severity,
            direction: v.direction,
            label: v.label.clone(),
            color: v.color,
        }
    }
}

/// A value whose test name is not in the reference catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnrecognizedValue {
    pub test: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub unit: String,
    pub panel: Panel,
}

/// A value that was excluded because it was missing or not a finite number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedValue {
    pub test: String,
    pub reason: String,
}

/// The structured result of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub results_summary: ResultsSummary,
    pub critical_values: Vec<CriticalValue>,
    pub abnormalities: Vec<Abnormality>,
    pub calculated_metrics: CalculatedMetrics,
    pub pattern_findings: Vec<PatternFinding>,
    /// Every classified value in input order.
    pub all_results: Vec<ClassifiedValue>,
    pub unrecognized_values: Vec<UnrecognizedValue>,
    pub rejected_values: Vec<RejectedValue>,
}

/// Free-text sections produced by the narrative collaborator.
///
/// Never produced by the engine itself; attached at the report boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub detailed_analysis: String,
    pub physician_summary: String,
}

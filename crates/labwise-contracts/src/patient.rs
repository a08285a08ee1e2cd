//! Request-side types: patient context and raw lab values.
//!
//! These mirror the wire shape of an analysis request. Nothing in this module
//! is mutated by the engine; the analyzer reads them and builds derived types.

use serde::{Deserialize, Serialize};

/// Patient gender, used to select demographic reference-range variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Male", alias = "MALE")]
    Male,
    #[serde(alias = "Female", alias = "FEMALE")]
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The lab panel a test was ordered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Panel {
    #[serde(rename = "CBC", alias = "cbc")]
    Cbc,
    #[serde(rename = "LFT", alias = "lft")]
    Lft,
    #[serde(rename = "KFT", alias = "kft")]
    Kft,
    #[serde(rename = "Lipid", alias = "lipid")]
    Lipid,
    #[serde(rename = "Thyroid", alias = "thyroid")]
    Thyroid,
    #[serde(rename = "Glucose", alias = "glucose")]
    Glucose,
}

impl Panel {
    pub const ALL: [Panel; 6] = [
        Panel::Cbc,
        Panel::Lft,
        Panel::Kft,
        Panel::Lipid,
        Panel::Thyroid,
        Panel::Glucose,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Cbc => "CBC",
            Panel::Lft => "LFT",
            Panel::Kft => "KFT",
            Panel::Lipid => "Lipid",
            Panel::Thyroid => "Thyroid",
            Panel::Glucose => "Glucose",
        }
    }
}

impl std::fmt::Display for Panel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lab reading exactly as the caller supplied it.
///
/// Callers occasionally send text ("pending", "<0.1") where a number belongs.
/// The reading is kept verbatim so the classifier can reject it explicitly
/// instead of coercing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabReading {
    Number(f64),
    Text(String),
    /// Booleans, objects and arrays. Decoding never fails on a reading, so
    /// one bad entry cannot lose the rest of the batch.
    Other(serde_json::Value),
}

impl From<f64> for LabReading {
    fn from(value: f64) -> Self {
        LabReading::Number(value)
    }
}

/// One caller-supplied lab value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValueInput {
    /// Free-text test name; matched case-insensitively against the catalog.
    pub test_name: String,
    /// `None` when the field was absent or `null`.
    #[serde(default)]
    pub value: Option<LabReading>,
    /// Advisory only; the catalog unit is authoritative for the range text.
    #[serde(default)]
    pub unit: String,
    pub panel: Panel,
}

impl LabValueInput {
    pub fn new(test_name: impl Into<String>, value: f64, unit: impl Into<String>, panel: Panel) -> Self {
        Self {
            test_name: test_name.into(),
            value: Some(LabReading::Number(value)),
            unit: unit.into(),
            panel,
        }
    }
}

/// The engine's input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Any JSON number is accepted here. Absent, negative, fractional and
    /// implausible ages are rejected by the analyzer as validation errors.
    #[serde(default)]
    pub patient_age: Option<f64>,
    pub patient_gender: Gender,
    #[serde(default)]
    pub lab_values: Vec<LabValueInput>,
    #[serde(default)]
    pub current_medications: Vec<String>,
}

/// Validated patient demographics and medications for one analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientContext {
    pub age: u32,
    pub gender: Gender,
    pub medications: Vec<String>,
}

//! Core trait definitions for the Labwise pipeline.
//!
//! These traits are the seams between the engine and its collaborators:
//!
//! - `ReferenceCatalog`: read-only reference ranges and severity cutoffs
//! - `PatternRecognizer`: cross-test rules over the classified set
//! - `ResultVerifier`: checks a finished result before it leaves the engine
//! - `NarrativeGenerator`: external prose writer, strictly downstream
//!
//! The analyzer wires the first two together. The last two live at the
//! report boundary and never feed back into classification.

use labwise_contracts::{
    classified::ClassifiedSet,
    error::LabResult,
    patient::{Gender, PatientContext},
    pattern::PatternFinding,
    range::{ReferenceRange, SeverityCutoffs},
    result::{AnalysisResult, Narrative},
    verify::VerificationReport,
};

/// Source of reference ranges.
///
/// Implementations are read-only after construction so one catalog can be
/// shared by concurrent analyses without locking.
pub trait ReferenceCatalog: Send + Sync {
    /// Resolve the range for `test_name` and `gender`.
    ///
    /// Matching is exact on the normalized name (see
    /// `labwise_contracts::range::normalize_test_name`). A gender-specific
    /// band is returned when one exists, otherwise the default band.
    /// Returns `None` for tests the catalog does not know.
    fn resolve(&self, test_name: &str, gender: Gender) -> Option<ReferenceRange>;

    /// Cutoffs used to bucket out-of-band values.
    fn severity_cutoffs(&self) -> SeverityCutoffs;
}

/// Evaluates cross-test pattern rules.
pub trait PatternRecognizer: Send + Sync {
    /// Return every finding whose rule fires on `values`.
    ///
    /// Must be deterministic: the same input yields the same findings in the
    /// same order.
    fn recognize(&self, values: &ClassifiedSet, patient: &PatientContext) -> Vec<PatternFinding>;
}

/// Checks a finished result against its output contract.
pub trait ResultVerifier: Send + Sync {
    /// Return a report with `passed = false` and populated `failures` when any
    /// check fails. `Err` is reserved for the verifier itself breaking.
    fn verify(&self, result: &AnalysisResult) -> LabResult<VerificationReport>;
}

/// The external narrative collaborator.
///
/// Called only after the structured result is complete and verified. Its
/// output is attached to the report and never alters the result.
pub trait NarrativeGenerator: Send + Sync {
    fn generate(&self, result: &AnalysisResult, patient: &PatientContext) -> LabResult<Narrative>;
}

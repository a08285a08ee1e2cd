//! Result verification report types.
//!
//! Before an analysis result leaves the engine boundary it is checked
//! against a JSON Schema and a set of semantic invariants. Only a passing
//! `VerificationReport` allows it to reach the narrative collaborator.

use serde::{Deserialize, Serialize};

/// The outcome of verifying one analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True only if every check passed.
    pub passed: bool,
    /// All failures collected in this run. Empty on pass.
    pub failures: Vec<VerificationFailure>,
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationFailure {
    pub check_id: String,
    pub message: String,
}

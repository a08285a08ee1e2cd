//! # labwise-contracts
//!
//! Shared types, schemas, and contracts for the Labwise lab interpretation
//! engine.
//!
//! All crates in the workspace import from here. Apart from test-name
//! normalization, no business logic lives in this crate: only data
//! definitions and error types.

pub mod classified;
pub mod error;
pub mod metrics;
pub mod patient;
pub mod pattern;
pub mod range;
pub mod result;
pub mod verify;

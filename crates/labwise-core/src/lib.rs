//! # labwise-core
//!
//! The deterministic interpretation runtime for Labwise.
//!
//! This crate provides:
//! - The collaborator traits (`ReferenceCatalog`, `PatternRecognizer`,
//!   `ResultVerifier`, `NarrativeGenerator`)
//! - The single-value `classifier` and the derived `metrics` calculator
//! - The `Analyzer` that aggregates them into an `AnalysisResult`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use labwise_core::Analyzer;
//!
//! let analyzer = Analyzer::new(Arc::new(catalog), Box::new(recognizer));
//! let result = analyzer.analyze(&request)?;
//! ```

pub mod analyzer;
pub mod classifier;
pub mod metrics;
pub mod traits;

pub use analyzer::Analyzer;

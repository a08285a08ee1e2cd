//! # labwise-report
//!
//! The report boundary of the Labwise engine. A structured `AnalysisResult`
//! is verified, digested, handed to a narrative generator, and wrapped in an
//! [`AnalysisReport`] with an id and timestamp.
//!
//! ```rust,ignore
//! use labwise_report::{FallbackNarrator, ReportPipeline, ResultSchemaVerifier};
//!
//! let pipeline = ReportPipeline::new(
//!     analyzer,
//!     Box::new(ResultSchemaVerifier::new()),
//!     Box::new(FallbackNarrator),
//! );
//! let report = pipeline.run(&request)?;
//! ```

pub mod digest;
pub mod narrative;
pub mod prompt;
pub mod report;
pub mod schema;
pub mod verify;

pub use digest::result_digest;
pub use narrative::FallbackNarrator;
pub use report::{build_report, AnalysisReport, PatientInfo, ReportPipeline};
pub use verify::ResultSchemaVerifier;

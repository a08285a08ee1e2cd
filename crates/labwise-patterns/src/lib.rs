//! # labwise-patterns
//!
//! Cross-test pattern recognition for the Labwise engine.
//!
//! [`RuleRegistry`] implements
//! [`PatternRecognizer`](labwise_core::traits::PatternRecognizer) over an
//! ordered list of [`PatternRule`]s. The built-in rules cover anemia
//! subtyping, liver injury patterns, thyroid function, BUN/creatinine ratio,
//! glycemic status, and a medication cross-check driven by the catalog's
//! medication profiles.
//!
//! ```rust,ignore
//! use labwise_patterns::RuleRegistry;
//!
//! let catalog = labwise_catalog::builtin()?;
//! let recognizer = RuleRegistry::with_default_rules(catalog.medication_effects());
//! ```

pub mod recognizer;
pub mod rules;

pub use recognizer::{PatternRule, RuleRegistry};

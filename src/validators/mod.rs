//! XML Schema validators
//!
//! Structural checks over a parsed schema document. [`validation`] answers
//! "is this a schema"; [`analysis`] lists what the schema declares. Both walk
//! the same tree produced by [`crate::documents`].

pub mod analysis;
pub mod helpers;
pub mod validation;

// Re-exports
pub use analysis::{analyze, analyze_with_limits, AnalysisResult, ElementDecl};
pub use validation::{validate, validate_with_limits, ValidationResult};

//! # xsd-retrieval
//!
//! Retrieve XML Schema (XSD) documents, check that they are structurally
//! schemas, and list what they declare.
//!
//! ## Features
//!
//! - Tolerant-but-honest validation: empty input is "nothing to check",
//!   malformed input is always an error with a parser diagnostic
//! - Element, complex type and simple type enumeration
//! - A path safety gate for every filesystem read and write
//! - Retrieval from local files or (with the `remote` feature) HTTP(S)
//!
//! ## Example
//!
//! ```rust
//! use xsd_retrieval::validators::{analyze, validate};
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:element name="note" type="xs:string"/>
//! </xs:schema>"#;
//!
//! let report = validate(xsd)?;
//! assert!(report.is_valid);
//! assert_eq!(report.element_names, vec!["note"]);
//!
//! let analysis = analyze(xsd)?;
//! assert_eq!(analysis.elements[0].type_ref, "xs:string");
//! # Ok::<(), xsd_retrieval::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod error;
pub mod limits;

// Utilities
pub mod names;
pub mod namespaces;

// Parsing and schema checks
pub mod documents;
pub mod validators;

// Filesystem and retrieval
pub mod locations;
pub mod loaders;
pub mod paths;

// Re-exports for convenience
pub use error::{Error, PathError, Result};
pub use loaders::{Loader, Retrieved};
pub use validators::{analyze, validate, AnalysisResult, ElementDecl, ValidationResult};

/// Version of the xsd-retrieval library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

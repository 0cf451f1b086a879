//! Error types for xsd-retrieval
//!
//! This module defines all error types used throughout the library.
//! Parser diagnostics travel as [`ParseError`]; filesystem gate rejections
//! travel as [`PathError`].

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for xsd-retrieval operations
#[derive(Error, Debug)]
pub enum Error {
    /// The text is not well-formed XML
    #[error("malformed XML: {0}")]
    MalformedXml(ParseError),

    /// Schema validation could not run because the text is not well-formed
    #[error("failed to validate XSD: {0}")]
    Validation(ParseError),

    /// Schema analysis could not run because the text is not well-formed
    #[error("failed to analyze XSD: {0}")]
    Analysis(ParseError),

    /// Well-formed XML without a schema root element
    #[error("no <xs:schema> element found in the provided XSD")]
    SchemaElementMissing,

    /// A path was rejected by the path safety gate
    #[error("invalid file path: {0}")]
    Path(#[from] PathError),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Resource retrieval error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// The parser diagnostic behind a malformed-input failure, if any
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::MalformedXml(e) | Error::Validation(e) | Error::Analysis(e) => Some(e),
            _ => None,
        }
    }
}

/// Diagnostic produced when the parser adapter cannot build a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the input text (`line L, column C`)
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Rejections raised by the path safety gate
#[derive(Error, Debug)]
pub enum PathError {
    /// The path is empty
    #[error("path is null or empty")]
    Empty,

    /// The normalized path still climbs above its starting point
    #[error("path contains directory traversal sequences: {}", .0.display())]
    Traversal(PathBuf),

    /// Absolute paths are not allowed when a sandbox root is set
    #[error("absolute paths are not allowed: {}", .0.display())]
    AbsolutePathRejected(PathBuf),

    /// The resolved path lies outside the sandbox root
    #[error(
        "path is outside the allowed directory: {} (root: {})",
        .path.display(),
        .root.display()
    )]
    SandboxEscape {
        /// Resolved path
        path: PathBuf,
        /// Resolved sandbox root
        root: PathBuf,
    },

    /// The file does not exist
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The path could not be inspected for a reason other than absence
    #[error("cannot access {}: {}", .path.display(), .source)]
    Inaccessible {
        /// Path that failed
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        source: std::io::Error,
    },

    /// The path exists but is not a regular file
    #[error("path is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    /// The parent directory of a write target does not exist
    #[error("parent directory does not exist: {}", .0.display())]
    ParentMissing(PathBuf),

    /// The parent of a write target is not a directory
    #[error("parent path is not a directory: {}", .0.display())]
    ParentNotDirectory(PathBuf),

    /// The working directory could not be determined
    #[error("cannot resolve current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

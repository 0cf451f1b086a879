//! Schema validation
//!
//! Answers whether a text is structurally an XML Schema, and reports the
//! namespace declarations and element names it carries.

use serde::Serialize;
use tracing::debug;

use super::helpers::{named_descendants, schema_root, trim_schema_text, xsd_elements};
use crate::documents::Document;
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{namespace_declarations, NamespaceDecl};
use crate::XSD_NAMESPACE;

/// Outcome of [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// The document is well-formed and rooted at a schema element
    pub is_valid: bool,
    /// The text starts with `<?xml` once whitespace and any byte order
    /// mark are trimmed
    pub has_xml_declaration: bool,
    /// The root element is `schema` (prefixed or not)
    pub has_schema_element: bool,
    /// Namespace declarations on the root element, in declaration order
    pub namespaces: Vec<NamespaceDecl>,
    /// `name` of every `element` node, in document order, duplicates kept
    pub element_names: Vec<String>,
}

impl ValidationResult {
    /// Whether the root element declares the XSD 1.0 namespace
    pub fn declares_xsd_namespace(&self) -> bool {
        self.namespaces.iter().any(|ns| ns.uri == XSD_NAMESPACE)
    }
}

/// Validate schema text with default limits
pub fn validate(text: &str) -> Result<ValidationResult> {
    validate_with_limits(text, &Limits::default())
}

/// Validate schema text.
///
/// A leading byte order mark is ignored. Empty or whitespace-only input
/// yields an all-false result. Text that is not well-formed XML fails with
/// [`Error::Validation`] carrying the parser diagnostic.
pub fn validate_with_limits(text: &str, limits: &Limits) -> Result<ValidationResult> {
    let text = trim_schema_text(text);
    if text.is_empty() {
        return Ok(ValidationResult::default());
    }

    let has_xml_declaration = text.starts_with("<?xml");

    let doc = Document::parse(text, limits).map_err(|e| match e {
        Error::MalformedXml(diag) => Error::Validation(diag),
        other => other,
    })?;

    let root = doc.root();
    let has_schema_element = schema_root(&doc).is_some();

    let result = ValidationResult {
        is_valid: has_schema_element,
        has_xml_declaration,
        has_schema_element,
        namespaces: namespace_declarations(&root.attributes),
        element_names: named_descendants(root, xsd_elements::ELEMENT)
            .map(|(name, _)| name.to_string())
            .collect(),
    };

    debug!(
        valid = result.is_valid,
        namespaces = result.namespaces.len(),
        elements = result.element_names.len(),
        "validated schema text"
    );
    Ok(result)
}

//! Schema analysis
//!
//! Enumerates the element, complex type and simple type declarations of a
//! schema document.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::helpers::{named_descendants, schema_root, trim_schema_text, xsd_attrs, xsd_elements};
use crate::documents::{Document, Element};
use crate::error::{Error, Result};
use crate::limits::Limits;

/// Type reference reported for an element without a `type` attribute
pub const UNDEFINED_TYPE: &str = "undefined";

/// Occurrence bound reported when `minOccurs`/`maxOccurs` is absent
pub const DEFAULT_OCCURS: &str = "1";

/// An element declaration with its positional attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementDecl {
    /// Declared name
    pub name: String,
    /// `type` attribute, or `"undefined"`
    #[serde(rename = "type")]
    pub type_ref: String,
    /// `minOccurs` attribute, or `"1"`
    pub min_occurs: String,
    /// `maxOccurs` attribute, or `"1"` (`"unbounded"` passes through)
    pub max_occurs: String,
}

impl ElementDecl {
    fn from_element(name: &str, element: &Element) -> Self {
        Self {
            name: name.to_string(),
            type_ref: attribute_or(element, xsd_attrs::TYPE, UNDEFINED_TYPE),
            min_occurs: attribute_or(element, xsd_attrs::MIN_OCCURS, DEFAULT_OCCURS),
            max_occurs: attribute_or(element, xsd_attrs::MAX_OCCURS, DEFAULT_OCCURS),
        }
    }

    /// Whether the element has no upper occurrence bound
    pub fn is_unbounded(&self) -> bool {
        self.max_occurs == "unbounded"
    }
}

impl fmt::Display for ElementDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (type: {}, min: {}, max: {})",
            self.name, self.type_ref, self.min_occurs, self.max_occurs
        )
    }
}

fn attribute_or(element: &Element, key: &str, default: &str) -> String {
    element.get_attribute(key).unwrap_or(default).to_string()
}

/// Outcome of [`analyze`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Element declarations, one per name, first occurrence wins
    pub elements: Vec<ElementDecl>,
    /// Named complex types in document order, duplicates kept
    pub complex_type_names: Vec<String>,
    /// Named simple types in document order, duplicates kept
    pub simple_type_names: Vec<String>,
}

impl AnalysisResult {
    /// Look up an element declaration by name
    pub fn element(&self, name: &str) -> Option<&ElementDecl> {
        self.elements.iter().find(|decl| decl.name == name)
    }
}

/// Analyze schema text with default limits
pub fn analyze(text: &str) -> Result<AnalysisResult> {
    analyze_with_limits(text, &Limits::default())
}

/// Analyze schema text.
///
/// Empty or whitespace-only input yields an empty result. Text that is not
/// well-formed fails with [`Error::Analysis`]; a well-formed document whose
/// root is not a schema element fails with [`Error::SchemaElementMissing`].
pub fn analyze_with_limits(text: &str, limits: &Limits) -> Result<AnalysisResult> {
    let text = trim_schema_text(text);
    if text.is_empty() {
        return Ok(AnalysisResult::default());
    }

    let doc = Document::parse(text, limits).map_err(|e| match e {
        Error::MalformedXml(diag) => Error::Analysis(diag),
        other => other,
    })?;
    let schema = schema_root(&doc).ok_or(Error::SchemaElementMissing)?;

    let mut elements: IndexMap<&str, ElementDecl> = IndexMap::new();
    for (name, element) in named_descendants(schema, xsd_elements::ELEMENT) {
        elements
            .entry(name)
            .or_insert_with(|| ElementDecl::from_element(name, element));
    }

    let type_names = |local_name: &str| {
        named_descendants(schema, local_name)
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>()
    };

    let result = AnalysisResult {
        elements: elements.into_values().collect(),
        complex_type_names: type_names(xsd_elements::COMPLEX_TYPE),
        simple_type_names: type_names(xsd_elements::SIMPLE_TYPE),
    };

    debug!(
        elements = result.elements.len(),
        complex_types = result.complex_type_names.len(),
        simple_types = result.simple_type_names.len(),
        "analyzed schema text"
    );
    Ok(result)
}

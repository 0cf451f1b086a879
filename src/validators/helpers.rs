//! Validator helper functions
//!
//! Shared name constants and lookups used by both the validator and the
//! analyzer, so the two read the tree the same way.

use crate::documents::{Document, Element};

/// XSD element local names
pub mod xsd_elements {
    /// `schema`
    pub const SCHEMA: &str = "schema";
    /// `element`
    pub const ELEMENT: &str = "element";
    /// `complexType`
    pub const COMPLEX_TYPE: &str = "complexType";
    /// `simpleType`
    pub const SIMPLE_TYPE: &str = "simpleType";
}

/// XSD attribute names
pub mod xsd_attrs {
    /// `name`
    pub const NAME: &str = "name";
    /// `type`
    pub const TYPE: &str = "type";
    /// `minOccurs`
    pub const MIN_OCCURS: &str = "minOccurs";
    /// `maxOccurs`
    pub const MAX_OCCURS: &str = "maxOccurs";
}

/// UTF-8 byte order mark, kept at the start of text read from disk
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Strip surrounding whitespace and any byte order mark
pub fn trim_schema_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || c == BYTE_ORDER_MARK)
}

/// Check whether an element is a schema root (`schema` or `<prefix>:schema`)
pub fn is_schema_element(element: &Element) -> bool {
    element.local_name() == xsd_elements::SCHEMA
}

/// The document's schema root, if its root element is one
pub fn schema_root(doc: &Document) -> Option<&Element> {
    Some(doc.root()).filter(|root| is_schema_element(root))
}

/// Descendants with the given local name that carry a `name` attribute,
/// yielded with that name
pub fn named_descendants<'a>(
    element: &'a Element,
    local_name: &'a str,
) -> impl Iterator<Item = (&'a str, &'a Element)> + 'a {
    element
        .descendants()
        .filter(move |e| e.local_name() == local_name)
        .filter_map(|e| e.get_attribute(xsd_attrs::NAME).map(|name| (name, e)))
}

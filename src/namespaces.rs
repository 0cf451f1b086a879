//! XML namespace handling
//!
//! This module provides prefixed element names and the extraction of
//! namespace declarations (`xmlns`, `xmlns:<prefix>`) from attribute maps.

use crate::names::split_qname;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Prefix reported for a default (unprefixed) namespace declaration
pub const DEFAULT_PREFIX: &str = "default";

/// Qualified name as written in the document: optional prefix plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace prefix (None when unprefixed)
    pub prefix: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a QName without a prefix
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a prefix
    pub fn prefixed(prefix: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            local_name: local_name.into(),
        }
    }

    /// Split a raw `prefix:local` name
    pub fn parse(raw: &str) -> Self {
        match split_qname(raw) {
            (Some(prefix), local) => Self::prefixed(prefix, local),
            (None, local) => Self::local(local),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// A namespace declaration found on an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceDecl {
    /// Declared prefix, or `"default"` for `xmlns="..."`
    pub prefix: String,
    /// Namespace URI
    pub uri: String,
}

impl NamespaceDecl {
    /// Interpret an attribute as a namespace declaration.
    ///
    /// Only `xmlns` and `xmlns:<prefix>` qualify; `xmlnsfoo` does not.
    pub fn from_attribute(key: &str, value: &str) -> Option<Self> {
        let prefix = if key == "xmlns" {
            DEFAULT_PREFIX
        } else {
            key.strip_prefix("xmlns:")?
        };

        Some(Self {
            prefix: prefix.to_string(),
            uri: value.to_string(),
        })
    }

    /// Whether this declares the default namespace
    pub fn is_default(&self) -> bool {
        self.prefix == DEFAULT_PREFIX
    }
}

impl fmt::Display for NamespaceDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            write!(f, "xmlns=\"{}\"", self.uri)
        } else {
            write!(f, "xmlns:{}=\"{}\"", self.prefix, self.uri)
        }
    }
}

/// Collect namespace declarations from an attribute map, in declaration order
pub fn namespace_declarations(attributes: &IndexMap<String, String>) -> Vec<NamespaceDecl> {
    attributes
        .iter()
        .filter_map(|(key, value)| NamespaceDecl::from_attribute(key, value))
        .collect()
}

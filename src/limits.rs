//! Resource limits for schema text
//!
//! Retrieved schemas come from arbitrary URLs and user-supplied paths, so
//! both the loader and the parser adapter check them against a [`Limits`]
//! before building anything from them.

use crate::error::{Error, Result};

const MIB: usize = 1024 * 1024;

/// Bounds on the size and shape of a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Deepest element nesting accepted, counting the root as 1
    pub max_xml_depth: usize,

    /// Largest document accepted, in bytes
    pub max_xml_size: usize,

    /// Most attributes (namespace declarations included) on one element
    pub max_attributes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 100 * MIB,
            max_attributes: 1000,
        }
    }
}

impl Limits {
    /// Same as [`Limits::default`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter bounds for untrusted remote sources
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 10 * MIB,
            max_attributes: 100,
        }
    }

    /// Loose bounds for very large generated schemas
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 10_000,
            max_xml_size: 1024 * MIB,
            max_attributes: 10_000,
        }
    }

    /// Look up a preset by name (`default`, `strict`, `permissive`),
    /// ignoring case
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            "permissive" => Some(Self::permissive()),
            _ => None,
        }
    }

    /// Reject nesting deeper than `max_xml_depth`
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        ensure(depth, self.max_xml_depth, "element depth")
    }

    /// Reject documents larger than `max_xml_size`
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        ensure(size, self.max_xml_size, "document size (bytes)")
    }

    /// Reject elements with more than `max_attributes` attributes
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        ensure(count, self.max_attributes, "attribute count")
    }
}

fn ensure(actual: usize, max: usize, what: &str) -> Result<()> {
    if actual > max {
        return Err(Error::LimitExceeded(format!(
            "{} {} exceeds maximum {}",
            what, actual, max
        )));
    }
    Ok(())
}

//! Structural parser adapter
//!
//! Turns XML text into a read-only attributed tree: each [`Element`] keeps
//! its name as written (prefix + local name), its attributes in document
//! order, and its child elements in document order. Text content is checked
//! for well-formedness and then dropped, since nothing downstream reads it.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::names::is_valid_qname;
use crate::namespaces::QName;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// XML Element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Element name as written
    pub qname: QName,
    /// Attributes keyed by their name as written, in declaration order
    pub attributes: IndexMap<String, String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace prefix of the element
    pub fn prefix(&self) -> Option<&str> {
        self.qname.prefix.as_deref()
    }

    /// Get an attribute value by its name as written
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// All elements below this one, in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over the descendants of an element
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Root element of the document
    pub root: Element,
}

impl Document {
    /// Parse an XML document from a string with default limits
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml, &Limits::default())
    }

    /// Parse an XML document from a string.
    ///
    /// Fails with [`Error::MalformedXml`] when the text is not well-formed
    /// and with [`Error::LimitExceeded`] when it exceeds one of `limits`.
    pub fn parse(xml: &str, limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml.as_bytes());
        reader.trim_text(true);
        reader.check_comments(true);

        let mut builder = TreeBuilder::new(limits);
        let mut buf = Vec::new();

        loop {
            let event = match reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(locate(
                        malformed(e.to_string()),
                        xml,
                        reader.buffer_position(),
                    ))
                }
            };

            let at_end = matches!(event, Event::Eof);
            if let Err(e) = builder.handle(event) {
                return Err(locate(e, xml, reader.buffer_position()));
            }
            if at_end {
                break;
            }
            buf.clear();
        }

        let root = builder
            .root
            .ok_or_else(|| malformed("document has no root element"))?;
        Ok(Document { root })
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// Assembles elements from reader events
struct TreeBuilder<'l> {
    limits: &'l Limits,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'l> TreeBuilder<'l> {
    fn new(limits: &'l Limits) -> Self {
        Self {
            limits,
            stack: Vec::new(),
            root: None,
        }
    }

    fn handle(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(start) => {
                let element = self.open(&start)?;
                self.stack.push(element);
            }
            Event::Empty(start) => {
                let element = self.open(&start)?;
                self.attach(element);
            }
            Event::End(end) => {
                let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let current = self
                    .stack
                    .pop()
                    .ok_or_else(|| malformed(format!("unexpected closing tag </{}>", found)))?;
                let expected = current.qname.to_string();
                if expected != found {
                    return Err(malformed(format!(
                        "mismatched closing tag: expected </{}>, found </{}>",
                        expected, found
                    )));
                }
                self.attach(current);
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| malformed(format!("invalid character data: {}", e)))?;
                if self.stack.is_empty() && !content.trim().is_empty() {
                    return Err(malformed("text content outside of the root element"));
                }
            }
            Event::CData(_) if self.stack.is_empty() => {
                return Err(malformed("CDATA section outside of the root element"));
            }
            Event::Eof => {
                if let Some(open) = self.stack.last() {
                    return Err(malformed(format!("unclosed element <{}>", open.qname)));
                }
            }
            _ => {} // Declarations, comments, processing instructions, doctype
        }
        Ok(())
    }

    /// Build an element for a start tag, enforcing one root and the limits
    fn open(&self, start: &BytesStart<'_>) -> Result<Element> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(malformed("multiple root elements"));
        }
        self.limits.check_xml_depth(self.stack.len() + 1)?;
        parse_element(start, self.limits)
    }

    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(element),
            None => self.root = Some(element),
        }
    }
}

/// Parse element from BytesStart event
fn parse_element(start: &BytesStart<'_>, limits: &Limits) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| malformed(format!("invalid element name: {}", e)))?
        .to_string();
    if !is_valid_qname(&name) {
        return Err(malformed(format!("invalid element name '{}'", name)));
    }

    let mut element = Element::new(QName::parse(&name));

    for attr_result in start.attributes() {
        let attr = attr_result.map_err(|e| malformed(format!("failed to parse attribute: {}", e)))?;

        let attr_name = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(format!("invalid attribute name: {}", e)))?
            .to_string();
        if !is_valid_qname(&attr_name) {
            return Err(malformed(format!(
                "invalid attribute name '{}' on <{}>",
                attr_name, name
            )));
        }

        let attr_value = attr
            .unescape_value()
            .map_err(|e| malformed(format!("failed to unescape attribute value: {}", e)))?
            .into_owned();

        if element.attributes.insert(attr_name.clone(), attr_value).is_some() {
            return Err(malformed(format!(
                "duplicate attribute '{}' on <{}>",
                attr_name, name
            )));
        }
    }
    limits.check_attributes(element.attributes.len())?;

    Ok(element)
}

fn malformed(message: impl Into<String>) -> Error {
    Error::MalformedXml(ParseError::new(message))
}

/// Attach a line/column location to a parser diagnostic that lacks one
fn locate(err: Error, xml: &str, offset: usize) -> Error {
    match err {
        Error::MalformedXml(diag) if diag.location.is_none() => {
            Error::MalformedXml(diag.with_location(line_column(xml, offset)))
        }
        other => other,
    }
}

fn line_column(xml: &str, offset: usize) -> String {
    let consumed = &xml.as_bytes()[..offset.min(xml.len())];
    let line = consumed.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = consumed
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    format!("line {}, column {}", line, consumed.len() - line_start + 1)
}

//! Document writer
//!
//! Serializes an element tree to XML text with an XML declaration,
//! an optional DOCTYPE, and nested indentation.

use crate::element::{Element, Node};
use crate::error::{MarkupError, MarkupResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// DOCTYPE body for SVG 1.1 documents
pub const SVG11_DOCTYPE: &str =
    r#"svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd""#;

/// A complete XML document ready to be written
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
    doctype: Option<String>,
    indent: usize,
}

impl Document {
    /// Create a document around a root element, indented by two spaces
    pub fn new(root: Element) -> Self {
        Self {
            root,
            doctype: None,
            indent: 2,
        }
    }

    /// Set the DOCTYPE body (the text between `<!DOCTYPE ` and `>`)
    pub fn doctype(mut self, doctype: impl Into<String>) -> Self {
        self.doctype = Some(doctype.into());
        self
    }

    /// Set spaces per nesting level; zero writes compact output
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Serialize the document to a string
    pub fn to_xml(&self) -> MarkupResult<String> {
        let mut writer = if self.indent > 0 {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| MarkupError::Xml(e.to_string()))?;

        if let Some(ref doctype) = self.doctype {
            writer
                .write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))
                .map_err(|e| MarkupError::Xml(e.to_string()))?;
        }

        write_element(&mut writer, &self.root)?;

        let bytes = writer.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, element: &Element) -> MarkupResult<()> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        let value = value.to_string();
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children().is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| MarkupError::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| MarkupError::Xml(e.to_string()))?;

    for node in element.children() {
        match node {
            Node::Element(child) => write_element(writer, child)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| MarkupError::Xml(e.to_string()))?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(|e| MarkupError::Xml(e.to_string()))?;

    Ok(())
}

//! Generic XML element tree
//!
//! Thin adapter over the quick-xml event reader. The KML walk in `parser`
//! works against this tree instead of the event stream, and quick-xml error
//! values never cross the crate boundary: everything surfaces as
//! `MalformedDocument`.
//!
//! Attributes and namespaces are dropped on purpose; the KML subset handled
//! here is defined by element names and text alone.

use placegraph_core::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One XML element: tag name, direct text content, child elements in
/// document order.
///
/// `text` is the concatenation of the element's direct text and CDATA nodes,
/// trimmed of surrounding whitespace. A present-but-empty element therefore
/// carries `""`, which callers must keep distinct from an absent element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// First direct child with the given tag name (case-sensitive).
    pub fn first_child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Text of the first direct child with the given tag name. `Some("")`
    /// for a present-but-empty child, `None` only when the child is absent.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.first_child(name).map(|child| child.text.as_str())
    }

    /// Number of direct children with the given tag name.
    pub fn count_children(&self, name: &str) -> usize {
        self.children.iter().filter(|child| child.name == name).count()
    }
}

/// Parse `bytes` into the root element of the document.
pub fn parse_xml_tree(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(start)) => {
                stack.push(XmlElement::from_start(&start));
            }
            Ok(Event::Empty(start)) => {
                let element = XmlElement::from_start(&start);
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let Some(element) = stack.pop() else {
                    return Err(Error::malformed_document("unexpected closing tag"));
                };
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(open) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|err| {
                        Error::malformed_document(format!("invalid character data: {}", err))
                    })?;
                    open.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(open) = stack.last_mut() {
                    open.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            // Declarations, comments, processing instructions, doctypes
            Ok(_) => {}
            Err(err) => {
                return Err(Error::malformed_document(format!("XML parse error: {}", err))
                    .with_source(err));
            }
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(Error::malformed_document("unexpected end of document"));
    }
    root.ok_or_else(|| Error::malformed_document("document has no root element"))
}

/// Hand a completed element to its parent, or make it the document root.
fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    mut element: XmlElement,
) -> Result<()> {
    element.text = element.text.trim().to_string();
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_some() {
        return Err(Error::malformed_document("multiple root elements"));
    } else {
        *root = Some(element);
    }
    Ok(())
}

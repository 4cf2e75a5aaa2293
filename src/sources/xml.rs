//! Minimal XML element tree for E-utilities responses.
//!
//! Responses are read with `quick_xml::Reader` into a small owned tree so
//! that fields can be looked up by path, the way the records are described:
//! `descendant("Id")`, `find_path(&["PubDate", "Year"])`, and so on.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::FetchError;

/// An element with its name, direct children and text content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub children: Vec<Element>,
    /// Direct text segments, each tagged with the number of children preceding it
    text: Vec<(usize, String)>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Self::default()
        }
    }

    /// All text of this element and its descendants, trimmed.
    ///
    /// `None` when the element holds no text at all.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        self.collect_text(&mut out);
        let trimmed = out.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn collect_text(&self, out: &mut String) {
        let mut segments = self.text.iter().peekable();
        for index in 0..=self.children.len() {
            while let Some((_, segment)) = segments.next_if(|(at, _)| *at == index) {
                out.push_str(segment);
            }
            if let Some(child) = self.children.get(index) {
                child.collect_text(out);
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        let at = self.children.len();
        match self.text.last_mut() {
            Some((last_at, segment)) if *last_at == at => segment.push_str(text),
            _ => self.text.push((at, text.to_string())),
        }
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Follow a chain of direct children
    pub fn child_path(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |element, name| element.child(name))
    }

    /// All descendants (not including `self`) with the given name, in document order
    pub fn descendants<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a Element> + 'n
    where
        'a: 'n,
    {
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            while let Some(element) = stack.pop() {
                stack.extend(element.children.iter().rev());
                if element.name == name {
                    return Some(element);
                }
            }
            None
        })
    }

    /// First descendant with the given name
    pub fn descendant(&self, name: &str) -> Option<&Element> {
        self.descendants(name).next()
    }

    /// Resolve a path whose first step may be any descendant and whose
    /// remaining steps are direct children, returning the first match in
    /// document order.
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        let (first, rest) = path.split_first()?;
        self.descendants(first)
            .find_map(|element| element.child_path(rest))
    }

    /// Text of the first match of [`find_path`](Self::find_path)
    pub fn find_text(&self, path: &[&str]) -> Option<String> {
        self.find_path(path).and_then(Element::text)
    }
}

/// Parse a document and return its root element.
///
/// Fails when the input has no root element, has mismatched or unclosed
/// tags, content after the root, or invalid escapes.
pub fn parse_document(xml: &str) -> Result<Element, FetchError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| FetchError::Parse(format!("XML parsing error: {}", e)))?;

        match event {
            Event::Start(ref e) => {
                ensure_single_root(&root)?;
                stack.push(Element::from_start(e));
            }
            Event::Empty(ref e) => {
                ensure_single_root(&root)?;
                close_element(Element::from_start(e), &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FetchError::Parse("Unexpected closing tag".to_string()))?;
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|e| FetchError::Parse(format!("XML escape error: {}", e)))?;
                if stack.is_empty() {
                    if !text.trim().is_empty() {
                        return Err(FetchError::Parse(
                            "Text content outside of the root element".to_string(),
                        ));
                    }
                } else if let Some(current) = stack.last_mut() {
                    current.push_text(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.push_text(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, doctypes, comments and processing instructions carry no fields
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FetchError::Parse(format!(
            "Unclosed element <{}> at end of document",
            open.name
        )));
    }

    root.ok_or_else(|| FetchError::Parse("Document has no root element".to_string()))
}

fn ensure_single_root(root: &Option<Element>) -> Result<(), FetchError> {
    match root {
        Some(existing) => Err(FetchError::Parse(format!(
            "Content after root element <{}>",
            existing.name
        ))),
        None => Ok(()),
    }
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

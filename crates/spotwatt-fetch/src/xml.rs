//! Minimal element tree over quick-xml events.
//!
//! Market documents are small (a few hundred points), so the parser
//! builds a tree and queries it by local element name. Namespaces and
//! attributes are ignored.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// An XML element with its concatenated text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Local name of the element.
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed text content.
    pub(crate) fn text(&self) -> &str {
        self.text.trim()
    }

    /// First direct child with the given name.
    pub(crate) fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Text of the first direct child with the given name.
    pub(crate) fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Self::text)
    }

    /// All direct children with the given name.
    pub(crate) fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth-first, pre-order) with the given name.
    pub(crate) fn find(&self, name: &str) -> Option<&Self> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.find(name) })
    }

    /// All descendants with the given name, in document order.
    ///
    /// Matches are not searched for nested matches of the same name.
    pub(crate) fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Self> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            } else {
                child.collect_named(name, found);
            }
        }
    }
}

/// Parses a document into its root element.
///
/// # Errors
///
/// Returns a description of the problem if the document is not well formed.
pub(crate) fn parse_document(input: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(Element::new(local_name(start.local_name().as_ref())));
            }
            Ok(Event::Empty(start)) => {
                let element = Element::new(local_name(start.local_name().as_ref()));
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(top) = stack.last_mut() {
                    let unescaped = text.unescape().map_err(|e| e.to_string())?;
                    top.text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or("unbalanced closing tag")?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!(
                    "invalid XML at byte {}: {e}",
                    reader.error_position()
                ));
            }
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err("multiple root elements".to_string())
    } else {
        *root = Some(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let doc = r#"<?xml version="1.0"?>
            <a:Root xmlns:a="urn:x"><Item><v>1</v></Item><Item><v>2</v></Item><Empty/></a:Root>"#;
        let root = parse_document(doc).unwrap();

        assert_eq!(root.name(), "Root");
        let values: Vec<_> = root
            .children_named("Item")
            .filter_map(|i| i.child_text("v"))
            .collect();
        assert_eq!(values, vec!["1", "2"]);
        assert!(root.child("Empty").is_some());
    }

    #[test]
    fn test_find_descendants() {
        let doc = "<r><x><TimeSeries><n>a</n></TimeSeries></x><TimeSeries><n>b</n></TimeSeries></r>";
        let root = parse_document(doc).unwrap();
        let names: Vec<_> = root
            .find_all("TimeSeries")
            .iter()
            .filter_map(|t| t.child_text("n"))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(root.find("n").map(Element::text), Some("a"));
    }

    #[test]
    fn test_unescapes_text() {
        let root = parse_document("<r>a &amp; b</r>").unwrap();
        assert_eq!(root.text(), "a & b");
    }

    #[test]
    fn test_rejects_mismatched_tags() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_rejects_truncated() {
        assert!(parse_document("<a><b>1</b>").is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(parse_document("").is_err());
        assert!(parse_document("not xml at all").is_err());
    }
}

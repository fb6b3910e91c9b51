// src/parser/node.rs

//! Arena-allocated XML element tree
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]; dropping
//! the tree frees everything at once. Mixed content is kept in document
//! order so description markup can be written back out verbatim.

use super::ParseError;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Index of a node in its [`NodeTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum Content {
    Text(String),
    Element(NodeId),
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    attrs: Vec<(String, String)>,
    content: Vec<Content>,
}

/// A parsed XML document
#[derive(Debug, Clone)]
pub struct NodeTree {
    nodes: Vec<Node>,
    has_declaration: bool,
}

impl NodeTree {
    /// Parse a document; the returned tree has a synthetic root holding the
    /// top-level element
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut tree = Self {
            nodes: vec![Node {
                name: String::new(),
                attrs: Vec::new(),
                content: Vec::new(),
            }],
            has_declaration: false,
        };
        let mut stack = vec![NodeId(0)];
        let mut reader = Reader::from_str(text);

        loop {
            let event = reader
                .read_event()
                .map_err(|e| ParseError::Xml(format!("{} at {}", e, reader.buffer_position())))?;
            match event {
                Event::Decl(_) => tree.has_declaration = true,
                Event::Start(e) => {
                    let id = tree.push_element(&e, stack_top(&stack))?;
                    stack.push(id);
                }
                Event::Empty(e) => {
                    tree.push_element(&e, stack_top(&stack))?;
                }
                Event::End(_) => {
                    if stack.len() <= 1 {
                        return Err(ParseError::Xml("unbalanced end tag".to_string()));
                    }
                    stack.pop();
                }
                Event::Text(t) => {
                    let value = t.unescape().map_err(|e| ParseError::Xml(e.to_string()))?;
                    tree.push_text(stack_top(&stack), &value);
                }
                Event::CData(t) => {
                    let value = std::str::from_utf8(&t).map_err(|_| ParseError::Encoding)?;
                    tree.push_text(stack_top(&stack), value);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if stack.len() != 1 {
            return Err(ParseError::Xml("unexpected end of document".to_string()));
        }
        Ok(tree)
    }

    fn push_element(&mut self, start: &BytesStart<'_>, parent: NodeId) -> Result<NodeId, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Xml(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| ParseError::Xml(e.to_string()))?
                .into_owned();
            attrs.push((key, value));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            attrs,
            content: Vec::new(),
        });
        self.nodes[parent.0].content.push(Content::Element(id));
        Ok(id)
    }

    fn push_text(&mut self, node: NodeId, value: &str) {
        let content = &mut self.nodes[node.0].content;
        if let Some(Content::Text(existing)) = content.last_mut() {
            existing.push_str(value);
        } else {
            content.push(Content::Text(value.to_string()));
        }
    }

    /// Whether the document started with `<?xml ...?>`
    pub fn has_declaration(&self) -> bool {
        self.has_declaration
    }

    /// The top-level element
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId(0)).next()
    }

    pub fn name(&self, node: NodeId) -> &str {
        &self.nodes[node.0].name
    }

    pub fn attr(&self, node: NodeId, key: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The `xml:lang` of a node, `None` for untranslated values
    pub fn lang(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "xml:lang").filter(|l| !l.is_empty())
    }

    /// Element children in document order
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[node.0].content.iter().filter_map(|c| match c {
            Content::Element(id) => Some(*id),
            Content::Text(_) => None,
        })
    }

    /// Element children with a given name
    pub fn children_named<'a>(
        &'a self,
        node: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(node).filter(move |c| self.name(*c) == name)
    }

    pub fn child(&self, node: NodeId, name: &str) -> Option<NodeId> {
        self.children_named(node, name).next()
    }

    /// Direct text of a node, trimmed; `None` when empty
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0]
            .content
            .iter()
            .find_map(|c| match c {
                Content::Text(t) if !t.trim().is_empty() => Some(t.trim()),
                _ => None,
            })
    }

    /// Inner content of a node written back out as markup
    pub fn markup(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_content(node, &mut out);
        out.trim().to_string()
    }

    fn write_content(&self, node: NodeId, out: &mut String) {
        for content in &self.nodes[node.0].content {
            match content {
                Content::Text(t) => {
                    if !t.trim().is_empty() {
                        out.push_str(&escape(t.as_str()));
                    }
                }
                Content::Element(child) => {
                    let name = self.name(*child);
                    out.push('<');
                    out.push_str(name);
                    out.push('>');
                    self.write_content(*child, out);
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
        }
    }
}

fn stack_top(stack: &[NodeId]) -> NodeId {
    stack.last().copied().unwrap_or(NodeId(0))
}

//! Document tree.
//!
//! The tree is strictly owned top-down: a [`Document`] owns its top-level
//! nodes and every [`Element`] owns its children. Nodes keep no link to their
//! parent; the builder tracks the open-element path while it descends.
//!
//! `Display` on every node type is the exact serialization. With-body elements
//! always write their closing tag, even when the source omitted it.

use mixdom_lexer::{Entity, StartTag, TagAttribute};
use std::fmt;

/// Whether an element has a body and closing tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Void,
    WithBody,
}

/// An element built from a start tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    start: StartTag,
    kind: ElementKind,
    pub(crate) children: Vec<Node>,
}

impl Element {
    pub fn new(start: StartTag, kind: ElementKind) -> Self {
        Self {
            start,
            kind,
            children: Vec::new(),
        }
    }

    /// A with-body element whose only child is verbatim `body` text
    /// (`script` and `style`).
    pub fn with_raw_text(start: StartTag, body: String) -> Self {
        Self {
            start,
            kind: ElementKind::WithBody,
            children: vec![Node::leaf(Entity::Text(body))],
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.start.name
    }

    pub fn start_tag(&self) -> &StartTag {
        &self.start
    }

    pub fn attribute(&self, name: &str) -> Option<&TagAttribute> {
        self.start.attribute(name)
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn is_void(&self) -> bool {
        self.kind == ElementKind::Void
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Indented rendering using one tab per level.
    ///
    /// A with-body element whose only child is not itself a with-body element
    /// is written on one line. Otherwise each child goes on its own line one
    /// level deeper and the closing tag gets a line of its own.
    pub fn pretty_print(&self, depth: usize) -> String {
        let indent = "\t".repeat(depth);
        let mut out = format!("{indent}{}", self.start);
        if self.is_void() {
            return out;
        }

        match self.children.as_slice() {
            [only] if !only.is_with_body_element() => out.push_str(&only.to_text()),
            children => {
                for child in children {
                    out.push('\n');
                    out.push_str(&child.pretty_print(depth + 1));
                }
                out.push('\n');
                out.push_str(&indent);
            }
        }

        out.push_str("</");
        out.push_str(self.tag_name());
        out.push('>');
        out
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)?;
        if self.is_void() {
            return Ok(());
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag_name())
    }
}

/// A node below the document root.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Text, comment, embedded code or doctype. Never has children.
    Leaf(Entity),
    Element(Element),
}

impl Node {
    /// Wrap a non-element entity. Tags belong in [`Element`]s; passing a start
    /// or end tag is a bug in the caller.
    pub fn leaf(entity: Entity) -> Self {
        debug_assert!(
            !matches!(entity, Entity::StartTag(_) | Entity::EndTag(_)),
            "tag entity {entity:?} cannot be a leaf"
        );
        Node::Leaf(entity)
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Node::Leaf(entity) => Some(entity),
            Node::Element(_) => None,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(Element::tag_name)
    }

    pub fn is_with_body_element(&self) -> bool {
        self.as_element()
            .is_some_and(|e| e.kind() == ElementKind::WithBody)
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn pretty_print(&self, depth: usize) -> String {
        match self {
            Node::Leaf(entity) => format!("{}{entity}", "\t".repeat(depth)),
            Node::Element(element) => element.pretty_print(depth),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(entity) => write!(f, "{entity}"),
            Node::Element(element) => write!(f, "{element}"),
        }
    }
}

/// The parse result: an ordered list of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub(crate) children: Vec<Node>,
}

impl Document {
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Every top-level node pretty-printed at depth 0, each followed by a
    /// newline.
    pub fn pretty_print(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            out.push_str(&child.pretty_print(0));
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

/// Child navigation shared by the document, elements and nodes.
///
/// Tag name comparisons ignore ASCII case.
pub trait ParentNode {
    fn children(&self) -> &[Node];

    fn child_count(&self) -> usize {
        self.children().len()
    }

    fn first_child(&self) -> Option<&Node> {
        self.children().first()
    }

    fn last_child(&self) -> Option<&Node> {
        self.children().last()
    }

    /// First direct child element named `tag`.
    fn find(&self, tag: &str) -> Option<&Element> {
        self.children()
            .iter()
            .filter_map(Node::as_element)
            .find(|e| e.tag_name().eq_ignore_ascii_case(tag))
    }

    /// All direct child elements named `tag`.
    fn direct_matches(&self, tag: &str) -> Vec<&Element> {
        self.children()
            .iter()
            .filter_map(Node::as_element)
            .filter(|e| e.tag_name().eq_ignore_ascii_case(tag))
            .collect()
    }

    /// Direct matches if there are any; otherwise the matches found by
    /// searching each child the same way. Stops descending at the first level
    /// that has a match, so nested matches below a match are not returned.
    fn find_all(&self, tag: &str) -> Vec<&Element> {
        let matches = self.direct_matches(tag);
        if !matches.is_empty() {
            return matches;
        }
        self.children()
            .iter()
            .flat_map(|child| child.find_all(tag))
            .collect()
    }

    /// Call `f` on every element [`find_all`](ParentNode::find_all) returns.
    fn for_each_match<F>(&self, tag: &str, mut f: F)
    where
        F: FnMut(&Element),
    {
        for element in self.find_all(tag) {
            f(element);
        }
    }
}

impl ParentNode for Document {
    fn children(&self) -> &[Node] {
        &self.children
    }
}

impl ParentNode for Element {
    fn children(&self) -> &[Node] {
        &self.children
    }
}

impl ParentNode for Node {
    fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            Node::Leaf(_) => &[],
        }
    }
}

//! External YAML node model
//!
//! This is the node shape a YAML parser hands us and a YAML serializer takes
//! back: a minimal model of kind, tag, value, style, anchor and alias plus
//! comments and source position. Nodes live in a [`Tree`] arena and refer to
//! each other through [`NodeRef`], so an alias and the node it points to share
//! identity instead of duplicating content.
//!
//! [`Kind`] and [`Style`] are open numeric codes rather than closed enums:
//! parsers occasionally emit values outside the documented set, and the
//! decoder needs to see them to reject them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural classification code of an external node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kind(pub u32);

impl Kind {
    /// Reserved zero value, observed from parsers in a few edge cases
    pub const UNSET: Kind = Kind(0);
    pub const DOCUMENT: Kind = Kind(1);
    pub const SEQUENCE: Kind = Kind(2);
    pub const MAPPING: Kind = Kind(4);
    pub const SCALAR: Kind = Kind(8);
    pub const ALIAS: Kind = Kind(16);

    /// Get the name of a recognized kind
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::UNSET => Some("unset"),
            Self::DOCUMENT => Some("document"),
            Self::SEQUENCE => Some("sequence"),
            Self::MAPPING => Some("mapping"),
            Self::SCALAR => Some("scalar"),
            Self::ALIAS => Some("alias"),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "kind({})", self.0),
        }
    }
}

/// Formatting hint code of an external node
///
/// The parser treats this as a bit set; only single-bit values are styles
/// we know how to carry across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(pub u32);

impl Style {
    /// No explicit style
    pub const NONE: Style = Style(0);
    pub const TAGGED: Style = Style(1);
    pub const DOUBLE_QUOTED: Style = Style(2);
    pub const SINGLE_QUOTED: Style = Style(4);
    pub const LITERAL: Style = Style(8);
    pub const FOLDED: Style = Style(16);
    pub const FLOW: Style = Style(32);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// Index of a node inside a [`Tree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeRef(pub usize);

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single external node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub kind: Kind,
    pub style: Style,
    pub tag: String,
    pub value: String,
    pub anchor: String,
    /// Target of an alias node
    pub alias: Option<NodeRef>,
    pub head_comment: String,
    pub line_comment: String,
    pub foot_comment: String,
    pub line: usize,
    pub column: usize,
    /// Children; mappings store keys and values alternately
    pub content: Vec<NodeRef>,
}

impl Node {
    /// Create an empty node of the given kind
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Create a scalar node with a tag and value
    pub fn scalar(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: Kind::SCALAR,
            tag: tag.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Create a document node wrapping an optional body
    pub fn document(body: Option<NodeRef>) -> Self {
        Self {
            kind: Kind::DOCUMENT,
            content: body.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Create a mapping node from flat key/value content
    pub fn mapping(content: Vec<NodeRef>) -> Self {
        Self {
            kind: Kind::MAPPING,
            tag: "!!map".to_string(),
            content,
            ..Default::default()
        }
    }

    /// Create a sequence node
    pub fn sequence(content: Vec<NodeRef>) -> Self {
        Self {
            kind: Kind::SEQUENCE,
            tag: "!!seq".to_string(),
            content,
            ..Default::default()
        }
    }

    /// Create an alias node pointing at `target`, whose anchor is `name`
    pub fn alias(name: impl Into<String>, target: NodeRef) -> Self {
        Self {
            kind: Kind::ALIAS,
            value: name.into(),
            alias: Some(target),
            ..Default::default()
        }
    }

    /// Set the anchor name
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Set the style code
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the source position
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// Arena holding every node of one external document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: Option<NodeRef>,
}

impl Tree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its reference
    pub fn push(&mut self, node: Node) -> NodeRef {
        let node_ref = NodeRef(self.nodes.len());
        self.nodes.push(node);
        node_ref
    }

    /// Get a node by reference
    pub fn get(&self, node_ref: NodeRef) -> Option<&Node> {
        self.nodes.get(node_ref.0)
    }

    /// Get a mutable node by reference
    pub fn get_mut(&mut self, node_ref: NodeRef) -> Option<&mut Node> {
        self.nodes.get_mut(node_ref.0)
    }

    /// Get the root node reference
    pub fn root(&self) -> Option<NodeRef> {
        self.root
    }

    /// Set the root node reference
    pub fn set_root(&mut self, root: NodeRef) {
        self.root = Some(root);
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its reference, in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeRef, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeRef(i), n))
    }

    /// Structural equality of two subtrees, ignoring arena layout
    ///
    /// Alias links are compared by the anchor name of their targets.
    pub fn subtree_eq(&self, a: NodeRef, other: &Tree, b: NodeRef) -> bool {
        let (Some(left), Some(right)) = (self.get(a), other.get(b)) else {
            return false;
        };

        let same_fields = left.kind == right.kind
            && left.style == right.style
            && left.tag == right.tag
            && left.value == right.value
            && left.anchor == right.anchor
            && left.head_comment == right.head_comment
            && left.line_comment == right.line_comment
            && left.foot_comment == right.foot_comment
            && left.line == right.line
            && left.column == right.column
            && left.content.len() == right.content.len();
        if !same_fields {
            return false;
        }

        let left_alias = left.alias.and_then(|r| self.get(r)).map(|n| &n.anchor);
        let right_alias = right.alias.and_then(|r| other.get(r)).map(|n| &n.anchor);
        if left_alias != right_alias {
            return false;
        }

        left.content
            .iter()
            .zip(right.content.iter())
            .all(|(&l, &r)| self.subtree_eq(l, other, r))
    }
}

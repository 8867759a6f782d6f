//! Candidate node model
//!
//! A [`CandidateTree`] owns every node produced by one decode pass. Nodes
//! point at each other with [`NodeId`]s: `content` is the owning parent to
//! child edge, while `key`, `alias` and `parent` are plain back-references
//! that never keep anything alive. Deleting a subtree therefore never frees a
//! node that an alias elsewhere still names, and an alias into its own
//! ancestor cannot form an ownership cycle.

use crate::core::style::Style;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag given to synthesized sequence index keys
pub const INT_TAG: &str = "!!int";
/// Tag of null scalars
pub const NULL_TAG: &str = "!!null";

/// Structural classification of a candidate node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Produced from an external node whose kind was never set
    #[default]
    Unclassified,
    Document,
    Alias,
    Scalar,
    Mapping,
    Sequence,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclassified => write!(f, "unclassified"),
            Self::Document => write!(f, "document"),
            Self::Alias => write!(f, "alias"),
            Self::Scalar => write!(f, "scalar"),
            Self::Mapping => write!(f, "mapping"),
            Self::Sequence => write!(f, "sequence"),
        }
    }
}

/// Index of a node inside a [`CandidateTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A node of the internal annotated tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateNode {
    pub kind: Kind,
    pub style: Style,
    pub tag: String,
    pub value: String,
    pub anchor: String,
    /// Node holding the anchor this alias refers to
    pub alias: Option<NodeId>,
    pub head_comment: String,
    pub line_comment: String,
    pub foot_comment: String,
    pub line: usize,
    pub column: usize,
    /// Owned children. Mappings alternate key and value; sequences hold only
    /// values, each with a synthesized index key behind `key`.
    pub content: Vec<NodeId>,
    /// Whether this node sits in a key position
    pub is_map_key: bool,
    /// Key paired with this value
    pub key: Option<NodeId>,
    /// Container this node was created under
    pub parent: Option<NodeId>,
}

impl CandidateNode {
    /// Create an empty node of the given kind
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Create a scalar node
    pub fn scalar(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: Kind::Scalar,
            tag: tag.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.kind == Kind::Scalar
    }

    pub fn is_alias(&self) -> bool {
        self.kind == Kind::Alias
    }

    /// Whether this node is a container addressed through key/value entries
    pub fn is_keyed(&self) -> bool {
        matches!(self.kind, Kind::Mapping | Kind::Sequence)
    }
}

/// Arena owning the nodes of one decoded document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTree {
    nodes: Vec<CandidateNode>,
    root: Option<NodeId>,
}

impl CandidateTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node and return its id
    pub fn push(&mut self, node: CandidateNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add an empty node created under `parent`
    pub fn create_child(&mut self, parent: NodeId) -> NodeId {
        self.push(CandidateNode {
            parent: Some(parent),
            ..Default::default()
        })
    }

    /// Get a node by id
    pub fn get(&self, id: NodeId) -> Option<&CandidateNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by id
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CandidateNode> {
        self.nodes.get_mut(id.0)
    }

    /// Get the root node id
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root node id
    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of nodes in the arena, synthesized keys included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over every node with its id, in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CandidateNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Owned children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.content.as_slice()).unwrap_or(&[])
    }

    /// Key paired with a value node
    pub fn key_of(&self, id: NodeId) -> Option<&CandidateNode> {
        self.get(id).and_then(|n| n.key).and_then(|k| self.get(k))
    }

    /// Short description of a node for diagnostics
    pub fn node_to_string(&self, id: NodeId) -> String {
        let Some(node) = self.get(id) else {
            return format!("{} <missing>", id);
        };

        let mut out = format!("{} {} {}", id, node.kind, node.tag);
        if !node.value.is_empty() {
            out.push_str(&format!(" '{}'", node.value));
        }
        if !node.anchor.is_empty() {
            out.push_str(&format!(" &{}", node.anchor));
        }
        if let Some(target) = node.alias {
            out.push_str(&format!(" -> {}", target));
        }
        if !node.content.is_empty() {
            out.push_str(&format!(" ({} children)", node.content.len()));
        }
        out
    }
}

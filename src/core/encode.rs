//! Encoding candidate trees back into external YAML trees
//!
//! Synthesized sequence keys are never emitted: a sequence's content holds
//! only its values, so the external sequence gets exactly those.
//!
//! Alias links are restored in a post-pass once every node has a slot in the
//! output tree. An alias is linked to the encoded copy of its candidate
//! target when it has one, otherwise to the closest anchor of the same name
//! emitted before it.

use crate::core::candidate::{CandidateNode, CandidateTree, Kind, NodeId};
use crate::core::style::map_to_yaml_style;
use crate::error::{CandidateError, Result};
use crate::yaml;
use log::{debug, warn};
use std::collections::HashMap;

/// Configuration for the encoder
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Re-establish external alias links after encoding
    pub relink_aliases: bool,
    /// Maximum nesting depth below the encoded node
    pub max_depth: Option<usize>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            relink_aliases: true,
            max_depth: Some(1024),
        }
    }
}

/// Tree encoder
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Create a new encoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new encoder with custom configuration
    pub fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode the subtree rooted at `node`
    pub fn encode(&self, source: &CandidateTree, node: NodeId) -> Result<yaml::Tree> {
        let mut pass = EncodePass {
            config: &self.config,
            source,
            out: yaml::Tree::new(),
            encoded: HashMap::new(),
            anchors: HashMap::new(),
            pending: Vec::new(),
        };

        let root = pass.marshal(node, 0)?;
        pass.out.set_root(root);

        if self.config.relink_aliases {
            pass.relink_aliases()?;
        }

        debug!("encoded {} yaml nodes", pass.out.len());
        Ok(pass.out)
    }

    /// Encode a tree from its root node
    pub fn encode_tree(&self, source: &CandidateTree) -> Result<yaml::Tree> {
        let root = source
            .root()
            .ok_or_else(|| CandidateError::validation("candidate tree has no root node"))?;
        self.encode(source, root)
    }
}

/// Encode the subtree rooted at `node` with default configuration
pub fn encode(source: &CandidateTree, node: NodeId) -> Result<yaml::Tree> {
    Encoder::new().encode(source, node)
}

/// An emitted alias waiting for its link
struct PendingAlias {
    node: yaml::NodeRef,
    target: Option<NodeId>,
    name: String,
    preceding_anchor: Option<yaml::NodeRef>,
}

struct EncodePass<'a> {
    config: &'a EncoderConfig,
    source: &'a CandidateTree,
    out: yaml::Tree,
    encoded: HashMap<NodeId, yaml::NodeRef>,
    anchors: HashMap<String, yaml::NodeRef>,
    pending: Vec<PendingAlias>,
}

impl<'a> EncodePass<'a> {
    fn candidate(&self, id: NodeId) -> Result<&'a CandidateNode> {
        self.source
            .get(id)
            .ok_or(CandidateError::InvalidNodeId { index: id.0 })
    }

    fn marshal(&mut self, id: NodeId, depth: usize) -> Result<yaml::NodeRef> {
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(CandidateError::DepthLimitExceeded { limit });
            }
        }

        let candidate = self.candidate(id)?;
        debug!("encoding {}", self.source.node_to_string(id));

        // reserve the slot first so descendants aliasing this node can find it
        let slot = self.out.push(yaml::Node::default());
        self.encoded.insert(id, slot);
        if !candidate.anchor.is_empty() {
            self.anchors.insert(candidate.anchor.clone(), slot);
        }

        let mut target = yaml::Node::default();
        copy_to_yaml_node(candidate, &mut target);

        match candidate.kind {
            Kind::Document => {
                target.kind = yaml::Kind::DOCUMENT;
                if let Some(&body) = candidate.content.first() {
                    target.content = vec![self.marshal(body, depth + 1)?];
                }
            }
            Kind::Alias => {
                target.kind = yaml::Kind::ALIAS;
                self.pending.push(PendingAlias {
                    node: slot,
                    target: candidate.alias,
                    name: candidate.value.clone(),
                    preceding_anchor: self.anchors.get(&candidate.value).copied(),
                });
            }
            Kind::Scalar => {
                target.kind = yaml::Kind::SCALAR;
            }
            Kind::Mapping | Kind::Sequence => {
                target.kind = if candidate.kind == Kind::Mapping {
                    yaml::Kind::MAPPING
                } else {
                    yaml::Kind::SEQUENCE
                };
                target.content = candidate
                    .content
                    .iter()
                    .map(|&child| self.marshal(child, depth + 1))
                    .collect::<Result<Vec<_>>>()?;
            }
            Kind::Unclassified => {
                debug!("emitting {} without a kind", id);
            }
        }

        let placeholder = self
            .out
            .get_mut(slot)
            .ok_or(CandidateError::InvalidNodeRef { index: slot.0 })?;
        *placeholder = target;
        Ok(slot)
    }

    fn relink_aliases(&mut self) -> Result<()> {
        for pending in std::mem::take(&mut self.pending) {
            let by_identity = pending
                .target
                .and_then(|target| self.encoded.get(&target).copied());

            match by_identity.or(pending.preceding_anchor) {
                Some(link) => {
                    self.out
                        .get_mut(pending.node)
                        .ok_or(CandidateError::InvalidNodeRef {
                            index: pending.node.0,
                        })?
                        .alias = Some(link);
                }
                None => warn!(
                    "alias {} ('{}') has no encoded target, leaving it unlinked",
                    pending.node, pending.name
                ),
            }
        }
        Ok(())
    }
}

/// Copy the scalar fields of a candidate onto an external node
fn copy_to_yaml_node(candidate: &CandidateNode, node: &mut yaml::Node) {
    node.style = map_to_yaml_style(candidate.style);

    node.tag = candidate.tag.clone();
    node.value = candidate.value.clone();
    node.anchor = candidate.anchor.clone();

    node.head_comment = candidate.head_comment.clone();
    node.line_comment = candidate.line_comment.clone();
    node.foot_comment = candidate.foot_comment.clone();

    node.line = candidate.line;
    node.column = candidate.column;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Style;

    #[test]
    fn test_encode_scalar() {
        let mut tree = CandidateTree::new();
        let mut node = CandidateNode::scalar("!!str", "hello");
        node.style = Style::SingleQuoted;
        node.line_comment = "# note".to_string();
        node.line = 2;
        node.column = 5;
        let id = tree.push(node);

        let out = encode(&tree, id).unwrap();
        let root = out.get(out.root().unwrap()).unwrap();
        assert_eq!(root.kind, yaml::Kind::SCALAR);
        assert_eq!(root.style, yaml::Style::SINGLE_QUOTED);
        assert_eq!(root.value, "hello");
        assert_eq!(root.line_comment, "# note");
        assert_eq!((root.line, root.column), (2, 5));
    }

    #[test]
    fn test_encode_empty_document() {
        let mut tree = CandidateTree::new();
        let id = tree.push(CandidateNode::new(Kind::Document));

        let out = encode(&tree, id).unwrap();
        let root = out.get(out.root().unwrap()).unwrap();
        assert_eq!(root.kind, yaml::Kind::DOCUMENT);
        assert!(root.content.is_empty());
    }

    #[test]
    fn test_encode_sequence_drops_synthetic_keys() {
        let mut tree = CandidateTree::new();
        let seq = tree.push(CandidateNode::new(Kind::Sequence));
        let key = tree.push(CandidateNode::scalar("!!int", "0"));
        let mut value = CandidateNode::scalar("!!str", "only");
        value.key = Some(key);
        let value = tree.push(value);
        tree.get_mut(seq).unwrap().content = vec![value];

        let out = encode(&tree, seq).unwrap();
        let root = out.get(out.root().unwrap()).unwrap();
        assert_eq!(root.kind, yaml::Kind::SEQUENCE);
        assert_eq!(root.content.len(), 1);
        assert_eq!(out.get(root.content[0]).unwrap().value, "only");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_encode_relinks_alias_by_identity() {
        let mut tree = CandidateTree::new();
        let seq = tree.push(CandidateNode::new(Kind::Sequence));
        let mut anchored = CandidateNode::scalar("!!str", "shared");
        anchored.anchor = "a".to_string();
        let anchored = tree.push(anchored);
        let mut alias = CandidateNode::new(Kind::Alias);
        alias.value = "a".to_string();
        alias.alias = Some(anchored);
        let alias = tree.push(alias);
        tree.get_mut(seq).unwrap().content = vec![anchored, alias];

        let out = encode(&tree, seq).unwrap();
        let content = &out.get(out.root().unwrap()).unwrap().content;
        let alias_node = out.get(content[1]).unwrap();
        assert_eq!(alias_node.kind, yaml::Kind::ALIAS);
        assert_eq!(alias_node.alias, Some(content[0]));
    }

    #[test]
    fn test_encode_relinks_alias_by_name() {
        let mut tree = CandidateTree::new();
        let seq = tree.push(CandidateNode::new(Kind::Sequence));
        let mut anchored = CandidateNode::scalar("!!str", "shared");
        anchored.anchor = "a".to_string();
        let anchored = tree.push(anchored);
        let mut alias = CandidateNode::new(Kind::Alias);
        alias.value = "a".to_string();
        let alias = tree.push(alias);
        tree.get_mut(seq).unwrap().content = vec![anchored, alias];

        let out = encode(&tree, seq).unwrap();
        let content = &out.get(out.root().unwrap()).unwrap().content;
        assert_eq!(out.get(content[1]).unwrap().alias, Some(content[0]));
    }

    #[test]
    fn test_relinking_can_be_disabled() {
        let mut tree = CandidateTree::new();
        let seq = tree.push(CandidateNode::new(Kind::Sequence));
        let mut anchored = CandidateNode::scalar("!!str", "shared");
        anchored.anchor = "a".to_string();
        let anchored = tree.push(anchored);
        let mut alias = CandidateNode::new(Kind::Alias);
        alias.value = "a".to_string();
        alias.alias = Some(anchored);
        let alias = tree.push(alias);
        tree.get_mut(seq).unwrap().content = vec![anchored, alias];

        let encoder = Encoder::with_config(EncoderConfig {
            relink_aliases: false,
            ..Default::default()
        });
        let out = encoder.encode(&tree, seq).unwrap();
        let content = &out.get(out.root().unwrap()).unwrap().content;
        let alias_node = out.get(content[1]).unwrap();
        assert_eq!(alias_node.alias, None);
        assert_eq!(alias_node.value, "a");
    }

    #[test]
    fn test_encode_unclassified_has_no_kind() {
        let mut tree = CandidateTree::new();
        let mut node = CandidateNode::default();
        node.value = "loose".to_string();
        node.content = vec![NodeId(0)];
        let id = tree.push(node);

        let out = encode(&tree, id).unwrap();
        let root = out.get(out.root().unwrap()).unwrap();
        assert_eq!(root.kind, yaml::Kind::UNSET);
        assert_eq!(root.value, "loose");
        assert!(root.content.is_empty());
    }

    #[test]
    fn test_encode_invalid_child_fails() {
        let mut tree = CandidateTree::new();
        let mut map = CandidateNode::new(Kind::Mapping);
        map.content = vec![NodeId(7), NodeId(8)];
        let id = tree.push(map);

        let err = encode(&tree, id).unwrap_err();
        assert!(matches!(err, CandidateError::InvalidNodeId { index: 7 }));
    }
}

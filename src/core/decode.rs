//! Decoding external YAML trees into candidate trees
//!
//! The walk is depth first in document order. Anchors are registered as soon
//! as the node declaring them has its fields copied, before its children or
//! any later sibling are visited, so an alias can only ever see anchors that
//! precede it in the document.

use crate::core::anchors::AnchorMap;
use crate::core::candidate::{CandidateNode, CandidateTree, Kind, NodeId, INT_TAG, NULL_TAG};
use crate::core::style::map_yaml_style;
use crate::error::{CandidateError, Result};
use crate::yaml;
use log::{debug, warn};

/// Configuration for the decoder
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Fail on aliases naming an anchor that was not declared before them.
    /// When false the alias is kept with no target and a warning is logged,
    /// so consumers of the tree must accept `Kind::Alias` nodes whose
    /// `alias` is `None`.
    pub strict_aliases: bool,
    /// Maximum nesting depth below the decoded node
    pub max_depth: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            strict_aliases: true,
            max_depth: Some(1024),
        }
    }
}

/// Tree decoder
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    /// Create a new decoder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new decoder with custom configuration
    pub fn with_config(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode the subtree rooted at `node` with a fresh anchor table
    pub fn decode(&self, source: &yaml::Tree, node: yaml::NodeRef) -> Result<CandidateTree> {
        let mut pass = DecodePass {
            config: &self.config,
            source,
            tree: CandidateTree::new(),
            anchors: AnchorMap::new(),
        };

        let root = pass.tree.push(CandidateNode::default());
        pass.unmarshal(root, node, 0)?;
        pass.tree.set_root(root);

        debug!(
            "decoded {} candidate nodes, {} anchors",
            pass.tree.len(),
            pass.anchors.len()
        );
        Ok(pass.tree)
    }

    /// Decode a tree from its root node
    pub fn decode_tree(&self, source: &yaml::Tree) -> Result<CandidateTree> {
        let root = source
            .root()
            .ok_or_else(|| CandidateError::validation("external tree has no root node"))?;
        self.decode(source, root)
    }
}

/// Decode the subtree rooted at `node` with default configuration
pub fn decode(source: &yaml::Tree, node: yaml::NodeRef) -> Result<CandidateTree> {
    Decoder::new().decode(source, node)
}

/// State of one decode call; the anchor table lives and dies with it
struct DecodePass<'a> {
    config: &'a DecoderConfig,
    source: &'a yaml::Tree,
    tree: CandidateTree,
    anchors: AnchorMap,
}

impl<'a> DecodePass<'a> {
    fn external(&self, node_ref: yaml::NodeRef) -> Result<&'a yaml::Node> {
        self.source
            .get(node_ref)
            .ok_or(CandidateError::InvalidNodeRef { index: node_ref.0 })
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut CandidateNode> {
        self.tree
            .get_mut(id)
            .ok_or(CandidateError::InvalidNodeId { index: id.0 })
    }

    fn set_kind(&mut self, id: NodeId, kind: Kind) -> Result<()> {
        self.node_mut(id)?.kind = kind;
        Ok(())
    }

    /// Fill `target` from the external node at `node_ref`, dispatching on its kind
    fn unmarshal(&mut self, target: NodeId, node_ref: yaml::NodeRef, depth: usize) -> Result<()> {
        if let Some(limit) = self.config.max_depth {
            if depth > limit {
                return Err(CandidateError::DepthLimitExceeded { limit });
            }
        }

        let node = self.external(node_ref)?;
        debug!("decoding {} node {} {}", node.kind, node_ref, node.tag);

        match node.kind {
            yaml::Kind::DOCUMENT => {
                self.set_kind(target, Kind::Document)?;
                self.copy_from_yaml_node(target, node)?;
                let Some(&body) = node.content.first() else {
                    return Ok(());
                };
                if node.content.len() > 1 {
                    debug!(
                        "document {} has {} body entries, keeping the first",
                        node_ref,
                        node.content.len()
                    );
                }

                let child = self.decode_into_child(target, body, depth + 1)?;
                self.node_mut(target)?.content = vec![child];
                Ok(())
            }
            yaml::Kind::ALIAS => {
                self.set_kind(target, Kind::Alias)?;
                self.copy_from_yaml_node(target, node)
            }
            yaml::Kind::SCALAR => {
                self.set_kind(target, Kind::Scalar)?;
                self.copy_from_yaml_node(target, node)
            }
            yaml::Kind::MAPPING => {
                if node.content.len() % 2 != 0 {
                    return Err(CandidateError::OddMappingContent {
                        len: node.content.len(),
                    });
                }
                self.set_kind(target, Kind::Mapping)?;
                self.copy_from_yaml_node(target, node)?;

                let mut content = Vec::with_capacity(node.content.len());
                for pair in node.content.chunks_exact(2) {
                    let key = self.decode_into_child(target, pair[0], depth + 1)?;
                    self.node_mut(key)?.is_map_key = true;

                    let value = self.decode_into_child(target, pair[1], depth + 1)?;
                    self.node_mut(value)?.key = Some(key);

                    content.push(key);
                    content.push(value);
                }
                self.node_mut(target)?.content = content;
                Ok(())
            }
            yaml::Kind::SEQUENCE => {
                self.set_kind(target, Kind::Sequence)?;
                self.copy_from_yaml_node(target, node)?;

                let mut content = Vec::with_capacity(node.content.len());
                for (index, &child) in node.content.iter().enumerate() {
                    let key = self.tree.create_child(target);
                    {
                        let key_node = self.node_mut(key)?;
                        key_node.kind = Kind::Scalar;
                        key_node.tag = INT_TAG.to_string();
                        key_node.value = index.to_string();
                        key_node.is_map_key = true;
                    }

                    let value = self.decode_into_child(target, child, depth + 1)?;
                    self.node_mut(value)?.key = Some(key);
                    content.push(value);
                }
                self.node_mut(target)?.content = content;
                Ok(())
            }
            yaml::Kind::UNSET => {
                self.copy_from_yaml_node(target, node)?;
                debug!("left {} unclassified", self.tree.node_to_string(target));
                Ok(())
            }
            other => Err(CandidateError::malformed_node(format!(
                "invalid node of {} at {} encountered while decoding",
                other, node_ref
            ))),
        }
    }

    /// Create a child of `parent` and decode `node_ref` into it
    fn decode_into_child(
        &mut self,
        parent: NodeId,
        node_ref: yaml::NodeRef,
        depth: usize,
    ) -> Result<NodeId> {
        let node = self.external(node_ref)?;
        let child = self.tree.create_child(parent);

        // null scalars are copied directly instead of going through kind dispatch
        if node.tag == NULL_TAG {
            self.set_kind(child, Kind::Scalar)?;
            self.copy_from_yaml_node(child, node)?;
            return Ok(child);
        }

        self.unmarshal(child, node_ref, depth)?;
        Ok(child)
    }

    /// Copy the scalar fields of `node` onto `target`, registering its anchor
    /// and resolving its alias
    fn copy_from_yaml_node(&mut self, target: NodeId, node: &yaml::Node) -> Result<()> {
        {
            let candidate = self.node_mut(target)?;
            candidate.style = map_yaml_style(node.style);
            candidate.tag = node.tag.clone();
            candidate.value = node.value.clone();
            candidate.anchor = node.anchor.clone();
            candidate.head_comment = node.head_comment.clone();
            candidate.line_comment = node.line_comment.clone();
            candidate.foot_comment = node.foot_comment.clone();
            candidate.line = node.line;
            candidate.column = node.column;
        }

        if !node.anchor.is_empty() {
            self.anchors.insert(node.anchor.clone(), target);
            debug!(
                "set anchor {} to {}",
                node.anchor,
                self.tree.node_to_string(target)
            );
        }

        if let Some(alias_ref) = node.alias {
            let alias_target = self.external(alias_ref)?;
            if !alias_target.anchor.is_empty() {
                let resolved = match self.anchors.resolve(&alias_target.anchor) {
                    Ok(id) => Some(id),
                    Err(err) if !self.config.strict_aliases => {
                        warn!("{}, leaving alias unresolved", err);
                        None
                    }
                    Err(err) => return Err(err),
                };
                if let Some(id) = resolved {
                    debug!("set alias to {}", self.tree.node_to_string(id));
                }
                self.node_mut(target)?.alias = resolved;
            }
        }

        Ok(())
    }
}

//! Anchor table for a single decode pass

use crate::core::candidate::NodeId;
use crate::error::{CandidateError, Result};
use std::collections::HashMap;

/// Anchor names declared so far, in document order
///
/// A table is filled while one document is walked depth first and must not be
/// reused for another document.
#[derive(Debug, Clone, Default)]
pub struct AnchorMap {
    anchors: HashMap<String, NodeId>,
}

impl AnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the node declaring `anchor`
    ///
    /// A later declaration of the same name shadows the earlier one, matching
    /// how aliases bind to the closest preceding anchor.
    pub fn insert(&mut self, anchor: impl Into<String>, id: NodeId) -> Option<NodeId> {
        self.anchors.insert(anchor.into(), id)
    }

    /// Look up an anchor that an alias refers to
    pub fn resolve(&self, anchor: &str) -> Result<NodeId> {
        self.anchors
            .get(anchor)
            .copied()
            .ok_or_else(|| CandidateError::dangling_alias(anchor))
    }

    pub fn get(&self, anchor: &str) -> Option<NodeId> {
        self.anchors.get(anchor).copied()
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

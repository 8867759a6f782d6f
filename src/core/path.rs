//! Uniform key/value addressing over candidate trees
//!
//! Mappings and sequences look the same from here: both expose `(key, value)`
//! entries, sequences through their synthesized index keys. Paths are built
//! by walking `parent` links up to the document and reading each step's key.

use crate::core::candidate::{CandidateTree, Kind, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a path from the document root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{}", key),
            Self::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Render a path in dot notation, e.g. `servers[0].name`
///
/// Keys that would be ambiguous in dot notation are written in brackets.
pub fn format_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) if key.is_empty() || key.contains(['.', '[', ']', '"']) => {
                out.push_str(&format!("[{:?}]", key));
            }
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{}]", index)),
        }
    }
    out
}

impl CandidateTree {
    /// Key/value entries of a mapping or sequence, in document order
    pub fn entries(&self, id: NodeId) -> Vec<(NodeId, NodeId)> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        match node.kind {
            Kind::Mapping => node
                .content
                .chunks_exact(2)
                .map(|pair| (pair[0], pair[1]))
                .collect(),
            Kind::Sequence => node
                .content
                .iter()
                .filter_map(|&value| self.get(value)?.key.map(|key| (key, value)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Find the value stored under `key` in a mapping or sequence
    ///
    /// Sequence elements are addressed by their decimal index.
    pub fn child_by_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.entries(id)
            .into_iter()
            .find(|&(k, _)| self.get(k).map(|n| n.value == key).unwrap_or(false))
            .map(|(_, value)| value)
    }

    /// Follow alias links to the node they ultimately refer to
    ///
    /// Returns the node itself when it is not an alias, and `None` for an
    /// alias without a target or a chain that loops.
    pub fn resolve_alias(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..=self.len() {
            let node = self.get(current)?;
            if node.kind != Kind::Alias {
                return Some(current);
            }
            current = node.alias?;
        }
        None
    }

    /// Path from the enclosing document (or detached root) to `id`
    pub fn path(&self, id: NodeId) -> Vec<PathSegment> {
        let mut segments = Vec::new();
        let mut current = id;

        for _ in 0..self.len() {
            let Some(node) = self.get(current) else {
                break;
            };
            let Some(parent_id) = node.parent else {
                break;
            };
            let Some(parent) = self.get(parent_id) else {
                break;
            };

            let label = if node.is_map_key {
                Some(node.value.as_str())
            } else {
                node.key
                    .and_then(|key| self.get(key))
                    .map(|key| key.value.as_str())
            };

            match parent.kind {
                Kind::Document => {}
                Kind::Sequence => {
                    let index = label
                        .and_then(|l| l.parse::<usize>().ok())
                        .or_else(|| parent.content.iter().position(|&c| c == current));
                    if let Some(index) = index {
                        segments.push(PathSegment::Index(index));
                    }
                }
                _ => {
                    if let Some(label) = label {
                        segments.push(PathSegment::Key(label.to_string()));
                    }
                }
            }
            current = parent_id;
        }

        segments.reverse();
        segments
    }

    /// Path of a node rendered in dot notation
    pub fn path_string(&self, id: NodeId) -> String {
        format_path(&self.path(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::candidate::{CandidateNode, INT_TAG};

    /// document -> { servers: [ { name: web } ] }
    fn sample() -> (CandidateTree, NodeId, NodeId) {
        let mut tree = CandidateTree::new();
        let doc = tree.push(CandidateNode::new(Kind::Document));
        let map = tree.create_child(doc);
        tree.get_mut(map).unwrap().kind = Kind::Mapping;

        let servers_key = tree.create_child(map);
        *tree.get_mut(servers_key).unwrap() = CandidateNode {
            is_map_key: true,
            parent: Some(map),
            ..CandidateNode::scalar("!!str", "servers")
        };
        let seq = tree.create_child(map);
        {
            let node = tree.get_mut(seq).unwrap();
            node.kind = Kind::Sequence;
            node.key = Some(servers_key);
        }

        let index_key = tree.create_child(seq);
        *tree.get_mut(index_key).unwrap() = CandidateNode {
            is_map_key: true,
            parent: Some(seq),
            ..CandidateNode::scalar(INT_TAG, "0")
        };
        let item = tree.create_child(seq);
        {
            let node = tree.get_mut(item).unwrap();
            node.kind = Kind::Mapping;
            node.key = Some(index_key);
        }

        let name_key = tree.create_child(item);
        *tree.get_mut(name_key).unwrap() = CandidateNode {
            is_map_key: true,
            parent: Some(item),
            ..CandidateNode::scalar("!!str", "name")
        };
        let name = tree.create_child(item);
        *tree.get_mut(name).unwrap() = CandidateNode {
            key: Some(name_key),
            parent: Some(item),
            ..CandidateNode::scalar("!!str", "web")
        };

        tree.get_mut(doc).unwrap().content = vec![map];
        tree.get_mut(map).unwrap().content = vec![servers_key, seq];
        tree.get_mut(seq).unwrap().content = vec![item];
        tree.get_mut(item).unwrap().content = vec![name_key, name];
        tree.set_root(doc);
        (tree, seq, name)
    }

    #[test]
    fn test_entries_are_uniform() {
        let (tree, seq, _) = sample();
        let map = tree.children(tree.root().unwrap())[0];

        let map_entries = tree.entries(map);
        assert_eq!(map_entries.len(), 1);
        assert_eq!(tree.get(map_entries[0].0).unwrap().value, "servers");

        let seq_entries = tree.entries(seq);
        assert_eq!(seq_entries.len(), 1);
        assert_eq!(tree.get(seq_entries[0].0).unwrap().value, "0");
    }

    #[test]
    fn test_child_by_key() {
        let (tree, seq, name) = sample();
        let map = tree.children(tree.root().unwrap())[0];
        assert_eq!(tree.child_by_key(map, "servers"), Some(seq));

        let item = tree.child_by_key(seq, "0").unwrap();
        assert_eq!(tree.child_by_key(item, "name"), Some(name));
        assert_eq!(tree.child_by_key(item, "missing"), None);
    }

    #[test]
    fn test_path() {
        let (tree, _, name) = sample();
        assert_eq!(
            tree.path(name),
            vec![
                PathSegment::Key("servers".to_string()),
                PathSegment::Index(0),
                PathSegment::Key("name".to_string()),
            ]
        );
        assert_eq!(tree.path_string(name), "servers[0].name");
        assert!(tree.path(tree.root().unwrap()).is_empty());
    }

    #[test]
    fn test_format_path_brackets_awkward_keys() {
        let path = vec![
            PathSegment::Key("a.b".to_string()),
            PathSegment::Key("c".to_string()),
        ];
        assert_eq!(format_path(&path), "[\"a.b\"].c");
    }

    #[test]
    fn test_resolve_alias_chain() {
        let mut tree = CandidateTree::new();
        let target = tree.push(CandidateNode::scalar("!!str", "x"));
        let first = tree.push(CandidateNode {
            alias: Some(target),
            ..CandidateNode::new(Kind::Alias)
        });
        let second = tree.push(CandidateNode {
            alias: Some(first),
            ..CandidateNode::new(Kind::Alias)
        });
        let dangling = tree.push(CandidateNode::new(Kind::Alias));

        assert_eq!(tree.resolve_alias(second), Some(target));
        assert_eq!(tree.resolve_alias(target), Some(target));
        assert_eq!(tree.resolve_alias(dangling), None);
    }

    #[test]
    fn test_resolve_alias_loop() {
        let mut tree = CandidateTree::new();
        let a = tree.push(CandidateNode::new(Kind::Alias));
        let b = tree.push(CandidateNode {
            alias: Some(a),
            ..CandidateNode::new(Kind::Alias)
        });
        tree.get_mut(a).unwrap().alias = Some(b);
        assert_eq!(tree.resolve_alias(a), None);
    }
}

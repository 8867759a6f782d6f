//! candidate-yaml: conversion between YAML parse trees and candidate trees
//!
//! A YAML parser describes a document with a minimal node model: kind, tag,
//! value, style, anchor, alias, comments and position. Query and
//! manipulation code wants more than that. This crate decodes the parser's
//! tree into a [`CandidateTree`] where
//!
//! - mappings and sequences share one key/value shape (every sequence
//!   element gets a synthesized `!!int` index key),
//! - aliases point at the node declaring their anchor without owning it,
//! - style, comments and positions ride along untouched,
//!
//! and encodes a candidate tree back into a parser tree ready for a
//! serializer.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use candidate_yaml::{decode, encode, yaml, Kind, Result};
//!
//! fn main() -> Result<()> {
//!     let mut source = yaml::Tree::new();
//!     let node = source.push(
//!         yaml::Node::scalar("!!str", "hello").with_style(yaml::Style::DOUBLE_QUOTED),
//!     );
//!
//!     let candidates = decode(&source, node)?;
//!     let root = candidates.root().unwrap();
//!     assert_eq!(candidates.get(root).unwrap().kind, Kind::Scalar);
//!
//!     let back = encode(&candidates, root)?;
//!     assert!(source.subtree_eq(node, &back, back.root().unwrap()));
//!     Ok(())
//! }
//! ```
//!
//! ## Working with files
//!
//! ```rust,no_run
//! use candidate_yaml::convenience;
//!
//! fn main() -> candidate_yaml::Result<()> {
//!     for tree in convenience::read_candidates("config.yaml")? {
//!         for (id, _) in tree.iter() {
//!             println!("{}", tree.path_string(id));
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`yaml`]: the parser-facing node model
//! - [`core`]: candidate nodes, decoding, encoding and addressing
//! - [`io`]: the `serde_yaml` bridge plus file reading, writing and resolution
//! - [`error`]: error handling

// Public API exports
pub use crate::error::{CandidateError, Result};

// Core types
pub use crate::core::{
    decode, encode, AnchorMap, CandidateNode, CandidateTree, Decoder, DecoderConfig, Encoder,
    EncoderConfig, Kind, NodeId, PathSegment, Style,
};

// IO types
pub use crate::io::{
    FileResolver, ReaderConfig, ResolverConfig, WriteResult, WriterConfig, YamlReader, YamlWriter,
};

pub mod core;
pub mod error;
pub mod io;
pub mod yaml;

/// Convenience functions for common operations
pub mod convenience {
    //! Convenience functions that provide simple APIs for common use cases
    //!
    //! These use default configuration throughout.

    use crate::{CandidateTree, Decoder, Encoder, Result, YamlReader, YamlWriter};
    use std::path::Path;

    /// Parse a YAML string and decode each document
    pub fn parse_candidates(content: &str) -> Result<Vec<CandidateTree>> {
        let decoder = Decoder::new();
        YamlReader::new()
            .parse_content(content)?
            .iter()
            .map(|tree| decoder.decode_tree(tree))
            .collect()
    }

    /// Read a YAML file and decode each document
    pub fn read_candidates<P: AsRef<Path>>(path: P) -> Result<Vec<CandidateTree>> {
        YamlReader::new().read_candidates(path, &Decoder::new())
    }

    /// Encode candidate trees and render them as YAML text
    pub fn to_yaml_string(trees: &[CandidateTree]) -> Result<String> {
        YamlWriter::new().format_candidates(trees, &Encoder::new())
    }

    /// Decode and re-encode a YAML string
    pub fn round_trip(content: &str) -> Result<String> {
        to_yaml_string(&parse_candidates(content)?)
    }
}

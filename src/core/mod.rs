//! Core conversion between external YAML trees and candidate trees
//!
//! This module contains the candidate node model and both directions of the
//! conversion:
//! - style: mapping between parser styles and candidate styles
//! - candidate: the candidate node arena
//! - anchors: the per-pass anchor table
//! - decode / encode: the two tree walks
//! - path: uniform key/value addressing used by query code

pub mod anchors;
pub mod candidate;
pub mod decode;
pub mod encode;
pub mod path;
pub mod style;

pub use anchors::AnchorMap;
pub use candidate::{CandidateNode, CandidateTree, Kind, NodeId, INT_TAG, NULL_TAG};
pub use decode::{decode, Decoder, DecoderConfig};
pub use encode::{encode, Encoder, EncoderConfig};
pub use path::{format_path, PathSegment};
pub use style::{map_to_yaml_style, map_yaml_style, Style};

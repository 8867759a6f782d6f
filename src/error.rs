//! Error types for the candidate-yaml library
//!
//! This module provides error handling for tree conversion in both directions
//! as well as the file I/O and YAML bridging that sits around it.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for all library operations
#[derive(Error, Debug)]
pub enum CandidateError {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Regular expression errors
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An external node whose kind matches none of the supported kinds
    #[error("Malformed node: {context}")]
    MalformedNode { context: String },

    /// A mapping whose content is not made of key/value pairs
    #[error("Malformed mapping: content has odd length {len}")]
    OddMappingContent { len: usize },

    /// An alias referring to an anchor not declared earlier in the document
    #[error("Unknown anchor '{anchor}' referenced by alias")]
    DanglingAlias { anchor: String },

    /// A reference to an external node outside its tree
    #[error("Invalid external node reference: {index}")]
    InvalidNodeRef { index: usize },

    /// A reference to a candidate node outside its tree
    #[error("Invalid candidate node id: {index}")]
    InvalidNodeId { index: usize },

    /// Nesting deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },

    /// Alias expansion producing more nodes than allowed
    #[error("Alias expansion exceeded the limit of {limit} nodes")]
    AliasExpansionExceeded { limit: usize },

    /// Scalar conversion errors
    #[error("Type conversion error: cannot convert {from} to {to}")]
    TypeConversion { from: String, to: String },

    /// File not found or invalid path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Path resolution errors
    #[error("Path resolution error: {reason}")]
    PathResolution { reason: String },

    /// Generic validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CandidateError>;

impl CandidateError {
    /// Create a new malformed node error
    pub fn malformed_node(context: impl Into<String>) -> Self {
        Self::MalformedNode {
            context: context.into(),
        }
    }

    /// Create a new dangling alias error
    pub fn dangling_alias(anchor: impl Into<String>) -> Self {
        Self::DanglingAlias {
            anchor: anchor.into(),
        }
    }

    /// Create a new type conversion error
    pub fn type_conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new path resolution error
    pub fn path_resolution(reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reason: reason.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check whether the error describes a structurally broken document
    /// rather than an environment problem
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::MalformedNode { .. }
                | Self::OddMappingContent { .. }
                | Self::DanglingAlias { .. }
                | Self::InvalidNodeRef { .. }
                | Self::InvalidNodeId { .. }
                | Self::DepthLimitExceeded { .. }
                | Self::AliasExpansionExceeded { .. }
                | Self::TypeConversion { .. }
        )
    }
}

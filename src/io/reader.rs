//! File reading and YAML document parsing
//!
//! Every document of a (possibly multi-document) YAML stream becomes its own
//! external tree, so each one is later decoded with its own anchor table.

use crate::core::{CandidateTree, Decoder};
use crate::error::{CandidateError, Result};
use crate::io::bridge::value_to_tree;
use crate::yaml;
use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Configuration for the YAML reader
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Maximum file size to read (in bytes)
    pub max_file_size: Option<usize>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: Some(10 * 1024 * 1024), // 10MB default limit
        }
    }
}

/// YAML document reader
#[derive(Debug, Clone, Default)]
pub struct YamlReader {
    config: ReaderConfig,
}

impl YamlReader {
    /// Create a new reader with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new reader with custom configuration
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read every document of a file as external trees
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<yaml::Tree>> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(CandidateError::file_not_found(path));
        }

        if let Some(max_size) = self.config.max_file_size {
            let metadata = fs::metadata(path)?;
            if metadata.len() as usize > max_size {
                return Err(CandidateError::validation(format!(
                    "File too large: {} bytes (limit: {} bytes)",
                    metadata.len(),
                    max_size
                )));
            }
        }

        let content = fs::read_to_string(path)?;
        debug!("read {} bytes from {}", content.len(), path.display());
        self.parse_content(&content)
    }

    /// Parse every document of a YAML string as external trees
    pub fn parse_content(&self, content: &str) -> Result<Vec<yaml::Tree>> {
        let mut trees = Vec::new();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = serde_yaml::Value::deserialize(document)?;
            trees.push(value_to_tree(&value));
        }
        debug!("parsed {} documents", trees.len());
        Ok(trees)
    }

    /// Read a file and decode each document into a candidate tree
    pub fn read_candidates<P: AsRef<Path>>(
        &self,
        path: P,
        decoder: &Decoder,
    ) -> Result<Vec<CandidateTree>> {
        self.read_file(path)?
            .iter()
            .map(|tree| decoder.decode_tree(tree))
            .collect()
    }

    /// Get reader configuration
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Kind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_multiple_documents() {
        let trees = YamlReader::new()
            .parse_content("a: 1\n---\n- x\n- y\n")
            .unwrap();
        assert_eq!(trees.len(), 2);

        let second = &trees[1];
        let doc = second.get(second.root().unwrap()).unwrap();
        let body = second.get(doc.content[0]).unwrap();
        assert_eq!(body.kind, yaml::Kind::SEQUENCE);
    }

    #[test]
    fn test_read_candidates() {
        let file = create_test_file("name: demo\nitems: [1, 2]\n");
        let trees = YamlReader::new()
            .read_candidates(file.path(), &Decoder::new())
            .unwrap();
        assert_eq!(trees.len(), 1);

        let tree = &trees[0];
        let doc = tree.get(tree.root().unwrap()).unwrap();
        assert_eq!(doc.kind, Kind::Document);
        let map = doc.content[0];
        assert_eq!(tree.get(map).unwrap().kind, Kind::Mapping);
        assert!(tree.child_by_key(map, "items").is_some());
    }

    #[test]
    fn test_file_size_limit() {
        let file = create_test_file("key: a fairly long value\n");
        let reader = YamlReader::with_config(ReaderConfig {
            max_file_size: Some(4),
        });
        let err = reader.read_file(file.path()).unwrap_err();
        assert!(matches!(err, CandidateError::Validation { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = YamlReader::new().read_file("/nonexistent/file.yaml").unwrap_err();
        assert!(matches!(err, CandidateError::FileNotFound { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = YamlReader::new().parse_content("a: [1, 2").unwrap_err();
        assert!(matches!(err, CandidateError::Yaml(_)));
    }
}

//! Serializing external trees back to YAML files
//!
//! Documents are rendered through `serde_yaml` and joined with `---`
//! separators. Writes go through a temporary file in the target directory
//! that is renamed into place.

use crate::core::{CandidateTree, Encoder};
use crate::error::{CandidateError, Result};
use crate::io::bridge::{tree_to_value_with_limit, DEFAULT_ALIAS_EXPANSION_LIMIT};
use crate::yaml;
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration for the YAML writer
#[derive(Debug, Clone)]
pub struct WriterConfig {
    /// Use atomic writes (write to temp file first, then rename)
    pub atomic_writes: bool,
    /// Maximum number of nodes alias expansion may produce per document
    pub max_alias_expansion: Option<usize>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
            max_alias_expansion: Some(DEFAULT_ALIAS_EXPANSION_LIMIT),
        }
    }
}

/// Result of a write operation
#[derive(Debug)]
pub struct WriteResult {
    /// Whether the file content changed
    pub modified: bool,
    /// Path where the content was written
    pub output_path: PathBuf,
}

/// YAML document writer
#[derive(Debug, Clone, Default)]
pub struct YamlWriter {
    config: WriterConfig,
}

impl YamlWriter {
    /// Create a new writer with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new writer with custom configuration
    pub fn with_config(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Render external trees as a YAML stream
    pub fn format_documents(&self, trees: &[yaml::Tree]) -> Result<String> {
        let mut out = String::new();
        for (index, tree) in trees.iter().enumerate() {
            let value = tree_to_value_with_limit(tree, self.config.max_alias_expansion)?;
            let rendered = serde_yaml::to_string(&value)?;
            if index > 0 || trees.len() > 1 {
                out.push_str("---\n");
            }
            out.push_str(&rendered);
        }
        Ok(out)
    }

    /// Encode candidate trees and render them as a YAML stream
    pub fn format_candidates(&self, trees: &[CandidateTree], encoder: &Encoder) -> Result<String> {
        let encoded = trees
            .iter()
            .map(|tree| encoder.encode_tree(tree))
            .collect::<Result<Vec<_>>>()?;
        self.format_documents(&encoded)
    }

    /// Write external trees to a file
    pub fn write_file<P: AsRef<Path>>(&self, trees: &[yaml::Tree], path: P) -> Result<WriteResult> {
        let path = path.as_ref();
        let new_content = self.format_documents(trees)?;

        let modified = match fs::read_to_string(path) {
            Ok(original) => original != new_content,
            Err(_) => true,
        };
        let result = WriteResult {
            modified,
            output_path: path.to_path_buf(),
        };
        if !modified {
            debug!("{} unchanged", path.display());
            return Ok(result);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if self.config.atomic_writes {
            self.write_atomic(path, &new_content)?;
        } else {
            fs::write(path, &new_content)?;
        }
        debug!("wrote {} bytes to {}", new_content.len(), path.display());
        Ok(result)
    }

    /// Write file atomically using temporary file
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        let parent_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;

        temp_file
            .persist(path)
            .map_err(|e| CandidateError::Io(e.error))?;
        Ok(())
    }

    /// Get writer configuration
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }
}

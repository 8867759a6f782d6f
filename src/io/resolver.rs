//! File resolution for batches of YAML files
//!
//! Expands directories into the YAML files below them, filters by extension
//! and exclude patterns, and returns a sorted, de-duplicated list.

use crate::error::{CandidateError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Configuration for file resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Follow symbolic links
    pub follow_links: bool,
    /// Maximum recursion depth for directory traversal
    pub max_depth: Option<usize>,
    /// Include hidden files (starting with .)
    pub include_hidden: bool,
    /// File extensions picked up from directories
    pub include_extensions: Vec<String>,
    /// Patterns to exclude (`*` and `?` wildcards)
    pub exclude_patterns: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
            include_hidden: false,
            include_extensions: vec!["yaml".to_string(), "yml".to_string()],
            exclude_patterns: Vec::new(),
        }
    }
}

/// File resolver for handling multiple files and directories
#[derive(Debug, Clone, Default)]
pub struct FileResolver {
    config: ResolverConfig,
}

impl FileResolver {
    /// Create a new resolver with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Get the resolver configuration
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve multiple paths to a list of files
    ///
    /// Files named explicitly are kept whatever their extension; files found
    /// inside directories must carry one of the configured extensions.
    pub fn resolve_paths<P>(&self, paths: &[P]) -> Result<Vec<PathBuf>>
    where
        P: AsRef<Path>,
    {
        let excludes = self
            .config
            .exclude_patterns
            .iter()
            .map(|pattern| glob_to_regex(pattern))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut resolved = Vec::new();

        for path in paths {
            for file in self.resolve_single_path(path.as_ref())? {
                let path_str = file.to_string_lossy().to_string();
                if excludes.iter().any(|re| re.is_match(&path_str)) {
                    continue;
                }
                if seen.insert(file.clone()) {
                    resolved.push(file);
                }
            }
        }

        resolved.sort();
        Ok(resolved)
    }

    fn resolve_single_path(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(CandidateError::file_not_found(path));
        }

        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(path)
            .follow_links(self.config.follow_links)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .into_iter()
            // hidden directories are pruned whole; the root itself is always walked
            .filter_entry(move |entry| {
                include_hidden || entry.depth() == 0 || !is_hidden_file(entry.path())
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                CandidateError::path_resolution(format!("Error traversing directory: {}", e))
            })?;
            let entry_path = entry.path();

            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_yaml_file(entry_path) {
                files.push(entry_path.to_path_buf());
            }
        }
        Ok(files)
    }

    /// Check if a file has one of the configured YAML extensions
    pub fn is_yaml_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .map(|ext| self.config.include_extensions.contains(&ext))
            .unwrap_or(false)
    }
}

/// Convert a simple `*` / `?` glob into an anchored regex
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let escaped = regex::escape(pattern)
        .replace(r"\*", ".*")
        .replace(r"\?", ".");
    Ok(Regex::new(&format!("^{}$", escaped))?)
}

fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.yaml"), "a: 1").unwrap();
        fs::write(root.join("b.yml"), "b: 2").unwrap();
        fs::write(root.join("c.txt"), "c").unwrap();
        fs::write(root.join(".hidden.yaml"), "h: 1").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/d.YAML"), "d: 4").unwrap();

        let files = FileResolver::new().resolve_paths(&[root]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml", "d.YAML"]);
    }

    #[test]
    fn test_hidden_directories_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config.yaml"), "x: 1").unwrap();
        fs::write(root.join("visible.yaml"), "y: 2").unwrap();

        let files = FileResolver::new().resolve_paths(&[root]).unwrap();
        assert_eq!(files, vec![root.join("visible.yaml")]);

        let resolver = FileResolver::with_config(ResolverConfig {
            include_hidden: true,
            ..Default::default()
        });
        let files = resolver.resolve_paths(&[root]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.contains(&root.join(".git/config.yaml")));
    }

    #[test]
    fn test_explicit_file_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.txt");
        fs::write(&file, "x: 1").unwrap();

        let files = FileResolver::new()
            .resolve_paths(&[file.clone(), file.clone()])
            .unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_exclude_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("keep.yaml"), "").unwrap();
        fs::write(root.join("skip.generated.yaml"), "").unwrap();

        let resolver = FileResolver::with_config(ResolverConfig {
            exclude_patterns: vec!["*.generated.yaml".to_string()],
            ..Default::default()
        });
        let files = resolver.resolve_paths(&[root]).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("keep.yaml"));
    }

    #[test]
    fn test_missing_path() {
        let err = FileResolver::new()
            .resolve_paths(&["/nonexistent/dir/file.yaml"])
            .unwrap_err();
        assert!(matches!(err, CandidateError::FileNotFound { .. }));
    }
}

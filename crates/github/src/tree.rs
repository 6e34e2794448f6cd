//! Generated file trees, meant to be overlaid on the repository root.

use gha_core::{Error, Result};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// One rendered workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    /// Path relative to the repository root
    pub path: PathBuf,
    /// Serialized workflow
    pub contents: String,
}

/// Rendered files keyed by relative path, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowTree {
    files: IndexMap<PathBuf, String>,
}

impl WorkflowTree {
    /// Create an empty tree
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateFile`] if the path is already present; the
    /// existing file is left untouched.
    pub fn insert(&mut self, file: WorkflowFile) -> Result<()> {
        if self.files.contains_key(&file.path) {
            return Err(Error::duplicate_file(&file.path));
        }
        self.files.insert(file.path, file.contents);
        Ok(())
    }

    /// Contents of the file at `path`
    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Relative paths, in generation order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    /// Files, in generation order
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files
            .iter()
            .map(|(path, contents)| (path.as_path(), contents.as_str()))
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the tree is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write every file below `root`, creating directories as needed.
    ///
    /// Existing files with the same paths are replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a directory or file cannot be written.
    pub fn write_to(&self, root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let mut written = Vec::with_capacity(self.files.len());
        for (path, contents) in &self.files {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, contents)?;
            tracing::info!(path = %target.display(), "Wrote workflow");
            written.push(target);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, contents: &str) -> WorkflowFile {
        WorkflowFile {
            path: PathBuf::from(path),
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let mut tree = WorkflowTree::new();
        tree.insert(file(".github/workflows/push-1.yml", "a")).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(".github/workflows/push-1.yml"), Some("a"));
        assert_eq!(tree.get("missing"), None);
    }

    #[test]
    fn test_duplicate_is_rejected_and_first_kept() {
        let mut tree = WorkflowTree::new();
        tree.insert(file("a.yml", "first")).unwrap();
        let err = tree.insert(file("a.yml", "second")).unwrap_err();
        assert!(matches!(err, Error::DuplicateFile { .. }));
        assert_eq!(tree.get("a.yml"), Some("first"));
    }

    #[test]
    fn test_write_to_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut tree = WorkflowTree::new();
        tree.insert(file(".github/workflows/push-1.yml", "name: x\n")).unwrap();

        let written = tree.write_to(dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join(".github/workflows/push-1.yml")]);
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "name: x\n");
    }
}

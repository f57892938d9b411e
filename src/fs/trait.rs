//! FileSystem trait definition

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Type of file system entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    File,
    Directory,
    Symlink,
}

/// A directory entry returned by read_dir
#[derive(Debug, Clone)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
}

impl DirEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.name
    }

    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    /// File name without its last extension
    pub fn stem(&self) -> Option<&str> {
        self.path.file_stem().and_then(|s| s.to_str())
    }

    /// Exact, case-sensitive match on the last extension
    pub fn has_extension(&self, extension: &str) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension)
    }
}

/// Abstraction over the file operations used by heuristic discovery and the
/// JSON sidecar codec, so both can run against an in-memory tree in tests.
pub trait FileSystem: Send + Sync {
    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// List directory contents
    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// Canonicalize a path
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Create a directory and all of its missing parents
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Replace the contents of `path` so that readers see either the old or
    /// the new contents, never a partial write.
    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_entry_stem_and_extension() {
        let entry = DirEntry {
            path: PathBuf::from("/heuristics/reproin.yaml"),
            name: "reproin.yaml".to_string(),
            file_type: FileType::File,
        };
        assert_eq!(entry.stem(), Some("reproin"));
        assert!(entry.has_extension("yaml"));
        assert!(!entry.has_extension("YAML"));
        assert!(!entry.has_extension("yml"));
        assert!(entry.is_file());
        assert_eq!(entry.file_name(), "reproin.yaml");
    }

    #[test]
    fn test_dir_entry_without_extension() {
        let entry = DirEntry {
            path: PathBuf::from("/heuristics/README"),
            name: "README".to_string(),
            file_type: FileType::File,
        };
        assert_eq!(entry.stem(), Some("README"));
        assert!(!entry.has_extension("yaml"));
    }

    #[test]
    fn test_dir_entry_directory() {
        let entry = DirEntry {
            path: PathBuf::from("/heuristics/nested"),
            name: "nested".to_string(),
            file_type: FileType::Directory,
        };
        assert!(!entry.is_file());
        assert_eq!(entry.path(), Path::new("/heuristics/nested"));
    }
}

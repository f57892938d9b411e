use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone)]
pub struct MockEntry {
    pub content: Option<String>,
    pub file_type: FileType,
}

/// In-memory file tree rooted at `/mock` unless told otherwise
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, MockEntry>>,
    root: PathBuf,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::with_root(PathBuf::from("/mock"))
    }

    pub fn with_root(root: PathBuf) -> Self {
        let fs = Self {
            files: RwLock::new(BTreeMap::new()),
            root: root.clone(),
        };
        fs.add_dir(root);
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();

        if let Some(parent) = path.parent() {
            Self::ensure_parents(&mut files, parent);
        }

        files.insert(
            path,
            MockEntry {
                content: Some(content.to_string()),
                file_type: FileType::File,
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.normalize_path(path.as_ref());
        let mut files = self.files.write().unwrap();
        Self::ensure_parents(&mut files, &path);
    }

    /// Contents of a file, if present
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = self.normalize_path(path.as_ref());
        self.files
            .read()
            .unwrap()
            .get(&path)
            .and_then(|e| e.content.clone())
    }

    /// Resolves relative paths against the root and folds `.` and `..`.
    fn normalize_path(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    fn ensure_parents(files: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            files.entry(current.clone()).or_insert(MockEntry {
                content: None,
                file_type: FileType::Directory,
            });
        }
    }

    fn kind(&self, path: &Path) -> Option<FileType> {
        let path = self.normalize_path(path);
        self.files.read().unwrap().get(&path).map(|e| e.file_type)
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.kind(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.kind(path) == Some(FileType::Directory)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.kind(path) == Some(FileType::File)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();
        let entry = files
            .get(&path)
            .ok_or_else(|| anyhow!("File not found: {:?}", path))?;

        entry
            .content
            .clone()
            .ok_or_else(|| anyhow!("Not a file: {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let path = self.normalize_path(path);
        let files = self.files.read().unwrap();

        match files.get(&path) {
            Some(entry) if entry.file_type == FileType::Directory => {}
            Some(_) => return Err(anyhow!("Not a directory: {:?}", path)),
            None => return Err(anyhow!("Directory not found: {:?}", path)),
        }

        let entries = files
            .iter()
            .filter(|(file_path, _)| file_path.parent() == Some(path.as_path()))
            .map(|(file_path, entry)| DirEntry {
                path: file_path.clone(),
                name: file_path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                file_type: entry.file_type,
            })
            .collect();

        Ok(entries)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let normalized = self.normalize_path(path);
        if self.files.read().unwrap().contains_key(&normalized) {
            Ok(normalized)
        } else {
            Err(anyhow!("Path not found: {:?}", path))
        }
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        if self.is_file(path) {
            return Err(anyhow!("Not a directory: {:?}", path));
        }
        self.add_dir(path);
        Ok(())
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let normalized = self.normalize_path(path);
        let parent = normalized
            .parent()
            .ok_or_else(|| anyhow!("Path {:?} does not include a file name", path))?;
        if !self.is_dir(parent) {
            return Err(anyhow!("Directory not found: {:?}", parent));
        }
        let text = std::str::from_utf8(contents)
            .map_err(|e| anyhow!("Mock file system only stores UTF-8 ({:?}): {}", path, e))?;

        self.files.write().unwrap().insert(
            normalized,
            MockEntry {
                content: Some(text.to_string()),
                file_type: FileType::File,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_file_creates_parents() {
        let fs = MockFileSystem::new();
        fs.add_file("heuristics/reproin.yaml", "description: x");

        assert!(fs.is_file(Path::new("/mock/heuristics/reproin.yaml")));
        assert!(fs.is_dir(Path::new("/mock/heuristics")));
        assert!(fs.exists(Path::new("heuristics")));
    }

    #[test]
    fn test_read_dir_lists_direct_children_sorted() {
        let fs = MockFileSystem::new();
        fs.add_file("h/b.yaml", "");
        fs.add_file("h/a.yaml", "");
        fs.add_file("h/nested/c.yaml", "");

        let entries = fs.read_dir(Path::new("h")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();
        assert_eq!(names, vec!["a.yaml", "b.yaml", "nested"]);
    }

    #[test]
    fn test_read_dir_on_file_fails() {
        let fs = MockFileSystem::new();
        fs.add_file("h/a.yaml", "");
        assert!(fs.read_dir(Path::new("h/a.yaml")).is_err());
        assert!(fs.read_dir(Path::new("missing")).is_err());
    }

    #[test]
    fn test_canonicalize_folds_dots() {
        let fs = MockFileSystem::new();
        fs.add_file("h/reproin.yaml", "");

        let canonical = fs.canonicalize(Path::new("h/./x/../reproin.yaml")).unwrap();
        assert_eq!(canonical, PathBuf::from("/mock/h/reproin.yaml"));
        assert!(fs.canonicalize(Path::new("h/unknown.yaml")).is_err());
    }

    #[test]
    fn test_write_atomic_requires_parent() {
        let fs = MockFileSystem::new();
        assert!(fs.write_atomic(Path::new("out/a.json"), b"{}").is_err());

        fs.create_dir_all(Path::new("out")).unwrap();
        fs.write_atomic(Path::new("out/a.json"), b"{}").unwrap();
        assert_eq!(fs.contents("out/a.json").as_deref(), Some("{}"));
    }
}

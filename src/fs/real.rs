use super::{DirEntry, FileSystem, FileType};
use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const TEMP_ATTEMPTS: usize = 16;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }

    /// Creates a unique temporary file next to `path`.
    fn create_temp_sibling(path: &Path) -> Result<(PathBuf, fs::File)> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Path {:?} does not include a file name", path))?;

        for _ in 0..TEMP_ATTEMPTS {
            let attempt = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
            let temp_path = parent.join(format!(
                ".{}.tmp.{}.{}",
                file_name,
                std::process::id(),
                attempt
            ));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&temp_path)
            {
                Ok(file) => return Ok((temp_path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).context(format!("Failed to create temporary file {:?}", temp_path))
                }
            }
        }

        Err(anyhow!("Failed to allocate a temporary file next to {:?}", path))
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).context(format!("Failed to read file {:?}", path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let entries = fs::read_dir(path).context(format!("Failed to read directory {:?}", path))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            let file_type = if path.is_file() {
                FileType::File
            } else if path.is_dir() {
                FileType::Directory
            } else {
                FileType::Symlink
            };

            result.push(DirEntry {
                path,
                name,
                file_type,
            });
        }

        Ok(result)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        path.canonicalize()
            .context(format!("Failed to canonicalize path {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).context(format!("Failed to create directory {:?}", path))
    }

    fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let (temp_path, mut file) = Self::create_temp_sibling(path)?;

        let written = file
            .write_all(contents)
            .and_then(|_| file.sync_all())
            .context(format!("Failed to write temporary file {:?}", temp_path));
        drop(file);

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).context(format!("Failed to move {:?} into place at {:?}", temp_path, path));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::create_dir(base.join("subdir")).unwrap();
        fs::write(base.join("reproin.yaml"), "description: hi\n").unwrap();
        fs::write(base.join("subdir/nested.txt"), "nested content").unwrap();

        dir
    }

    #[test]
    fn test_exists_and_kinds() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        assert!(fs.exists(temp.path()));
        assert!(fs.is_dir(&temp.path().join("subdir")));
        assert!(fs.is_file(&temp.path().join("reproin.yaml")));
        assert!(!fs.exists(&temp.path().join("nonexistent")));
    }

    #[test]
    fn test_read_to_string() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let content = fs.read_to_string(&temp.path().join("reproin.yaml")).unwrap();
        assert_eq!(content, "description: hi\n");
        assert!(fs.read_to_string(&temp.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_read_dir() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let entries = fs.read_dir(temp.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name()).collect();

        assert!(names.contains(&"reproin.yaml"));
        assert!(names.contains(&"subdir"));
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let target = temp.path().join("sidecar.json");

        fs.write_atomic(&target, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{}");

        fs.write_atomic(&target, b"{\"a\": 1}").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "{\"a\": 1}");

        // no temporary files left behind
        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();

        let result = fs.write_atomic(&temp.path().join("nope/sidecar.json"), b"{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_create_dir_all_and_canonicalize() {
        let temp = create_test_dir();
        let fs = RealFileSystem::new();
        let nested = temp.path().join("a/b/c");

        fs.create_dir_all(&nested).unwrap();
        assert!(fs.is_dir(&nested));

        let canonical = fs.canonicalize(&nested.join("..")).unwrap();
        assert!(canonical.is_absolute());
        assert!(canonical.ends_with("a/b"));
    }
}

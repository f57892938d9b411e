use super::loader::import_file;
use super::module::HeuristicModule;
use crate::config::{bundled_heuristics_dir, HeudiconvConfig};
use crate::error::HeuristicError;
use crate::fs::{FileSystem, RealFileSystem};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Extension of heuristic files inside the registry directory
pub const HEURISTIC_EXTENSION: &str = "yaml";

/// The set of heuristics discoverable by bare name: every `*.yaml` file
/// directly inside one directory, minus those whose name starts with `_`.
///
/// Nothing is cached; each call rescans the directory.
#[derive(Clone)]
pub struct HeuristicRegistry {
    dir: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl HeuristicRegistry {
    pub fn new(dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            dir: dir.into(),
            fs,
        }
    }

    /// Registry over the heuristics shipped with the crate
    pub fn bundled() -> Self {
        Self::new(bundled_heuristics_dir(), Arc::new(RealFileSystem::new()))
    }

    pub fn from_config(config: &HeudiconvConfig) -> Self {
        Self::new(
            config.heuristics_dir.clone(),
            Arc::new(RealFileSystem::new()),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub(crate) fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Result<Vec<String>, HeuristicError> {
        let entries = self
            .fs
            .read_dir(&self.dir)
            .map_err(|source| HeuristicError::Discovery {
                dir: self.dir.clone(),
                source,
            })?;

        let mut names: Vec<String> = entries
            .iter()
            .filter(|entry| entry.is_file() && entry.has_extension(HEURISTIC_EXTENSION))
            .filter_map(|entry| entry.stem())
            .filter(|stem| is_registrable(stem))
            .map(str::to_string)
            .collect();
        names.sort();

        debug!("Found {} heuristics in {}", names.len(), self.dir.display());
        Ok(names)
    }

    /// Location of the heuristic registered under `name`, if any
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        if !is_registrable(name) || name.contains(['/', '\\']) {
            return None;
        }
        let path = self
            .dir
            .join(format!("{}.{}", name, HEURISTIC_EXTENSION));
        self.fs.is_file(&path).then_some(path)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_some()
    }

    /// Loads a registered heuristic by name
    pub fn load(&self, name: &str) -> Result<HeuristicModule, HeuristicError> {
        let path = self.path_for(name).ok_or_else(|| self.not_found(name))?;
        import_file(self.fs(), name, &path)
    }

    /// One-line description of every registered heuristic, keyed by name
    pub fn list_descriptions(&self) -> Result<BTreeMap<String, String>, HeuristicError> {
        let mut descriptions = BTreeMap::new();
        for name in self.names()? {
            let module = self.load(&name)?;
            descriptions.insert(name, module.one_line_description().to_string());
        }
        Ok(descriptions)
    }

    /// One-line description of `name`, or its whole documentation when `full`
    pub fn get_description(&self, name: &str, full: bool) -> Result<String, HeuristicError> {
        let module = self.load(name)?;
        Ok(if full {
            module.documentation().to_string()
        } else {
            module.one_line_description().to_string()
        })
    }

    fn not_found(&self, name: &str) -> HeuristicError {
        HeuristicError::NotFound {
            name: name.to_string(),
            known: self.names().unwrap_or_default(),
        }
    }
}

fn is_registrable(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('_') && !name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    fn registry_with(files: &[(&str, &str)]) -> HeuristicRegistry {
        let fs = MockFileSystem::new();
        fs.add_dir("heuristics");
        for (name, content) in files {
            fs.add_file(format!("heuristics/{}", name), content);
        }
        HeuristicRegistry::new("/mock/heuristics", Arc::new(fs))
    }

    #[test]
    fn test_names_filters_and_sorts() {
        let registry = registry_with(&[
            ("zeta.yaml", "description: z\n"),
            ("alpha.yaml", "description: a\n"),
            ("_private.yaml", "description: p\n"),
            ("notes.txt", "not a heuristic"),
            ("nested/inner.yaml", "description: n\n"),
        ]);

        assert_eq!(registry.names().unwrap(), vec!["alpha", "zeta"]);
        assert!(registry.contains("alpha"));
        assert!(!registry.contains("_private"));
        assert!(!registry.contains("notes"));
        assert!(!registry.contains("nested/inner"));
    }

    #[test]
    fn test_extension_case_must_match() {
        let registry = registry_with(&[
            ("alpha.yaml", "description: Alpha\n"),
            ("Legacy.YAML", "description: Legacy\n"),
            ("Mixed.Yaml", "description: Mixed\n"),
        ]);

        assert_eq!(registry.names().unwrap(), vec!["alpha"]);
        assert!(!registry.contains("Legacy"));

        let descriptions = registry.list_descriptions().unwrap();
        assert_eq!(descriptions.len(), 1);
        assert_eq!(descriptions["alpha"], "Alpha");
    }

    #[test]
    fn test_every_listed_name_loads() {
        let registry = registry_with(&[
            ("alpha.yaml", "description: Alpha\n"),
            ("beta.yaml", "description: Beta\n"),
            ("Gamma.YAML", "description: Gamma\n"),
        ]);

        for name in registry.names().unwrap() {
            assert!(registry.path_for(&name).is_some(), "{} has no path", name);
            assert_eq!(registry.load(&name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_missing_dir_is_discovery_error() {
        let registry = HeuristicRegistry::new("/nowhere", Arc::new(MockFileSystem::new()));
        assert!(matches!(
            registry.names(),
            Err(HeuristicError::Discovery { .. })
        ));
    }

    #[test]
    fn test_descriptions() {
        let registry = registry_with(&[
            ("alpha.yaml", "description: |\n  Alpha heuristic\n  with details\n"),
            ("beta.yaml", "description: Beta heuristic\n"),
        ]);

        let descriptions = registry.list_descriptions().unwrap();
        assert_eq!(descriptions.len(), 2);
        assert_eq!(descriptions["alpha"], "Alpha heuristic");
        assert_eq!(descriptions["beta"], "Beta heuristic");

        assert_eq!(
            registry.get_description("alpha", true).unwrap(),
            "Alpha heuristic\nwith details\n"
        );
        assert_eq!(registry.get_description("alpha", false).unwrap(), "Alpha heuristic");
    }

    #[test]
    fn test_get_description_unknown_name() {
        let registry = registry_with(&[("alpha.yaml", "description: a\n")]);
        match registry.get_description("omega", false) {
            Err(HeuristicError::NotFound { name, known }) => {
                assert_eq!(name, "omega");
                assert_eq!(known, vec!["alpha"]);
            }
            other => panic!("expected NotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_broken_heuristic_fails_listing() {
        let registry = registry_with(&[
            ("alpha.yaml", "description: a\n"),
            ("broken.yaml", "rules: [unclosed"),
        ]);
        let err = registry.list_descriptions().unwrap_err();
        assert!(err.is_import_failure());
    }
}

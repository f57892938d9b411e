use super::module::HeuristicModule;
use super::registry::HeuristicRegistry;
use crate::error::HeuristicError;
use crate::fs::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a heuristic reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedHeuristic {
    /// A registered name and its file in the registry directory
    Named { name: String, path: PathBuf },
    /// An existing file given by path
    Path(PathBuf),
}

impl ResolvedHeuristic {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedHeuristic::Named { path, .. } => path,
            ResolvedHeuristic::Path(path) => path,
        }
    }
}

/// Turns a heuristic reference (registered name or file path) into a loaded
/// module. Every failure, whichever way the reference resolved, is reported
/// as [`HeuristicError::ImportFailure`].
#[derive(Clone)]
pub struct HeuristicLoader {
    registry: HeuristicRegistry,
}

impl HeuristicLoader {
    pub fn new(registry: HeuristicRegistry) -> Self {
        Self { registry }
    }

    pub fn bundled() -> Self {
        Self::new(HeuristicRegistry::bundled())
    }

    pub fn registry(&self) -> &HeuristicRegistry {
        &self.registry
    }

    /// Registered names win over files of the same name in the working directory.
    pub fn resolve(&self, reference: &str) -> Result<ResolvedHeuristic, HeuristicError> {
        if let Some(path) = self.registry.path_for(reference) {
            debug!("Heuristic '{}' resolved by name to {}", reference, path.display());
            return Ok(ResolvedHeuristic::Named {
                name: reference.to_string(),
                path,
            });
        }

        let fs = self.registry.fs();
        let path = Path::new(reference);
        if fs.is_file(path) {
            debug!("Heuristic '{}' resolved as a file path", reference);
            return Ok(ResolvedHeuristic::Path(path.to_path_buf()));
        }

        let reason = if fs.is_dir(path) {
            "path is a directory, not a heuristic file"
        } else {
            "neither a registered heuristic name nor an existing file"
        };
        Err(HeuristicError::import_failure(reference, reason))
    }

    pub fn load(&self, reference: &str) -> Result<HeuristicModule, HeuristicError> {
        let resolved = self.resolve(reference)?;
        import_file(self.registry.fs(), reference, resolved.path())
    }
}

/// Loads a heuristic from the bundled registry or from a path
pub fn load_heuristic(reference: &str) -> Result<HeuristicModule, HeuristicError> {
    HeuristicLoader::bundled().load(reference)
}

/// Reads, parses and validates one heuristic file. The module's origin is
/// the canonical path so loads by name and by path compare equal.
pub(crate) fn import_file(
    fs: &dyn FileSystem,
    reference: &str,
    path: &Path,
) -> Result<HeuristicModule, HeuristicError> {
    let origin = fs
        .canonicalize(path)
        .map_err(|e| HeuristicError::import_failure(reference, format!("{:#}", e)))?;
    let source = fs
        .read_to_string(&origin)
        .map_err(|e| HeuristicError::import_failure(reference, format!("{:#}", e)))?;

    let module = HeuristicModule::parse(origin, &source).map_err(|e| {
        debug!("Heuristic '{}' failed to load: {}", reference, e);
        HeuristicError::import_failure(reference, e.to_string())
    })?;

    debug!(
        "Loaded heuristic '{}' from {} ({} rules)",
        reference,
        module.origin_path().display(),
        module.rules().len()
    );
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;
    use std::sync::Arc;

    fn loader() -> HeuristicLoader {
        let fs = MockFileSystem::new();
        fs.add_file("heuristics/reproin.yaml", "description: ReproIn\n");
        fs.add_file("heuristics/broken.yaml", "rules: [unclosed");
        fs.add_file("custom/mine.yaml", "description: Mine\n");
        fs.add_file("custom/bad.yaml", "description: [oops\n");
        fs.add_dir("custom/folder");
        HeuristicLoader::new(HeuristicRegistry::new("/mock/heuristics", Arc::new(fs)))
    }

    #[test]
    fn test_resolve_by_name() {
        let resolved = loader().resolve("reproin").unwrap();
        assert_eq!(
            resolved,
            ResolvedHeuristic::Named {
                name: "reproin".to_string(),
                path: PathBuf::from("/mock/heuristics/reproin.yaml"),
            }
        );
    }

    #[test]
    fn test_resolve_by_path() {
        let resolved = loader().resolve("/mock/custom/mine.yaml").unwrap();
        assert_eq!(
            resolved,
            ResolvedHeuristic::Path(PathBuf::from("/mock/custom/mine.yaml"))
        );
    }

    #[test]
    fn test_name_and_path_share_origin() {
        let loader = loader();
        let by_name = loader.load("reproin").unwrap();
        let by_path = loader.load("/mock/heuristics/./reproin.yaml").unwrap();
        assert_eq!(by_name.origin_path(), by_path.origin_path());
        assert_eq!(by_name.documentation(), "ReproIn");
    }

    #[test]
    fn test_unknown_references_fail_uniformly() {
        let loader = loader();
        for reference in [
            "unknownsomething",
            "/mock/heuristics/unknownsomething.yaml",
            "/mock/custom/folder",
            "/mock/custom/bad.yaml",
            "broken",
            "",
        ] {
            let err = loader.load(reference).unwrap_err();
            assert!(
                err.is_import_failure(),
                "{} should be an import failure, got {}",
                reference,
                err
            );
        }
    }
}

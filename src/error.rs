use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by heuristic discovery and loading
#[derive(Debug, Error)]
pub enum HeuristicError {
    /// The name is not one of the registered heuristics
    #[error("Unknown heuristic '{name}'. Known heuristics: {}", .known.join(", "))]
    NotFound { name: String, known: Vec<String> },

    /// The reference could not be resolved or its file could not be loaded.
    /// Raised for unknown names, missing paths, unparsable files and invalid
    /// rule definitions alike.
    #[error("Failed to import heuristic from '{reference}': {reason}")]
    ImportFailure { reference: String, reason: String },

    /// The registry directory itself could not be scanned
    #[error("Failed to scan heuristics directory {dir}: {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl HeuristicError {
    pub fn import_failure(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        HeuristicError::ImportFailure {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn is_import_failure(&self) -> bool {
        matches!(self, HeuristicError::ImportFailure { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HeuristicError::NotFound { .. })
    }
}

/// Failures surfaced by the JSON sidecar codec
#[derive(Debug, Error)]
pub enum JsonError {
    /// The file content is not valid JSON, or does not fit the requested type
    #[error("Failed to decode JSON from {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The value could not be serialized
    #[error("Failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    /// An object was required but the file holds another JSON value
    #[error("Expected a JSON object in {path}")]
    NotAnObject { path: PathBuf },
}

impl JsonError {
    pub fn is_decode(&self) -> bool {
        matches!(self, JsonError::Decode { .. })
    }
}

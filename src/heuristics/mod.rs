//! Heuristic discovery and loading
//!
//! A heuristic decides how scanned series map onto output file names. The
//! registry enumerates the bundled heuristics, the loader resolves a name or
//! path to a validated module.

pub mod loader;
pub mod module;
pub mod registry;
pub mod template;

pub use loader::{load_heuristic, HeuristicLoader, ResolvedHeuristic};
pub use module::{ConversionKey, HeuristicModule, ModuleError, Rule, SeriesAssignment};
pub use registry::{HeuristicRegistry, HEURISTIC_EXTENSION};
pub use template::{KeyTemplate, TemplateError};

use crate::error::HeuristicError;
use std::collections::BTreeMap;

/// One-line descriptions of the bundled heuristics
pub fn get_known_heuristics_with_descriptions() -> Result<BTreeMap<String, String>, HeuristicError> {
    HeuristicRegistry::bundled().list_descriptions()
}

/// Description of a bundled heuristic
pub fn get_heuristic_description(name: &str, full: bool) -> Result<String, HeuristicError> {
    HeuristicRegistry::bundled().get_description(name, full)
}

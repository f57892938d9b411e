//! heudiconv - heuristic management and JSON sidecar tooling for DICOM conversion
//!
//! A heuristic decides how the series of a scanning session are named once
//! converted. This library finds the heuristics shipped with the crate, loads
//! user supplied ones from disk, and applies them to scanned series. It also
//! owns the JSON sidecar codec, which writes metadata files in a stable layout.
//!
//! # Example Usage
//!
//! ```no_run
//! use heudiconv::{get_known_heuristics_with_descriptions, load_heuristic, SeqInfo};
//!
//! for (name, description) in get_known_heuristics_with_descriptions()? {
//!     println!("{name}: {description}");
//! }
//!
//! let module = load_heuristic("reproin")?;
//! let series = vec![SeqInfo::new("1-anat", "anat-T1w")];
//! for assignment in module.infotodict(&series) {
//!     println!("{} <- {:?}", assignment.key.template, assignment.series_ids);
//! }
//! # Ok::<(), heudiconv::HeuristicError>(())
//! ```
//!
//! # Project Structure
//!
//! - [`heuristics`]: registry of bundled heuristics and the name-or-path loader
//! - [`json`]: sidecar pretty printer and load/save helpers
//! - [`seqinfo`]: per-series scan metadata heuristics match against
//! - [`fs`]: filesystem abstraction with a real and an in-memory implementation
//! - [`cli`]: command line front end

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod heuristics;
pub mod json;
pub mod seqinfo;
pub mod util;

pub use config::{bundled_heuristics_dir, ConfigError, HeudiconvConfig, HEURISTICS_PATH};
pub use error::{HeuristicError, JsonError};
pub use heuristics::{
    get_heuristic_description, get_known_heuristics_with_descriptions, load_heuristic,
    ConversionKey, HeuristicLoader, HeuristicModule, HeuristicRegistry, SeriesAssignment,
};
pub use json::{load_json, pretty_print, save_json, update_json};
pub use seqinfo::SeqInfo;
pub use util::{create_tree, init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_exists() {
        assert_eq!(NAME, "heudiconv");
    }
}

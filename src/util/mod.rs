//! Utility modules for heudiconv
//!
//! - Structured logging setup and configuration
//! - File tree helpers used to build fixtures

pub mod logging;
pub mod tree;

pub use logging::{init_default, init_from_env, init_logging, LoggingConfig};
pub use tree::{create_file_if_missing, create_tree, TreeNode};

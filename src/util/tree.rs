//! Helpers for laying out small file trees, mainly for test fixtures

use crate::json::pretty_print;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One node of a tree passed to [`create_tree`]
#[derive(Debug, Clone)]
pub enum TreeNode {
    /// A text file with the given contents
    File(String),
    /// A JSON file written in the sidecar layout
    Json(Value),
    /// A directory with its children
    Dir(Vec<(String, TreeNode)>),
}

impl From<&str> for TreeNode {
    fn from(content: &str) -> Self {
        TreeNode::File(content.to_string())
    }
}

impl From<Value> for TreeNode {
    fn from(value: Value) -> Self {
        TreeNode::Json(value)
    }
}

/// Creates `entries` under `root`, making `root` first if needed.
/// Existing files are overwritten.
pub fn create_tree(root: &Path, entries: &[(String, TreeNode)]) -> Result<()> {
    fs::create_dir_all(root).context(format!("Failed to create directory {:?}", root))?;

    for (name, node) in entries {
        let path = root.join(name);
        match node {
            TreeNode::File(content) => {
                fs::write(&path, content).context(format!("Failed to write {:?}", path))?;
            }
            TreeNode::Json(value) => {
                let text = pretty_print(value)?;
                fs::write(&path, text).context(format!("Failed to write {:?}", path))?;
            }
            TreeNode::Dir(children) => create_tree(&path, children)?,
        }
    }

    Ok(())
}

/// Writes `content` to `path` unless the file is already there.
/// Returns whether the file was created.
pub fn create_file_if_missing(path: &Path, content: &str) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(format!("Failed to create directory {:?}", parent))?;
        }
    }
    fs::write(path, content).context(format!("Failed to write {:?}", path))?;
    Ok(true)
}

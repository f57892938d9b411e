//! Output formatting for multiple formats
//!
//! JSON goes through the sidecar pretty printer, YAML through `serde_yaml`,
//! and the human format is plain aligned text.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::heuristics::{HeuristicModule, SeriesAssignment};
use crate::json::pretty_print;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

/// What `check` reports about a loaded heuristic
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub name: String,
    pub origin_path: PathBuf,
    pub description: String,
    pub rules: Vec<String>,
}

impl From<&HeuristicModule> for ModuleSummary {
    fn from(module: &HeuristicModule) -> Self {
        Self {
            name: module.name().to_string(),
            origin_path: module.origin_path().to_path_buf(),
            description: module.one_line_description().to_string(),
            rules: module.rules().iter().map(|r| r.name().to_string()).collect(),
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_descriptions(&self, descriptions: &BTreeMap<String, String>) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(descriptions),
            OutputFormat::Yaml => self.format_yaml(descriptions),
            OutputFormat::Human => {
                let width = descriptions.keys().map(String::len).max().unwrap_or(0);
                Ok(descriptions
                    .iter()
                    .map(|(name, description)| {
                        format!("- {:<width$}  {}", name, description, width = width)
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    pub fn format_module(&self, summary: &ModuleSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(summary),
            OutputFormat::Yaml => self.format_yaml(summary),
            OutputFormat::Human => {
                let mut out = String::new();
                out.push_str(&format!("Heuristic: {}\n", summary.name));
                out.push_str(&format!("Origin: {}\n", summary.origin_path.display()));
                out.push_str(&format!("Description: {}\n", summary.description));
                out.push_str(&format!("Rules ({}):", summary.rules.len()));
                for rule in &summary.rules {
                    out.push_str(&format!("\n  - {}", rule));
                }
                Ok(out)
            }
        }
    }

    pub fn format_assignments(&self, assignments: &[SeriesAssignment]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(assignments),
            OutputFormat::Yaml => self.format_yaml(assignments),
            OutputFormat::Human => {
                if assignments.is_empty() {
                    return Ok("No series matched".to_string());
                }
                Ok(assignments
                    .iter()
                    .map(|a| {
                        format!(
                            "{} [{}]\n  series: {}",
                            a.key.template,
                            a.key.outtype.join(", "),
                            a.series_ids.join(", ")
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    fn format_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        pretty_print(value).context("Failed to serialize output to JSON")
    }

    fn format_yaml<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        serde_yaml::to_string(value).context("Failed to serialize output to YAML")
    }
}

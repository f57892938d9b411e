//! Loaded heuristics and the rules they apply to scanned series
//!
//! A heuristic file is YAML:
//!
//! ```yaml
//! description: |
//!   One line summary.
//!   Longer explanation...
//! outtype: [nii.gz]
//! rules:
//!   - name: t1w
//!     template: "{bids_subject_session_dir}/anat/{bids_subject_session_prefix}_T1w"
//!     match:
//!       protocol_name: "(?i)mprage"
//!       is_derived: false
//! ```
//!
//! Rules are tried in order and the first one matching a series decides its
//! output key. Regex criteria are searched, not anchored.

use super::template::{KeyTemplate, TemplateError};
use crate::seqinfo::SeqInfo;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DEFAULT_OUTTYPE: &str = "nii.gz";

/// Why a heuristic file could not be turned into a module
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("invalid heuristic definition: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("rule '{rule}': invalid {field} pattern: {source}")]
    Pattern {
        rule: String,
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{rule}': {source}")]
    Template {
        rule: String,
        #[source]
        source: TemplateError,
    },

    #[error("rule '{rule}': template uses <{group}> but no pattern defines that group")]
    UndefinedGroup { rule: String, group: String },

    #[error("rule '{rule}': outtype list is empty")]
    EmptyOuttype { rule: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HeuristicFile {
    #[serde(default)]
    description: String,
    #[serde(default)]
    outtype: Option<Vec<String>>,
    #[serde(default)]
    rules: Vec<RuleSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSpec {
    name: Option<String>,
    template: String,
    outtype: Option<Vec<String>>,
    annotation_classes: Option<Vec<String>>,
    #[serde(rename = "match", default)]
    criteria: CriteriaSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CriteriaSpec {
    protocol_name: Option<String>,
    series_description: Option<String>,
    sequence_name: Option<String>,
    image_type: Option<String>,
    is_derived: Option<bool>,
    is_motion_corrected: Option<bool>,
    dim3: Option<u32>,
    min_dim4: Option<u32>,
    max_dim4: Option<u32>,
}

/// Output location and formats for a group of series
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversionKey {
    pub template: String,
    pub outtype: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub annotation_classes: Option<Vec<String>>,
}

impl ConversionKey {
    pub fn new(template: impl Into<String>, outtype: &[&str]) -> Self {
        Self {
            template: template.into(),
            outtype: outtype.iter().map(|s| s.to_string()).collect(),
            annotation_classes: None,
        }
    }
}

/// Series routed to one conversion key, in scan order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesAssignment {
    pub key: ConversionKey,
    pub series_ids: Vec<String>,
}

#[derive(Debug, Default)]
struct Criteria {
    protocol_name: Option<Regex>,
    series_description: Option<Regex>,
    sequence_name: Option<Regex>,
    image_type: Option<Regex>,
    is_derived: Option<bool>,
    is_motion_corrected: Option<bool>,
    dim3: Option<u32>,
    min_dim4: Option<u32>,
    max_dim4: Option<u32>,
}

impl Criteria {
    fn compile(rule: &str, spec: CriteriaSpec) -> Result<Self, ModuleError> {
        let pattern = |field: &'static str, value: Option<String>| -> Result<Option<Regex>, ModuleError> {
            value
                .map(|p| {
                    Regex::new(&p).map_err(|source| ModuleError::Pattern {
                        rule: rule.to_string(),
                        field,
                        source,
                    })
                })
                .transpose()
        };

        Ok(Self {
            protocol_name: pattern("protocol_name", spec.protocol_name)?,
            series_description: pattern("series_description", spec.series_description)?,
            sequence_name: pattern("sequence_name", spec.sequence_name)?,
            image_type: pattern("image_type", spec.image_type)?,
            is_derived: spec.is_derived,
            is_motion_corrected: spec.is_motion_corrected,
            dim3: spec.dim3,
            min_dim4: spec.min_dim4,
            max_dim4: spec.max_dim4,
        })
    }

    /// Regexes whose named groups feed the template, in priority order
    fn capturing(&self) -> impl Iterator<Item = &Regex> {
        [
            self.protocol_name.as_ref(),
            self.series_description.as_ref(),
            self.sequence_name.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    fn defines_group(&self, group: &str) -> bool {
        self.capturing()
            .any(|re| re.capture_names().flatten().any(|name| name == group))
    }

    /// Returns the named captures when every criterion holds
    fn matches(&self, info: &SeqInfo) -> Option<HashMap<String, String>> {
        if self.is_derived.is_some_and(|v| v != info.is_derived) {
            return None;
        }
        if self
            .is_motion_corrected
            .is_some_and(|v| v != info.is_motion_corrected)
        {
            return None;
        }
        if self.dim3.is_some_and(|v| v != info.dim3) {
            return None;
        }
        if self.min_dim4.is_some_and(|v| info.dim4 < v) {
            return None;
        }
        if self.max_dim4.is_some_and(|v| info.dim4 > v) {
            return None;
        }
        if let Some(re) = &self.image_type {
            if !info.image_type.iter().any(|t| re.is_match(t)) {
                return None;
            }
        }

        let mut captures = HashMap::new();
        let fields = [
            (&self.protocol_name, info.protocol_name.as_str()),
            (&self.series_description, info.series_description.as_str()),
            (&self.sequence_name, info.sequence_name.as_str()),
        ];
        for (re, value) in fields {
            let Some(re) = re else { continue };
            let caps = re.captures(value)?;
            for name in re.capture_names().flatten() {
                if let Some(m) = caps.name(name) {
                    captures.entry(name.to_string()).or_insert_with(|| m.as_str().to_string());
                }
            }
        }

        Some(captures)
    }
}

#[derive(Debug)]
pub struct Rule {
    name: String,
    template: KeyTemplate,
    outtype: Vec<String>,
    annotation_classes: Option<Vec<String>>,
    criteria: Criteria,
}

impl Rule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        self.template.as_str()
    }

    pub fn outtype(&self) -> &[String] {
        &self.outtype
    }

    fn apply(&self, info: &SeqInfo) -> Option<ConversionKey> {
        let captures = self.criteria.matches(info)?;
        match self.template.expand(&captures) {
            Ok(template) => Some(ConversionKey {
                template,
                outtype: self.outtype.clone(),
                annotation_classes: self.annotation_classes.clone(),
            }),
            Err(e) => {
                debug!(
                    "Rule {} matched series {} but cannot build its key: {}",
                    self.name, info.series_id, e
                );
                None
            }
        }
    }
}

/// A heuristic ready to classify series
#[derive(Debug)]
pub struct HeuristicModule {
    name: String,
    origin_path: PathBuf,
    documentation: String,
    rules: Vec<Rule>,
}

impl HeuristicModule {
    /// Parses and validates heuristic source text. `origin_path` is recorded
    /// as given; its file stem becomes the module name.
    pub fn parse(origin_path: impl Into<PathBuf>, source: &str) -> Result<Self, ModuleError> {
        let origin_path = origin_path.into();
        let file: HeuristicFile = serde_yaml::from_str(source)?;

        let default_outtype = file
            .outtype
            .unwrap_or_else(|| vec![DEFAULT_OUTTYPE.to_string()]);

        let mut rules = Vec::with_capacity(file.rules.len());
        for (index, spec) in file.rules.into_iter().enumerate() {
            let name = spec.name.unwrap_or_else(|| format!("#{}", index + 1));

            let template = KeyTemplate::parse(&spec.template).map_err(|source| {
                ModuleError::Template {
                    rule: name.clone(),
                    source,
                }
            })?;
            let criteria = Criteria::compile(&name, spec.criteria)?;

            if let Some(group) = template
                .groups()
                .into_iter()
                .find(|g| !criteria.defines_group(g))
            {
                return Err(ModuleError::UndefinedGroup {
                    rule: name,
                    group: group.to_string(),
                });
            }

            let outtype = spec.outtype.unwrap_or_else(|| default_outtype.clone());
            if outtype.is_empty() {
                return Err(ModuleError::EmptyOuttype { rule: name });
            }

            rules.push(Rule {
                name,
                template,
                outtype,
                annotation_classes: spec.annotation_classes,
                criteria,
            });
        }

        let name = origin_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self {
            name,
            origin_path,
            documentation: file.description,
            rules,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved location the module was loaded from
    pub fn origin_path(&self) -> &Path {
        &self.origin_path
    }

    /// Full documentation string
    pub fn documentation(&self) -> &str {
        &self.documentation
    }

    /// First line of the documentation
    pub fn one_line_description(&self) -> &str {
        first_line(&self.documentation)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Routes each series to the key of the first rule that matches it.
    /// Series producing the same key are grouped, keeping scan order.
    pub fn infotodict(&self, seqinfo: &[SeqInfo]) -> Vec<SeriesAssignment> {
        let mut assignments: Vec<SeriesAssignment> = Vec::new();
        let mut positions: HashMap<ConversionKey, usize> = HashMap::new();

        for info in seqinfo {
            let Some(key) = self.rules.iter().find_map(|rule| rule.apply(info)) else {
                debug!(
                    "Heuristic {} has no rule for series {} ({})",
                    self.name, info.series_id, info.protocol_name
                );
                continue;
            };

            match positions.get(&key) {
                Some(&index) => assignments[index].series_ids.push(info.series_id.clone()),
                None => {
                    positions.insert(key.clone(), assignments.len());
                    assignments.push(SeriesAssignment {
                        key,
                        series_ids: vec![info.series_id.clone()],
                    });
                }
            }
        }

        assignments
    }
}

/// First non-blank line, trimmed
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

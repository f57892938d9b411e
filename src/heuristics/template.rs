//! Output key templates
//!
//! A template is the output path stem of a converted series. Three kinds of
//! markup are recognised:
//!
//! - `<group>` is replaced by a named capture from the rule's regex criteria
//! - `[ ... ]` is an optional segment, dropped unless every group inside it
//!   captured something
//! - `{...}` is passed through untouched for the converter to fill in later
//!   (`{subject}`, `{session}`, `{item:02d}`, `{bids_subject_session_dir}`, ...)

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template is empty")]
    Empty,

    #[error("unterminated '<' at offset {0}")]
    UnterminatedGroup(usize),

    #[error("invalid group name '{0}'")]
    InvalidGroupName(String),

    #[error("optional segments cannot be nested (offset {0})")]
    NestedOptional(usize),

    #[error("unbalanced ']' at offset {0}")]
    UnbalancedClose(usize),

    #[error("optional segment opened at offset {0} is never closed")]
    UnclosedOptional(usize),

    #[error("group '{0}' did not capture")]
    MissingGroup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Group(String),
    Optional(Vec<Segment>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl KeyTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        if source.trim().is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut optional: Option<(usize, Vec<Segment>)> = None;
        let mut literal = String::new();
        let mut chars = source.char_indices();

        while let Some((offset, c)) = chars.next() {
            match c {
                '<' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '>' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::UnterminatedGroup(offset));
                    }
                    if name.is_empty()
                        || !name.chars().all(|n| n.is_ascii_alphanumeric() || n == '_')
                    {
                        return Err(TemplateError::InvalidGroupName(name));
                    }

                    let target = match optional.as_mut() {
                        Some((_, inner)) => inner,
                        None => &mut segments,
                    };
                    flush_literal(&mut literal, target);
                    target.push(Segment::Group(name));
                }
                '[' => {
                    if optional.is_some() {
                        return Err(TemplateError::NestedOptional(offset));
                    }
                    flush_literal(&mut literal, &mut segments);
                    optional = Some((offset, Vec::new()));
                }
                ']' => match optional.take() {
                    Some((_, mut inner)) => {
                        flush_literal(&mut literal, &mut inner);
                        segments.push(Segment::Optional(inner));
                    }
                    None => return Err(TemplateError::UnbalancedClose(offset)),
                },
                other => literal.push(other),
            }
        }

        if let Some((offset, _)) = optional {
            return Err(TemplateError::UnclosedOptional(offset));
        }
        flush_literal(&mut literal, &mut segments);

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Groups referenced anywhere in the template, in order of appearance
    pub fn groups(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Group(name) => names.push(name.as_str()),
                Segment::Optional(inner) => {
                    for s in inner {
                        if let Segment::Group(name) = s {
                            names.push(name.as_str());
                        }
                    }
                }
                Segment::Literal(_) => {}
            }
        }
        names
    }

    /// Substitutes captured groups. A group outside an optional segment must
    /// be present.
    pub fn expand(&self, captures: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Group(name) => match captures.get(name) {
                    Some(value) => out.push_str(value),
                    None => return Err(TemplateError::MissingGroup(name.clone())),
                },
                Segment::Optional(inner) => {
                    let mut piece = String::new();
                    let mut complete = true;
                    for s in inner {
                        match s {
                            Segment::Literal(text) => piece.push_str(text),
                            Segment::Group(name) => match captures.get(name) {
                                Some(value) => piece.push_str(value),
                                None => {
                                    complete = false;
                                    break;
                                }
                            },
                            Segment::Optional(_) => {}
                        }
                    }
                    if complete {
                        out.push_str(&piece);
                    }
                }
            }
        }

        Ok(out)
    }
}

fn flush_literal(literal: &mut String, target: &mut Vec<Segment>) {
    if !literal.is_empty() {
        target.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captures(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_plain_template_passes_braces_through() {
        let t = KeyTemplate::parse("sub-{subject}/{session}/anat/sub-{subject}_T1w").unwrap();
        assert!(t.groups().is_empty());
        assert_eq!(
            t.expand(&HashMap::new()).unwrap(),
            "sub-{subject}/{session}/anat/sub-{subject}_T1w"
        );
    }

    #[test]
    fn test_groups_and_optional_segments() {
        let t = KeyTemplate::parse(
            "{bids_subject_session_dir}/<datatype>/{bids_subject_session_prefix}[_acq-<acq>][_run-<run>]_<suffix>",
        )
        .unwrap();
        assert_eq!(t.groups(), vec!["datatype", "acq", "run", "suffix"]);

        let full = t
            .expand(&captures(&[
                ("datatype", "anat"),
                ("acq", "mpr"),
                ("run", "02"),
                ("suffix", "T1w"),
            ]))
            .unwrap();
        assert_eq!(
            full,
            "{bids_subject_session_dir}/anat/{bids_subject_session_prefix}_acq-mpr_run-02_T1w"
        );

        let sparse = t
            .expand(&captures(&[("datatype", "anat"), ("suffix", "T2w")]))
            .unwrap();
        assert_eq!(
            sparse,
            "{bids_subject_session_dir}/anat/{bids_subject_session_prefix}_T2w"
        );
    }

    #[test]
    fn test_required_group_missing() {
        let t = KeyTemplate::parse("func/<task>_bold").unwrap();
        assert_eq!(
            t.expand(&HashMap::new()),
            Err(TemplateError::MissingGroup("task".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(KeyTemplate::parse("  "), Err(TemplateError::Empty));
        assert_eq!(
            KeyTemplate::parse("anat/<suffix"),
            Err(TemplateError::UnterminatedGroup(5))
        );
        assert_eq!(
            KeyTemplate::parse("anat/<bad name>"),
            Err(TemplateError::InvalidGroupName("bad name".to_string()))
        );
        assert_eq!(
            KeyTemplate::parse("a[_x[_y]]"),
            Err(TemplateError::NestedOptional(4))
        );
        assert_eq!(
            KeyTemplate::parse("a]_x"),
            Err(TemplateError::UnbalancedClose(1))
        );
        assert_eq!(
            KeyTemplate::parse("a[_x"),
            Err(TemplateError::UnclosedOptional(1))
        );
    }
}

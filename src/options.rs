use crate::field::{Field, FieldType, Frame};
use clap::ValueEnum;
use serde::Serialize;

/// An option a chooser can present: a stable value plus a human label.
#[derive(Debug, Serialize, Clone, Eq, PartialEq)]
pub struct SelectableValue {
    pub value: String,
    pub label: String,
}

/// Layout orientation for the value table.
#[derive(Debug, ValueEnum, Copy, Clone, Eq, PartialEq, Default)]
pub enum Orientation {
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

const AUTO_HORIZONTAL_MAX_VALUES: usize = 4;

impl Orientation {
    /// Resolve `Auto` by value count: a handful of values fit one row,
    /// anything more stacks vertically.
    pub fn resolve(self, value_count: usize) -> Self {
        match self {
            Self::Auto => {
                if value_count <= AUTO_HORIZONTAL_MAX_VALUES {
                    Self::Horizontal
                } else {
                    Self::Vertical
                }
            }
            other => other,
        }
    }
}

/// Which fields of a frame participate in reduction.
///
/// Parsed from the matcher strings a field chooser emits: the empty string
/// selects numeric fields only, `/.*/` selects every field, and an
/// anchored `/^name$/` pattern (or a bare field name) selects one field.
#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum FieldMatcher {
    #[default]
    Numeric,
    All,
    ByName(String),
}

impl FieldMatcher {
    pub fn parse(value: &str) -> Self {
        if value.is_empty() {
            return Self::Numeric;
        }
        if value == "/.*/" {
            return Self::All;
        }
        if let Some(inner) = value
            .strip_prefix("/^")
            .and_then(|rest| rest.strip_suffix("$/"))
        {
            return Self::ByName(unescape_regex_literal(inner));
        }
        Self::ByName(value.to_string())
    }

    pub fn matches(&self, field: &Field) -> bool {
        match self {
            Self::Numeric => field.field_type == FieldType::Number,
            Self::All => true,
            Self::ByName(name) => field.name == *name,
        }
    }
}

/// The selectable field-matcher list for a frame set: the two fixed
/// entries plus one anchored, escaped entry per field.
pub fn field_matcher_options(frames: &[Frame]) -> Vec<SelectableValue> {
    let mut options = vec![
        SelectableValue {
            value: String::new(),
            label: "Numeric Fields".to_string(),
        },
        SelectableValue {
            value: "/.*/".to_string(),
            label: "All Fields".to_string(),
        },
    ];
    for frame in frames {
        for field in &frame.fields {
            options.push(SelectableValue {
                value: format!("/^{}$/", escape_regex_literal(&field.name)),
                label: field.name.clone(),
            });
        }
    }
    options
}

const REGEX_METACHARACTERS: &str = r"\^$.|?*+()[]{}";

/// Escape a field name so it reads as a literal inside a regex pattern.
pub fn escape_regex_literal(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for ch in name.chars() {
        if REGEX_METACHARACTERS.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn unescape_regex_literal(pattern: &str) -> String {
    let mut unescaped = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                unescaped.push(next);
            }
        } else {
            unescaped.push(ch);
        }
    }
    unescaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    fn frame_with(names: &[(&str, &str)]) -> Frame {
        Frame {
            name: "test".to_string(),
            fields: names
                .iter()
                .map(|(name, cell)| {
                    Field::new((*name).to_string(), vec![(*cell).to_string()])
                })
                .collect(),
        }
    }

    #[test]
    fn empty_matcher_selects_numeric_fields_only() {
        let frame = frame_with(&[("latency", "1.5"), ("host", "web-1")]);
        let matcher = FieldMatcher::parse("");
        assert!(matcher.matches(&frame.fields[0]));
        assert!(!matcher.matches(&frame.fields[1]));
    }

    #[test]
    fn wildcard_matcher_selects_everything() {
        let frame = frame_with(&[("latency", "1.5"), ("host", "web-1")]);
        let matcher = FieldMatcher::parse("/.*/");
        assert!(frame.fields.iter().all(|field| matcher.matches(field)));
    }

    #[test]
    fn anchored_pattern_round_trips_special_names() {
        let frame = frame_with(&[("p99 (ms)", "2.0")]);
        let options = field_matcher_options(std::slice::from_ref(&frame));
        assert_eq!(options[2].value, r"/^p99 \(ms\)$/");
        let matcher = FieldMatcher::parse(&options[2].value);
        assert_eq!(matcher, FieldMatcher::ByName("p99 (ms)".to_string()));
        assert!(matcher.matches(&frame.fields[0]));
    }

    #[test]
    fn bare_name_matches_exactly() {
        let frame = frame_with(&[("latency", "1.5")]);
        let matcher = FieldMatcher::parse("latency");
        assert!(matcher.matches(&frame.fields[0]));
        assert!(!FieldMatcher::parse("late").matches(&frame.fields[0]));
    }

    #[test]
    fn auto_orientation_stacks_large_sets() {
        assert_eq!(Orientation::Auto.resolve(3), Orientation::Horizontal);
        assert_eq!(Orientation::Auto.resolve(9), Orientation::Vertical);
        assert_eq!(Orientation::Vertical.resolve(1), Orientation::Vertical);
    }
}

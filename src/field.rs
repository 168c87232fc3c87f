use chrono::NaiveDate;
use serde::Serialize;

/// Column type, sniffed from the raw cells when the frame is loaded.
///
/// Only `Number` fields are eligible for custom prefix rewriting; the other
/// types pass through the formatter untouched.
#[derive(Debug, Serialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Time,
    Boolean,
    String,
}

impl FieldType {
    /// Sniff the type of a column from its raw cells. Empty cells are
    /// ignored; an all-empty column falls back to `String`.
    pub fn sniff<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen_any = false;
        let mut all_number = true;
        let mut all_time = true;
        let mut all_boolean = true;

        for cell in cells {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            seen_any = true;
            if all_number && cell.parse::<f64>().is_err() {
                all_number = false;
            }
            if all_time && !parses_as_time(cell) {
                all_time = false;
            }
            if all_boolean && !matches!(cell, "true" | "false") {
                all_boolean = false;
            }
            if !all_number && !all_time && !all_boolean {
                return Self::String;
            }
        }

        if !seen_any {
            return Self::String;
        }
        if all_number {
            Self::Number
        } else if all_time {
            Self::Time
        } else if all_boolean {
            Self::Boolean
        } else {
            Self::String
        }
    }
}

fn parses_as_time(cell: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(cell).is_ok()
        || NaiveDate::parse_from_str(cell, "%Y-%m-%d").is_ok()
}

/// A named column of raw cells plus its sniffed type.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub values: Vec<String>,
}

impl Field {
    pub fn new(name: String, values: Vec<String>) -> Self {
        let field_type = FieldType::sniff(values.iter().map(String::as_str));
        Self {
            name,
            field_type,
            values,
        }
    }

    /// Each cell parsed as a number; empty and unparseable cells are `None`.
    pub fn numeric_values(&self) -> Vec<Option<f64>> {
        self.values
            .iter()
            .map(|cell| {
                let cell = cell.trim();
                if cell.is_empty() {
                    return None;
                }
                cell.parse::<f64>().ok().filter(|value| value.is_finite())
            })
            .collect()
    }
}

/// A named collection of equal-length fields.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Frame {
    pub fn row_count(&self) -> usize {
        self.fields.first().map_or(0, |field| field.values.len())
    }
}

/// The rendering-ready representation of a single value. `prefix` is the
/// only attribute the prefix formatter rewrites.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DisplayValue {
    pub title: Option<String>,
    pub text: String,
    pub numeric: Option<f64>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

/// A display value tagged with the type of the field it came from.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldValue {
    pub field_type: FieldType,
    pub display: DisplayValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_numeric_column() {
        let field_type = FieldType::sniff(["1.5", "-2", "", "3e4"]);
        assert_eq!(field_type, FieldType::Number);
    }

    #[test]
    fn sniffs_time_column() {
        let field_type = FieldType::sniff(["2024-01-02", "2024-02-03T10:00:00Z"]);
        assert_eq!(field_type, FieldType::Time);
    }

    #[test]
    fn sniffs_boolean_column() {
        assert_eq!(FieldType::sniff(["true", "false", ""]), FieldType::Boolean);
    }

    #[test]
    fn mixed_column_is_string() {
        assert_eq!(FieldType::sniff(["1.5", "abc"]), FieldType::String);
        assert_eq!(FieldType::sniff(["", ""]), FieldType::String);
    }

    #[test]
    fn numeric_values_skip_blank_and_bad_cells() {
        let field = Field::new(
            "latency".to_string(),
            vec![
                "1.5".to_string(),
                String::new(),
                "oops".to_string(),
                "2".to_string(),
            ],
        );
        assert_eq!(
            field.numeric_values(),
            vec![Some(1.5), None, None, Some(2.0)]
        );
    }
}

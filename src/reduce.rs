use crate::field::{DisplayValue, Field, FieldType, FieldValue, Frame};
use crate::formatting::format_value;
use crate::options::FieldMatcher;
use clap::ValueEnum;
use serde::Serialize;

pub const DEFAULT_VALUE_LIMIT: usize = 25;
pub const MAX_VALUE_LIMIT: usize = 5000;

/// A reducer function collapsing a column of values into one number.
#[derive(Debug, ValueEnum, Serialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ReducerId {
    Sum,
    Mean,
    Min,
    Max,
    Count,
    First,
    Last,
    LastNotNull,
}

impl ReducerId {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sum => "Sum",
            Self::Mean => "Mean",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Count => "Count",
            Self::First => "First",
            Self::Last => "Last",
            Self::LastNotNull => "Last (not null)",
        }
    }
}

/// How non-numeric cells of a numeric column are treated during reduction.
#[derive(Debug, ValueEnum, Copy, Clone, Eq, PartialEq, Default)]
pub enum ReduceMode {
    /// Drop missing/unparseable cells.
    #[default]
    Drop,
    /// Replace them with a fixed value.
    Replace,
}

#[derive(Debug, Clone)]
pub struct ReduceSettings {
    pub mode: ReduceMode,
    pub replace_with: f64,
}

impl Default for ReduceSettings {
    fn default() -> Self {
        Self {
            mode: ReduceMode::Drop,
            replace_with: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReduceOptions {
    /// Show each row instead of calculating a single value per field.
    pub all_values: bool,
    /// Max rows to show in all-values mode; clamped to 1..=5000.
    pub limit: Option<usize>,
    pub calcs: Vec<ReducerId>,
    pub fields: FieldMatcher,
    pub settings: ReduceSettings,
    pub decimals: Option<usize>,
    /// Unit text copied into each display before any custom stat prefix.
    pub value_prefix: Option<String>,
    pub value_suffix: Option<String>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            all_values: false,
            limit: None,
            calcs: vec![ReducerId::LastNotNull],
            fields: FieldMatcher::default(),
            settings: ReduceSettings::default(),
            decimals: None,
            value_prefix: None,
            value_suffix: None,
        }
    }
}

impl ReduceOptions {
    pub fn effective_limit(&self) -> usize {
        // A zero limit means "unset", not "show one row".
        self.limit
            .filter(|&limit| limit > 0)
            .unwrap_or(DEFAULT_VALUE_LIMIT)
            .clamp(1, MAX_VALUE_LIMIT)
    }
}

/// Reduce a numeric column to a single value. Returns `None` for an empty
/// column or when the reducer has nothing to work with.
pub fn reduce(values: &[Option<f64>], reducer: ReducerId, settings: &ReduceSettings) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    if reducer == ReducerId::LastNotNull {
        return match settings.mode {
            ReduceMode::Drop => values.iter().rev().find_map(|value| *value),
            ReduceMode::Replace => values
                .last()
                .copied()
                .map(|value| value.unwrap_or(settings.replace_with)),
        };
    }

    let resolved: Vec<f64> = match settings.mode {
        ReduceMode::Drop => values.iter().filter_map(|value| *value).collect(),
        ReduceMode::Replace => values
            .iter()
            .map(|value| value.unwrap_or(settings.replace_with))
            .collect(),
    };

    match reducer {
        ReducerId::Count => Some(to_f64(resolved.len())),
        _ if resolved.is_empty() => None,
        ReducerId::Sum => Some(resolved.iter().sum()),
        ReducerId::Mean => Some(resolved.iter().sum::<f64>() / to_f64(resolved.len())),
        ReducerId::Min => resolved.iter().copied().reduce(f64::min),
        ReducerId::Max => resolved.iter().copied().reduce(f64::max),
        ReducerId::First => resolved.first().copied(),
        ReducerId::Last => resolved.last().copied(),
        // Handled by the early return above.
        ReducerId::LastNotNull => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(count: usize) -> f64 {
    count as f64
}

/// Produce the display values for every matched field across the frames:
/// one record per calc, or one per row (up to the limit) in all-values
/// mode.
pub fn calculate_field_displays(frames: &[Frame], options: &ReduceOptions) -> Vec<FieldValue> {
    let mut displays = Vec::new();
    for frame in frames {
        for field in &frame.fields {
            if !options.fields.matches(field) {
                continue;
            }
            if options.all_values {
                collect_row_displays(field, options, &mut displays);
            } else {
                collect_calc_displays(field, options, &mut displays);
            }
        }
    }
    displays
}

fn collect_calc_displays(field: &Field, options: &ReduceOptions, displays: &mut Vec<FieldValue>) {
    let numeric_values = field.numeric_values();
    for &calc in &options.calcs {
        let Some(display) = display_for_calc(field, &numeric_values, calc, options) else {
            continue;
        };
        displays.push(display);
    }
}

fn display_for_calc(
    field: &Field,
    numeric_values: &[Option<f64>],
    calc: ReducerId,
    options: &ReduceOptions,
) -> Option<FieldValue> {
    let title = if options.calcs.len() > 1 {
        format!("{} ({})", field.name, calc.label())
    } else {
        field.name.clone()
    };

    if field.field_type == FieldType::Number {
        let numeric = reduce(numeric_values, calc, &options.settings);
        return Some(make_field_value(
            field.field_type,
            title,
            format_value(numeric, options.decimals),
            numeric,
            options,
        ));
    }

    // Non-numeric fields only support the order/count reducers.
    let present: Vec<&str> = field
        .values
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect();
    let (text, numeric) = match calc {
        ReducerId::Count => {
            let count = to_f64(present.len());
            (format_value(Some(count), Some(0)), Some(count))
        }
        ReducerId::First => ((*present.first()?).to_string(), None),
        ReducerId::Last | ReducerId::LastNotNull => ((*present.last()?).to_string(), None),
        _ => return None,
    };
    Some(make_field_value(field.field_type, title, text, numeric, options))
}

fn collect_row_displays(field: &Field, options: &ReduceOptions, displays: &mut Vec<FieldValue>) {
    let numeric_values = field.numeric_values();
    let limit = options.effective_limit();
    for (row, cell) in field.values.iter().take(limit).enumerate() {
        let (text, numeric) = if field.field_type == FieldType::Number {
            let numeric = numeric_values.get(row).copied().flatten();
            (format_value(numeric, options.decimals), numeric)
        } else {
            (cell.trim().to_string(), None)
        };
        displays.push(make_field_value(
            field.field_type,
            field.name.clone(),
            text,
            numeric,
            options,
        ));
    }
}

fn make_field_value(
    field_type: FieldType,
    title: String,
    text: String,
    numeric: Option<f64>,
    options: &ReduceOptions,
) -> FieldValue {
    FieldValue {
        field_type,
        display: DisplayValue {
            title: Some(title),
            text,
            numeric,
            prefix: options.value_prefix.clone(),
            suffix: options.value_suffix.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(mode: ReduceMode, replace_with: f64) -> ReduceSettings {
        ReduceSettings { mode, replace_with }
    }

    #[test]
    fn reducers_over_plain_column() {
        let values = vec![Some(1.0), Some(4.0), Some(2.0)];
        let drop = ReduceSettings::default();
        assert_eq!(reduce(&values, ReducerId::Sum, &drop), Some(7.0));
        assert_eq!(reduce(&values, ReducerId::Mean, &drop), Some(7.0 / 3.0));
        assert_eq!(reduce(&values, ReducerId::Min, &drop), Some(1.0));
        assert_eq!(reduce(&values, ReducerId::Max, &drop), Some(4.0));
        assert_eq!(reduce(&values, ReducerId::Count, &drop), Some(3.0));
        assert_eq!(reduce(&values, ReducerId::First, &drop), Some(1.0));
        assert_eq!(reduce(&values, ReducerId::Last, &drop), Some(2.0));
    }

    #[test]
    fn drop_mode_skips_missing_cells() {
        let values = vec![None, Some(3.0), None];
        let drop = ReduceSettings::default();
        assert_eq!(reduce(&values, ReducerId::Count, &drop), Some(1.0));
        assert_eq!(reduce(&values, ReducerId::Last, &drop), Some(3.0));
        assert_eq!(reduce(&values, ReducerId::LastNotNull, &drop), Some(3.0));
    }

    #[test]
    fn replace_mode_substitutes_missing_cells() {
        let values = vec![None, Some(3.0), None];
        let replace = settings(ReduceMode::Replace, 10.0);
        assert_eq!(reduce(&values, ReducerId::Sum, &replace), Some(23.0));
        assert_eq!(reduce(&values, ReducerId::Count, &replace), Some(3.0));
        assert_eq!(reduce(&values, ReducerId::Last, &replace), Some(10.0));
    }

    #[test]
    fn last_not_null_skips_trailing_missing() {
        let values = vec![Some(1.0), Some(2.0), None, None];
        let drop = ReduceSettings::default();
        assert_eq!(reduce(&values, ReducerId::LastNotNull, &drop), Some(2.0));
        assert_eq!(reduce(&values, ReducerId::Last, &drop), Some(2.0));
        assert_eq!(
            reduce(&[None, None], ReducerId::LastNotNull, &drop),
            None
        );
    }

    #[test]
    fn empty_column_reduces_to_nothing() {
        let drop = ReduceSettings::default();
        assert_eq!(reduce(&[], ReducerId::Sum, &drop), None);
        assert_eq!(reduce(&[], ReducerId::Count, &drop), None);
    }

    #[test]
    fn limit_is_clamped() {
        let mut options = ReduceOptions::default();
        assert_eq!(options.effective_limit(), DEFAULT_VALUE_LIMIT);
        options.limit = Some(3);
        assert_eq!(options.effective_limit(), 3);
        options.limit = Some(9999);
        assert_eq!(options.effective_limit(), MAX_VALUE_LIMIT);
    }

    #[test]
    fn zero_limit_falls_back_to_default() {
        let options = ReduceOptions {
            limit: Some(0),
            ..ReduceOptions::default()
        };
        assert_eq!(options.effective_limit(), DEFAULT_VALUE_LIMIT);
    }

    fn sample_frame() -> Frame {
        Frame {
            name: "metrics".to_string(),
            fields: vec![
                Field::new(
                    "latency".to_string(),
                    vec!["1.5".to_string(), "2.5".to_string(), String::new()],
                ),
                Field::new(
                    "host".to_string(),
                    vec!["web-1".to_string(), "web-2".to_string(), "web-3".to_string()],
                ),
            ],
        }
    }

    #[test]
    fn numeric_matcher_skips_string_fields() {
        let frames = [sample_frame()];
        let options = ReduceOptions::default();
        let displays = calculate_field_displays(&frames, &options);
        assert_eq!(displays.len(), 1);
        assert_eq!(displays[0].display.title.as_deref(), Some("latency"));
        assert_eq!(displays[0].display.numeric, Some(2.5));
    }

    #[test]
    fn multiple_calcs_get_labeled_titles() {
        let frames = [sample_frame()];
        let options = ReduceOptions {
            calcs: vec![ReducerId::Min, ReducerId::Max],
            ..ReduceOptions::default()
        };
        let displays = calculate_field_displays(&frames, &options);
        assert_eq!(displays.len(), 2);
        assert_eq!(displays[0].display.title.as_deref(), Some("latency (Min)"));
        assert_eq!(displays[1].display.title.as_deref(), Some("latency (Max)"));
    }

    #[test]
    fn string_fields_support_order_and_count_reducers() {
        let frames = [sample_frame()];
        let options = ReduceOptions {
            calcs: vec![ReducerId::Last, ReducerId::Count, ReducerId::Mean],
            fields: FieldMatcher::ByName("host".to_string()),
            ..ReduceOptions::default()
        };
        let displays = calculate_field_displays(&frames, &options);
        // Mean is skipped for a string field.
        assert_eq!(displays.len(), 2);
        assert_eq!(displays[0].display.text, "web-3");
        assert_eq!(displays[1].display.text, "3");
    }

    #[test]
    fn all_values_mode_honors_the_limit() {
        let frames = [sample_frame()];
        let options = ReduceOptions {
            all_values: true,
            limit: Some(2),
            fields: FieldMatcher::All,
            ..ReduceOptions::default()
        };
        let displays = calculate_field_displays(&frames, &options);
        assert_eq!(displays.len(), 4);
        assert_eq!(displays[0].display.text, "1.50");
        assert_eq!(displays[2].display.text, "web-1");
    }

    #[test]
    fn unit_text_lands_in_prefix_and_suffix() {
        let frames = [sample_frame()];
        let options = ReduceOptions {
            value_prefix: Some("avg ".to_string()),
            value_suffix: Some(" ms".to_string()),
            ..ReduceOptions::default()
        };
        let displays = calculate_field_displays(&frames, &options);
        assert_eq!(displays[0].display.prefix.as_deref(), Some("avg "));
        assert_eq!(displays[0].display.suffix.as_deref(), Some(" ms"));
    }
}

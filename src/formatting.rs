use crate::field::DisplayValue;

/// The final on-screen text for a display value: prefix, body, suffix.
pub fn compose_text(display: &DisplayValue) -> String {
    format!(
        "{}{}{}",
        display.prefix.as_deref().unwrap_or(""),
        display.text,
        display.suffix.as_deref().unwrap_or("")
    )
}

/// Render a numeric result for display. Missing or non-finite values show
/// as "-"; `decimals = None` picks whole-number display for integral
/// values and two decimals otherwise.
pub fn format_value(value: Option<f64>, decimals: Option<usize>) -> String {
    match value {
        Some(v) if v.is_finite() => match decimals {
            Some(places) => format!("{v:.places$}"),
            None if v.fract().abs() < f64::EPSILON => format!("{v:.0}"),
            None => format!("{v:.2}"),
        },
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_non_finite_render_as_dash() {
        assert_eq!(format_value(None, None), "-");
        assert_eq!(format_value(Some(f64::NAN), Some(2)), "-");
        assert_eq!(format_value(Some(f64::INFINITY), None), "-");
    }

    #[test]
    fn auto_decimals_trim_integral_values() {
        assert_eq!(format_value(Some(42.0), None), "42");
        assert_eq!(format_value(Some(1.5), None), "1.50");
    }

    #[test]
    fn explicit_decimals_are_honored() {
        assert_eq!(format_value(Some(1.234), Some(2)), "1.23");
        assert_eq!(format_value(Some(2.0), Some(1)), "2.0");
    }

    #[test]
    fn composed_text_includes_prefix_and_suffix() {
        let display = DisplayValue {
            title: None,
            text: "42".to_string(),
            numeric: Some(42.0),
            prefix: Some("\u{2191}".to_string()),
            suffix: Some(" ms".to_string()),
        };
        assert_eq!(compose_text(&display), "\u{2191}42 ms");
    }
}

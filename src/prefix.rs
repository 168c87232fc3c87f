use crate::field::{FieldType, FieldValue};
use crate::options::SelectableValue;
use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// A custom stat prefix: a short glyph prepended to a displayed numeric
/// value to annotate its direction or category.
#[derive(Debug, Copy, Clone)]
pub struct PrefixEntry {
    pub key: &'static str,
    pub description: &'static str,
    pub symbol: &'static str,
}

// Ordered registry; the order is what a chooser presents and the order
// symbols are stripped in. "remove" carries the empty symbol on purpose.
const PREFIX_REGISTRY: &[PrefixEntry] = &[
    PrefixEntry {
        key: "remove",
        description: "Remove Custom Prefix",
        symbol: "",
    },
    PrefixEntry {
        key: "increase",
        description: "Increase (\u{2191})",
        symbol: "\u{2191}",
    },
    PrefixEntry {
        key: "decrease",
        description: "Decrease (\u{2193})",
        symbol: "\u{2193}",
    },
    PrefixEntry {
        key: "lessThan",
        description: "Less than (<)",
        symbol: "<",
    },
    PrefixEntry {
        key: "greaterThan",
        description: "Greater than (>)",
        symbol: ">",
    },
    PrefixEntry {
        key: "approximately",
        description: "Approximately (~)",
        symbol: "~",
    },
    PrefixEntry {
        key: "fiscalQuarter",
        description: "Fiscal quarter (FQ)",
        symbol: "FQ",
    },
    PrefixEntry {
        key: "quarter",
        description: "Quarter (Qtr)",
        symbol: "Qtr",
    },
    PrefixEntry {
        key: "fiscalYear",
        description: "Fiscal year (FY)",
        symbol: "FY",
    },
    PrefixEntry {
        key: "delta",
        description: "Delta (\u{0394})",
        symbol: "\u{0394}",
    },
    PrefixEntry {
        key: "mean",
        description: "Mean (\u{00B5})",
        symbol: "\u{00B5}",
    },
];

fn registry_index() -> &'static FxHashMap<&'static str, &'static PrefixEntry> {
    static INDEX: OnceLock<FxHashMap<&'static str, &'static PrefixEntry>> = OnceLock::new();
    INDEX.get_or_init(|| {
        PREFIX_REGISTRY
            .iter()
            .map(|entry| (entry.key, entry))
            .collect()
    })
}

/// The symbol for a prefix key. An unknown key resolves to the empty
/// symbol, making it behave exactly like "remove" rather than an error.
pub fn symbol_for(prefix_key: &str) -> &'static str {
    registry_index()
        .get(prefix_key)
        .map_or("", |entry| entry.symbol)
}

pub fn is_known_key(prefix_key: &str) -> bool {
    registry_index().contains_key(prefix_key)
}

/// Ordered (key, description) pairs for populating a prefix chooser.
pub fn selectable_prefix_values() -> Vec<SelectableValue> {
    PREFIX_REGISTRY
        .iter()
        .map(|entry| SelectableValue {
            value: entry.key.to_string(),
            label: entry.description.to_string(),
        })
        .collect()
}

/// Remove every occurrence of every registry symbol from `text`.
///
/// Symbols are treated as literal substrings, never as patterns, so a
/// future symbol containing a regex metacharacter cannot misbehave here.
/// Text that is not a registry symbol survives untouched.
pub fn strip_known_symbols(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut stripped = text.to_string();
    for entry in PREFIX_REGISTRY {
        if entry.symbol.is_empty() {
            continue;
        }
        if stripped.contains(entry.symbol) {
            stripped = stripped.replace(entry.symbol, "");
        }
    }
    stripped
}

/// Rewrite the display prefix of every numeric record so it carries exactly
/// the chosen annotation, stripping any registry symbol applied earlier.
///
/// Pure over its inputs: the output has the same length and order, records
/// of non-numeric fields are copied through value-identical, and repeated
/// application with the same key is idempotent. Choosing "remove" (or any
/// unrecognized key) strips all known symbols and adds nothing.
pub fn apply_prefix(field_values: &[FieldValue], prefix_key: &str) -> Vec<FieldValue> {
    let chosen = symbol_for(prefix_key);

    field_values
        .iter()
        .map(|field_value| {
            if field_value.field_type != FieldType::Number {
                return field_value.clone();
            }
            let previous = field_value.display.prefix.as_deref().unwrap_or("");
            let updated = format!("{chosen}{}", strip_known_symbols(previous));
            let mut rewritten = field_value.clone();
            rewritten.display.prefix = Some(updated);
            rewritten
        })
        .collect()
}

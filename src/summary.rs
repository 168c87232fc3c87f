use crate::field::{FieldType, FieldValue};
use crate::formatting::compose_text;
use crate::options::Orientation;
use chrono::{DateTime, Local};
use colored::Colorize;
use std::path::Path;

const COMPACT_VALUE_LIMIT: usize = 10;

pub struct SummaryPaths<'a> {
    pub csv: Option<&'a Path>,
    pub json: Option<&'a Path>,
    pub html: Option<&'a Path>,
}

pub struct SummaryContext<'a> {
    pub frame_count: usize,
    pub field_count: usize,
    pub row_count: usize,
    pub run_started_at: &'a DateTime<Local>,
    pub paths: SummaryPaths<'a>,
    pub field_values: &'a [FieldValue],
    pub orientation: Orientation,
    pub full_output: bool,
}

pub fn print_summary(context: &SummaryContext<'_>) {
    println!();
    print_summary_header(context);
    print_summary_paths(&context.paths);
    println!();
    println!("{}", "Stat Values".bold().bright_magenta());
    let table_width = print_value_table(context);
    if table_width > 0 {
        let divider = "=".repeat(table_width);
        println!("{}", divider.bright_cyan());
    }
}

fn print_summary_header(context: &SummaryContext<'_>) {
    println!(
        "{}",
        "====================== FieldStat Summary ======================"
            .bold()
            .bright_cyan()
    );
    println!(
        "{} {}",
        "Run started".bright_yellow().bold(),
        context
            .run_started_at
            .format("%Y-%m-%d %H:%M:%S %Z")
            .to_string()
            .bright_white()
    );
    println!(
        "{} {} | {} | {}",
        "Input".bright_yellow().bold(),
        format!("Frames: {}", context.frame_count).bright_white(),
        format!("Fields: {}", context.field_count).bright_white(),
        format!("Rows: {}", context.row_count).bright_white()
    );
}

fn print_summary_paths(paths: &SummaryPaths<'_>) {
    print_path_line("Values CSV", paths.csv, "not saved (use --save-csv)");
    print_path_line("Values JSON", paths.json, "not saved (use --save-json)");
    print_path_line("HTML Report", paths.html, "not saved (use --save-html)");
}

fn print_path_line(label: &str, path: Option<&Path>, hint: &str) {
    let label_colored = label.bright_yellow().bold();
    match path {
        Some(path) => println!(
            "{} {}",
            label_colored,
            format!("{}", path.display()).bright_white()
        ),
        None => println!("{} {}", label_colored, hint.bright_black()),
    }
}

fn print_value_table(context: &SummaryContext<'_>) -> usize {
    if context.field_values.is_empty() {
        let message = "No values matched the field selection.";
        println!("{}", message.bright_black());
        return message.len();
    }

    let shown = if context.full_output {
        context.field_values.len()
    } else {
        context.field_values.len().min(COMPACT_VALUE_LIMIT)
    };

    let width = match context.orientation.resolve(shown) {
        Orientation::Horizontal => print_horizontal_values(context, shown),
        _ => print_vertical_values(context, shown),
    };

    let hidden = context.field_values.len() - shown;
    if hidden > 0 {
        let message = format!("... {hidden} more entries (use --full-output to display all).");
        println!("{}", message.bright_black());
        return width.max(message.len());
    }
    width
}

fn print_horizontal_values(context: &SummaryContext<'_>, shown: usize) -> usize {
    let rendered: Vec<String> = context
        .field_values
        .iter()
        .take(shown)
        .map(|value| {
            format!(
                "{}: {}",
                value.display.title.as_deref().unwrap_or("(value)"),
                compose_text(&value.display)
            )
        })
        .collect();
    let line = rendered.join("  |  ");
    println!("{}", line.bright_green());
    line.len()
}

fn print_vertical_values(context: &SummaryContext<'_>, shown: usize) -> usize {
    let title_width = context
        .field_values
        .iter()
        .take(shown)
        .map(|value| value.display.title.as_deref().unwrap_or("(value)").len())
        .max()
        .unwrap_or(0)
        .max("Field".len());

    let header = format!("{:<title_width$} | {:<8} | Value", "Field", "Type");
    let separator = format!("{}-+-{}-+------", "-".repeat(title_width), "-".repeat(8));
    let mut max_width = header.len().max(separator.len());
    println!("{}", header.bold().bright_white());
    println!("{}", separator.bright_black());

    for value in context.field_values.iter().take(shown) {
        let line = format!(
            "{:<title_width$} | {:<8} | {}",
            value.display.title.as_deref().unwrap_or("(value)"),
            type_label(value.field_type),
            compose_text(&value.display)
        );
        max_width = max_width.max(line.len());
        println!("{}", line.bright_green());
    }
    max_width
}

pub const fn type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Number => "number",
        FieldType::Time => "time",
        FieldType::Boolean => "boolean",
        FieldType::String => "string",
    }
}

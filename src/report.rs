use crate::field::FieldValue;
use crate::formatting::compose_text;
use crate::summary::type_label;
use crate::write_output_file;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::Path;

pub struct HtmlReportPaths<'a> {
    pub csv: Option<&'a Path>,
    pub json: Option<&'a Path>,
}

pub struct HtmlReportContext<'a> {
    pub frame_count: usize,
    pub field_count: usize,
    pub row_count: usize,
    pub run_started_at: &'a DateTime<Local>,
    pub field_values: &'a [FieldValue],
    pub full_output: bool,
    pub paths: HtmlReportPaths<'a>,
    pub output_path: &'a Path,
}

const COMPACT_ROW_LIMIT: usize = 10;

pub async fn save_html_report(output_path: &Path, context: &HtmlReportContext<'_>) -> Result<()> {
    let html = render_html_report(context);
    write_output_file(output_path, html.as_bytes()).await
}

fn render_html_report(context: &HtmlReportContext<'_>) -> String {
    let generated_at = context
        .run_started_at
        .format("%Y-%m-%d %H:%M:%S %Z")
        .to_string();
    let total = context.field_values.len();
    let shown = if context.full_output {
        total
    } else {
        total.min(COMPACT_ROW_LIMIT)
    };
    let coverage = if context.full_output {
        format!("Showing all {total} values")
    } else {
        format!("Showing top {shown} of {total} values")
    };
    let hint = if context.full_output {
        String::new()
    } else {
        "Run with --full-output to include the full table.".to_string()
    };
    let title = format!(
        "FieldStat Report - {}",
        context.run_started_at.format("%Y-%m-%d")
    );

    let mut html = String::new();
    html.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("<meta name=\"color-scheme\" content=\"light\">\n");
    html.push_str("<style>\n");
    html.push_str(REPORT_STYLE);
    html.push_str("\n</style>\n</head>\n<body>\n");
    html.push_str("<div class=\"page\">\n");
    html.push_str("<header class=\"hero\">\n");
    html.push_str(&format!(
        "<div class=\"pill\">FieldStat v{}</div>\n",
        env!("CARGO_PKG_VERSION")
    ));
    html.push_str("<h1>FieldStat Report</h1>\n");
    html.push_str(
        "<p class=\"subtitle\">Reduced field values with custom stat annotations.</p>\n",
    );
    html.push_str("<div class=\"meta\">\n");
    html.push_str(&format!(
        "<div><span class=\"label\">Generated</span><span class=\"value mono\">{}</span></div>\n",
        escape_html(&generated_at)
    ));
    html.push_str(&format!(
        "<div><span class=\"label\">Coverage</span><span class=\"value mono\">{}</span></div>\n",
        escape_html(&coverage)
    ));
    html.push_str("</div>\n</header>\n");

    html.push_str("<section class=\"cards\">\n");
    for (label, count) in [
        ("Frames", context.frame_count),
        ("Fields", context.field_count),
        ("Rows", context.row_count),
        ("Values", total),
    ] {
        html.push_str(&format!(
            "<div class=\"card\"><div class=\"card-label\">{label}</div><div class=\"card-value\">{count}</div></div>\n"
        ));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"table-section\">\n");
    html.push_str("<h2>Stat Values</h2>\n");
    if !hint.is_empty() {
        html.push_str(&format!(
            "<div class=\"hint\">{}</div>\n",
            escape_html(&hint)
        ));
    }
    html.push_str("<div class=\"table-wrap\">\n<table>\n");
    html.push_str("<thead><tr><th>Field</th><th>Type</th><th>Value</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&render_value_rows(context.field_values, shown));
    html.push_str("</tbody>\n</table>\n</div>\n</section>\n");

    html.push_str(&render_downloads(context));

    html.push_str("<footer class=\"footer\">\n");
    html.push_str("<div>Generated by fieldstat.</div>\n");
    html.push_str("</footer>\n");
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

fn render_value_rows(field_values: &[FieldValue], limit: usize) -> String {
    let mut rows = String::new();
    for value in field_values.iter().take(limit) {
        rows.push_str("<tr>");
        rows.push_str(&format!(
            "<td class=\"field\">{}</td>",
            escape_html(value.display.title.as_deref().unwrap_or("(value)"))
        ));
        rows.push_str(&format!(
            "<td class=\"type\">{}</td>",
            type_label(value.field_type)
        ));
        rows.push_str(&format!(
            "<td class=\"num\">{}</td>",
            escape_html(&compose_text(&value.display))
        ));
        rows.push_str("</tr>\n");
    }
    rows
}

fn render_downloads(context: &HtmlReportContext<'_>) -> String {
    let items = [
        ("Values CSV", context.paths.csv),
        ("Values JSON", context.paths.json),
    ];
    let any_saved = items.iter().any(|(_, path)| path.is_some());

    let mut section = String::new();
    section.push_str("<section class=\"downloads\">\n");
    section.push_str("<h3>Downloads</h3>\n");
    if !any_saved {
        section.push_str(
            "<p class=\"muted\">No data files were saved. Use --save-csv or --save-json.</p>\n",
        );
        section.push_str("</section>\n");
        return section;
    }

    section.push_str("<div class=\"download-list\">\n");
    for (label, path) in items {
        section.push_str("<div class=\"download-item\">\n");
        section.push_str(&format!(
            "<div class=\"download-label\">{}</div>\n",
            escape_html(label)
        ));
        if let Some(path) = path {
            let full_display = path.to_string_lossy();
            let display_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(full_display.as_ref());
            if let Some(rel) = relative_link(context.output_path, path) {
                section.push_str(&format!(
                    "<a class=\"download-link\" href=\"{}\" title=\"{}\">{}</a>\n",
                    escape_html(&rel),
                    escape_html(full_display.as_ref()),
                    escape_html(display_name)
                ));
            } else {
                section.push_str(&format!(
                    "<span class=\"download-path\" title=\"{}\">{}</span>\n",
                    escape_html(full_display.as_ref()),
                    escape_html(display_name)
                ));
            }
        } else {
            section.push_str("<span class=\"download-path\">Not saved</span>\n");
        }
        section.push_str("</div>\n");
    }
    section.push_str("</div>\n</section>\n");
    section
}

fn relative_link(html_path: &Path, target: &Path) -> Option<String> {
    let html_dir = html_path.parent()?;
    let target_dir = target.parent()?;
    if html_dir == target_dir {
        target
            .file_name()
            .and_then(|name| name.to_str())
            .map(std::string::ToString::to_string)
    } else {
        None
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const REPORT_STYLE: &str = r"
:root {
  color-scheme: light;
  --bg: #f4f6f8;
  --ink: #16212b;
  --muted: #5f6b76;
  --card: #ffffff;
  --accent: #2f6feb;
  --border: #d6dee6;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  font-family: 'Segoe UI', 'Helvetica Neue', sans-serif;
  color: var(--ink);
  background: var(--bg);
}

.page { max-width: 960px; margin: 0 auto; padding: 40px 20px 56px; }

.hero {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 16px;
  padding: 28px 32px;
}

.pill {
  display: inline-flex;
  padding: 4px 12px;
  border-radius: 999px;
  background: rgba(47, 111, 235, 0.12);
  color: var(--accent);
  font-size: 12px;
  font-weight: 600;
  text-transform: uppercase;
  letter-spacing: 0.08em;
}

h1 { margin: 14px 0 6px; font-size: 2rem; }

.subtitle { margin: 0 0 14px; color: var(--muted); }

.meta { display: flex; gap: 28px; flex-wrap: wrap; }

.label {
  display: block;
  font-size: 11px;
  text-transform: uppercase;
  letter-spacing: 0.1em;
  color: var(--muted);
  margin-bottom: 3px;
}

.value { font-weight: 600; }

.mono { font-family: ui-monospace, 'SFMono-Regular', monospace; }

.cards {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
  gap: 14px;
  margin: 22px 0;
}

.card {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 12px;
  padding: 14px 18px;
}

.card-label {
  font-size: 11px;
  text-transform: uppercase;
  letter-spacing: 0.1em;
  color: var(--muted);
  margin-bottom: 6px;
}

.card-value { font-size: 22px; font-weight: 600; color: var(--accent); }

.table-section { margin: 26px 0 20px; }

.table-section h2 { margin: 0 0 4px; font-size: 1.4rem; }

.hint { color: var(--muted); font-size: 13px; margin-bottom: 12px; }

.table-wrap {
  border: 1px solid var(--border);
  border-radius: 12px;
  overflow: auto;
  background: var(--card);
}

table { width: 100%; border-collapse: collapse; }

thead th {
  background: var(--accent);
  color: #f8fafc;
  text-align: left;
  font-size: 12px;
  text-transform: uppercase;
  letter-spacing: 0.06em;
  padding: 10px 14px;
}

tbody td {
  padding: 9px 14px;
  border-bottom: 1px solid var(--border);
  font-size: 14px;
}

tbody tr:nth-child(even) { background: rgba(214, 222, 230, 0.25); }

.field { font-weight: 600; }

.type { color: var(--muted); }

.num {
  text-align: right;
  font-variant-numeric: tabular-nums;
  font-family: ui-monospace, 'SFMono-Regular', monospace;
}

.downloads {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: 12px;
  padding: 16px 20px;
}

.downloads h3 { margin: 0 0 10px; font-size: 1.1rem; }

.download-list {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
  gap: 10px;
}

.download-item {
  padding: 10px 12px;
  border: 1px solid var(--border);
  border-radius: 10px;
}

.download-label {
  font-size: 11px;
  text-transform: uppercase;
  letter-spacing: 0.08em;
  color: var(--muted);
  margin-bottom: 4px;
}

.download-link,
.download-path {
  color: var(--accent);
  font-weight: 600;
  text-decoration: none;
  word-break: break-all;
}

.download-link:hover { text-decoration: underline; }

.muted { color: var(--muted); }

.footer { margin-top: 24px; color: var(--muted); font-size: 13px; text-align: center; }
";

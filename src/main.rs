use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use csv::Writer;
use fieldstat::cli::{Cli, handle_command, list_prefixes};
use fieldstat::field::{FieldType, FieldValue, Frame};
use fieldstat::formatting::compose_text;
use fieldstat::input::{load_frame, load_frame_from_stdin};
use fieldstat::options::{FieldMatcher, field_matcher_options};
use fieldstat::prefix::{apply_prefix, is_known_key};
use fieldstat::reduce::{ReduceOptions, ReduceSettings, ReducerId, calculate_field_displays};
use fieldstat::report::{HtmlReportContext, HtmlReportPaths, save_html_report};
use fieldstat::summary::{SummaryContext, SummaryPaths, print_summary};
use fieldstat::write_output_file;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    colored::control::set_override(true);

    let mut cli = Cli::parse();

    if let Some(command) = cli.command.take() {
        handle_command(command)?;
        return Ok(());
    }

    if cli.list_prefixes {
        list_prefixes();
        return Ok(());
    }

    let run_started_at = Local::now();

    let frames = load_frames(&cli.inputs).await?;
    if cli.list_fields {
        print_field_matchers(&frames);
        return Ok(());
    }

    let options = reduce_options_from_cli(&cli);
    let displays = calculate_field_displays(&frames, &options);

    let field_values = match cli.prefix.as_deref() {
        Some(key) => {
            if !is_known_key(key) {
                // Unknown keys deliberately fall back to "remove" behavior.
                eprintln!(
                    "{}",
                    format!("unknown prefix key '{key}'; stripping custom prefixes instead")
                        .bright_black()
                );
            }
            apply_prefix(&displays, key)
        }
        None => displays,
    };

    if let Some(path) = cli.save_csv.as_ref() {
        save_values_csv(&field_values, path.as_path()).await?;
    }
    if let Some(path) = cli.save_json.as_ref() {
        save_values_json(&field_values, path.as_path()).await?;
    }

    let frame_count = frames.len();
    let field_count = frames.iter().map(|frame| frame.fields.len()).sum();
    let row_count = frames.iter().map(Frame::row_count).sum();

    if let Some(path) = cli.save_html.as_ref() {
        let html_context = HtmlReportContext {
            frame_count,
            field_count,
            row_count,
            run_started_at: &run_started_at,
            field_values: &field_values,
            full_output: cli.full_output,
            paths: HtmlReportPaths {
                csv: cli.save_csv.as_deref(),
                json: cli.save_json.as_deref(),
            },
            output_path: path.as_path(),
        };
        save_html_report(path.as_path(), &html_context).await?;
    }

    print_summary(&SummaryContext {
        frame_count,
        field_count,
        row_count,
        run_started_at: &run_started_at,
        paths: SummaryPaths {
            csv: cli.save_csv.as_deref(),
            json: cli.save_json.as_deref(),
            html: cli.save_html.as_deref(),
        },
        field_values: &field_values,
        orientation: cli.orientation,
        full_output: cli.full_output,
    });

    Ok(())
}

async fn load_frames(inputs: &[PathBuf]) -> Result<Vec<Frame>> {
    if inputs.is_empty() {
        return Ok(vec![load_frame_from_stdin()?]);
    }
    let mut frames = Vec::with_capacity(inputs.len());
    for path in inputs {
        frames.push(load_frame(path).await?);
    }
    Ok(frames)
}

fn reduce_options_from_cli(cli: &Cli) -> ReduceOptions {
    let calcs = if cli.calc.is_empty() {
        vec![ReducerId::LastNotNull]
    } else {
        cli.calc.clone()
    };
    ReduceOptions {
        all_values: cli.all_values,
        limit: cli.limit,
        calcs,
        fields: FieldMatcher::parse(&cli.fields),
        settings: ReduceSettings {
            mode: cli.non_numeric,
            replace_with: cli.replace_value,
        },
        decimals: cli.decimals,
        value_prefix: cli.value_prefix.clone(),
        value_suffix: cli.value_suffix.clone(),
    }
}

fn print_field_matchers(frames: &[Frame]) {
    println!("{}", "Selectable field matchers".bold().bright_magenta());
    for selectable in field_matcher_options(frames) {
        let value = if selectable.value.is_empty() {
            "(empty)".to_string()
        } else {
            selectable.value
        };
        println!(
            "{:<24} {}",
            value.bright_yellow(),
            selectable.label.bright_white()
        );
    }
}

#[derive(Debug, Serialize)]
struct ValueRecord<'a> {
    field: &'a str,
    field_type: FieldType,
    numeric: Option<f64>,
    prefix: &'a str,
    text: String,
}

async fn save_values_csv(field_values: &[FieldValue], path: &Path) -> Result<()> {
    let mut writer = Writer::from_writer(Vec::new());
    for value in field_values {
        let record = ValueRecord {
            field: value.display.title.as_deref().unwrap_or(""),
            field_type: value.field_type,
            numeric: value.display.numeric,
            prefix: value.display.prefix.as_deref().unwrap_or(""),
            text: compose_text(&value.display),
        };
        writer
            .serialize(record)
            .context("failed to serialize value record")?;
    }
    let serialized = finalize_writer(writer, "value CSV writer")?;
    write_output_file(path, &serialized).await
}

async fn save_values_json(field_values: &[FieldValue], path: &Path) -> Result<()> {
    let serialized =
        serde_json::to_vec_pretty(field_values).context("failed to serialize values to JSON")?;
    write_output_file(path, &serialized).await
}

fn finalize_writer(mut writer: Writer<Vec<u8>>, label: &str) -> Result<Vec<u8>> {
    writer
        .flush()
        .with_context(|| format!("failed to flush {label}"))?;
    writer
        .into_inner()
        .with_context(|| format!("failed to finalize {label}"))
}

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate, generate_to};
use colored::Colorize;

use crate::options::Orientation;
use crate::prefix::selectable_prefix_values;
use crate::reduce::{ReduceMode, ReducerId};

pub const DEFAULT_CSV_PATH: &str = "data/output/values.csv";
pub const DEFAULT_JSON_PATH: &str = "data/output/values.json";
pub const DEFAULT_HTML_PATH: &str = "data/output/report.html";

pub const SAVE_CSV_HELP: &str = "Save the computed stat values to the given CSV file (defaults to data/output/values.csv when no path is provided).";
pub const SAVE_JSON_HELP: &str = "Save the computed stat values to the given JSON file (defaults to data/output/values.json when no path is provided).";
pub const SAVE_HTML_HELP: &str =
    "Save the HTML report to the given file (defaults to data/output/report.html when no path is provided).";
pub const FIELDS_HELP: &str = "Field matcher: empty selects numeric fields, /.*/ selects all fields, a field name (or /^name$/ pattern) selects one field. Use --list-fields to see the choices for an input.";
pub const PREFIX_HELP: &str = "Custom stat prefix key to apply to numeric values (e.g. increase, decrease, delta). Use --list-prefixes to see all keys. \"remove\" strips any previous annotation.";

#[derive(Debug, Parser)]
#[command(
    name = "fieldstat",
    about = "Reduce tabular data fields into stat values and annotate them with custom prefixes.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    #[arg(
        value_name = "FILE",
        help = "CSV files to load, one frame per file. Reads stdin when omitted."
    )]
    pub inputs: Vec<PathBuf>,
    #[arg(
        long,
        value_enum,
        value_name = "REDUCER",
        help = "Calculation per field; repeat for several (default: last-not-null)."
    )]
    pub calc: Vec<ReducerId>,
    #[arg(
        long,
        help = "Show each row instead of calculating a single value per field."
    )]
    pub all_values: bool,
    #[arg(
        long,
        value_name = "N",
        help = "Max rows to show with --all-values (default 25, capped at 5000)."
    )]
    pub limit: Option<usize>,
    #[arg(long, value_name = "MATCHER", default_value = "", help = FIELDS_HELP)]
    pub fields: String,
    #[arg(long, value_name = "KEY", help = PREFIX_HELP)]
    pub prefix: Option<String>,
    #[arg(
        long,
        value_enum,
        default_value = "auto",
        help = "Layout orientation for the value table."
    )]
    pub orientation: Orientation,
    #[arg(
        long,
        value_enum,
        default_value = "drop",
        help = "How non-numeric cells of a numeric field are reduced."
    )]
    pub non_numeric: ReduceMode,
    #[arg(
        long,
        value_name = "VALUE",
        default_value_t = 0.0,
        help = "Replacement for non-numeric cells when --non-numeric replace is set."
    )]
    pub replace_value: f64,
    #[arg(long, value_name = "N", help = "Decimal places for numeric display text.")]
    pub decimals: Option<usize>,
    #[arg(
        long,
        value_name = "TEXT",
        help = "Unit text prepended to every display value (kept when prefixes change)."
    )]
    pub value_prefix: Option<String>,
    #[arg(
        long,
        value_name = "TEXT",
        help = "Unit text appended to every display value."
    )]
    pub value_suffix: Option<String>,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CSV_PATH,
        help = SAVE_CSV_HELP
    )]
    pub save_csv: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_JSON_PATH,
        help = SAVE_JSON_HELP
    )]
    pub save_json: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        default_missing_value = DEFAULT_HTML_PATH,
        help = SAVE_HTML_HELP
    )]
    pub save_html: Option<PathBuf>,
    #[arg(
        long,
        help = "Print the complete value table instead of the abbreviated summary."
    )]
    pub full_output: bool,
    #[arg(
        long,
        help = "List the selectable field matchers for the loaded inputs and exit."
    )]
    pub list_fields: bool,
    #[arg(
        long,
        help = "List the available custom stat prefix keys and exit."
    )]
    pub list_prefixes: bool,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate shell completion scripts, optionally installing them for the current user.
    Completions {
        #[arg(value_enum, help = "Shell to generate completions for.")]
        shell: Shell,
        #[arg(
            long,
            value_name = "DIR",
            help = "Directory to write the completion script to."
        )]
        output_dir: Option<PathBuf>,
        #[arg(
            long,
            help = "Install the completion script into the default location for the selected shell."
        )]
        install: bool,
    },
}

pub fn handle_command(command: Commands) -> Result<()> {
    match command {
        Commands::Completions {
            shell,
            output_dir,
            install,
        } => generate_completions(shell, output_dir, install),
    }
}

pub fn list_prefixes() {
    println!("{}", "Custom stat prefixes".bold().bright_magenta());
    for selectable in selectable_prefix_values() {
        println!(
            "{:<16} {}",
            selectable.value.bright_yellow(),
            selectable.label.bright_white()
        );
    }
}

fn generate_completions(shell: Shell, output_dir: Option<PathBuf>, install: bool) -> Result<()> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    let target_dir = if let Some(dir) = output_dir {
        Some(dir)
    } else if install {
        Some(default_install_dir(shell)?)
    } else {
        None
    };

    if let Some(dir) = target_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create completion directory {}", dir.display()))?;
        let path = generate_to(shell, &mut command, bin_name, &dir)
            .context("failed to write completion file")?;
        println!("Installed {shell:?} completions to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        generate(shell, &mut command, bin_name, &mut stdout);
        stdout
            .flush()
            .context("failed to flush completion output")?;
    }

    Ok(())
}

fn default_install_dir(shell: Shell) -> Result<PathBuf> {
    let home = std::env::var_os("HOME").ok_or_else(|| {
        anyhow!("HOME environment variable is not set; use --output-dir to specify a path")
    })?;
    let mut path = PathBuf::from(home);

    match shell {
        Shell::Bash => {
            path.push(".local/share/bash-completion/completions");
            Ok(path)
        }
        Shell::Elvish => {
            path.push(".elvish/lib/completions");
            Ok(path)
        }
        Shell::Fish => {
            path.push(".config/fish/completions");
            Ok(path)
        }
        Shell::PowerShell => {
            path.push(".local/share/powershell/Scripts");
            Ok(path)
        }
        Shell::Zsh => {
            path.push(".local/share/zsh/site-functions");
            Ok(path)
        }
        other => Err(anyhow!(
            "no default install location for {other:?}; specify --output-dir"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_prefixes_parses_as_flag() {
        let cli = Cli::try_parse_from(["fieldstat", "--list-prefixes"]).unwrap();
        assert!(cli.list_prefixes);
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["fieldstat"]).unwrap();
        assert!(!cli.list_prefixes);
    }
}

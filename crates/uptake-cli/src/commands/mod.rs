//! CLI command implementations.

pub mod buckets;
pub mod compare;
pub mod crosstab;
pub mod encode;
pub mod missing;
pub mod profile;
pub mod quality;
pub mod rates;
pub mod summary;
pub mod time;

use std::path::Path;

use colored::Colorize;
use tracing::debug;
use uptake::{AnalysisConfig, Analyzer, CategoryOrder, DataTable};

use crate::cli::{Cli, OrderChoice, OutputFormat};

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Settings shared by every command.
pub struct Context {
    pub analyzer: Analyzer,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl Context {
    /// Build the analyzer from `--config` plus flag overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match &cli.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(target) = &cli.target {
            config.target_column = target.clone();
        }
        if !cli.drop.is_empty() {
            config.parser.drop_columns = cli.drop.clone();
        }
        config.validate()?;
        debug!(
            target_column = %config.target_column,
            dropped = ?config.parser.drop_columns,
            "resolved configuration"
        );

        Ok(Self {
            analyzer: Analyzer::with_config(config),
            format: cli.format,
            verbose: cli.verbose,
        })
    }

    pub fn is_text(&self) -> bool {
        self.format == OutputFormat::Table
    }

    /// Load a data file, announcing it in text mode.
    pub fn load(&self, file: &Path) -> Result<DataTable, Box<dyn std::error::Error>> {
        if !file.exists() {
            return Err(format!("Data file not found: {}", file.display()).into());
        }
        let (table, source) = self.analyzer.load(file)?;

        if self.is_text() {
            println!(
                "{} {} ({} rows, {} columns)",
                "Loaded".cyan().bold(),
                source.file.white(),
                source.row_count,
                source.column_count
            );
            if self.verbose {
                println!("  sha256: {}", source.hash.dimmed());
                if !source.dropped_columns.is_empty() {
                    println!("  dropped: {}", source.dropped_columns.join(", ").dimmed());
                }
            }
        }
        Ok(table)
    }

    /// Canonical order for a choice, as configured.
    pub fn order(&self, choice: OrderChoice) -> CategoryOrder {
        let config = self.analyzer.config();
        let labels = match choice {
            OrderChoice::Time => &config.time.time_order,
            OrderChoice::Frequency => &config.profile.frequency_order,
            OrderChoice::Age => &config.profile.age_order,
        };
        CategoryOrder::new(labels.iter().cloned())
    }
}

/// Split a `NAME=VALUE` argument.
pub fn split_assignment<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value.trim())),
        _ => Err(format!("Invalid {} '{}': expected NAME=VALUE", flag, arg)),
    }
}

/// Split a comma-separated list, dropping empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

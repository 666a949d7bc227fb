//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use uptake::quality::DEFAULT_MISSING_THRESHOLD;

/// Uptake: acceptance-rate analytics for coupon offer data
#[derive(Parser)]
#[command(name = "uptake")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Accepted/declined column (overrides the configuration)
    #[arg(short, long, global = true, value_name = "COLUMN")]
    pub target: Option<String>,

    /// Columns to drop after loading, comma-separated
    #[arg(long, global = true, value_delimiter = ',', value_name = "COLUMNS")]
    pub drop: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report null rates, duplicates and missing required columns
    Quality {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Columns that must be present, comma-separated
        #[arg(long, value_delimiter = ',', value_name = "COLUMNS")]
        require: Vec<String>,

        /// Null percentage above which a column gets a warning
        #[arg(long, value_name = "PCT")]
        warn: Option<f64>,

        /// Null percentage above which a column gets an error
        #[arg(long, value_name = "PCT")]
        error: Option<f64>,
    },

    /// Show type, null counts and a sample value per column
    Summary {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Acceptance rates, overall or grouped
    Rates {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Columns to group by, comma-separated
        #[arg(short = 'b', long = "by", value_delimiter = ',', value_name = "COLUMNS")]
        group_by: Vec<String>,

        /// Canonical order for the first group column
        #[arg(long)]
        order: Option<OrderChoice>,

        /// Sort groups by acceptance rate, highest first
        #[arg(long, conflicts_with = "order")]
        sort_rate: bool,
    },

    /// Compare a segment against all other rows
    Compare {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Keep rows whose column has one of the values
        #[arg(long = "where", value_name = "COLUMN=V1,V2")]
        conditions: Vec<String>,

        /// Keep rows whose numeric column lies in the inclusive range
        #[arg(long, value_name = "COLUMN=MIN..MAX")]
        between: Vec<String>,
    },

    /// Remap a categorical column into coarser buckets
    Buckets {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column to bucketize
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Bucket definition, repeatable and applied in order
        /// (default: Low=never,less1 and High=1~3,4~8,gt8)
        #[arg(long = "bucket", value_name = "LABEL=V1,V2")]
        buckets: Vec<String>,
    },

    /// Acceptance by time of day and expiration
    Time {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Restrict to one coupon type
        #[arg(long, conflicts_with = "by_coupon")]
        coupon: Option<String>,

        /// Best and worst time for every coupon type
        #[arg(long)]
        by_coupon: bool,
    },

    /// Acceptance-rate matrix over two columns
    Crosstab {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column for the rows
        #[arg(value_name = "ROWS")]
        rows: String,

        /// Column for the columns
        #[arg(value_name = "COLUMNS")]
        columns: String,

        /// Canonical order for the row axis
        #[arg(long)]
        order: Option<OrderChoice>,

        /// Long format: one line per cell
        #[arg(long)]
        long: bool,
    },

    /// Encode categorical columns as frequency-ranked integers
    Encode {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the encoded table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report or treat missing values
    Missing {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Strategy: report, drop_columns, drop_rows or fill
        #[arg(short, long, default_value = "report")]
        strategy: String,

        /// Null fraction used by the drop strategies
        #[arg(long, default_value_t = DEFAULT_MISSING_THRESHOLD)]
        threshold: f64,

        /// Fill value for a column, repeatable
        #[arg(long = "fill", value_name = "COLUMN=VALUE")]
        fill: Vec<String>,

        /// Write the resulting table to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Headline metrics, or the profile of one coupon type
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Coupon type to profile
        #[arg(long)]
        coupon: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use table, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Canonical category orders known to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderChoice {
    /// 7AM, 10AM, 2PM, 6PM, 10PM
    Time,
    /// never, less1, 1~3, 4~8, gt8
    Frequency,
    /// below21, 21, ..., 50plus
    Age,
}

impl std::str::FromStr for OrderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time" => Ok(OrderChoice::Time),
            "frequency" | "freq" => Ok(OrderChoice::Frequency),
            "age" => Ok(OrderChoice::Age),
            _ => Err(format!("Unknown order: {}. Use time, frequency, or age.", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "uptake", "rates", "data.csv", "--by", "coupon,time", "-t", "accepted", "-f", "json",
        ])
        .unwrap();
        assert_eq!(cli.target.as_deref(), Some("accepted"));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Rates { group_by, .. } => assert_eq!(group_by, ["coupon", "time"]),
            _ => panic!("expected rates"),
        }
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("freq".parse::<OrderChoice>(), Ok(OrderChoice::Frequency));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}

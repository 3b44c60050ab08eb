//! CLI argument definitions for the pivot debugging front end.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "pivot",
    version,
    about = "Pivot clinical observation records into count tables",
    long_about = "Pivot clinical observation records into count tables.\n\n\
                  Reads a JSON array of records (or a CSV file with a header row),\n\
                  builds a row x column cross-tab or a demographic percentage table,\n\
                  and prints it as JSON or as a terminal table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration file (JSON): synonyms, sentinels, age ranges.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include record values (potential PHI) in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build a row x column count table from observation records.
    Table(TableArgs),

    /// Build indicator-by-age-range percentages from patient records.
    Demographic(DemographicArgs),

    /// List logical fields and the record keys they resolve from.
    Fields,
}

#[derive(Args)]
pub struct TableArgs {
    /// Input file: JSON array of objects, or CSV when the extension is `.csv`.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Logical field supplying row labels (e.g. segment, diagnosis).
    #[arg(long = "row", value_name = "FIELD")]
    pub row: String,

    /// Logical field supplying column labels (e.g. date).
    #[arg(long = "column", value_name = "FIELD", default_value = "date")]
    pub column: String,

    /// Keep only records whose event type equals this value.
    #[arg(long = "filter", value_name = "VALUE")]
    pub filter: Option<String>,

    /// Field compared by `--filter` (default: configured discriminator).
    #[arg(long = "filter-field", value_name = "FIELD", requires = "filter")]
    pub filter_field: Option<String>,

    /// Shape of the emitted data.
    #[arg(long = "shape", value_enum, default_value = "raw")]
    pub shape: ShapeArg,

    /// Output rendering.
    #[arg(long = "output", value_enum, default_value = "table")]
    pub output: OutputArg,
}

#[derive(Args)]
pub struct DemographicArgs {
    /// Input file: JSON array of objects, or CSV when the extension is `.csv`.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Indicator as `field` or `field:boolean|demographic` (repeatable).
    ///
    /// When omitted, the standard social-needs and demographic indicators
    /// are used.
    #[arg(long = "indicator", value_name = "FIELD[:KIND]")]
    pub indicators: Vec<String>,

    /// Reference date for ages derived from birth dates (default: today).
    #[arg(long = "as-of", value_name = "YYYY-MM-DD")]
    pub as_of: Option<String>,

    /// Output rendering.
    #[arg(long = "output", value_enum, default_value = "table")]
    pub output: OutputArg,
}

/// Data shape for `pivot table`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShapeArg {
    /// The cross-tab itself, with processing counters.
    Raw,
    Heatmap,
    Ranked,
    Pie,
    Hierarchy,
    /// One entry per non-empty cell.
    Flat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputArg {
    Json,
    Table,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

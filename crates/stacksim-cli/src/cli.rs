use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "StackSim Maintainers",
    version,
    about = "StackSim CLI - A command-line interface for the StackSim dose-response and stack interaction engine.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a stack against a profile and print the full report.
    Evaluate(EvaluateArgs),
    /// Validate and summarize the local reference data files.
    Data(DataArgs),
    /// Export a compound's personalized dose-response series to CSV.
    Sweep(SweepArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Path to the compound catalog (TOML).
    #[arg(long, value_name = "PATH", default_value = "data/compounds.toml")]
    pub catalog: PathBuf,

    /// Path to the interaction matrix (CSV).
    #[arg(long, value_name = "PATH", default_value = "data/interactions.csv")]
    pub interactions: PathBuf,

    /// Path to a stack file (TOML with a [[compounds]] array).
    #[arg(short, long, value_name = "PATH")]
    pub stack: Option<PathBuf>,

    /// Add a stack entry inline: 'compound=dose[@freq][:ester]'.
    /// Can be used multiple times.
    #[arg(short = 'a', long = "add", value_name = "ENTRY")]
    pub add: Vec<String>,

    /// Path to a user profile (TOML). Defaults to the reference profile.
    #[arg(short, long, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Weeks of sustained load for the saturation model.
    #[arg(long, value_name = "FLOAT", default_value_t = 0.0)]
    pub weeks: f64,

    /// Override the baseline receptor capacity (mg of weekly active dose).
    #[arg(long, value_name = "FLOAT")]
    pub base_capacity: Option<f64>,

    /// Override the daily binding capacity (mg/day).
    #[arg(long, value_name = "FLOAT")]
    pub daily_capacity: Option<f64>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the `data` subcommand.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Path to the compound catalog (TOML).
    #[arg(long, value_name = "PATH", default_value = "data/compounds.toml")]
    pub catalog: PathBuf,

    /// Path to the interaction matrix (CSV); validated when present.
    #[arg(long, value_name = "PATH")]
    pub interactions: Option<PathBuf>,
}

/// Arguments for the `sweep` subcommand.
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Path to the compound catalog (TOML).
    #[arg(long, value_name = "PATH", default_value = "data/compounds.toml")]
    pub catalog: PathBuf,

    /// Compound id to sweep.
    #[arg(short, long, value_name = "ID")]
    pub compound: String,

    /// Highest dose to sample; defaults to the compound's evidence ceiling.
    #[arg(long, value_name = "FLOAT")]
    pub max_dose: Option<f64>,

    /// Number of sample steps.
    #[arg(long, value_name = "INT", default_value_t = 20)]
    pub steps: usize,

    /// Path to a user profile (TOML). Defaults to the reference profile.
    #[arg(short, long, value_name = "PATH")]
    pub profile: Option<PathBuf>,

    /// Output CSV path.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,
}

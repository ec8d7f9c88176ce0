use clap::{Args, Parser, Subcommand, ValueEnum};
use mdfp::core::simulation::extractor::Variant;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "MDFP CLI - Compose molecular dynamics fingerprints from structural descriptors and per-frame simulation properties.",
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
    /// Compose a fingerprint from per-frame property tables.
    Compose(ComposeArgs),
    /// Print the ten structural descriptor counts for one or more SMILES strings.
    Descriptors(DescriptorsArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantArg {
    Solution,
    Liquid,
    SolutionLiquid,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Solution => Variant::Solution,
            VariantArg::Liquid => Variant::Liquid,
            VariantArg::SolutionLiquid => Variant::SolutionLiquid,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Fingerprint with metadata and named groups.
    #[default]
    Json,
    /// Header of feature names followed by one row of values.
    Csv,
    /// The bare flat vector, whitespace-separated.
    Vector,
}

/// Arguments for the `compose` subcommand.
#[derive(Args, Debug)]
pub struct ComposeArgs {
    // --- Variant and Sources ---
    /// Which fingerprint layout to compose.
    #[arg(long, value_enum, required = true)]
    pub variant: VariantArg,

    /// Per-frame property table (CSV) of the solute in water.
    #[arg(long, value_name = "CSV")]
    pub solution_frames: Option<PathBuf>,

    /// Per-frame property table (CSV) of the pure liquid.
    #[arg(long, value_name = "CSV")]
    pub liquid_frames: Option<PathBuf>,

    /// Override the identifier embedded in the solution table.
    #[arg(long, value_name = "SMILES")]
    pub solution_identifier: Option<String>,

    /// Override the identifier embedded in the liquid table.
    #[arg(long, value_name = "SMILES")]
    pub liquid_identifier: Option<String>,

    /// Explicit identifier. Produces a descriptor-only fingerprint; tables are not read.
    #[arg(long, value_name = "SMILES")]
    pub smiles: Option<String>,

    // --- Configuration ---
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Moment to compute per property, in order. Repeat to build the list;
    /// replaces the list from the config file.
    #[arg(short, long = "moment", value_name = "NAME")]
    pub moments: Vec<String>,

    /// Extractor option passed through to every extractor. Can be used multiple times.
    #[arg(long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S moments=mean,max
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    // --- Output ---
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the fingerprint to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `descriptors` subcommand.
#[derive(Args, Debug)]
pub struct DescriptorsArgs {
    /// SMILES strings to describe.
    #[arg(required = true, value_name = "SMILES")]
    pub smiles: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

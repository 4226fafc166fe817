use clap::{Args, Parser, Subcommand};
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
    about = "FoldTops CLI - derives TOPS topology strings and secondary-structure segments from protein backbone coordinates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to analyse chains in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one TOPS string per chain and domain.
    Tops(AnalysisArgs),
    /// Write the secondary-structure segments of every chain as a CSV table.
    Segments(AnalysisArgs),
}

/// Arguments shared by the analysis subcommands.
#[derive(Args, Debug)]
pub struct AnalysisArgs {
    // --- Core Arguments ---
    /// Path to the input backbone table (CSV with chain, residue-number, residue-name, atom, x, y, z).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the output file. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an analysis configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Structure name used as the prefix of every TOPS string. Defaults to the input file stem.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    // --- Domain Overrides ---
    /// Define a domain as CHAIN:RANGES (e.g., 'A:1-50,60-80'). Can be used multiple times;
    /// domains of a chain given here replace that chain's domains from the config file
    /// and are numbered from 1 in the order given.
    #[arg(short, long = "domain", value_name = "CHAIN:RANGES")]
    pub domains: Vec<String>,

    // --- Analysis Overrides ---
    /// Override the analysis mode ('standard' or 'dssp').
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Override how helices are oriented when a chain has no single sheet
    /// ('unresolved' or 'chain-axis').
    #[arg(long, value_name = "FALLBACK")]
    pub helix_orientation_fallback: Option<String>,

    /// Do not synthesize missing amide hydrogens.
    #[arg(long)]
    pub no_amide_hydrogens: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S pairing.max-distance=3.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

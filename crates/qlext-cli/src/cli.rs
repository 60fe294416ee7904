//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{CheckArgs, GenerateArgs, InspectArgs, MappingsArgs};

/// QlExt - struct and JSON codec generator for QuantLib constructors
#[derive(Parser)]
#[command(name = "qlext-gen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More logging (-v debug, -vv trace); ignored when RUST_LOG is set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate struct headers and codec bodies
    Generate(GenerateArgs),

    /// Show the structs and fields an entry generates
    Inspect(InspectArgs),

    /// Decode a JSON document through an entry's codec
    Check(CheckArgs),

    /// List the effective lookup tables
    Mappings(MappingsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

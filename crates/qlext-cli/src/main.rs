//! QlExt generator CLI.
//!
//! # Usage
//!
//! ```bash
//! # Generate headers and bodies for every configured entry
//! qlext-gen generate --config config/code_gen.json --output-dir gen/
//!
//! # Show the fields generated for one entry
//! qlext-gen inspect --config config/code_gen.json --entry OISRateHelper
//!
//! # Decode a JSON document the way the generated code would
//! qlext-gen check --config config/code_gen.json --entry DepositRateHelper --document deposit.json
//!
//! # List the effective lookup tables
//! qlext-gen mappings --table resolvers
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

/// Log filter used when `RUST_LOG` is not set.
fn default_filter(quiet: bool, verbose: u8) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(quiet, verbose).into());
    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let format = cli.format;

    match cli.command {
        Commands::Generate(args) => commands::generate::execute(args, format)?,
        Commands::Inspect(args) => commands::inspect::execute(args, format)?,
        Commands::Check(args) => commands::check::execute(args, format)?,
        Commands::Mappings(args) => commands::mappings::execute(args, format)?,
    }

    Ok(())
}

//! unitctl - encode and decode the 64-bit unit descriptor field
//!
//! Operator tool for checking what a device will put in the unit field of a
//! sensor or array message, and for reading a captured field back.

mod commands;
mod config;
mod hex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use unit_codec::PrefixAlias;

use crate::config::{UnitctlConfig, DEFAULT_CONFIG_PATH};

#[derive(Parser)]
#[command(name = "unitctl")]
#[command(about = "Unit descriptor field encoder/decoder")]
#[command(long_about = "Unit descriptor field encoder/decoder

Commands:
  pack        Encode units, exponents and prefix into the 64-bit field
  unpack      Decode a 64-bit field into raw codes
  tables      Show unit, exponent and prefix code tables
  catalog     Pack the named descriptors from the configuration file

Examples:
  unitctl pack -u meter -u second -e 1 -e -2          # m/s^2
  unitctl pack -u pascal -p kilo                      # kPa
  unitctl unpack 0x0044000000000000 --named           # meter^1
  unitctl catalog -c config/units.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file
    #[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CONFIG_PATH)]
    config_path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a descriptor into the 64-bit field
    Pack {
        /// Unit name or code; repeat for compound units (at most 6)
        #[arg(short = 'u', long = "unit", required = true)]
        units: Vec<String>,

        /// Decimal exponent per unit, in unit order (default: 1 for a single unit)
        #[arg(short = 'e', long = "exp", allow_negative_numbers = true)]
        exponents: Vec<i32>,

        /// Prefix as name (kilo), power of ten (3) or notation (1e3)
        #[arg(short = 'p', long, default_value = "none", allow_hyphen_values = true)]
        prefix: PrefixAlias,
    },

    /// Decode a 64-bit field into raw codes
    Unpack {
        /// Field as hex, e.g. 0x0044000000000000
        word: String,

        /// Also resolve codes back to unit and prefix names
        #[arg(short, long)]
        named: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the code tables
    Tables,

    /// Pack every descriptor in the configuration catalog
    Catalog {
        /// Only show this entry
        #[arg(short, long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configure colored output
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Initialize logging; RUST_LOG wins over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(cli)
}

/// Dispatch a parsed command. Only `pack` and `catalog` read the config file.
fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Pack {
            units,
            exponents,
            prefix,
        } => {
            let uppercase = UnitctlConfig::load_hex_uppercase(&cli.config_path)?;
            commands::handle_pack(&units, &exponents, prefix, uppercase)
        },
        Commands::Unpack { word, named, json } => commands::handle_unpack(&word, named, json),
        Commands::Tables => commands::handle_tables(),
        Commands::Catalog { name } => {
            let config = UnitctlConfig::load(&cli.config_path)?;
            debug!("Using config {}", cli.config_path.display());
            commands::handle_catalog(&config, name.as_deref())
        },
    }
}

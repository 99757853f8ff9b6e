//! drape: command-line interface for garment fitting and size
//! recommendation.
//!
//! This tool exposes drape-core and drape-shell functionality from the
//! command line, suitable for scripting and batch fitting runs.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=drape_core=info,drape_shell=info` - basic operation logging
//! - `RUST_LOG=drape::timing=debug` - per-stage timing
//! - `RUST_LOG=debug` - all debug output
//!
//! # Example
//!
//! ```bash
//! # Fit a size-M tee onto a body mesh
//! drape fit body.obj --measurements body.json --garment tee_m.json -o garment.obj
//!
//! # Recommend a size from a chart
//! drape recommend --measurements body.json --chart tee_chart.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{analyze, fit, info, measure, recommend};

/// drape - fit garments onto body meshes and report how well sizes fit.
#[derive(Parser)]
#[command(name = "drape")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for results
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GarmentKindArg {
    /// Standard tee, hem at mid-hip
    Tshirt,
    /// Longer top, hem below the hip
    LongTop,
    /// Jacket with higher collar coverage
    Jacket,
}

impl From<GarmentKindArg> for drape_core::GarmentKind {
    fn from(arg: GarmentKindArg) -> Self {
        match arg {
            GarmentKindArg::Tshirt => drape_core::GarmentKind::TShirt,
            GarmentKindArg::LongTop => drape_core::GarmentKind::LongTop,
            GarmentKindArg::Jacket => drape_core::GarmentKind::Jacket,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FabricWeightArg {
    Light,
    Medium,
    Heavy,
}

impl From<FabricWeightArg> for drape_shell::FabricWeight {
    fn from(arg: FabricWeightArg) -> Self {
        match arg {
            FabricWeightArg::Light => drape_shell::FabricWeight::Light,
            FabricWeightArg::Medium => drape_shell::FabricWeight::Medium,
            FabricWeightArg::Heavy => drape_shell::FabricWeight::Heavy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh statistics and information
    Info {
        /// Input mesh file (OBJ)
        input: PathBuf,
    },

    /// Extract body measurements from a body mesh
    Measure {
        /// Input body mesh (OBJ, meters, y-up)
        input: PathBuf,

        /// Check measurements against plausible anthropometric ranges
        #[arg(long)]
        validate: bool,
    },

    /// Analyze how a garment fits a body, from measurement records
    Analyze {
        /// Body measurements JSON file (cm, camelCase fields)
        #[arg(long, short)]
        measurements: PathBuf,

        /// Garment measurements JSON file (cm)
        #[arg(long, short)]
        garment: PathBuf,
    },

    /// Recommend the best size from a size chart
    Recommend {
        /// Body measurements JSON file
        #[arg(long, short)]
        measurements: PathBuf,

        /// Size chart JSON file
        #[arg(long, short)]
        chart: PathBuf,
    },

    /// Fit a garment shell onto a body mesh
    Fit {
        /// Input body mesh (OBJ, meters, y-up)
        input: PathBuf,

        /// Body measurements JSON file
        #[arg(long, short)]
        measurements: PathBuf,

        /// Garment measurements JSON file
        #[arg(long, short)]
        garment: PathBuf,

        /// Output garment mesh path (OBJ)
        #[arg(long, short)]
        output: PathBuf,

        /// Garment silhouette
        #[arg(long, default_value = "tshirt")]
        kind: GarmentKindArg,

        /// Fabric weight class
        #[arg(long, default_value = "medium")]
        weight: FabricWeightArg,
    },
}

/// Initialize the tracing subscriber based on verbosity level.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // RUST_LOG wins over -v flags
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "drape_core=info,drape_shell=info",
            2 => "drape_core=debug,drape_shell=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    // Install miette's panic hook for better error display in development
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Info { input } => info::run(input, &cli),
        Commands::Measure { input, validate } => measure::run(input, *validate, &cli),
        Commands::Analyze {
            measurements,
            garment,
        } => analyze::run(measurements, garment, &cli),
        Commands::Recommend {
            measurements,
            chart,
        } => recommend::run(measurements, chart, &cli),
        Commands::Fit {
            input,
            measurements,
            garment,
            output,
            kind,
            weight,
        } => fit::run(
            input,
            measurements,
            garment,
            output,
            (*kind).into(),
            (*weight).into(),
            &cli,
        ),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(fit_err) = e.downcast_ref::<drape_core::FitError>() {
                eprintln!("{}: {}", "Error".red().bold(), fit_err);
                eprintln!("  {}: {}", "Code".cyan(), fit_err.code());
            } else if let Some(drape_err) = e.downcast_ref::<drape_shell::DrapeError>() {
                eprintln!("{}: {}", "Error".red().bold(), drape_err);
                eprintln!("  {}: {}", "Code".cyan(), drape_err.code());
            } else {
                eprintln!("{}: {}", "Error".red().bold(), e);
                for cause in e.chain().skip(1) {
                    eprintln!("  {}: {}", "Caused by".yellow(), cause);
                }
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

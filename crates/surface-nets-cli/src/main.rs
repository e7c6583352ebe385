//! snets: Command-line driver for naive surface nets extraction.
//!
//! Samples a built-in signed distance shape onto a cubic grid, extracts its
//! surface and reports or exports the result.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable to control log output:
//! - `RUST_LOG=surface_nets=info` - Operation summaries
//! - `RUST_LOG=surface_nets=debug` - Intermediate counts
//! - `RUST_LOG=surface_nets::timing=trace` - Per-phase timing
//! - `RUST_LOG=debug` - All debug output
//!
//! # Example
//!
//! ```bash
//! # Extract a sphere and write it as OBJ
//! snets extract sphere --size 64 -o sphere.obj
//!
//! # Terrain statistics as JSON
//! snets --format json info terrain --size 18
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;

use commands::{extract, info};

/// snets - Extract isosurfaces from signed distance fields.
///
/// Runs naive surface nets over sampled shapes for inspection and export.
#[derive(Parser)]
#[command(name = "snets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
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

#[derive(Subcommand)]
enum Commands {
    /// Extract a shape's surface and optionally save it
    Extract {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Output OBJ file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip normal estimation
        #[arg(long)]
        no_normals: bool,

        /// Skip tangent estimation
        #[arg(long)]
        no_tangents: bool,

        /// Evaluate cells on all cores
        #[arg(long)]
        parallel: bool,

        /// Layout of the reported bounds
        #[arg(long, default_value = "center-extent")]
        bounds: BoundsFormat,
    },

    /// Display extraction statistics for a shape
    Info {
        #[command(flatten)]
        shape: ShapeArgs,
    },
}

/// Shape selection shared by all commands.
#[derive(Args, Clone)]
pub struct ShapeArgs {
    /// Shape to sample
    pub shape: ShapeKind,

    /// Samples per grid axis
    #[arg(long, short, default_value = "32")]
    pub size: usize,

    /// Sphere radius or box half-size, in grid units
    #[arg(long, short)]
    pub radius: Option<f32>,

    /// Plane height or terrain base height, in grid units
    #[arg(long, short)]
    pub level: Option<f32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ShapeKind {
    /// Ball centred in the grid
    Sphere,
    /// Horizontal half-space
    Plane,
    /// Axis-aligned cube centred in the grid
    Box,
    /// Rolling heightfield
    Terrain,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BoundsFormat {
    /// Center and half extent
    CenterExtent,
    /// Minimum and maximum corners
    MinMax,
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
            1 => "surface_nets=info,snets=info",
            2 => "surface_nets=debug,snets=debug",
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
    // Nicer panic reports in development builds
    #[cfg(debug_assertions)]
    miette::set_panic_hook();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Extract {
            shape,
            output,
            no_normals,
            no_tangents,
            parallel,
            bounds,
        } => extract::run(
            shape,
            output.as_deref(),
            !*no_normals,
            !*no_tangents,
            *parallel,
            *bounds,
            &cli,
        ),
        Commands::Info { shape } => info::run(shape, &cli),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            if let Some(err) = e.downcast_ref::<surface_nets::SurfaceNetsError>() {
                eprintln!("{}: {}", "Error".red().bold(), err);
                eprintln!("  {}: {}", "Code".cyan(), err.code());
                eprintln!("  {}: {}", "Suggestion".green(), err.recovery_suggestion());
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

//! colorviz - gamut inspection CLI
//!
//! Reads gamut boundary files, converts Lab samples and runs set operations
//! without opening a window.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colorviz_gamut::BooleanOp;
use colorviz_math::Illuminant;
use colorviz_view::ViewerConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "colorviz")]
#[command(author, version, about = "Color gamut inspection tool")]
#[command(long_about = "
Inspect Lab gamut boundary files and combine them.

Examples:
  colorviz info srgb.gam adobe.gam          # Counts, bounds, header
  colorviz lab 50 20 -30 --illuminant D65   # Lab -> XYZ / sRGB
  colorviz boolean a.gam b.gam --op union -o ab.gam
  colorviz pick srgb.gam 400 300            # First hit under a pixel
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Viewer config file (RON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show gamut file information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Convert a Lab color to XYZ and sRGB
    Lab(LabArgs),

    /// Union or intersection of two gamuts
    #[command(visible_alias = "b")]
    Boolean(BooleanArgs),

    /// Cast a camera ray through a pixel and report the hit
    Pick(PickArgs),
}

/// Arguments for the `info` command.
#[derive(Args)]
struct InfoArgs {
    /// Gamut file(s)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Reject malformed lines instead of skipping them
    #[arg(long)]
    strict: bool,
}

/// Arguments for the `lab` command.
#[derive(Args)]
struct LabArgs {
    /// Lightness
    l: f32,

    /// a* component
    #[arg(allow_negative_numbers = true)]
    a: f32,

    /// b* component
    #[arg(allow_negative_numbers = true)]
    b: f32,

    /// Reference white (defaults to the config illuminant)
    #[arg(short, long)]
    illuminant: Option<Illuminant>,
}

/// Arguments for the `boolean` command.
#[derive(Args)]
struct BooleanArgs {
    /// First gamut
    a: PathBuf,

    /// Second gamut
    b: PathBuf,

    /// Operation: union, intersection
    #[arg(long, default_value = "intersection")]
    op: BooleanOp,

    /// Write the result as a gamut file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Arguments for the `pick` command.
#[derive(Args)]
struct PickArgs {
    /// Gamut file
    input: PathBuf,

    /// Pixel column
    x: f32,

    /// Pixel row (from the top)
    y: f32,

    /// Viewport width
    #[arg(long, default_value = "800")]
    width: f32,

    /// Viewport height
    #[arg(long, default_value = "600")]
    height: f32,

    /// Orbit elevation in radians
    #[arg(long, default_value = "0.0")]
    theta: f32,

    /// Orbit azimuth in radians
    #[arg(long, default_value = "0.0")]
    phi: f32,

    /// Orbit distance (defaults to framing the gamut)
    #[arg(short, long)]
    distance: Option<f32>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info(args) => commands::info::run(args, &config, cli.verbose),
        Commands::Lab(args) => commands::lab::run(args, &config),
        Commands::Boolean(args) => commands::boolean::run(args, &config),
        Commands::Pick(args) => commands::pick::run(args, &config),
    }
}

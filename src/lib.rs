//! Synthvoc: synthetic object-detection corpus generator.
//!
//! Synthvoc cuts background photographs into fixed-size frames, pastes
//! randomly chosen and randomly oriented foreground cutouts onto every
//! orientation of every frame, and writes each composite as a PNG next to a
//! Pascal VOC style XML annotation of the pasted boxes.
//!
//! # Modules
//!
//! - [`augment`]: Orientation orbit, background tiling, compositing
//! - [`ir`]: Boxes, composites, annotation documents and their XML form
//! - [`pipeline`]: The end-to-end generation run and run planning
//! - [`validation`]: Verification of a generated corpus
//! - [`config`]: Run configuration (defaults, YAML file, flags)
//! - [`error`]: Error types for synthvoc operations

pub mod augment;
pub mod config;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod validation;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use env_logger::Env;

pub use config::{ConfigLayer, GeneratorConfig, InstanceCountDistribution};
pub use error::SynthError;

/// The synthvoc CLI application.
#[derive(Parser)]
#[command(name = "synthvoc")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate composite images and annotations.
    Generate(GenerateArgs),
    /// Predict what `generate` would produce without writing anything.
    Plan(GenerateArgs),
    /// Check a generated corpus for pairing and geometry problems.
    Verify(VerifyArgs),
}

/// Arguments shared by the generate and plan subcommands.
///
/// Flags override values from `--config`.
#[derive(clap::Args)]
struct GenerateArgs {
    /// YAML file with any of the settings below.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of background photographs.
    #[arg(long)]
    backgrounds: Option<PathBuf>,

    /// Directory of foreground cutouts.
    #[arg(long)]
    foregrounds: Option<PathBuf>,

    /// Directory receiving <id>.png composites.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Directory receiving <id>.xml annotations [default: <output>/Annotations].
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Seed for all random sampling [default: 42].
    #[arg(long)]
    seed: Option<u64>,

    /// Edge of the square frames cut from backgrounds [default: 416].
    #[arg(long)]
    tile_size: Option<u32>,

    /// Objects-per-composite distribution as 'count:weight,...' [default: 1:0.5,2:0.35,3:0.15].
    #[arg(long)]
    distribution: Option<InstanceCountDistribution>,

    /// Class label written for every object [default: polar-bear].
    #[arg(long)]
    label: Option<String>,

    /// Output format for the summary ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,
}

impl GenerateArgs {
    /// Merge the config file (if any) with the flags.
    fn resolve(&self) -> Result<GeneratorConfig, SynthError> {
        let file = match &self.config {
            Some(path) => ConfigLayer::from_yaml_file(path)?,
            None => ConfigLayer::default(),
        };
        let flags = ConfigLayer {
            backgrounds: self.backgrounds.clone(),
            foregrounds: self.foregrounds.clone(),
            output: self.output.clone(),
            annotations: self.annotations.clone(),
            seed: self.seed,
            tile_size: self.tile_size,
            distribution: self.distribution.clone(),
            label: self.label.clone(),
        };
        file.merge(flags).resolve()
    }
}

/// Arguments for the verify subcommand.
#[derive(clap::Args)]
struct VerifyArgs {
    /// Directory holding the <id>.png composites.
    #[arg(long)]
    images: PathBuf,

    /// Directory holding the <id>.xml annotations [default: <images>/Annotations].
    #[arg(long)]
    annotations: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the synthvoc CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SynthError> {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Some(Commands::Generate(args)) => run_generate(args),
        Some(Commands::Plan(args)) => run_plan(args),
        Some(Commands::Verify(args)) => run_verify(args),
        None => {
            println!("synthvoc {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Synthetic object-detection corpus generator.");
            println!();
            println!("Run 'synthvoc --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the generate subcommand.
fn run_generate(args: GenerateArgs) -> Result<(), SynthError> {
    let config = args.resolve()?;
    let report = pipeline::generate(&config)?;

    match args.report.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report),
    }
    Ok(())
}

/// Execute the plan subcommand.
fn run_plan(args: GenerateArgs) -> Result<(), SynthError> {
    let config = args.resolve()?;
    let plan = pipeline::plan_run(&config)?;

    match args.report.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&plan)?),
        _ => print!("{}", plan),
    }
    Ok(())
}

/// Execute the verify subcommand.
fn run_verify(args: VerifyArgs) -> Result<(), SynthError> {
    let annotations = args
        .annotations
        .unwrap_or_else(|| args.images.join(config::DEFAULT_ANNOTATIONS_DIR));
    let opts = validation::VerifyOptions {
        strict: args.strict,
    };
    let report = validation::verify_corpus(&args.images, &annotations, &opts)?;

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report),
    }

    if !report.is_ok() {
        Err(SynthError::VerificationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

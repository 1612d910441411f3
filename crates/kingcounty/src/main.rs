mod config;
mod io;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use kingcounty_core::{pipeline::step_descriptors, Preprocessor};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "King County housing data preprocessing", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean and feature-engineer a sales file, writing the result as CSV
    Preprocess(PreprocessArgs),
    /// List the pipeline steps in execution order
    Steps,
}

#[derive(Args, Debug)]
struct PreprocessArgs {
    /// Input table (.csv, .json or .parquet)
    input: PathBuf,
    /// Output CSV path (overrides configuration)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(config.log_format);

    match cli.command {
        Command::Preprocess(args) => handle_preprocess(args, config),
        Command::Steps => {
            print_steps();
            Ok(())
        }
    }
}

fn init_tracing(format: LogFormat) {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn handle_preprocess(args: PreprocessArgs, config: CliConfig) -> Result<()> {
    let output_path = args.output.unwrap_or(config.output);

    let df = io::load_table(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    info!(input = %args.input.display(), rows = df.height(), "loaded sales table");

    let mut transformed = Preprocessor::new().fit_transform(&df)?;
    io::write_csv(&mut transformed, &output_path)?;

    info!(
        output = %output_path.display(),
        rows = transformed.height(),
        columns = transformed.width(),
        "wrote transformed table"
    );
    Ok(())
}

fn print_steps() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Stage", "Step", "Description"]);

    for (idx, descriptor) in step_descriptors().iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            descriptor.stage.to_string(),
            descriptor.step.to_string(),
            descriptor.description.to_string(),
        ]);
    }

    println!("{table}");
}

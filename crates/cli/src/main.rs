mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use binspec_lib::consts::{APP_NAME, DEFAULT_MODEL_FILE, MODEL_ENV};

use crate::output::{OutputFormat, print_error};

/// binspec - inspect binary sources and build eligibility
#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Path to the model file
  #[arg(short, long, global = true, env = MODEL_ENV, default_value = DEFAULT_MODEL_FILE)]
  model: PathBuf,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the host platform and the toolchains found for each language
  Info,

  /// Resolve every binary and report whether it can be built
  Check,

  /// List the source sets a binary compiles
  Sources {
    /// Binary name
    binary: String,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  if let Err(err) = run(cli) {
    print_error(&format!("{:#}", err));
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<()> {
  match cli.command {
    Commands::Info => cmd::cmd_info(&cli.model, cli.output),
    Commands::Check => cmd::cmd_check(&cli.model, cli.output),
    Commands::Sources { binary } => cmd::cmd_sources(&cli.model, &binary, cli.output),
  }
}

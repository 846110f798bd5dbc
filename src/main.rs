mod checks;
mod commands;
mod core;
mod index;
mod ui;

use clap::{Parser, Subcommand};
use crate::core::context::{CliOverrides, RunContext};
use crate::core::error::{IndexError, IndexResult, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Validate a release index against its schema and the source repository
#[derive(Parser)]
#[command(name = "release-index-check")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run every consistency check against the release index
  Check {
    /// Release index manifest (default: release-index.yaml)
    #[arg(long)]
    path: Option<PathBuf>,
    /// JSON schema for the manifest (default: release-index-schema.json)
    #[arg(long)]
    schema_path: Option<PathBuf>,
    /// Repository cache clone (falls back to RELEASE_INDEX_REPO_PATH)
    #[arg(long)]
    repo_path: Option<PathBuf>,
    /// Remote to clone when the cache does not exist yet
    #[arg(long)]
    remote: Option<String>,
    /// Branch to check out when cloning (default: master)
    #[arg(long)]
    main_branch: Option<String>,
    /// Run every check and report all violations instead of stopping at the first
    #[arg(long)]
    batch: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
    /// Log git invocations and resolution results to stderr
    #[arg(short, long)]
    verbose: bool,
  },

  /// List the registered checks
  List {
    /// Output the list in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Log to stderr; RUST_LOG wins over --verbose
fn init_tracing(verbose: bool) {
  let default_level = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();

  let verbose = matches!(cli.command, Commands::Check { verbose: true, .. });
  init_tracing(verbose);

  let result = match cli.command {
    Commands::Check {
      path,
      schema_path,
      repo_path,
      remote,
      main_branch,
      batch,
      json,
      verbose: _,
    } => {
      let overrides = CliOverrides {
        path,
        schema_path,
        repo_path,
        remote,
        main_branch,
        batch,
      };
      build_context(overrides).and_then(|ctx| commands::run_check(&ctx, json))
    }
    Commands::List { json } => commands::run_list(json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

/// Resolve settings from the working directory, its config file and the environment
fn build_context(overrides: CliOverrides) -> IndexResult<RunContext> {
  let root = std::env::current_dir().map_err(|e| IndexError::message(format!("Failed to get current directory: {}", e)))?;
  RunContext::build(&root, overrides)
}

fn handle_error(err: IndexError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}

//! Command-line interface definitions for mlflow-client.
//!
//! This module defines the CLI structure using clap derives and dispatches to
//! the handlers in [`crate::commands`].

use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::color::ColorScheme;
use crate::commands::auth::handle_auth_command;
use crate::commands::completions::handle_completions_command;
use crate::commands::experiments::handle_experiments_command;
use crate::commands::version::handle_version_command;

/// mlflow-client - Talk to an MLflow tracking server
#[derive(Debug, Parser)]
#[command(
  name = "mlflow-client",
  version,
  about = "Inspect and drive an MLflow tracking server",
  long_about = "A command-line client for the MLflow tracking REST API.\n\
                Resolves credentials from the tracking URI, ~/.databrickscfg profiles, or a\n\
                runtime-injected source, and issues authenticated requests.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Connection options
  #[command(flatten)]
  pub connection: ConnectionOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,
}

/// Top-level subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Credential resolution and authentication checks
  Auth {
    #[command(subcommand)]
    subcommand: AuthCommand,
  },

  /// Experiment operations
  Experiments {
    #[command(subcommand)]
    subcommand: ExperimentsCommand,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Authentication subcommands
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum AuthCommand {
  /// Call the tracking server to verify the resolved credentials
  Test,
  /// Show which credentials would be used, without calling the server
  Show,
}

/// Experiment subcommands
#[derive(Debug, Subcommand)]
pub enum ExperimentsCommand {
  /// List experiments
  List {
    /// Output in JSON format
    #[arg(long)]
    json: bool,
  },
  /// Show a single experiment
  Get {
    /// Experiment ID
    #[arg(value_name = "ID")]
    experiment_id: String,
  },
  /// Create an experiment, or return the existing one with the same name
  Create {
    /// Experiment name
    name: String,
  },
}

/// Shells supported by `completions`
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

/// Connection options
#[derive(Debug, Parser)]
pub struct ConnectionOptions {
  /// Tracking URI: http(s)://host[:port], databricks, or databricks://<profile>
  #[arg(long, global = true, env = "MLFLOW_TRACKING_URI", value_name = "URI")]
  pub tracking_uri: Option<String>,

  /// Request timeout in seconds
  #[arg(long, global = true, default_value = "30", value_name = "SECONDS")]
  pub timeout: u64,
}

impl ConnectionOptions {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout)
  }
}

/// Behavior options
#[derive(Debug, Parser)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, global = true, value_enum, default_value = "auto", value_name = "WHEN")]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Whether the selected command talks to a tracking server.
  pub fn needs_tracking_uri(&self) -> bool {
    matches!(self.command, Command::Auth { .. } | Command::Experiments { .. })
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.needs_tracking_uri()
      && self
        .connection
        .tracking_uri
        .as_deref()
        .is_none_or(|uri| uri.trim().is_empty())
    {
      return Err("--tracking-uri is required (or set MLFLOW_TRACKING_URI)".to_string());
    }

    if self.connection.timeout == 0 {
      return Err("--timeout must be at least 1 second".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize logging, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  let colors = ColorScheme::new(cli.behavior.color);

  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::Auth { subcommand } => {
      handle_auth_command(*subcommand, &cli, &colors).await;
    }
    Command::Experiments { subcommand } => {
      handle_experiments_command(subcommand, &cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}

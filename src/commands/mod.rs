//! CLI subcommand handlers.
//!
//! This module groups the implementations for each `mlflow-client` subcommand,
//! keeping `cli.rs` focused on argument definitions while the handlers share
//! client construction and error reporting helpers.

pub mod auth;
pub mod completions;
pub mod experiments;
pub mod version;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::creds::CredsError;
use crate::error::ClientError;
use crate::tracking::ApiClient;

/// Build an API client from the CLI's tracking URI and timeout.
///
/// # Errors
/// Returns an error when no tracking URI was given or it is unsupported.
pub(crate) fn connect(cli: &Cli) -> Result<ApiClient> {
  let uri = cli
    .connection
    .tracking_uri
    .as_deref()
    .context("No tracking URI configured")?;

  ApiClient::from_tracking_uri_with_timeout(uri, Some(cli.connection.timeout()))
    .with_context(|| format!("Cannot use tracking URI '{uri}'"))
}

/// Print hints matching the class of a client error.
pub(crate) fn print_error_hints(err: &ClientError, colors: &ColorScheme) {
  match err {
    ClientError::Credentials(CredsError::ChainExhausted { failures }) => {
      eprintln!("\n{}", colors.info("Tried these credential sources:"));
      for failure in failures {
        eprintln!("  • {}: {}", colors.emphasis(&failure.provider), failure.message);
      }
    }
    ClientError::Credentials(_) => {
      eprintln!("\n{}", colors.info("Check your tracking URI and ~/.databrickscfg profile."));
    }
    ClientError::HttpStatus { status: 401 | 403, .. } => {
      eprintln!("\n{}", colors.info("The server rejected the credentials:"));
      eprintln!("  1. Verify the token or username/password in your profile");
      eprintln!("  2. Tokens take precedence over username/password when both are set");
    }
    ClientError::Transport { .. } => {
      eprintln!("\n{}", colors.info("The server could not be reached:"));
      eprintln!("  1. Check the host and port in the tracking URI");
      eprintln!("  2. For self-signed certificates set 'insecure = true' in the profile");
    }
    _ => {}
  }
}

//! Authentication subcommand handlers.
//!
//! Covers both `mlflow-client auth test`, which performs a live API call, and
//! `mlflow-client auth show`, which prints the credentials the provider chain
//! resolves without contacting the server.

use std::process;

use super::{connect, print_error_hints};
use crate::cli::{AuthCommand, Cli};
use crate::color::ColorScheme;
use crate::creds::{Auth, HostCreds, SourceRegistry};
use crate::error::ClientError;
use crate::tracking::{TRACKING_URI_ENV, TrackingApi, parse_tracking_uri, provider_for};

/// Dispatch the authentication subcommands defined under `mlflow-client auth`.
///
/// # Arguments
/// * `subcommand` - Auth-specific variant to execute.
/// * `cli` - Parsed CLI settings containing connection and output options.
/// * `colors` - Shared color scheme used to render output consistently.
pub(crate) async fn handle_auth_command(subcommand: AuthCommand, cli: &Cli, colors: &ColorScheme) {
  match subcommand {
    AuthCommand::Test => test_auth(cli, colors).await,
    AuthCommand::Show => show_auth_config(cli, colors),
  }
}

async fn test_auth(cli: &Cli, colors: &ColorScheme) {
  let client = match connect(cli) {
    Ok(client) => client,
    Err(e) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to create API client"));
      eprintln!("  {e:#}");
      process::exit(1);
    }
  };

  println!("{} {}", colors.info("→"), colors.info("Testing authentication"));
  println!(
    "  {}: {}",
    colors.emphasis("Provider"),
    colors.dimmed(client.caller().provider().name())
  );

  match client.list_experiments().await {
    Ok(experiments) => {
      println!(
        "\n{} {}",
        colors.success("✓"),
        colors.success("Authentication successful!")
      );
      println!(
        "  {}: {}",
        colors.emphasis("Visible experiments"),
        colors.number(experiments.len())
      );
    }
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Authentication failed"));
      eprintln!("  {e}");
      print_error_hints(&e, colors);
      eprintln!(
        "\n{}",
        colors.dimmed("Run 'mlflow-client auth show' to see the resolved credentials")
      );
      process::exit(2);
    }
  }
}

/// Display the credentials the configured tracking URI resolves to.
///
/// # Arguments
/// * `cli` - Parsed CLI options containing the tracking URI.
/// * `colors` - Color palette used for consistent, accessible output.
fn show_auth_config(cli: &Cli, colors: &ColorScheme) {
  println!("{}\n", colors.emphasis("Authentication Configuration"));

  let uri = cli.connection.tracking_uri.as_deref().unwrap_or_default();
  let env_uri = std::env::var(TRACKING_URI_ENV).ok();
  let source = tracking_uri_source(uri, env_uri.as_deref());
  println!("{}: {}", colors.emphasis("Tracking URI"), colors.link(uri));
  println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(source));

  let target = match parse_tracking_uri(uri) {
    Ok(target) => target,
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error(e));
      process::exit(4);
    }
  };

  let provider = provider_for(&target, SourceRegistry::global());
  println!("\n{}: {}", colors.emphasis("Provider"), provider.name());

  match provider.resolve() {
    Ok(creds) if creds.is_available() => print_creds(&creds, colors),
    Ok(_) => {
      println!("\n{} {}", colors.warning("⚠"), colors.warning("Resolved credentials have no host"));
      process::exit(2);
    }
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Failed to resolve credentials"));
      eprintln!("  {e}");
      let err: ClientError = e.into();
      print_error_hints(&err, colors);
      process::exit(2);
    }
  }
}

fn print_creds(creds: &HostCreds, colors: &ColorScheme) {
  println!("\n{}: {}", colors.emphasis("Host"), colors.link(creds.host()));

  match creds.auth() {
    Auth::Bearer(token) => {
      println!("{}: {}", colors.emphasis("Auth"), "bearer token");
      println!("  {}: {}", colors.dimmed("Token"), colors.dimmed(mask_secret(token)));
    }
    Auth::Basic { username, .. } => {
      println!("{}: {}", colors.emphasis("Auth"), "basic");
      println!("  {}: {}", colors.dimmed("Username"), username);
      println!("  {}: {}", colors.dimmed("Password"), colors.dimmed("********"));
    }
    Auth::Anonymous => {
      println!("{}: {}", colors.emphasis("Auth"), colors.dimmed("(none)"));
    }
  }

  if creds.no_tls_verify() {
    println!(
      "\n{} {}",
      colors.warning("⚠"),
      colors.warning("TLS certificate verification is disabled")
    );
  } else {
    println!("\n{} {}", colors.success("✓"), colors.success("Credentials configured"));
  }
}

/// Where the effective tracking URI came from. The flag overrides the
/// environment, so the environment only counts when it holds the same value.
fn tracking_uri_source(uri: &str, env_uri: Option<&str>) -> &'static str {
  match env_uri {
    Some(env_uri) if env_uri == uri => "environment variable",
    _ => "command-line flag",
  }
}

/// Mask all but the first four characters of long secrets.
fn mask_secret(secret: &str) -> String {
  let len = secret.chars().count();
  if len > 8 {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}{}", "*".repeat(len - 4))
  } else {
    "*".repeat(len)
  }
}

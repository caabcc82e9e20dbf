//! Experiment subcommand handlers.

use std::process;

use super::{connect, print_error_hints};
use crate::cli::{Cli, ExperimentsCommand};
use crate::color::ColorScheme;
use crate::error::ClientError;
use crate::tracking::{ApiClient, Experiment, TrackingApi};

/// Dispatch `mlflow-client experiments <subcommand>`.
pub(crate) async fn handle_experiments_command(subcommand: &ExperimentsCommand, cli: &Cli, colors: &ColorScheme) {
  let client = match connect(cli) {
    Ok(client) => client,
    Err(e) => {
      eprintln!("{} {e:#}", colors.error("Error:"));
      process::exit(1);
    }
  };

  let result = match subcommand {
    ExperimentsCommand::List { json } => list(&client, *json, colors).await,
    ExperimentsCommand::Get { experiment_id } => get(&client, experiment_id, colors).await,
    ExperimentsCommand::Create { name } => create(&client, name, colors).await,
  };

  if let Err(e) = result {
    eprintln!("{} {}", colors.error("✗"), colors.error(&e));
    print_error_hints(&e, colors);
    process::exit(if e.status().is_some() || e.is_transport() { 3 } else { 2 });
  }
}

async fn list(client: &ApiClient, json: bool, colors: &ColorScheme) -> Result<(), ClientError> {
  let experiments = client.list_experiments().await?;

  if json {
    let rendered = serde_json::to_string_pretty(&experiments).map_err(|source| ClientError::Json {
      endpoint: "experiments/list".to_string(),
      source,
    })?;
    println!("{rendered}");
    return Ok(());
  }

  if experiments.is_empty() {
    println!("{}", colors.dimmed("(no experiments)"));
    return Ok(());
  }

  let id_width = experiments.iter().map(|e| e.experiment_id.len()).max().unwrap_or(2).max(2);
  println!("{}", colors.emphasis(format!("{:<id_width$}  NAME", "ID")));
  for experiment in &experiments {
    println!("{}", format_row(experiment, id_width, colors));
  }
  println!(
    "\n{} {}",
    colors.number(experiments.len()),
    colors.dimmed("experiment(s)")
  );

  Ok(())
}

fn format_row(experiment: &Experiment, id_width: usize, colors: &ColorScheme) -> String {
  let id = format!("{:<id_width$}", experiment.experiment_id);
  let mut row = format!("{}  {}", colors.number(id), experiment.name);
  if experiment.lifecycle_stage.as_deref() == Some("deleted") {
    row.push_str(&format!(" {}", colors.dimmed("(deleted)")));
  }
  row
}

async fn get(client: &ApiClient, experiment_id: &str, colors: &ColorScheme) -> Result<(), ClientError> {
  let response = client.get_experiment(experiment_id).await?;
  let experiment = response.experiment;

  println!("{}: {}", colors.emphasis("ID"), colors.number(&experiment.experiment_id));
  println!("{}: {}", colors.emphasis("Name"), experiment.name);
  if let Some(location) = &experiment.artifact_location {
    println!("{}: {}", colors.emphasis("Artifacts"), colors.link(location));
  }
  if let Some(stage) = &experiment.lifecycle_stage {
    println!("{}: {}", colors.emphasis("Stage"), stage);
  }
  if let Some(created) = experiment.creation_time.and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis) {
    println!(
      "{}: {}",
      colors.emphasis("Created"),
      colors.dimmed(created.format("%Y-%m-%d %H:%M:%S UTC"))
    );
  }

  Ok(())
}

async fn create(client: &ApiClient, name: &str, colors: &ColorScheme) -> Result<(), ClientError> {
  let existing = client.get_experiment_by_name(name).await?;
  let (id, verb) = match existing {
    Some(experiment) => (experiment.experiment_id, "Found existing"),
    None => (client.create_experiment(name).await?, "Created"),
  };

  println!(
    "{} {} experiment {} ({}: {})",
    colors.success("✓"),
    verb,
    colors.emphasis(name),
    colors.dimmed("id"),
    colors.number(id)
  );
  Ok(())
}

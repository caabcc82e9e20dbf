//! Trait definitions for interacting with the tracking server.

use async_trait::async_trait;

use super::models::{
  CreateRunRequest, Experiment, GetExperimentResponse, ListArtifactsResponse, Metric, Run, RunInfo, RunStatus,
  SearchClause,
};
use crate::error::Result;

/// Tracking API operations (enables testing with fake implementations).
#[async_trait]
pub trait TrackingApi: Send + Sync {
  /// Fetch an experiment by ID.
  async fn get_experiment(&self, experiment_id: &str) -> Result<GetExperimentResponse>;

  /// List all active experiments.
  async fn list_experiments(&self) -> Result<Vec<Experiment>>;

  /// Create an experiment and return its ID.
  async fn create_experiment(&self, name: &str) -> Result<String>;

  /// Fetch a run with its logged data.
  async fn get_run(&self, run_id: &str) -> Result<Run>;

  /// Start a run and return its metadata, including the new run ID.
  async fn create_run(&self, request: &CreateRunRequest) -> Result<RunInfo>;

  /// Set a run's status and end time (epoch milliseconds).
  async fn update_run(&self, run_id: &str, status: RunStatus, end_time: i64) -> Result<()>;

  /// Log a parameter on a run.
  async fn log_parameter(&self, run_id: &str, key: &str, value: &str) -> Result<()>;

  /// Log a metric on a run, timestamped now.
  async fn log_metric(&self, run_id: &str, key: &str, value: f64) -> Result<()>;

  /// Latest value of a metric.
  async fn get_metric(&self, run_id: &str, metric_key: &str) -> Result<Metric>;

  /// Every recorded value of a metric.
  async fn get_metric_history(&self, run_id: &str, metric_key: &str) -> Result<Vec<Metric>>;

  /// Runs in `experiment_ids` matching every clause.
  async fn search_runs(&self, experiment_ids: &[&str], clauses: &[SearchClause]) -> Result<Vec<Run>>;

  /// List artifacts under `path` (the artifact root when `None`).
  async fn list_artifacts(&self, run_id: &str, path: Option<&str>) -> Result<ListArtifactsResponse>;

  /// Download a single artifact.
  async fn get_artifact(&self, run_id: &str, path: &str) -> Result<Vec<u8>>;

  /// Find an experiment by exact name.
  async fn get_experiment_by_name(&self, name: &str) -> Result<Option<Experiment>> {
    let experiments = self.list_experiments().await?;
    Ok(experiments.into_iter().find(|e| e.name == name))
  }

  /// Return the ID of the named experiment, creating it if missing.
  async fn get_or_create_experiment_id(&self, name: &str) -> Result<String> {
    match self.get_experiment_by_name(name).await? {
      Some(experiment) => Ok(experiment.experiment_id),
      None => self.create_experiment(name).await,
    }
  }
}

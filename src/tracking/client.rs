//! Tracking API client built on [`HttpCaller`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::api::TrackingApi;
use super::models::{
  CreateExperimentRequest, CreateExperimentResponse, CreateRunRequest, CreateRunResponse, Experiment,
  GetExperimentResponse, GetMetricHistoryResponse, GetMetricResponse, GetRunResponse, ListArtifactsResponse,
  ListExperimentsResponse, LogMetricRequest, LogParamRequest, Metric, Run, RunInfo, RunStatus, SearchClause,
  SearchRunsRequest, SearchRunsResponse, UpdateRunRequest,
};
use super::uri::{parse_tracking_uri, provider_for, tracking_uri_from_env};
use crate::creds::{HostCredsProvider, SourceRegistry};
use crate::error::{ClientError, Result};
use crate::http::HttpCaller;

/// Path prefix of every tracking endpoint.
pub const API_BASE_PATH: &str = "api/2.0/preview/mlflow";

/// MLflow tracking API client.
#[derive(Clone)]
pub struct ApiClient {
  caller: HttpCaller,
}

impl ApiClient {
  /// Create a client for a tracking URI (`http(s)://…`, `databricks`, or
  /// `databricks://<profile>`).
  ///
  /// # Errors
  /// Returns an error for unsupported URIs or if the HTTP client cannot be
  /// built. Credential problems surface on the first request.
  pub fn from_tracking_uri(tracking_uri: &str) -> Result<Self> {
    Self::from_tracking_uri_with_timeout(tracking_uri, None)
  }

  /// Like [`from_tracking_uri`](Self::from_tracking_uri) with a transport
  /// timeout applied to every request.
  pub fn from_tracking_uri_with_timeout(tracking_uri: &str, timeout: Option<Duration>) -> Result<Self> {
    let target = parse_tracking_uri(tracking_uri)?;
    let provider = provider_for(&target, SourceRegistry::global());
    tracing::debug!(uri = %tracking_uri, provider = %provider.name(), "Selected credential provider");
    Self::from_provider(provider, timeout)
  }

  /// Create a client from `MLFLOW_TRACKING_URI`.
  ///
  /// # Errors
  /// Fails with a configuration-unavailable error when the variable is unset.
  pub fn default_client() -> Result<Self> {
    let uri = tracking_uri_from_env()?;
    Self::from_tracking_uri(&uri)
  }

  /// Create a client backed by an arbitrary credential provider.
  pub fn from_provider(provider: Arc<dyn HostCredsProvider>, timeout: Option<Duration>) -> Result<Self> {
    Ok(Self {
      caller: HttpCaller::new(provider, API_BASE_PATH, timeout)?,
    })
  }

  /// The underlying HTTP caller.
  pub fn caller(&self) -> &HttpCaller {
    &self.caller
  }

  /// Drop any cached credentials so the next request re-resolves them.
  pub fn refresh_credentials(&self) -> Result<()> {
    self.caller.refresh_credentials()
  }

  /// Raw GET against an endpoint path.
  pub async fn get(&self, path: &str) -> Result<String> {
    self.caller.get(path, &[]).await
  }

  /// Raw POST of a JSON document to an endpoint path.
  pub async fn post(&self, path: &str, json: &str) -> Result<String> {
    self.caller.post(path, json).await
  }

  async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
    let body = self.caller.get(path, query).await?;
    decode(path, &body)
  }

  async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, request: &B) -> Result<T> {
    let json = serde_json::to_string(request).map_err(|source| ClientError::Json {
      endpoint: path.to_string(),
      source,
    })?;
    let body = self.caller.post(path, json).await?;
    decode(path, &body)
  }
}

fn decode<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T> {
  // Empty-message endpoints may answer with an empty body.
  let body = if body.trim().is_empty() { "{}" } else { body };
  serde_json::from_str(body).map_err(|source| ClientError::Json {
    endpoint: endpoint.to_string(),
    source,
  })
}

#[async_trait]
impl TrackingApi for ApiClient {
  async fn get_experiment(&self, experiment_id: &str) -> Result<GetExperimentResponse> {
    self
      .get_json("experiments/get", &[("experiment_id", experiment_id)])
      .await
  }

  async fn list_experiments(&self) -> Result<Vec<Experiment>> {
    let response: ListExperimentsResponse = self.get_json("experiments/list", &[]).await?;
    Ok(response.experiments)
  }

  async fn create_experiment(&self, name: &str) -> Result<String> {
    let request = CreateExperimentRequest { name: name.to_string() };
    let response: CreateExperimentResponse = self.post_json("experiments/create", &request).await?;
    Ok(response.experiment_id)
  }

  async fn get_run(&self, run_id: &str) -> Result<Run> {
    let response: GetRunResponse = self
      .get_json("runs/get", &[("run_id", run_id), ("run_uuid", run_id)])
      .await?;
    Ok(response.run)
  }

  async fn create_run(&self, request: &CreateRunRequest) -> Result<RunInfo> {
    let response: CreateRunResponse = self.post_json("runs/create", request).await?;
    Ok(response.run.info)
  }

  async fn update_run(&self, run_id: &str, status: RunStatus, end_time: i64) -> Result<()> {
    let request = UpdateRunRequest {
      run_id: run_id.to_string(),
      run_uuid: run_id.to_string(),
      status,
      end_time,
    };
    let _: serde_json::Value = self.post_json("runs/update", &request).await?;
    Ok(())
  }

  async fn log_parameter(&self, run_id: &str, key: &str, value: &str) -> Result<()> {
    let request = LogParamRequest {
      run_id: run_id.to_string(),
      run_uuid: run_id.to_string(),
      key: key.to_string(),
      value: value.to_string(),
    };
    let _: serde_json::Value = self.post_json("runs/log-parameter", &request).await?;
    Ok(())
  }

  async fn log_metric(&self, run_id: &str, key: &str, value: f64) -> Result<()> {
    let request = LogMetricRequest {
      run_id: run_id.to_string(),
      run_uuid: run_id.to_string(),
      key: key.to_string(),
      value,
      timestamp: chrono::Utc::now().timestamp_millis(),
      step: 0,
    };
    let _: serde_json::Value = self.post_json("runs/log-metric", &request).await?;
    Ok(())
  }

  async fn get_metric(&self, run_id: &str, metric_key: &str) -> Result<Metric> {
    let response: GetMetricResponse = self
      .get_json(
        "metrics/get",
        &[("run_id", run_id), ("run_uuid", run_id), ("metric_key", metric_key)],
      )
      .await?;
    Ok(response.metric)
  }

  async fn get_metric_history(&self, run_id: &str, metric_key: &str) -> Result<Vec<Metric>> {
    let response: GetMetricHistoryResponse = self
      .get_json(
        "metrics/get-history",
        &[("run_id", run_id), ("run_uuid", run_id), ("metric_key", metric_key)],
      )
      .await?;
    Ok(response.metrics)
  }

  async fn search_runs(&self, experiment_ids: &[&str], clauses: &[SearchClause]) -> Result<Vec<Run>> {
    let request = SearchRunsRequest {
      experiment_ids: experiment_ids.iter().map(|id| id.to_string()).collect(),
      anded_expressions: clauses.to_vec(),
    };
    let response: SearchRunsResponse = self.post_json("runs/search", &request).await?;
    Ok(response.runs)
  }

  async fn list_artifacts(&self, run_id: &str, path: Option<&str>) -> Result<ListArtifactsResponse> {
    let mut query = vec![("run_id", run_id), ("run_uuid", run_id)];
    if let Some(path) = path {
      query.push(("path", path));
    }
    self.get_json("artifacts/list", &query).await
  }

  async fn get_artifact(&self, run_id: &str, path: &str) -> Result<Vec<u8>> {
    self
      .caller
      .get_bytes("artifacts/get", &[("run_id", run_id), ("run_uuid", run_id), ("path", path)])
      .await
  }
}

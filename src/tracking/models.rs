//! Data transfer objects exchanged with the MLflow tracking REST API.

use serde::{Deserialize, Deserializer, Serialize};

/// An experiment groups runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
  /// Server-assigned identifier.
  pub experiment_id: String,
  /// Unique human-readable name.
  pub name: String,
  /// Root location for artifacts of runs in this experiment.
  #[serde(default)]
  pub artifact_location: Option<String>,
  /// `"active"` or `"deleted"`.
  #[serde(default)]
  pub lifecycle_stage: Option<String>,
  #[serde(default, deserialize_with = "lenient_i64::option")]
  pub creation_time: Option<i64>,
  #[serde(default, deserialize_with = "lenient_i64::option")]
  pub last_update_time: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListExperimentsResponse {
  #[serde(default)]
  pub experiments: Vec<Experiment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetExperimentResponse {
  pub experiment: Experiment,
  /// Runs listed by older servers alongside the experiment.
  #[serde(default)]
  pub runs: Vec<RunInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExperimentRequest {
  pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExperimentResponse {
  pub experiment_id: String,
}

/// Lifecycle state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
  Running,
  Scheduled,
  Finished,
  Failed,
  Killed,
}

/// Run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInfo {
  #[serde(default)]
  pub run_id: Option<String>,
  /// Legacy identifier field still sent by some servers.
  #[serde(default)]
  pub run_uuid: Option<String>,
  pub experiment_id: String,
  #[serde(default)]
  pub status: Option<RunStatus>,
  #[serde(default, deserialize_with = "lenient_i64::option")]
  pub start_time: Option<i64>,
  #[serde(default, deserialize_with = "lenient_i64::option")]
  pub end_time: Option<i64>,
  #[serde(default)]
  pub artifact_uri: Option<String>,
  #[serde(default)]
  pub lifecycle_stage: Option<String>,
}

impl RunInfo {
  /// The run identifier, preferring `run_id` over the legacy `run_uuid`.
  pub fn id(&self) -> Option<&str> {
    self.run_id.as_deref().or(self.run_uuid.as_deref())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
  pub key: String,
  pub value: f64,
  #[serde(deserialize_with = "lenient_i64::required")]
  pub timestamp: i64,
  #[serde(default, deserialize_with = "lenient_i64::required")]
  pub step: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
  pub key: String,
  pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTag {
  pub key: String,
  pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunData {
  #[serde(default)]
  pub metrics: Vec<Metric>,
  #[serde(default)]
  pub params: Vec<Param>,
  #[serde(default)]
  pub tags: Vec<RunTag>,
}

/// A run with its metadata and logged data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
  pub info: RunInfo,
  #[serde(default)]
  pub data: RunData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRunResponse {
  pub run: Run,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRunRequest {
  pub run_id: String,
  pub run_uuid: String,
  pub status: RunStatus,
  pub end_time: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogParamRequest {
  pub run_id: String,
  pub run_uuid: String,
  pub key: String,
  pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogMetricRequest {
  pub run_id: String,
  pub run_uuid: String,
  pub key: String,
  pub value: f64,
  pub timestamp: i64,
  pub step: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetMetricHistoryResponse {
  #[serde(default)]
  pub metrics: Vec<Metric>,
}

/// A file or directory under a run's artifact root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
  pub path: String,
  #[serde(default)]
  pub is_dir: bool,
  #[serde(default, deserialize_with = "lenient_i64::option")]
  pub file_size: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListArtifactsResponse {
  #[serde(default)]
  pub root_uri: Option<String>,
  #[serde(default)]
  pub files: Vec<FileInfo>,
}

/// Where a run's code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
  Notebook,
  Job,
  Project,
  Local,
  Unknown,
}

/// Body of `runs/create`. Only `experiment_id` is required; unset fields are
/// omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRunRequest {
  pub experiment_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub user_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub run_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_type: Option<SourceType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub entry_point_name: Option<String>,
  /// Epoch milliseconds.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub start_time: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub source_version: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tags: Vec<RunTag>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parent_run_id: Option<String>,
}

impl CreateRunRequest {
  pub fn new(experiment_id: impl Into<String>) -> Self {
    Self {
      experiment_id: experiment_id.into(),
      ..Self::default()
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunResponse {
  pub run: Run,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMetricResponse {
  pub metric: Metric,
}

/// Comparison against a metric's latest value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatClause {
  /// One of `>`, `>=`, `=`, `!=`, `<=`, `<`.
  pub comparator: String,
  pub value: f64,
}

/// Comparison against a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringClause {
  /// `=` or `!=`.
  pub comparator: String,
  pub value: String,
}

/// One condition of a run search. All clauses of a search must hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchClause {
  Metric { key: String, float: FloatClause },
  Parameter { key: String, string: StringClause },
}

impl SearchClause {
  /// `metric.<key> <comparator> <value>`
  pub fn metric(key: impl Into<String>, comparator: impl Into<String>, value: f64) -> Self {
    Self::Metric {
      key: key.into(),
      float: FloatClause {
        comparator: comparator.into(),
        value,
      },
    }
  }

  /// `params.<key> <comparator> <value>`
  pub fn param(key: impl Into<String>, comparator: impl Into<String>, value: impl Into<String>) -> Self {
    Self::Parameter {
      key: key.into(),
      string: StringClause {
        comparator: comparator.into(),
        value: value.into(),
      },
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRunsRequest {
  pub experiment_ids: Vec<String>,
  pub anded_expressions: Vec<SearchClause>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRunsResponse {
  #[serde(default)]
  pub runs: Vec<Run>,
}

/// Proto3 JSON encodes int64 as strings; some servers send plain numbers.
/// Accept both.
mod lenient_i64 {
  use super::*;

  #[derive(Deserialize)]
  #[serde(untagged)]
  enum NumOrString {
    Num(i64),
    Str(String),
  }

  impl NumOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
      match self {
        Self::Num(n) => Ok(n),
        Self::Str(s) => s.trim().parse().map_err(E::custom),
      }
    }
  }

  pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    NumOrString::deserialize(deserializer)?.into_i64()
  }

  pub fn option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Option::<NumOrString>::deserialize(deserializer)?
      .map(NumOrString::into_i64)
      .transpose()
  }
}

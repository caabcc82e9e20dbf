//! In-memory implementation of [`TrackingApi`] for testing the trait's
//! provided methods without a server.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mlflow_client::tracking::{
  CreateRunRequest, Experiment, GetExperimentResponse, ListArtifactsResponse, Metric, Param, Run, RunData, RunInfo,
  RunStatus, SearchClause, TrackingApi,
};
use mlflow_client::{ClientError, Result};

/// A fake tracking server holding experiments and runs in memory.
#[derive(Default)]
pub struct FakeTrackingApi {
  experiments: Mutex<Vec<Experiment>>,
  runs: Mutex<HashMap<String, Run>>,
  metrics: Mutex<Vec<(String, Metric)>>,
  next_id: AtomicUsize,
  create_calls: AtomicUsize,
  fail_with_status: Option<u16>,
}

impl FakeTrackingApi {
  pub fn new() -> Self {
    Self {
      next_id: AtomicUsize::new(100),
      ..Self::default()
    }
  }

  /// A fake whose every call fails with the given HTTP status.
  pub fn failing(status: u16) -> Self {
    Self {
      fail_with_status: Some(status),
      ..Self::new()
    }
  }

  pub fn with_experiment(self, id: &str, name: &str) -> Self {
    self.experiments.lock().unwrap().push(Experiment {
      experiment_id: id.to_string(),
      name: name.to_string(),
      artifact_location: None,
      lifecycle_stage: Some("active".to_string()),
      creation_time: None,
      last_update_time: None,
    });
    self
  }

  pub fn with_run(self, run_id: &str, experiment_id: &str) -> Self {
    self.insert_run(run_id, experiment_id, Some(0));
    self
  }

  fn insert_run(&self, run_id: &str, experiment_id: &str, start_time: Option<i64>) -> RunInfo {
    let info = RunInfo {
      run_id: Some(run_id.to_string()),
      run_uuid: None,
      experiment_id: experiment_id.to_string(),
      status: Some(RunStatus::Running),
      start_time,
      end_time: None,
      artifact_uri: None,
      lifecycle_stage: Some("active".to_string()),
    };
    self.runs.lock().unwrap().insert(
      run_id.to_string(),
      Run {
        info: info.clone(),
        data: RunData::default(),
      },
    );
    info
  }

  /// Number of `create_experiment` calls seen.
  pub fn create_calls(&self) -> usize {
    self.create_calls.load(Ordering::SeqCst)
  }

  fn check(&self) -> Result<()> {
    match self.fail_with_status {
      Some(status) => Err(ClientError::HttpStatus {
        host: "fake".to_string(),
        status,
        body: "fake failure".to_string(),
      }),
      None => Ok(()),
    }
  }

  fn not_found(what: &str) -> ClientError {
    ClientError::HttpStatus {
      host: "fake".to_string(),
      status: 404,
      body: format!("{what} not found"),
    }
  }

  fn matches(run: &Run, clause: &SearchClause) -> bool {
    match clause {
      SearchClause::Metric { key, float } => {
        let Some(latest) = run.data.metrics.iter().rev().find(|m| &m.key == key) else {
          return false;
        };
        match float.comparator.as_str() {
          ">" => latest.value > float.value,
          ">=" => latest.value >= float.value,
          "<" => latest.value < float.value,
          "<=" => latest.value <= float.value,
          "=" => latest.value == float.value,
          "!=" => latest.value != float.value,
          _ => false,
        }
      }
      SearchClause::Parameter { key, string } => {
        let value = run.data.params.iter().find(|p| &p.key == key).map(|p| p.value.as_str());
        match string.comparator.as_str() {
          "=" => value == Some(string.value.as_str()),
          "!=" => value.is_some_and(|v| v != string.value),
          _ => false,
        }
      }
    }
  }

  fn with_run_mut<T>(&self, run_id: &str, f: impl FnOnce(&mut Run) -> T) -> Result<T> {
    let mut runs = self.runs.lock().unwrap();
    let run = runs.get_mut(run_id).ok_or_else(|| Self::not_found(run_id))?;
    Ok(f(run))
  }
}

#[async_trait]
impl TrackingApi for FakeTrackingApi {
  async fn get_experiment(&self, experiment_id: &str) -> Result<GetExperimentResponse> {
    self.check()?;
    let experiment = self
      .experiments
      .lock()
      .unwrap()
      .iter()
      .find(|e| e.experiment_id == experiment_id)
      .cloned()
      .ok_or_else(|| Self::not_found(experiment_id))?;
    let runs = self
      .runs
      .lock()
      .unwrap()
      .values()
      .filter(|run| run.info.experiment_id == experiment_id)
      .map(|run| run.info.clone())
      .collect();
    Ok(GetExperimentResponse { experiment, runs })
  }

  async fn list_experiments(&self) -> Result<Vec<Experiment>> {
    self.check()?;
    Ok(self.experiments.lock().unwrap().clone())
  }

  async fn create_experiment(&self, name: &str) -> Result<String> {
    self.check()?;
    self.create_calls.fetch_add(1, Ordering::SeqCst);
    let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
    self.experiments.lock().unwrap().push(Experiment {
      experiment_id: id.clone(),
      name: name.to_string(),
      artifact_location: None,
      lifecycle_stage: Some("active".to_string()),
      creation_time: None,
      last_update_time: None,
    });
    Ok(id)
  }

  async fn get_run(&self, run_id: &str) -> Result<Run> {
    self.check()?;
    self.with_run_mut(run_id, |run| run.clone())
  }

  async fn create_run(&self, request: &CreateRunRequest) -> Result<RunInfo> {
    self.check()?;
    let run_id = format!("run-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
    Ok(self.insert_run(&run_id, &request.experiment_id, request.start_time))
  }

  async fn update_run(&self, run_id: &str, status: RunStatus, end_time: i64) -> Result<()> {
    self.check()?;
    self.with_run_mut(run_id, |run| {
      run.info.status = Some(status);
      run.info.end_time = Some(end_time);
    })
  }

  async fn log_parameter(&self, run_id: &str, key: &str, value: &str) -> Result<()> {
    self.check()?;
    self.with_run_mut(run_id, |run| {
      run.data.params.push(Param {
        key: key.to_string(),
        value: value.to_string(),
      });
    })
  }

  async fn log_metric(&self, run_id: &str, key: &str, value: f64) -> Result<()> {
    self.check()?;
    let metric = Metric {
      key: key.to_string(),
      value,
      timestamp: 0,
      step: 0,
    };
    self.with_run_mut(run_id, |run| run.data.metrics.push(metric.clone()))?;
    self.metrics.lock().unwrap().push((run_id.to_string(), metric));
    Ok(())
  }

  async fn get_metric(&self, run_id: &str, metric_key: &str) -> Result<Metric> {
    self.check()?;
    self
      .metrics
      .lock()
      .unwrap()
      .iter()
      .rev()
      .find(|(id, metric)| id == run_id && metric.key == metric_key)
      .map(|(_, metric)| metric.clone())
      .ok_or_else(|| Self::not_found(metric_key))
  }

  async fn get_metric_history(&self, run_id: &str, metric_key: &str) -> Result<Vec<Metric>> {
    self.check()?;
    Ok(
      self
        .metrics
        .lock()
        .unwrap()
        .iter()
        .filter(|(id, metric)| id == run_id && metric.key == metric_key)
        .map(|(_, metric)| metric.clone())
        .collect(),
    )
  }

  async fn search_runs(&self, experiment_ids: &[&str], clauses: &[SearchClause]) -> Result<Vec<Run>> {
    self.check()?;
    let mut runs: Vec<Run> = self
      .runs
      .lock()
      .unwrap()
      .values()
      .filter(|run| experiment_ids.contains(&run.info.experiment_id.as_str()))
      .filter(|run| clauses.iter().all(|clause| Self::matches(run, clause)))
      .cloned()
      .collect();
    runs.sort_by(|a, b| a.info.run_id.cmp(&b.info.run_id));
    Ok(runs)
  }

  async fn list_artifacts(&self, _run_id: &str, _path: Option<&str>) -> Result<ListArtifactsResponse> {
    self.check()?;
    Ok(ListArtifactsResponse::default())
  }

  async fn get_artifact(&self, run_id: &str, _path: &str) -> Result<Vec<u8>> {
    self.check()?;
    Err(Self::not_found(&format!("artifacts of {run_id}")))
  }
}

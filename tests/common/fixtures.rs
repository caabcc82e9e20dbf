//! Sample MLflow tracking API payloads.

use serde_json::json;

pub fn list_experiments_response() -> serde_json::Value {
  json!({
    "experiments": [
      {
        "experiment_id": "0",
        "name": "Default",
        "artifact_location": "dbfs:/databricks/mlflow-tracking/0",
        "lifecycle_stage": "active"
      },
      {
        "experiment_id": "1834",
        "name": "/Users/someone@example.com/churn",
        "artifact_location": "dbfs:/databricks/mlflow-tracking/1834",
        "lifecycle_stage": "active",
        "creation_time": "1700000000000",
        "last_update_time": 1700000500000i64
      }
    ]
  })
}

pub fn create_experiment_response(id: &str) -> serde_json::Value {
  json!({ "experiment_id": id })
}

pub fn get_run_response() -> serde_json::Value {
  json!({
    "run": {
      "info": {
        "run_uuid": "5b1f0c3d",
        "experiment_id": "1834",
        "status": "FINISHED",
        "start_time": "1700000100000",
        "end_time": "1700000200000",
        "artifact_uri": "dbfs:/databricks/mlflow-tracking/1834/5b1f0c3d/artifacts",
        "lifecycle_stage": "active"
      },
      "data": {
        "metrics": [
          { "key": "auc", "value": 0.91, "timestamp": "1700000150000", "step": "3" }
        ],
        "params": [
          { "key": "max_depth", "value": "6" }
        ],
        "tags": [
          { "key": "mlflow.source.type", "value": "NOTEBOOK" }
        ]
      }
    }
  })
}

pub fn create_run_response(run_id: &str) -> serde_json::Value {
  json!({
    "run": {
      "info": {
        "run_id": run_id,
        "run_uuid": run_id,
        "experiment_id": "1834",
        "status": "RUNNING",
        "start_time": "1700000100000",
        "lifecycle_stage": "active"
      },
      "data": {}
    }
  })
}

pub fn get_metric_response() -> serde_json::Value {
  json!({
    "metric": { "key": "auc", "value": 0.93, "timestamp": "1700000160000", "step": "4" }
  })
}

pub fn search_runs_response() -> serde_json::Value {
  json!({
    "runs": [
      {
        "info": { "run_uuid": "a1", "experiment_id": "1834", "status": "FINISHED" },
        "data": {
          "metrics": [{ "key": "auc", "value": 0.95, "timestamp": "1700000150000", "step": "0" }]
        }
      }
    ]
  })
}

pub fn list_artifacts_response() -> serde_json::Value {
  json!({
    "root_uri": "dbfs:/databricks/mlflow-tracking/1834/5b1f0c3d/artifacts",
    "files": [
      { "path": "model", "is_dir": true },
      { "path": "model.pkl", "is_dir": false, "file_size": "2048" }
    ]
  })
}

pub fn error_response(code: &str, message: &str) -> serde_json::Value {
  json!({ "error_code": code, "message": message })
}

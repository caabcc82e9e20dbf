//! Tracking module providing the API abstraction, the HTTP-backed client,
//! REST data models, and tracking URI parsing.

pub mod api;
pub mod client;
pub mod models;
pub mod uri;

pub use api::TrackingApi;
pub use client::{API_BASE_PATH, ApiClient};
pub use models::{
  CreateRunRequest, Experiment, FileInfo, FloatClause, GetExperimentResponse, ListArtifactsResponse, Metric, Param, Run,
  RunData, RunInfo, RunStatus, RunTag, SearchClause, SourceType, StringClause,
};
pub use uri::{TRACKING_URI_ENV, TrackingTarget, parse_tracking_uri, provider_for, tracking_uri_from_env};

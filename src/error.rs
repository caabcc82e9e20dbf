//! Error types surfaced by the tracking client.

use crate::creds::CredsError;

/// Errors returned by [`HttpCaller`](crate::http::HttpCaller) and
/// [`ApiClient`](crate::tracking::ApiClient).
///
/// Nothing is retried internally; every variant carries enough detail (host,
/// status, underlying cause) for the caller to decide on its own retry policy.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
  /// Host credentials could not be resolved.
  #[error(transparent)]
  Credentials(#[from] CredsError),

  /// The request never produced a response (DNS, connect, TLS, timeout).
  #[error("request to {host} failed: {source}")]
  Transport {
    host: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-2xx status.
  #[error("{host} returned HTTP {status}: {body}")]
  HttpStatus { host: String, status: u16, body: String },

  /// The resolved host and path do not form a valid URL.
  #[error("invalid request URL for host {host}: {source}")]
  InvalidUrl {
    host: String,
    #[source]
    source: url::ParseError,
  },

  /// A request body could not be encoded or a response body decoded.
  #[error("invalid JSON for {endpoint}: {source}")]
  Json {
    endpoint: String,
    #[source]
    source: serde_json::Error,
  },

  /// The tracking URI uses an unrecognised scheme.
  #[error("invalid tracking server URI: '{0}'")]
  InvalidTrackingUri(String),

  /// The tracking URI points at a local file store.
  #[error("local tracking URIs are not supported, point to a tracking server instead: '{0}'")]
  LocalTrackingUnsupported(String),

  /// The HTTP transport could not be constructed.
  #[error("failed to create HTTP client: {0}")]
  ClientBuild(#[source] reqwest::Error),
}

impl ClientError {
  /// HTTP status code, when the server produced a response.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::HttpStatus { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Whether this is a network-level failure rather than a server answer.
  pub fn is_transport(&self) -> bool {
    matches!(self, Self::Transport { .. })
  }
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

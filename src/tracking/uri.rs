//! Helpers for turning a tracking URI into a credential provider.
//!
//! Supported forms:
//! - `http://host:port` / `https://host` → a fixed tracking server.
//! - `databricks` → the default Databricks profile.
//! - `databricks://<profile>` → a named Databricks profile.
//!
//! Local file stores (`file:///…` or bare paths) and any other scheme are
//! rejected before a provider is built.

use std::sync::Arc;

use url::Url;

use crate::creds::{
  BasicProvider, ConfigFileProvider, CredsError, DATABRICKS_SOURCE, DynamicProvider, HostCredsProvider, ProviderChain,
  SourceRegistry,
};
use crate::error::{ClientError, Result};

/// Environment variable holding the default tracking URI.
pub const TRACKING_URI_ENV: &str = "MLFLOW_TRACKING_URI";

const DATABRICKS_SCHEME: &str = "databricks";

/// Where a tracking URI points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackingTarget {
  /// A tracking server reachable at this base URL.
  Server(String),
  /// A Databricks workspace, optionally through a named config profile.
  Databricks { profile: Option<String> },
}

/// Parse a tracking URI into a [`TrackingTarget`].
///
/// # Errors
/// Returns [`ClientError::LocalTrackingUnsupported`] for file stores and
/// [`ClientError::InvalidTrackingUri`] for unrecognised schemes.
pub fn parse_tracking_uri(uri: &str) -> Result<TrackingTarget> {
  let trimmed = uri.trim();

  if trimmed == DATABRICKS_SCHEME {
    return Ok(TrackingTarget::Databricks { profile: None });
  }

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(url::ParseError::RelativeUrlWithoutBase) => {
      return Err(ClientError::LocalTrackingUnsupported(uri.to_string()));
    }
    Err(_) => return Err(ClientError::InvalidTrackingUri(uri.to_string())),
  };

  match parsed.scheme() {
    "http" | "https" => Ok(TrackingTarget::Server(trimmed.trim_end_matches('/').to_string())),
    DATABRICKS_SCHEME => {
      let profile = parsed.host_str().filter(|h| !h.is_empty()).map(str::to_string);
      Ok(TrackingTarget::Databricks { profile })
    }
    "file" => Err(ClientError::LocalTrackingUnsupported(uri.to_string())),
    // Windows drive letters (`C:\mlruns`) parse as one-letter schemes.
    scheme if scheme.len() == 1 => Err(ClientError::LocalTrackingUnsupported(uri.to_string())),
    _ => Err(ClientError::InvalidTrackingUri(uri.to_string())),
  }
}

/// Build the credential provider for a target.
///
/// Databricks targets get a chain preferring a runtime source registered in
/// `registry` over the config file profile.
pub fn provider_for(target: &TrackingTarget, registry: &SourceRegistry) -> Arc<dyn HostCredsProvider> {
  match target {
    TrackingTarget::Server(host) => Arc::new(BasicProvider::new(host.clone())),
    TrackingTarget::Databricks { profile } => {
      let mut chain = ProviderChain::default();
      if let Some(dynamic) = DynamicProvider::from_registry(registry, DATABRICKS_SOURCE) {
        chain = chain.with(dynamic);
      }
      Arc::new(chain.with(ConfigFileProvider::new(profile.as_deref())))
    }
  }
}

/// Read the default tracking URI from [`TRACKING_URI_ENV`].
///
/// This is the only place the library consults the environment for the
/// tracking URI.
///
/// # Errors
/// Returns [`CredsError::Unavailable`] when the variable is unset or blank.
pub fn tracking_uri_from_env() -> Result<String> {
  match std::env::var(TRACKING_URI_ENV) {
    Ok(uri) if !uri.trim().is_empty() => Ok(uri),
    _ => Err(
      CredsError::Unavailable(format!(
        "the default client requires {TRACKING_URI_ENV} to be set; use ApiClient::from_tracking_uri instead"
      ))
      .into(),
    ),
  }
}

//! Host credential resolution for the MLflow tracking API.
//!
//! This module provides a trait-based interface for discovering the tracking
//! host and its authentication material from several sources:
//!
//! - [`BasicProvider`]: an explicit `http(s)://` URI.
//! - [`ConfigFileProvider`]: a profile in `~/.databrickscfg`.
//! - [`DynamicProvider`]: a settings callback registered by a host runtime.
//! - [`ProviderChain`]: first-success fallback across any of the above.
//!
//! Store a Databricks profile in `~/.databrickscfg`:
//! ```text
//! [DEFAULT]
//! host = https://my-workspace.cloud.databricks.com
//! token = dapi0123456789abcdef
//! ```

mod basic;
mod chain;
mod config_file;
mod dynamic;
mod provider;
mod types;

pub use basic::BasicProvider;
pub use chain::ProviderChain;
pub use config_file::{CONFIG_FILE_ENV, ConfigFileProvider, DEFAULT_PROFILE, default_config_path};
pub use dynamic::{DATABRICKS_SOURCE, DynamicProvider, SettingsSource, SourceRegistry};
pub use provider::HostCredsProvider;
pub use types::{Auth, CredsError, HostCreds, ProviderFailure};

//! Host credential provider abstractions.
//!
//! Defines the [`HostCredsProvider`] trait so different credential backends
//! (explicit URIs, the Databricks config file, runtime-injected sources, and
//! chains of those) can plug into the HTTP layer without changing call sites.

use std::sync::Arc;

use super::{CredsError, HostCreds};

/// A source of [`HostCreds`].
///
/// Implementations must tolerate concurrent calls to [`resolve`] and
/// [`refresh`]; each resolution returns an independent snapshot.
///
/// [`resolve`]: HostCredsProvider::resolve
/// [`refresh`]: HostCredsProvider::refresh
pub trait HostCredsProvider: Send + Sync {
  /// Identifier used in logs and chain failure reports.
  fn name(&self) -> String;

  /// Resolve the current credentials.
  ///
  /// # Returns
  /// * `Ok(HostCreds)` with whatever the source currently holds. The value may
  ///   carry an empty host, which callers treat as "not available".
  ///
  /// # Errors
  /// Returns `Err(CredsError)` when the source is missing or malformed.
  fn resolve(&self) -> Result<HostCreds, CredsError>;

  /// Drop any cached state so the next [`resolve`](Self::resolve) re-derives
  /// credentials. Safe to call before any resolution has happened.
  fn refresh(&self) -> Result<(), CredsError> {
    Ok(())
  }
}

impl<P: HostCredsProvider + ?Sized> HostCredsProvider for Arc<P> {
  fn name(&self) -> String {
    (**self).name()
  }

  fn resolve(&self) -> Result<HostCreds, CredsError> {
    (**self).resolve()
  }

  fn refresh(&self) -> Result<(), CredsError> {
    (**self).refresh()
  }
}

impl<P: HostCredsProvider + ?Sized> HostCredsProvider for Box<P> {
  fn name(&self) -> String {
    (**self).name()
  }

  fn resolve(&self) -> Result<HostCreds, CredsError> {
    (**self).resolve()
  }

  fn refresh(&self) -> Result<(), CredsError> {
    (**self).refresh()
  }
}

//! Static credentials built from an explicit tracking URI.

use super::{CredsError, HostCreds, HostCredsProvider};

/// A provider that always returns the same credentials.
///
/// Used for plain `http://` and `https://` tracking URIs, optionally with
/// static auth attached by the caller.
#[derive(Debug, Clone)]
pub struct BasicProvider {
  creds: HostCreds,
}

impl BasicProvider {
  /// Creates a provider for `host` with no authentication.
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      creds: HostCreds::new(host),
    }
  }

  /// Creates a provider returning the given credentials verbatim.
  pub fn from_creds(creds: HostCreds) -> Self {
    Self { creds }
  }
}

impl HostCredsProvider for BasicProvider {
  fn name(&self) -> String {
    format!("basic({})", self.creds.host())
  }

  fn resolve(&self) -> Result<HostCreds, CredsError> {
    Ok(self.creds.clone())
  }
}

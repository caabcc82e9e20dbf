//! First-success fallback across several credential providers.

use super::{CredsError, HostCreds, HostCredsProvider, ProviderFailure};

/// An ordered list of providers consulted until one yields a usable host.
///
/// The chain owns no credentials of its own, only the ordering. It lets a
/// client prefer a runtime-injected source over a static profile without the
/// caller knowing which one is active.
#[derive(Default)]
pub struct ProviderChain {
  providers: Vec<Box<dyn HostCredsProvider>>,
}

impl ProviderChain {
  /// Creates a chain consulting `providers` in order.
  pub fn new(providers: Vec<Box<dyn HostCredsProvider>>) -> Self {
    Self { providers }
  }

  /// Appends a provider to the end of the chain.
  pub fn with(mut self, provider: impl HostCredsProvider + 'static) -> Self {
    self.providers.push(Box::new(provider));
    self
  }

  pub fn len(&self) -> usize {
    self.providers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.providers.is_empty()
  }
}

impl HostCredsProvider for ProviderChain {
  fn name(&self) -> String {
    let names: Vec<String> = self.providers.iter().map(|p| p.name()).collect();
    format!("chain[{}]", names.join(", "))
  }

  /// Returns the first credentials with a non-empty host.
  ///
  /// Providers after the first success are not consulted. A provider that
  /// errors or yields no host is recorded and skipped.
  ///
  /// # Errors
  /// Returns [`CredsError::ChainExhausted`] with one entry per provider, in
  /// chain order, when none produced usable credentials.
  fn resolve(&self) -> Result<HostCreds, CredsError> {
    let mut failures = Vec::with_capacity(self.providers.len());

    for provider in &self.providers {
      let name = provider.name();

      match provider.resolve() {
        Ok(creds) if creds.is_available() => {
          tracing::debug!(provider = %name, "Loaded host credentials");
          return Ok(creds);
        }
        Ok(_) => {
          let err = CredsError::MissingHost { provider: name.clone() };
          tracing::debug!(provider = %name, "Provider returned credentials without a host");
          failures.push(ProviderFailure {
            provider: name,
            message: err.to_string(),
          });
        }
        Err(err) => {
          tracing::debug!(provider = %name, error = %err, "Unable to load host credentials");
          failures.push(ProviderFailure {
            provider: name,
            message: err.to_string(),
          });
        }
      }
    }

    Err(CredsError::ChainExhausted { failures })
  }

  /// Refreshes every provider in order.
  ///
  /// A provider failing to refresh is logged and does not stop the remaining
  /// providers from refreshing. The chain itself never reports an error.
  fn refresh(&self) -> Result<(), CredsError> {
    for provider in &self.providers {
      if let Err(err) = provider.refresh() {
        tracing::warn!(provider = %provider.name(), error = %err, "Failed to refresh host credentials");
      }
    }
    Ok(())
  }
}

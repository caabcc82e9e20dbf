//! Runtime-injected credential sources.
//!
//! Managed runtimes (notebooks, jobs) can register a settings callback under a
//! well-known name. [`DynamicProvider`] looks the callback up at construction
//! time and invokes it on every resolution, so credentials always reflect what
//! the host runtime currently holds.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use super::{CredsError, HostCreds, HostCredsProvider};

/// Name under which a Databricks runtime registers its settings source.
pub const DATABRICKS_SOURCE: &str = "databricks.client-settings";

/// A zero-argument callback returning a map of named settings.
///
/// Recognised keys: `host`, `username`, `password`, `token`, and
/// `no-tls-verify` (the string `"true"` enables it).
pub type SettingsSource = Arc<dyn Fn() -> HashMap<String, String> + Send + Sync>;

/// A registry of named settings sources.
///
/// "Not registered" is an ordinary outcome: lookups return `None` so callers
/// can fall back to another provider.
#[derive(Default)]
pub struct SourceRegistry {
  sources: RwLock<HashMap<String, SettingsSource>>,
}

impl SourceRegistry {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self::default()
  }

  /// The process-wide registry that host runtimes register into.
  pub fn global() -> &'static SourceRegistry {
    static GLOBAL: OnceLock<SourceRegistry> = OnceLock::new();
    GLOBAL.get_or_init(SourceRegistry::new)
  }

  /// Registers `source` under `name`, replacing any previous registration.
  pub fn register<F>(&self, name: impl Into<String>, source: F)
  where
    F: Fn() -> HashMap<String, String> + Send + Sync + 'static,
  {
    let name = name.into();
    tracing::debug!(source = %name, "Registering dynamic settings source");
    self
      .sources
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .insert(name, Arc::new(source));
  }

  /// Removes the source registered under `name`, returning whether one existed.
  pub fn unregister(&self, name: &str) -> bool {
    self
      .sources
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .remove(name)
      .is_some()
  }

  /// Looks up the source registered under `name`.
  pub fn lookup(&self, name: &str) -> Option<SettingsSource> {
    self.sources.read().unwrap_or_else(|e| e.into_inner()).get(name).cloned()
  }
}

impl fmt::Debug for SourceRegistry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let sources = self.sources.read().unwrap_or_else(|e| e.into_inner());
    let mut names: Vec<&String> = sources.keys().collect();
    names.sort();
    f.debug_struct("SourceRegistry").field("sources", &names).finish()
  }
}

/// A provider backed by a settings source found in a [`SourceRegistry`].
#[derive(Clone)]
pub struct DynamicProvider {
  name: String,
  source: SettingsSource,
}

impl DynamicProvider {
  /// Returns a provider for the Databricks runtime source in the global
  /// registry, or `None` when no runtime has registered one.
  pub fn create_if_available() -> Option<Self> {
    Self::from_registry(SourceRegistry::global(), DATABRICKS_SOURCE)
  }

  /// Returns a provider for the source registered under `name`, or `None`.
  pub fn from_registry(registry: &SourceRegistry, name: &str) -> Option<Self> {
    match registry.lookup(name) {
      Some(source) => Some(Self {
        name: name.to_string(),
        source,
      }),
      None => {
        tracing::debug!(source = %name, "No dynamic settings source registered");
        None
      }
    }
  }
}

impl fmt::Debug for DynamicProvider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DynamicProvider").field("name", &self.name).finish()
  }
}

impl HostCredsProvider for DynamicProvider {
  fn name(&self) -> String {
    format!("dynamic({})", self.name)
  }

  fn resolve(&self) -> Result<HostCreds, CredsError> {
    let settings = (self.source)();
    let field = |key: &str| settings.get(key).map(String::as_str);

    Ok(HostCreds::from_parts(
      field("host"),
      field("username"),
      field("password"),
      field("token"),
      field("no-tls-verify") == Some("true"),
    ))
  }
}

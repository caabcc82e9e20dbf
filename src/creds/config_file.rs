//! Databricks config file credential discovery.
//!
//! Provides a [`HostCredsProvider`] implementation that reads a named profile
//! from the Databricks CLI configuration file (`~/.databrickscfg` by
//! default). This keeps tokens out of shell history and supports several
//! workspaces through profiles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{CredsError, HostCreds, HostCredsProvider};

/// Profile used when none is named.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// Environment variable overriding the config file location.
pub const CONFIG_FILE_ENV: &str = "DATABRICKS_CONFIG_FILE";

const CONFIG_FILE_NAME: &str = ".databrickscfg";

/// A credentials provider that reads a profile from the Databricks config
/// file.
///
/// # Example profile
///
/// ```text
/// [DEFAULT]
/// host = https://my-workspace.cloud.databricks.com
/// token = dapi0123456789abcdef
///
/// [staging]
/// host = https://staging.example.com
/// username = me@example.com
/// password = secret
/// insecure = true
/// ```
///
/// The parsed profile is cached until [`refresh`](HostCredsProvider::refresh)
/// is called. A read that was already in flight when the refresh happened is
/// returned to its caller but never cached.
#[derive(Debug)]
pub struct ConfigFileProvider {
  path: Option<PathBuf>,
  profile: String,
  cached: RwLock<Option<HostCreds>>,
  /// Bumped by every refresh, under the `cached` write lock.
  generation: AtomicU64,
}

impl ConfigFileProvider {
  /// Creates a provider for `profile` (or [`DEFAULT_PROFILE`]) at the default
  /// config location.
  ///
  /// The location is read from the environment once, here. When it cannot be
  /// determined, [`resolve`](HostCredsProvider::resolve) reports the source
  /// as unavailable.
  pub fn new(profile: Option<&str>) -> Self {
    Self {
      path: default_config_path(),
      profile: profile_or_default(profile),
      cached: RwLock::new(None),
      generation: AtomicU64::new(0),
    }
  }

  /// Creates a provider reading `profile` from an explicit file.
  pub fn with_path(path: impl Into<PathBuf>, profile: Option<&str>) -> Self {
    Self {
      path: Some(path.into()),
      profile: profile_or_default(profile),
      cached: RwLock::new(None),
      generation: AtomicU64::new(0),
    }
  }

  /// Name of the profile this provider reads.
  pub fn profile(&self) -> &str {
    &self.profile
  }

  /// Location of the config file, when known.
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  fn load(&self) -> Result<HostCreds, CredsError> {
    let path = self.path.as_ref().ok_or_else(|| {
      CredsError::Unavailable(format!(
        "cannot locate {CONFIG_FILE_NAME}: neither {CONFIG_FILE_ENV} nor HOME is set"
      ))
    })?;

    if !path.exists() {
      return Err(CredsError::ConfigNotFound { path: path.clone() });
    }

    let content = std::fs::read_to_string(path).map_err(|source| CredsError::Io {
      path: path.clone(),
      source,
    })?;

    parse_profile(&content, &self.profile, path)
  }

  /// Cache `creds` unless a refresh happened since `generation` was taken.
  fn store(&self, generation: u64, creds: &HostCreds) {
    let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
    if self.generation.load(Ordering::SeqCst) == generation {
      *cached = Some(creds.clone());
    } else {
      tracing::debug!(profile = %self.profile, "Discarding credentials read before a refresh");
    }
  }
}

impl HostCredsProvider for ConfigFileProvider {
  fn name(&self) -> String {
    format!("config-file({})", self.profile)
  }

  fn resolve(&self) -> Result<HostCreds, CredsError> {
    if let Some(creds) = self.cached.read().unwrap_or_else(|e| e.into_inner()).as_ref() {
      return Ok(creds.clone());
    }

    let generation = self.generation.load(Ordering::SeqCst);
    let creds = self.load()?;
    self.store(generation, &creds);
    Ok(creds)
  }

  fn refresh(&self) -> Result<(), CredsError> {
    let mut cached = self.cached.write().unwrap_or_else(|e| e.into_inner());
    self.generation.fetch_add(1, Ordering::SeqCst);
    *cached = None;
    Ok(())
  }
}

fn profile_or_default(profile: Option<&str>) -> String {
  profile
    .map(str::trim)
    .filter(|p| !p.is_empty())
    .unwrap_or(DEFAULT_PROFILE)
    .to_string()
}

/// Default config file location: `$DATABRICKS_CONFIG_FILE`, else
/// `$HOME/.databrickscfg`.
pub fn default_config_path() -> Option<PathBuf> {
  if let Ok(path) = std::env::var(CONFIG_FILE_ENV)
    && !path.trim().is_empty()
  {
    return Some(PathBuf::from(path));
  }

  std::env::var("HOME")
    .ok()
    .map(|home| Path::new(&home).join(CONFIG_FILE_NAME))
}

/// Parses an INI-style config file and builds credentials for `profile`.
///
/// The format is:
/// ```text
/// [profile-name]
/// key = value
/// ```
///
/// Lines starting with `#` or `;` are comments. Repeated sections are merged,
/// later keys winning.
fn parse_profile(content: &str, profile: &str, path: &Path) -> Result<HostCreds, CredsError> {
  let malformed = |message: String| CredsError::MalformedConfig {
    path: path.to_path_buf(),
    message,
  };

  let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
  let mut current: Option<String> = None;

  for (idx, line) in content.lines().enumerate() {
    let line_no = idx + 1;
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
      continue;
    }

    if let Some(rest) = line.strip_prefix('[') {
      let name = rest
        .strip_suffix(']')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| malformed(format!("invalid section header at line {line_no}")))?;
      sections.entry(name.to_string()).or_default();
      current = Some(name.to_string());
      continue;
    }

    let Some((key, value)) = line.split_once('=') else {
      return Err(malformed(format!("expected 'key = value' at line {line_no}")));
    };

    let Some(section) = current.as_ref() else {
      return Err(malformed(format!("key outside of any profile at line {line_no}")));
    };

    sections
      .entry(section.clone())
      .or_default()
      .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
  }

  let Some(values) = sections.get(profile) else {
    return Err(CredsError::ProfileNotFound {
      profile: profile.to_string(),
      path: path.to_path_buf(),
    });
  };

  let field = |key: &str| values.get(key).map(String::as_str);

  let creds = HostCreds::from_parts(
    field("host"),
    field("username"),
    field("password"),
    field("token"),
    field("insecure").is_some_and(|v| v.eq_ignore_ascii_case("true")),
  );

  if !creds.is_available() {
    return Err(malformed(format!("profile '{profile}' has no 'host'")));
  }

  Ok(creds)
}

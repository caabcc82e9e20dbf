//! Strongly typed host credentials and related errors.
//!
//! These types are shared between the credential providers, the HTTP caller,
//! and the CLI so that callers can reason about hosts, tokens, and failure
//! modes consistently.

use std::fmt;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Connection and authentication parameters for a tracking server.
///
/// Values are immutable once built. Providers hand out a fresh value on every
/// resolution; refreshing a provider never mutates a value already returned.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HostCreds {
  host: String,
  username: Option<String>,
  password: Option<String>,
  token: Option<String>,
  no_tls_verify: bool,
}

/// Authentication scheme selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth<'a> {
  /// `Authorization: Bearer <token>`
  Bearer(&'a str),
  /// `Authorization: Basic base64(<username>:<password>)`
  Basic { username: &'a str, password: &'a str },
  /// No `Authorization` header.
  Anonymous,
}

impl HostCreds {
  /// Create credentials for `host` with no authentication material.
  pub fn new(host: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      ..Self::default()
    }
  }

  /// Attach a username and password used for basic auth.
  pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
    self.username = Some(username.into());
    self.password = Some(password.into());
    self
  }

  /// Attach a bearer token. Tokens take precedence over basic auth.
  pub fn with_token(mut self, token: impl Into<String>) -> Self {
    self.token = Some(token.into());
    self
  }

  /// Skip TLS certificate verification for requests made with these
  /// credentials.
  pub fn with_no_tls_verify(mut self, no_tls_verify: bool) -> Self {
    self.no_tls_verify = no_tls_verify;
    self
  }

  /// Build credentials from optional fields, dropping empty strings.
  ///
  /// Configuration sources frequently carry keys with blank values
  /// (`token =`); those are treated as absent. Only the host is trimmed;
  /// usernames and secrets are kept byte for byte.
  pub(crate) fn from_parts(
    host: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
    no_tls_verify: bool,
  ) -> Self {
    let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);

    Self {
      host: non_empty(host.map(str::trim)).unwrap_or_default(),
      username: non_empty(username),
      password: non_empty(password),
      token: non_empty(token),
      no_tls_verify,
    }
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn username(&self) -> Option<&str> {
    self.username.as_deref()
  }

  pub fn password(&self) -> Option<&str> {
    self.password.as_deref()
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn no_tls_verify(&self) -> bool {
    self.no_tls_verify
  }

  /// Whether these credentials name a host and may be used for requests.
  pub fn is_available(&self) -> bool {
    !self.host.trim().is_empty()
  }

  /// Select the authentication scheme: token first, then username and
  /// password, otherwise anonymous.
  pub fn auth(&self) -> Auth<'_> {
    if let Some(token) = self.token.as_deref() {
      return Auth::Bearer(token);
    }

    match (self.username.as_deref(), self.password.as_deref()) {
      (Some(username), Some(password)) => Auth::Basic { username, password },
      _ => Auth::Anonymous,
    }
  }

  /// Value for the `Authorization` header, if any auth is configured.
  pub fn authorization_header(&self) -> Option<String> {
    match self.auth() {
      Auth::Bearer(token) => Some(format!("Bearer {token}")),
      Auth::Basic { username, password } => {
        let credentials = format!("{username}:{password}");
        Some(format!("Basic {}", BASE64.encode(credentials.as_bytes())))
      }
      Auth::Anonymous => None,
    }
  }
}

impl fmt::Debug for HostCreds {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");

    f.debug_struct("HostCreds")
      .field("host", &self.host)
      .field("username", &self.username)
      .field("password", &redact(&self.password))
      .field("token", &redact(&self.token))
      .field("no_tls_verify", &self.no_tls_verify)
      .finish()
  }
}

/// A single provider failure recorded while walking a provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
  /// Name of the provider that failed.
  pub provider: String,
  /// Rendered error message.
  pub message: String,
}

impl fmt::Display for ProviderFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}: {}", self.provider, self.message)
  }
}

/// Errors that can occur while resolving host credentials.
#[derive(Debug, thiserror::Error)]
pub enum CredsError {
  /// A required configuration source is not available.
  #[error("configuration unavailable: {0}")]
  Unavailable(String),

  /// The configuration file does not exist.
  #[error("config file not found: {}", .path.display())]
  ConfigNotFound { path: PathBuf },

  /// The configuration file exists but has no section for the profile.
  #[error("profile '{profile}' not found in {}", .path.display())]
  ProfileNotFound { profile: String, path: PathBuf },

  /// The configuration file or profile could not be interpreted.
  #[error("malformed config {}: {message}", .path.display())]
  MalformedConfig { path: PathBuf, message: String },

  /// Reading the configuration file failed.
  #[error("failed to read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Credentials were resolved but carry no host.
  #[error("no host configured by {provider}")]
  MissingHost { provider: String },

  /// Every provider in a chain failed.
  #[error(
    "unable to load host credentials from any provider in the chain: [{}]",
    .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
  )]
  ChainExhausted { failures: Vec<ProviderFailure> },
}

impl CredsError {
  /// Whether this error means "this source cannot supply credentials" as
  /// opposed to the aggregate failure of a whole chain.
  pub fn is_unavailable(&self) -> bool {
    !matches!(self, Self::ChainExhausted { .. })
  }
}

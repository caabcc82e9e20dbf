//! Authenticated HTTP calls against the tracking server.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response};
use url::Url;

use crate::creds::{CredsError, HostCreds, HostCredsProvider};
use crate::error::{ClientError, Result};

/// Certificate verification mode for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
  /// Validate the server certificate chain (the default).
  Verify,
  /// Accept any certificate, including self-signed and expired ones.
  AcceptInvalidCerts,
}

impl TlsPolicy {
  /// Policy dictated by the resolved credentials.
  pub fn for_creds(creds: &HostCreds) -> Self {
    if creds.no_tls_verify() {
      Self::AcceptInvalidCerts
    } else {
      Self::Verify
    }
  }
}

/// Issues GET/POST requests to `<host>/<base path>/<endpoint>` using
/// credentials resolved from a [`HostCredsProvider`] on every call.
///
/// Credentials are never cached here, so a provider refresh is picked up by
/// the next request. Failures are returned immediately and never retried.
#[derive(Clone)]
pub struct HttpCaller {
  provider: Arc<dyn HostCredsProvider>,
  base_path: String,
  verified: reqwest::Client,
  unverified: reqwest::Client,
}

impl HttpCaller {
  /// Create a caller for the given provider and API prefix.
  ///
  /// # Arguments
  /// * `provider` - Source of host credentials, consulted on every request.
  /// * `base_path` - Fixed API prefix (e.g. `api/2.0/preview/mlflow`).
  /// * `timeout` - Optional transport timeout applied to every request.
  ///
  /// # Errors
  /// Returns [`ClientError::ClientBuild`] if a `reqwest::Client` cannot be
  /// built.
  pub fn new(
    provider: Arc<dyn HostCredsProvider>,
    base_path: impl Into<String>,
    timeout: Option<Duration>,
  ) -> Result<Self> {
    let base_path = base_path.into().trim_matches('/').to_string();

    Ok(Self {
      provider,
      base_path,
      verified: build_transport(TlsPolicy::Verify, timeout)?,
      unverified: build_transport(TlsPolicy::AcceptInvalidCerts, timeout)?,
    })
  }

  /// The provider consulted for credentials.
  pub fn provider(&self) -> &Arc<dyn HostCredsProvider> {
    &self.provider
  }

  pub fn base_path(&self) -> &str {
    &self.base_path
  }

  /// Resolve credentials and reject ones without a host.
  ///
  /// # Errors
  /// Propagates provider failures, and returns [`CredsError::MissingHost`]
  /// when the resolved host is empty.
  pub fn resolve_creds(&self) -> Result<HostCreds> {
    let creds = self.provider.resolve()?;
    if !creds.is_available() {
      return Err(
        CredsError::MissingHost {
          provider: self.provider.name(),
        }
        .into(),
      );
    }
    Ok(creds)
  }

  /// Ask the provider to drop cached credentials.
  pub fn refresh_credentials(&self) -> Result<()> {
    self.provider.refresh()?;
    Ok(())
  }

  /// Join host, base path, endpoint path, and query parameters into a URL.
  ///
  /// Redundant slashes at the joins are dropped; no `?` is emitted when
  /// `query` is empty.
  pub fn build_url(&self, host: &str, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let host = host.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let raw = if self.base_path.is_empty() {
      format!("{host}/{path}")
    } else {
      format!("{host}/{}/{path}", self.base_path)
    };

    let mut url = Url::parse(&raw).map_err(|source| ClientError::InvalidUrl {
      host: host.to_string(),
      source,
    })?;

    if !query.is_empty() {
      url.query_pairs_mut().extend_pairs(query);
    }

    Ok(url)
  }

  /// GET `path` and return the body as text.
  pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
    let (host, response) = self.send(Method::GET, path, query, None).await?;
    response
      .text()
      .await
      .map_err(|source| ClientError::Transport { host, source })
  }

  /// GET `path` and return the raw body bytes.
  pub async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
    let (host, response) = self.send(Method::GET, path, query, None).await?;
    let bytes = response
      .bytes()
      .await
      .map_err(|source| ClientError::Transport { host, source })?;
    Ok(bytes.to_vec())
  }

  /// POST a JSON `body` to `path` and return the response body as text.
  pub async fn post(&self, path: &str, body: impl Into<String>) -> Result<String> {
    let (host, response) = self.send(Method::POST, path, &[], Some(body.into())).await?;
    response
      .text()
      .await
      .map_err(|source| ClientError::Transport { host, source })
  }

  /// Build the request for `path` with freshly resolved credentials.
  fn prepare(&self, method: Method, path: &str, query: &[(&str, &str)]) -> Result<(HostCreds, RequestBuilder)> {
    let creds = self.resolve_creds()?;
    let url = self.build_url(creds.host(), path, query)?;

    let transport = match TlsPolicy::for_creds(&creds) {
      TlsPolicy::Verify => &self.verified,
      TlsPolicy::AcceptInvalidCerts => &self.unverified,
    };

    tracing::debug!(%method, %url, no_tls_verify = creds.no_tls_verify(), "Sending tracking request");

    let mut request = transport.request(method, url).header(ACCEPT, "application/json");
    if let Some(value) = creds.authorization_header() {
      request = request.header(AUTHORIZATION, value);
    }

    Ok((creds, request))
  }

  /// Dispatch a request and classify the outcome.
  async fn send(
    &self,
    method: Method,
    path: &str,
    query: &[(&str, &str)],
    body: Option<String>,
  ) -> Result<(String, Response)> {
    let (creds, mut request) = self.prepare(method, path, query)?;
    let host = creds.host().to_string();

    if let Some(body) = body {
      request = request.header(CONTENT_TYPE, "application/json").body(body);
    }

    let response = match request.send().await {
      Ok(response) => response,
      Err(source) => return Err(ClientError::Transport { host, source }),
    };

    let status = response.status();
    if !status.is_success() {
      let body = response
        .text()
        .await
        .unwrap_or_else(|_| String::from("(no error details)"));
      tracing::debug!(%host, status = status.as_u16(), "Tracking server returned an error");
      return Err(ClientError::HttpStatus {
        host,
        status: status.as_u16(),
        body,
      });
    }

    Ok((host, response))
  }
}

fn build_transport(policy: TlsPolicy, timeout: Option<Duration>) -> Result<reqwest::Client> {
  let mut builder = reqwest::Client::builder()
    .user_agent(format!(
      "mlflow-client/{} ({})",
      env!("CARGO_PKG_VERSION"),
      env!("TARGET")
    ))
    .danger_accept_invalid_certs(policy == TlsPolicy::AcceptInvalidCerts);

  if let Some(timeout) = timeout {
    builder = builder.timeout(timeout);
  }

  builder.build().map_err(ClientError::ClientBuild)
}

//! Minimal in-process HTTP server for exercising the real transport.
//!
//! Each route maps a path (without query string) to a canned status and body.
//! Every request is recorded so tests can assert on the request line, headers
//! and body that actually went over the wire.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
  pub method: String,
  /// Path plus query string, exactly as sent.
  pub target: String,
  /// Header names are lowercased.
  pub headers: HashMap<String, String>,
  pub body: String,
}

impl RecordedRequest {
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
  }

  pub fn path(&self) -> &str {
    self.target.split('?').next().unwrap_or_default()
  }
}

#[derive(Clone)]
struct CannedResponse {
  status: u16,
  content_type: &'static str,
  body: Vec<u8>,
}

/// Builder for a [`FakeServer`].
#[derive(Default)]
pub struct FakeServerBuilder {
  routes: HashMap<String, CannedResponse>,
}

impl FakeServerBuilder {
  /// Answer `path` with a JSON body.
  pub fn json(mut self, path: &str, status: u16, body: serde_json::Value) -> Self {
    self.routes.insert(
      path.to_string(),
      CannedResponse {
        status,
        content_type: "application/json",
        body: body.to_string().into_bytes(),
      },
    );
    self
  }

  /// Answer `path` with raw bytes.
  pub fn bytes(mut self, path: &str, status: u16, body: &[u8]) -> Self {
    self.routes.insert(
      path.to_string(),
      CannedResponse {
        status,
        content_type: "application/octet-stream",
        body: body.to_vec(),
      },
    );
    self
  }

  /// Answer `path` with plain text.
  pub fn text(mut self, path: &str, status: u16, body: &str) -> Self {
    self.routes.insert(
      path.to_string(),
      CannedResponse {
        status,
        content_type: "text/plain",
        body: body.as_bytes().to_vec(),
      },
    );
    self
  }

  /// Bind to an ephemeral localhost port and start serving.
  pub async fn start(self) -> FakeServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(self.routes);

    let recorded = Arc::clone(&requests);
    tokio::spawn(async move {
      while let Ok((stream, _)) = listener.accept().await {
        let routes = Arc::clone(&routes);
        let recorded = Arc::clone(&recorded);
        tokio::spawn(async move {
          handle_connection(stream, &routes, &recorded).await;
        });
      }
    });

    FakeServer {
      url: format!("http://{addr}"),
      requests,
    }
  }

  /// Like [`start`](Self::start), but over TLS with a self-signed
  /// certificate for `localhost` and `127.0.0.1`.
  pub async fn start_tls(self) -> FakeServer {
    let rcgen::CertifiedKey { cert, key_pair } =
      rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()]).unwrap();
    let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(key_pair.serialize_der()));
    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
      .with_safe_default_protocol_versions()
      .unwrap()
      .with_no_client_auth()
      .with_single_cert(vec![cert.der().clone()], key)
      .unwrap();
    let acceptor = TlsAcceptor::from(Arc::new(config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let routes = Arc::new(self.routes);

    let recorded = Arc::clone(&requests);
    tokio::spawn(async move {
      while let Ok((stream, _)) = listener.accept().await {
        let acceptor = acceptor.clone();
        let routes = Arc::clone(&routes);
        let recorded = Arc::clone(&recorded);
        tokio::spawn(async move {
          // A client that rejects the certificate aborts the handshake.
          if let Ok(stream) = acceptor.accept(stream).await {
            handle_connection(stream, &routes, &recorded).await;
          }
        });
      }
    });

    FakeServer {
      url: format!("https://{addr}"),
      requests,
    }
  }
}

/// Handle to a running fake server.
pub struct FakeServer {
  url: String,
  requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl FakeServer {
  pub fn builder() -> FakeServerBuilder {
    FakeServerBuilder::default()
  }

  /// Base URL such as `http://127.0.0.1:41234` (`https://` for TLS servers).
  pub fn url(&self) -> &str {
    &self.url
  }

  /// All requests received so far, in arrival order.
  pub fn requests(&self) -> Vec<RecordedRequest> {
    self.requests.lock().unwrap().clone()
  }

  /// The single request received, panicking if there were zero or several.
  pub fn only_request(&self) -> RecordedRequest {
    let requests = self.requests();
    assert_eq!(requests.len(), 1, "expected exactly one request, got {requests:?}");
    requests.into_iter().next().unwrap()
  }
}

async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(
  mut stream: S,
  routes: &HashMap<String, CannedResponse>,
  recorded: &Mutex<Vec<RecordedRequest>>,
) {
  let Some(request) = read_request(&mut stream).await else {
    return;
  };

  let response = routes.get(request.path()).cloned().unwrap_or(CannedResponse {
    status: 404,
    content_type: "text/plain",
    body: b"not found".to_vec(),
  });
  recorded.lock().unwrap().push(request);

  let head = format!(
    "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
    response.status,
    reason(response.status),
    response.content_type,
    response.body.len()
  );
  let _ = stream.write_all(head.as_bytes()).await;
  let _ = stream.write_all(&response.body).await;
  let _ = stream.shutdown().await;
}

async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> Option<RecordedRequest> {
  let mut buf = Vec::new();
  let mut chunk = [0u8; 4096];

  let header_end = loop {
    let n = stream.read(&mut chunk).await.ok()?;
    if n == 0 {
      return None;
    }
    buf.extend_from_slice(&chunk[..n]);
    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
      break pos + 4;
    }
  };

  let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
  let mut lines = head.split("\r\n");
  let mut request_line = lines.next()?.split_whitespace();
  let method = request_line.next()?.to_string();
  let target = request_line.next()?.to_string();

  let headers: HashMap<String, String> = lines
    .filter_map(|line| line.split_once(':'))
    .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
    .collect();

  let content_length = headers
    .get("content-length")
    .and_then(|len| len.parse::<usize>().ok())
    .unwrap_or(0);

  while buf.len() < header_end + content_length {
    let n = stream.read(&mut chunk).await.ok()?;
    if n == 0 {
      break;
    }
    buf.extend_from_slice(&chunk[..n]);
  }

  let body_end = buf.len().min(header_end + content_length);
  let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();

  Some(RecordedRequest {
    method,
    target,
    headers,
    body,
  })
}

fn reason(status: u16) -> &'static str {
  match status {
    200 => "OK",
    400 => "Bad Request",
    401 => "Unauthorized",
    403 => "Forbidden",
    404 => "Not Found",
    500 => "Internal Server Error",
    _ => "Unknown",
  }
}

/// An address on which nothing is listening.
pub async fn closed_port_url() -> String {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  format!("http://{addr}")
}

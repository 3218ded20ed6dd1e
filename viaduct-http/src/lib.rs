//! Minimal HTTP client with proxy routing and safe logging.
//!
//! - Client construction: direct, or routed through an HTTP proxy with
//!   optional basic-auth credentials
//! - `get_text` / `get_json` helpers, one attempt per request (no retries)
//! - Structured `tracing` events for request start, response headers, and
//!   final errors; proxy passwords never appear in logs or `Debug` output
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), viaduct_http::HttpError> {
//! let route = viaduct_http::ProxyRoute::new("localhost", 8080);
//! let client = viaduct_http::HttpClient::with_proxy(&route)?;
//! let html = client
//!     .get_text("http://toscrape.com/", viaduct_http::RequestOpts::default())
//!     .await?;
//! # let _ = html;
//! # Ok(()) }
//! ```
//!
//! Security: credentials ride on the proxy connection via `Proxy::basic_auth`;
//! log fields only ever record whether auth is present, not the values.

use reqwest::{Client, Proxy, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("proxy authentication failed (407): {0}")]
    ProxyAuth(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

// ==============================
// Proxy route
// ==============================

/// Proxy endpoint the client tunnels through, with optional basic-auth.
///
/// ```
/// use viaduct_http::ProxyRoute;
///
/// let route = ProxyRoute::new("proxy.example.net", 22225)
///     .with_basic_auth("customer-zone", "s3cret");
/// assert_eq!(route.url(), "http://proxy.example.net:22225");
/// ```
#[derive(Clone)]
pub struct ProxyRoute {
    host: String,
    port: u16,
    username: Option<String>,
    password: Option<String>,
}

impl ProxyRoute {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Parse a full proxy URL such as `http://localhost:8080`.
    pub fn parse(server: &str) -> Result<Self, HttpError> {
        let url = Url::parse(server).map_err(|e| HttpError::Url(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| HttpError::Url(format!("proxy URL has no host: {server}")))?;
        let port = url.port().unwrap_or(80);
        Ok(Self::new(host, port))
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Scheme-qualified URL without embedded userinfo.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn has_auth(&self) -> bool {
        self.username.is_some()
    }
}

// Manual Debug so a dumped route never leaks the password.
impl fmt::Debug for ProxyRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRoute")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ==============================
// Request options
// ==============================

/// Per-request tuning knobs.
///
/// ```
/// use viaduct_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts {
    pub timeout: Option<Duration>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    pub default_timeout: Duration,
    proxy_kind: &'static str,
}

impl HttpClient {
    /// Construct a client that connects directly, without a proxy.
    pub fn direct() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(15),
            proxy_kind: "none",
        })
    }

    /// Construct a client whose transport routes through `route`.
    ///
    /// All schemes go through the proxy (`Proxy::all`); credentials, when
    /// present, are presented as proxy basic-auth.
    pub fn with_proxy(route: &ProxyRoute) -> Result<Self, HttpError> {
        let mut proxy =
            Proxy::all(route.url()).map_err(|e| HttpError::Url(e.to_string()))?;
        let proxy_kind = if let (Some(user), Some(pass)) = (&route.username, &route.password) {
            proxy = proxy.basic_auth(user, pass);
            "credentialed"
        } else {
            "plain"
        };
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .proxy(proxy)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: Duration::from_secs(15),
            proxy_kind,
        })
    }

    /// Override the default timeout returned by the constructors.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET a URL and return the response body as text.
    pub async fn get_text(&self, url: &str, opts: RequestOpts) -> Result<String, HttpError> {
        let bytes = self.get_bytes(url, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET a URL and decode the response body as JSON.
    pub async fn get_json<T>(&self, url: &str, opts: RequestOpts) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let bytes = self.get_bytes(url, opts).await?;
        let snippet = snip_body(&bytes);
        serde_json::from_slice::<T>(&bytes).map_err(|e| {
            tracing::warn!(
                serde_err=%e.to_string(),
                body_snippet=%snippet,
                "http.response.decode_error"
            );
            HttpError::Decode(e.to_string(), snippet)
        })
    }

    // ==============================
    // Core request implementation
    // ==============================

    async fn get_bytes(&self, url: &str, opts: RequestOpts) -> Result<Vec<u8>, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        // Lightweight request id without extra deps
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );

        tracing::debug!(
            req_id=%req_id,
            host_path=%format!("{}{}", url.domain().unwrap_or("-"), url.path()),
            timeout_ms=timeout.as_millis() as u64,
            proxy=self.proxy_kind,
            "http.request.start"
        );

        let t0 = std::time::Instant::now();
        let resp = self
            .inner
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                let message = err.to_string();
                tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
                HttpError::Network(message)
            })?;

        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            "http.response.headers"
        );

        if status.is_success() {
            return Ok(bytes.to_vec());
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            req_id=%req_id,
            %status,
            message=%message,
            "http.error"
        );
        if status == StatusCode::PROXY_AUTHENTICATION_REQUIRED {
            return Err(HttpError::ProxyAuth(message));
        }
        Err(HttpError::Api { status, message })
    }
}

// ==============================
// Helpers
// ==============================

fn extract_error_message(body: &[u8]) -> String {
    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        if !m.message.is_empty() {
            return m.message;
        }
        if !m.detail.is_empty() {
            return m.detail;
        }
        if !m.error.is_empty() {
            return m.error;
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > 500 {
        snip.truncate(500);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_route_formats_url_without_userinfo() {
        let route = ProxyRoute::new("proxy.example.net", 22225)
            .with_basic_auth("customer", "hunter2");
        assert_eq!(route.url(), "http://proxy.example.net:22225");
        assert!(route.has_auth());
    }

    #[test]
    fn proxy_route_parse_accepts_full_url() {
        let route = ProxyRoute::parse("http://localhost:8080").unwrap();
        assert_eq!(route.url(), "http://localhost:8080");
        assert!(!route.has_auth());
    }

    #[test]
    fn proxy_route_parse_rejects_garbage() {
        assert!(matches!(
            ProxyRoute::parse("not a url"),
            Err(HttpError::Url(_))
        ));
    }

    #[test]
    fn debug_output_redacts_password() {
        let route = ProxyRoute::new("h", 1).with_basic_auth("u", "topsecret");
        let dump = format!("{route:?}");
        assert!(!dump.contains("topsecret"));
        assert!(dump.contains("<redacted>"));
    }

    #[test]
    fn error_message_extraction_prefers_structured_fields() {
        assert_eq!(
            extract_error_message(br#"{"message":"quota exceeded"}"#),
            "quota exceeded"
        );
        assert_eq!(
            extract_error_message(br#"{"error":"bad gateway"}"#),
            "bad gateway"
        );
        assert_eq!(extract_error_message(b"plain text body"), "plain text body");
    }

    #[test]
    fn direct_client_builds_with_default_timeout() {
        let client = HttpClient::direct().unwrap();
        assert_eq!(client.default_timeout, Duration::from_secs(15));

        let client = client.with_timeout(Duration::from_secs(2));
        assert_eq!(client.default_timeout, Duration::from_secs(2));
    }

    #[test]
    fn with_proxy_rejects_malformed_host() {
        // A host with spaces cannot form a valid proxy URL.
        let route = ProxyRoute::new("not a host", 8080);
        assert!(HttpClient::with_proxy(&route).is_err());
    }
}

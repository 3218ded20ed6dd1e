//! Shared plumbing for the demo binaries.
//!
//! Each binary is an independent entry point; what they share is only the
//! error classification into [`ViaductError`] variants and the single
//! catch-and-report block every demo ends with.

use viaduct_common::ViaductError;
use viaduct_http::HttpError;

/// Map a transport-level error into the workspace taxonomy so a rejected
/// proxy credential reads differently from a dead socket.
pub fn classify_http(err: HttpError) -> ViaductError {
    match err {
        HttpError::ProxyAuth(msg) => ViaductError::ProxyAuth(msg),
        HttpError::Url(msg) | HttpError::Build(msg) => ViaductError::Config(msg),
        HttpError::Network(msg) if msg.contains("timed out") => ViaductError::Timeout,
        other => ViaductError::Http(other.to_string()),
    }
}

/// Final handler: log the failure and put a diagnostic on stderr. The
/// caller decides the exit code; nothing is rethrown or retried.
pub fn report_failure(demo: &'static str, err: &ViaductError) {
    tracing::error!(target: "demo", demo, error = %err, "demo.failed");
    eprintln!("Error: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_auth_is_distinguished_from_network_faults() {
        let err = classify_http(HttpError::ProxyAuth("407 from upstream".into()));
        assert!(matches!(err, ViaductError::ProxyAuth(_)));

        let err = classify_http(HttpError::Network("connection refused".into()));
        assert!(matches!(err, ViaductError::Http(_)));
    }

    #[test]
    fn timeouts_get_their_own_variant() {
        let err = classify_http(HttpError::Network("operation timed out".into()));
        assert!(matches!(err, ViaductError::Timeout));
    }

    #[test]
    fn malformed_config_surfaces_as_config_error() {
        let err = classify_http(HttpError::Url("relative URL without a base".into()));
        assert!(matches!(err, ViaductError::Config(_)));
    }
}

//! Common types and utilities shared across Viaduct crates.
//!
//! This crate defines the shared error taxonomy and the observability
//! helpers used by every demo binary. It is intentionally lightweight and
//! dependency‑minimal so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`ViaductError`] and [`Result`]: Shared error handling
//! - [`observability`]: Centralised tracing/logging initialisation
use thiserror::Error;

pub mod observability;

/// Error types used across the Viaduct workspace.
///
/// Each variant names a distinguishable failure class so callers can tell
/// a rejected proxy credential apart from a plain network fault, rather
/// than collapsing everything into one opaque message.
#[derive(Error, Debug)]
pub enum ViaductError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An HTTP request failed at the transport or protocol level.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The proxy rejected the supplied credentials.
    #[error("Proxy authentication rejected: {0}")]
    ProxyAuth(String),

    /// The browser session (WebDriver) reported an error.
    #[error("Browser error: {0}")]
    Browser(#[from] anyhow::Error),

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`ViaductError`].
pub type Result<T> = std::result::Result<T, ViaductError>;

//! Browser automation through a proxy, backed by `fantoccini`.
//!
//! A [`BrowserSession`](session::BrowserSession) drives a Chrome instance via
//! a WebDriver endpoint (chromedriver). The proxy address can reach the
//! browser two ways, chosen by [`ProxyMode`](caps::ProxyMode): as a W3C
//! `proxy` capability, or as a `--proxy-server` Chrome argument.

pub mod caps;
pub mod session;

pub use caps::ProxyMode;
pub use session::{fetch_page_html, BrowserSession};

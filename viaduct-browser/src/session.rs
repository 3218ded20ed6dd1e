use crate::caps::{build_capabilities, ProxyMode};
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use tracing::debug;

/// Thin wrapper around a `fantoccini` WebDriver client.
pub struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    /// Open a session against a running WebDriver service, with the proxy
    /// wired in according to `mode`.
    ///
    /// Default endpoint in config: `http://localhost:9515` (chromedriver).
    pub async fn launch(webdriver_url: &str, mode: &ProxyMode, headless: bool) -> Result<Self> {
        let caps = build_capabilities(mode, headless);
        debug!(
            target: "browser",
            %webdriver_url,
            mode=?mode,
            headless,
            "browser.session.launch"
        );
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;
        Ok(Self { client })
    }

    /// Navigate to `url` and wait for the driver-default load completion.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        debug!(target: "browser", %url, "browser.navigate");
        self.client.goto(url).await.map_err(anyhow::Error::from)
    }

    /// Return the full page HTML source.
    pub async fn page_source(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        debug!(target: "browser", "browser.session.close");
        self.client.close().await?;
        Ok(())
    }
}

/// Scoped fetch: open a session, navigate, read the rendered HTML, and close
/// the session on every exit path.
///
/// The browser process must terminate even when navigation or extraction
/// fails, so the close runs before any error propagates.
pub async fn fetch_page_html(
    webdriver_url: &str,
    mode: &ProxyMode,
    target: &str,
    headless: bool,
) -> Result<String> {
    let mut session = BrowserSession::launch(webdriver_url, mode, headless).await?;

    let outcome = async {
        session.goto(target).await?;
        session.page_source().await
    }
    .await;

    let closed = session.close().await;
    let html = outcome?;
    closed?;
    Ok(html)
}

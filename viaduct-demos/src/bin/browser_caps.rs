//! Render one page in Chrome with the proxy set as a structured WebDriver
//! capability, then print the page HTML.
//!
//! Requires a WebDriver service (chromedriver) at the configured endpoint.

use anyhow::Result;
use clap::Parser;
use viaduct_browser::{fetch_page_html, ProxyMode};
use viaduct_common::observability::{init_logging, LogConfig};
use viaduct_common::ViaductError;
use viaduct_config::{ViaductConfig, ViaductConfigLoader};
use viaduct_demos::report_failure;

#[derive(Parser, Debug)]
#[command(name = "browser_caps", about = "Browser fetch, proxy via W3C capability")]
struct Cli {
    /// Path to the YAML config file (optional; env vars work alone).
    #[arg(long, default_value = "viaduct.yaml")]
    config: String,
    /// Override the target URL from config.
    #[arg(long)]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg: ViaductConfig = ViaductConfigLoader::new().with_file(&cli.config).load()?;
    init_logging(LogConfig {
        app_name: "browser_caps",
        ..LogConfig::default()
    })?;

    let target = cli.target.unwrap_or_else(|| cfg.targets.html_page.clone());
    match run(&cfg, &target).await {
        Ok(html) => {
            println!("{html}");
            Ok(())
        }
        Err(err) => {
            report_failure("browser_caps", &err);
            std::process::exit(1);
        }
    }
}

async fn run(cfg: &ViaductConfig, target: &str) -> Result<String, ViaductError> {
    let mode = ProxyMode::Capability {
        server: cfg.local_proxy.server.clone(),
    };

    tracing::info!(
        target: "demo",
        webdriver = %cfg.webdriver_url,
        proxy = %cfg.local_proxy.server,
        url = target,
        "browser_caps.start"
    );
    // The session closes on every exit path inside fetch_page_html.
    fetch_page_html(&cfg.webdriver_url, &mode, target, cfg.headless)
        .await
        .map_err(ViaductError::Browser)
}

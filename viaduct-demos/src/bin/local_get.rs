//! Fetch one URL through the unauthenticated local proxy and print the body.

use anyhow::Result;
use clap::Parser;
use viaduct_common::observability::{init_logging, LogConfig};
use viaduct_common::ViaductError;
use viaduct_config::{ViaductConfig, ViaductConfigLoader};
use viaduct_demos::{classify_http, report_failure};
use viaduct_http::{HttpClient, ProxyRoute, RequestOpts};

#[derive(Parser, Debug)]
#[command(name = "local_get", about = "GET a URL through the local proxy agent")]
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
        app_name: "local_get",
        ..LogConfig::default()
    })?;

    let target = cli.target.unwrap_or_else(|| cfg.targets.html_page.clone());
    match run(&cfg, &target).await {
        Ok(body) => {
            println!("{body}");
            Ok(())
        }
        Err(err) => {
            report_failure("local_get", &err);
            std::process::exit(1);
        }
    }
}

async fn run(cfg: &ViaductConfig, target: &str) -> Result<String, ViaductError> {
    let route = ProxyRoute::parse(&cfg.local_proxy.server).map_err(classify_http)?;

    tracing::info!(target: "demo", proxy = %route.url(), url = target, "local_get.start");
    let client = HttpClient::with_proxy(&route).map_err(classify_http)?;
    client
        .get_text(target, RequestOpts::default())
        .await
        .map_err(classify_http)
}

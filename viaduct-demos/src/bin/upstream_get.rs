//! Fetch one URL through a credentialed upstream proxy and print the body.
//!
//! The proxy endpoint and its basic-auth credentials come from
//! `viaduct.yaml` / `VIADUCT_*` environment variables, never from literals
//! in the source.

use anyhow::Result;
use clap::Parser;
use viaduct_common::observability::{init_logging, LogConfig};
use viaduct_common::ViaductError;
use viaduct_config::{ViaductConfig, ViaductConfigLoader};
use viaduct_demos::{classify_http, report_failure};
use viaduct_http::{HttpClient, ProxyRoute, RequestOpts};

#[derive(Parser, Debug)]
#[command(name = "upstream_get", about = "GET a URL through the credentialed upstream proxy")]
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
        app_name: "upstream_get",
        ..LogConfig::default()
    })?;

    let target = cli.target.unwrap_or_else(|| cfg.targets.ip_probe.clone());
    match run(&cfg, &target).await {
        Ok(body) => {
            println!("{body}");
            Ok(())
        }
        Err(err) => {
            report_failure("upstream_get", &err);
            std::process::exit(1);
        }
    }
}

async fn run(cfg: &ViaductConfig, target: &str) -> Result<serde_json::Value, ViaductError> {
    let upstream = cfg.upstream_proxy.as_ref().ok_or_else(|| {
        ViaductError::Config(
            "upstream_proxy is not configured (set it in viaduct.yaml or via \
             VIADUCT_UPSTREAM_PROXY__* environment variables)"
                .into(),
        )
    })?;

    let mut route = ProxyRoute::new(&upstream.host, upstream.port);
    if let (Some(user), Some(pass)) = (&upstream.username, &upstream.password) {
        route = route.with_basic_auth(user, pass);
    }

    tracing::info!(target: "demo", proxy = %route.url(), url = target, "upstream_get.start");
    let client = HttpClient::with_proxy(&route).map_err(classify_http)?;
    client
        .get_json(target, RequestOpts::default())
        .await
        .map_err(classify_http)
}

use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// How the proxy address reaches the browser process.
#[derive(Debug, Clone)]
pub enum ProxyMode {
    /// W3C `proxy` capability with `proxyType: "manual"`. The WebDriver
    /// service hands the address to the browser through the session config.
    Capability { server: String },
    /// `--proxy-server=<url>` passed on Chrome's command line via
    /// `goog:chromeOptions.args`.
    ChromeArg { server: String },
    /// No proxy; traffic goes out directly.
    Direct,
}

/// Construct the Chrome command-line arguments for a session.
///
/// Headless args are included when requested so the demos run on machines
/// without a display.
pub fn build_chrome_args(mode: &ProxyMode, headless: bool) -> Vec<String> {
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
    ];
    if headless {
        args.push("--headless".to_string());
        args.push("--disable-gpu".to_string());
    }
    if let ProxyMode::ChromeArg { server } = mode {
        args.push(format!("--proxy-server={server}"));
    }
    args
}

/// Build the full capabilities object handed to the WebDriver endpoint.
///
/// The structured variant strips the URL scheme: the W3C manual-proxy
/// fields take a bare `host:port` address.
pub fn build_capabilities(mode: &ProxyMode, headless: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    let mut chrome_opts = HashMap::new();
    chrome_opts.insert("args".to_string(), json!(build_chrome_args(mode, headless)));
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

    if let ProxyMode::Capability { server } = mode {
        let address = server
            .strip_prefix("http://")
            .unwrap_or(server)
            .trim_end_matches('/');
        caps.insert(
            "proxy".to_string(),
            json!({
                "proxyType": "manual",
                "httpProxy": address,
                "sslProxy": address,
            }),
        );
    }
    caps
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn args_of(caps: &Capabilities) -> Vec<String> {
        caps.get("goog:chromeOptions")
            .and_then(|o| o.get("args"))
            .and_then(Value::as_array)
            .expect("chromeOptions.args present")
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn capability_mode_sets_manual_proxy_without_scheme() {
        let mode = ProxyMode::Capability {
            server: "http://localhost:8080".into(),
        };
        let caps = build_capabilities(&mode, true);

        let proxy = caps.get("proxy").expect("proxy capability present");
        assert_eq!(proxy["proxyType"], "manual");
        assert_eq!(proxy["httpProxy"], "localhost:8080");
        assert_eq!(proxy["sslProxy"], "localhost:8080");

        // Proxy must not leak into the args in this mode.
        assert!(!args_of(&caps).iter().any(|a| a.contains("--proxy-server")));
    }

    #[test]
    fn chrome_arg_mode_passes_proxy_flag() {
        let mode = ProxyMode::ChromeArg {
            server: "http://localhost:8080".into(),
        };
        let caps = build_capabilities(&mode, true);

        assert!(caps.get("proxy").is_none());
        assert!(args_of(&caps)
            .contains(&"--proxy-server=http://localhost:8080".to_string()));
    }

    #[test]
    fn headless_toggle_controls_headless_args() {
        let headless = build_chrome_args(&ProxyMode::Direct, true);
        assert!(headless.contains(&"--headless".to_string()));
        assert!(headless.contains(&"--disable-gpu".to_string()));

        let headed = build_chrome_args(&ProxyMode::Direct, false);
        assert!(!headed.contains(&"--headless".to_string()));
    }
}

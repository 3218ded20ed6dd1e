//! Loader for workspace configuration with YAML + environment overlays.
//!
//! The schema carries everything the demo binaries would otherwise hardcode:
//! the upstream proxy endpoint and its credentials, the local proxy address,
//! the WebDriver endpoint, and the target URLs. Values may reference
//! environment variables with `${VAR}` syntax so credentials never have to
//! live in the file itself.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAX_ENV_EXPANSION_DEPTH: usize = 8;

/// Top-level configuration for the demo binaries.
///
/// Every field is optional or defaulted: a process with no config file and
/// no environment overrides still gets a usable local-proxy setup.
#[derive(Debug, Deserialize)]
pub struct ViaductConfig {
    pub version: Option<String>,
    /// Credentialed upstream proxy, required only by `upstream-get`.
    #[serde(default)]
    pub upstream_proxy: Option<UpstreamProxy>,
    #[serde(default)]
    pub local_proxy: LocalProxy,
    /// WebDriver endpoint the browser demos connect to.
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
    /// Whether browser demos run without a visible window.
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub targets: Targets,
}

/// Remote proxy reached with basic-auth credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamProxy {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl UpstreamProxy {
    /// Scheme-qualified proxy URL without embedded userinfo.
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Unauthenticated proxy on the loopback interface.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalProxy {
    #[serde(default = "default_local_proxy_server")]
    pub server: String,
}

impl Default for LocalProxy {
    fn default() -> Self {
        Self {
            server: default_local_proxy_server(),
        }
    }
}

/// URLs the demos fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct Targets {
    /// JSON endpoint that echoes the apparent origin IP.
    #[serde(default = "default_ip_probe")]
    pub ip_probe: String,
    /// Plain HTML page for the local-proxy and browser demos.
    #[serde(default = "default_html_page")]
    pub html_page: String,
}

impl Default for Targets {
    fn default() -> Self {
        Self {
            ip_probe: default_ip_probe(),
            html_page: default_html_page(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:9515".into()
}
fn default_local_proxy_server() -> String {
    "http://localhost:8080".into()
}
fn default_ip_probe() -> String {
    "http://lumtest.com/myip.json".into()
}
fn default_html_page() -> String {
    "http://toscrape.com/".into()
}
fn default_headless() -> bool {
    true
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAX_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ViaductConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ViaductConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ViaductConfigLoader {
    /// Start with sensible defaults: `VIADUCT_` env overrides, no file.
    ///
    /// ```
    /// use viaduct_config::ViaductConfigLoader;
    ///
    /// let config = ViaductConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(config.local_proxy.server, "http://localhost:8080");
    /// assert_eq!(config.webdriver_url, "http://localhost:9515");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    // Single underscore after the prefix, double underscore for nesting:
    // VIADUCT_UPSTREAM_PROXY__PORT. try_parsing lets numeric and boolean
    // fields come in from the environment as their typed values.
    fn env_source() -> Environment {
        Environment::with_prefix("VIADUCT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by
    /// suffix. The file is optional so env-only deployments keep working.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use viaduct_config::ViaductConfigLoader;
    ///
    /// let cfg = ViaductConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// local_proxy:
    ///   server: "http://localhost:3128"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("test"));
    /// assert_eq!(cfg.local_proxy.server, "http://localhost:3128");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly
    /// typed config.
    ///
    /// The loader combines YAML sources with `VIADUCT_`-prefixed environment
    /// variables and expands `${VAR}` placeholders before materialising the
    /// typed structs.
    ///
    /// ```
    /// use viaduct_config::ViaductConfigLoader;
    ///
    /// unsafe { std::env::set_var("PROXY_PASSWORD", "injected-from-env"); }
    ///
    /// let config = ViaductConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// version: "1"
    /// upstream_proxy:
    ///   host: "proxy.example.net"
    ///   port: 22225
    ///   username: "customer-zone"
    ///   password: "${PROXY_PASSWORD}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// let upstream = config.upstream_proxy.expect("upstream proxy present");
    /// assert_eq!(upstream.url(), "http://proxy.example.net:22225");
    /// assert_eq!(upstream.password.as_deref(), Some("injected-from-env"));
    ///
    /// unsafe { std::env::remove_var("PROXY_PASSWORD"); }
    /// ```
    pub fn load(self) -> Result<ViaductConfig, ConfigError> {
        // The env source merges last so environment variables win over any
        // file or inline YAML value.
        let cfg = self.builder.add_source(Self::env_source()).build()?;

        // Convert to serde_json::Value first so ${VAR} references can be
        // expanded anywhere in the tree before typing.
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ViaductConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

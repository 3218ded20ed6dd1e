use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;
use viaduct_config::ViaductConfigLoader;

/// Helper to write a YAML file in a temp dir and return its path.
fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let p = tmp.path().join(name);
    fs::write(&p, yaml).expect("write yaml");
    p
}

#[test]
#[serial]
fn test_config_load() {
    let tmp = TempDir::new().unwrap();

    let file_yaml = r#"
version: "0.1"
upstream_proxy:
  host: "proxy.example.net"
  port: 22225
  username: "${VIADUCT_TEST_PROXY_USER}"
  password: "${VIADUCT_TEST_PROXY_PASS}"
local_proxy:
  server: "http://localhost:8080"
targets:
  html_page: "http://toscrape.com/"
"#;
    let p = write_yaml(&tmp, "viaduct.yaml", file_yaml);

    temp_env::with_vars(
        [
            ("VIADUCT_TEST_PROXY_USER", Some("customer-zone-static")),
            ("VIADUCT_TEST_PROXY_PASS", Some("s3cret")),
        ],
        || {
            let config = ViaductConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load demo config");

            let upstream = config.upstream_proxy.expect("upstream proxy configured");
            assert_eq!(upstream.url(), "http://proxy.example.net:22225");
            assert_eq!(upstream.username.as_deref(), Some("customer-zone-static"));
            assert_eq!(upstream.password.as_deref(), Some("s3cret"));
            assert_eq!(config.local_proxy.server, "http://localhost:8080");
        },
    );
}

#[test]
#[serial]
fn test_env_overlay_overrides_typed_fields() {
    temp_env::with_vars(
        [
            ("VIADUCT_UPSTREAM_PROXY__HOST", Some("env.proxy.example")),
            ("VIADUCT_UPSTREAM_PROXY__PORT", Some("24000")),
            ("VIADUCT_LOCAL_PROXY__SERVER", Some("http://localhost:3128")),
            ("VIADUCT_HEADLESS", Some("false")),
        ],
        || {
            let config = ViaductConfigLoader::new()
                .load()
                .expect("env-only load succeeds");

            let upstream = config.upstream_proxy.expect("upstream proxy from env");
            assert_eq!(upstream.host, "env.proxy.example");
            assert_eq!(upstream.port, 24000);
            assert_eq!(config.local_proxy.server, "http://localhost:3128");
            assert!(!config.headless);
        },
    );
}

#[test]
#[serial]
fn test_env_overlay_wins_over_file_values() {
    let tmp = TempDir::new().unwrap();
    let p = write_yaml(
        &tmp,
        "viaduct.yaml",
        r#"
local_proxy:
  server: "http://localhost:8080"
"#,
    );

    temp_env::with_var(
        "VIADUCT_LOCAL_PROXY__SERVER",
        Some("http://localhost:9999"),
        || {
            let config = ViaductConfigLoader::new()
                .with_file(&p)
                .load()
                .expect("load with env override");
            assert_eq!(config.local_proxy.server, "http://localhost:9999");
        },
    );
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = ViaductConfigLoader::new()
        .with_file(tmp.path().join("does-not-exist.yaml"))
        .load()
        .expect("optional file should not fail the load");

    assert!(config.upstream_proxy.is_none());
    assert_eq!(config.webdriver_url, "http://localhost:9515");
}

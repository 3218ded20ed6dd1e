use viaduct_browser::{fetch_page_html, ProxyMode};

fn webdriver_or_skip() -> String {
    std::env::var("VIADUCT_WEBDRIVER_URL").unwrap_or_else(|_| {
        panic!("SKIP: VIADUCT_WEBDRIVER_URL not set");
    })
}

/// Needs chromedriver at `$VIADUCT_WEBDRIVER_URL` and a proxy on :8080.
#[tokio::test]
#[ignore]
async fn capability_proxy_fetch_yields_html() {
    let webdriver = webdriver_or_skip();
    let mode = ProxyMode::Capability {
        server: "http://localhost:8080".into(),
    };

    let html = fetch_page_html(&webdriver, &mode, "http://toscrape.com/", true)
        .await
        .expect("browser fetch through proxy");

    assert!(html.contains("<html"), "page source should be HTML");
}

/// Needs chromedriver at `$VIADUCT_WEBDRIVER_URL` and a proxy on :8080.
#[tokio::test]
#[ignore]
async fn chrome_arg_proxy_fetch_yields_html() {
    let webdriver = webdriver_or_skip();
    let mode = ProxyMode::ChromeArg {
        server: "http://localhost:8080".into(),
    };

    let html = fetch_page_html(&webdriver, &mode, "http://toscrape.com/", true)
        .await
        .expect("browser fetch through proxy");

    assert!(html.contains("<html"), "page source should be HTML");
}

#[tokio::test]
async fn unreachable_webdriver_errors_cleanly() {
    // No WebDriver on port 1; launch must fail with an error rather than
    // leaving anything behind.
    let mode = ProxyMode::Direct;
    let result = fetch_page_html("http://localhost:1", &mode, "http://toscrape.com/", true).await;
    assert!(result.is_err());
}

// Shared helpers for integration tests.
//
// Scenarios need a live chromedriver or geckodriver; when none is
// reachable the tests skip with a message instead of failing, so the unit
// suite stays green on machines without a WebDriver installed.

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use loginprobe::{BrowserKind, SuiteConfig};
use url::Url;

static INIT: Once = Once::new();

/// Initializes tracing for tests (call at the start of each test)
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Returns the first browser kind whose WebDriver endpoint accepts TCP
/// connections, honoring `WEBDRIVER_URL` and `LOGINPROBE_BROWSER`.
pub async fn available_browser() -> Option<BrowserKind> {
    let config = SuiteConfig::from_env().ok()?;
    let requested = std::env::var("LOGINPROBE_BROWSER")
        .ok()
        .and_then(|raw| raw.parse::<BrowserKind>().ok());

    if let Some(endpoint) = &config.webdriver_url {
        if reachable(endpoint).await {
            return Some(requested.unwrap_or(BrowserKind::Chrome));
        }
        return None;
    }

    let candidates = match requested {
        Some(kind) => vec![kind],
        None => BrowserKind::ALL.to_vec(),
    };
    for kind in candidates {
        if reachable(kind.default_webdriver_url()).await {
            return Some(kind);
        }
    }
    None
}

/// Suite config pointed at a fixture page, with waits shortened to keep
/// negative outcomes (absent banner, absent toggle) fast.
pub fn fixture_config(base: &str, path: &str) -> SuiteConfig {
    let url = Url::parse(&format!("{base}{path}")).expect("fixture URL should parse");
    SuiteConfig::from_env()
        .expect("environment overrides should parse")
        .with_base_url(url)
        .with_element_wait(Duration::from_secs(5))
        .with_optional_wait(Duration::from_secs(2))
}

pub fn skip(test: &str) {
    eprintln!(
        "skipping {test}: no WebDriver endpoint reachable \
         (start `chromedriver --port=9515` or `geckodriver --port 4444`)"
    );
}

async fn reachable(endpoint: &str) -> bool {
    let Ok(url) = Url::parse(endpoint) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };
    let Some(port) = url.port_or_known_default() else {
        return false;
    };
    matches!(
        tokio::time::timeout(
            Duration::from_secs(1),
            tokio::net::TcpStream::connect((host.to_string(), port)),
        )
        .await,
        Ok(Ok(_))
    )
}

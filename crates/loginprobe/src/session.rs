// Driver session manager
//
// One WebDriver session per scenario, owned by value and passed explicitly
// down the call chain. Hardening options and session timeouts ride in the
// new-session capability document, so provisioning is a single protocol
// exchange against chromedriver/geckodriver.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use fantoccini::elements::Element as WdElement;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::{Map, Value, json};

use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::locator::{Document, Element, Selector};

/// The supported browser engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 2] = [BrowserKind::Chrome, BrowserKind::Firefox];

    /// Endpoint used when the config carries no explicit WebDriver URL.
    pub fn default_webdriver_url(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "http://localhost:9515",
            BrowserKind::Firefox => "http://localhost:4444",
        }
    }

    fn browser_name(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.browser_name())
    }
}

impl FromStr for BrowserKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            _ => Err(Error::UnsupportedBrowserKind(s.to_string())),
        }
    }
}

/// Diagnostic snapshot of the current document.
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub url: String,
    pub title: String,
    pub source_bytes: usize,
}

/// One live WebDriver session.
///
/// Created at scenario start, closed at scenario end, never reused across
/// scenarios. `close` is idempotent; a `Drop` backstop releases sessions a
/// panicking scenario left behind.
pub struct Session {
    client: Option<Client>,
    kind: BrowserKind,
}

impl Session {
    /// Opens a fresh session against the configured WebDriver endpoint.
    pub async fn open(kind: BrowserKind, config: &SuiteConfig) -> Result<Self> {
        let url = config
            .webdriver_url
            .clone()
            .unwrap_or_else(|| kind.default_webdriver_url().to_string());
        tracing::debug!(browser = %kind, %url, "opening WebDriver session");

        let caps = capabilities(kind, config);
        let client = ClientBuilder::rustls()
            .map_err(|e| Error::ClientSetup(e.to_string()))?
            .capabilities(caps)
            .connect(&url)
            .await
            .map_err(|source| Error::SessionOpen {
                browser: kind,
                url: url.clone(),
                source,
            })?;

        // Window sizing is best-effort; headless engines may reject it.
        if let Some((width, height)) = config.window_size {
            if let Err(e) = client.set_window_size(width, height).await {
                tracing::debug!(error = %e, "could not set window size; continuing");
            }
        }

        tracing::debug!(browser = %kind, "session ready");
        Ok(Self {
            client: Some(client),
            kind,
        })
    }

    pub fn kind(&self) -> BrowserKind {
        self.kind
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(Error::SessionClosed)
    }

    /// Navigates and propagates transport failures.
    pub async fn try_navigate(&self, url: &str) -> Result<()> {
        self.client()?
            .goto(url)
            .await
            .map_err(|source| Error::Navigation {
                url: url.to_string(),
                source,
            })
    }

    /// Navigates, logging and suppressing transport failures.
    ///
    /// Navigation failures are non-fatal: subsequent steps independently
    /// detect missing elements, so control returns to the caller with the
    /// document in whatever state it is in. Returns whether navigation
    /// succeeded.
    pub async fn navigate(&self, url: &str) -> bool {
        match self.try_navigate(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(%url, error = %e, "navigation failed; continuing with current document");
                false
            }
        }
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client()?.current_url().await?.to_string())
    }

    pub async fn title(&self) -> Result<String> {
        let value = self
            .client()?
            .execute("return document.title;", Vec::new())
            .await?;
        Ok(value.as_str().unwrap_or_default().to_owned())
    }

    /// Current URL, title and page-source size, for triage logs.
    pub async fn snapshot(&self) -> Result<PageSnapshot> {
        let client = self.client()?;
        let url = client.current_url().await?.to_string();
        let title = self.title().await?;
        let source_bytes = client.source().await?.len();
        Ok(PageSnapshot {
            url,
            title,
            source_bytes,
        })
    }

    /// Releases the WebDriver session. Safe to call more than once; a close
    /// failure is logged, never propagated.
    pub async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                tracing::warn!(browser = %self.kind, error = %e, "failed to close WebDriver session");
            } else {
                tracing::debug!(browser = %self.kind, "session closed");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            tracing::warn!(browser = %self.kind, "session dropped without close(); releasing in background");
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                handle.spawn(async move {
                    let _ = client.close().await;
                });
            }
        }
    }
}

#[async_trait]
impl Document for Session {
    type Handle = WdElement;

    async fn query(&self, selector: &Selector) -> Result<Vec<WdElement>> {
        let client = self.client()?;
        let located = match selector {
            Selector::Css(expr) => client.find_all(WdLocator::Css(expr)).await?,
            Selector::XPath(expr) => client.find_all(WdLocator::XPath(expr)).await?,
        };
        Ok(located)
    }
}

#[async_trait]
impl Element for WdElement {
    async fn is_visible(&self) -> Result<bool> {
        Ok(self.is_displayed().await?)
    }

    async fn is_interactable(&self) -> Result<bool> {
        Ok(self.is_enabled().await?)
    }

    async fn click(&self) -> Result<()> {
        Ok(WdElement::click(self).await?)
    }

    async fn clear(&self) -> Result<()> {
        Ok(WdElement::clear(self).await?)
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        Ok(self.send_keys(text).await?)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attr(name).await?)
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.text().await?)
    }
}

/// Builds the new-session capability document: browser hardening options
/// plus the W3C `timeouts` member carrying the suite's fixed defaults.
fn capabilities(kind: BrowserKind, config: &SuiteConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("browserName".to_string(), json!(kind.browser_name()));
    // Implicit wait stays 0: it would stall every non-matching selector in
    // a fallback list for the full timeout. Element waiting is explicit
    // (the locator's polling waits carry the element-wait bound).
    caps.insert(
        "timeouts".to_string(),
        json!({
            "implicit": 0,
            "pageLoad": config.page_load_timeout.as_millis() as u64,
            "script": config.script_timeout.as_millis() as u64,
        }),
    );

    match kind {
        BrowserKind::Chrome => {
            let mut args: Vec<String> = [
                "--disable-notifications",
                "--disable-popup-blocking",
                "--disable-extensions",
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--remote-allow-origins=*",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            if config.headless {
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
            }
            if let Some((width, height)) = config.window_size {
                args.push(format!("--window-size={width},{height}"));
            }
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({
                    "args": args,
                    // 2 = block, so permission prompts never cover the form
                    "prefs": {
                        "profile.default_content_setting_values.notifications": 2,
                        "profile.default_content_setting_values.geolocation": 2,
                        "profile.default_content_setting_values.media_stream": 2,
                    },
                }),
            );
        }
        BrowserKind::Firefox => {
            let mut args: Vec<String> = Vec::new();
            if config.headless {
                args.push("-headless".to_string());
            }
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({
                    "args": args,
                    "prefs": {
                        "dom.webnotifications.enabled": false,
                        "geo.enabled": false,
                        "media.navigator.enabled": false,
                    },
                }),
            );
        }
    }
    caps
}

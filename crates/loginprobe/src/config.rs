// Suite configuration
//
// Code defaults first, environment overrides second. Env lookups go through
// a function seam so tests can exercise overrides without mutating the
// process environment.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// The login page under test.
pub const DEFAULT_BASE_URL: &str = "https://dev-dash.janitri.in/";

/// Implicit element wait applied to the WebDriver session (20s)
pub const DEFAULT_ELEMENT_WAIT: Duration = Duration::from_secs(20);

/// Page-load timeout applied to the WebDriver session (60s)
pub const DEFAULT_PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Script timeout applied to the WebDriver session (30s)
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Wait bound for elements whose absence is a valid outcome (5s)
pub const DEFAULT_OPTIONAL_WAIT: Duration = Duration::from_secs(5);

/// Fixed polling interval for condition waits (100ms)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for one suite run.
///
/// # Example
///
/// ```ignore
/// use loginprobe::SuiteConfig;
///
/// let config = SuiteConfig::from_env()?
///     .with_headless(false);
/// ```
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// URL of the login page under test
    pub base_url: Url,
    /// WebDriver endpoint override; per-browser defaults apply when `None`
    pub webdriver_url: Option<String>,
    /// Run the browser without a visible window
    pub headless: bool,
    /// Window size requested after session creation (best-effort)
    pub window_size: Option<(u32, u32)>,
    /// Implicit element wait, also the bound for required-element waits
    pub element_wait: Duration,
    /// Page-load timeout
    pub page_load_timeout: Duration,
    /// Script timeout
    pub script_timeout: Duration,
    /// Wait bound for optional elements (error banner, password toggle)
    pub optional_wait: Duration,
    /// Polling interval for condition waits
    pub poll_interval: Duration,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            webdriver_url: None,
            headless: true,
            window_size: Some((1920, 1080)),
            element_wait: DEFAULT_ELEMENT_WAIT,
            page_load_timeout: DEFAULT_PAGE_LOAD_TIMEOUT,
            script_timeout: DEFAULT_SCRIPT_TIMEOUT,
            optional_wait: DEFAULT_OPTIONAL_WAIT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SuiteConfig {
    /// Builds a config from defaults plus process environment overrides.
    ///
    /// Recognized variables: `LOGINPROBE_BASE_URL`, `WEBDRIVER_URL`,
    /// `LOGINPROBE_HEADLESS` (`1`/`true`/`yes` or `0`/`false`/`no`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from defaults plus overrides supplied by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup("LOGINPROBE_BASE_URL") {
            config.base_url = Url::parse(&raw)
                .map_err(|e| Error::Config(format!("LOGINPROBE_BASE_URL '{raw}': {e}")))?;
        }
        if let Some(raw) = lookup("WEBDRIVER_URL") {
            config.webdriver_url = Some(raw);
        }
        if let Some(raw) = lookup("LOGINPROBE_HEADLESS") {
            config.headless = parse_bool(&raw)
                .ok_or_else(|| Error::Config(format!("LOGINPROBE_HEADLESS '{raw}': expected a boolean")))?;
        }
        Ok(config)
    }

    /// Sets the login page URL.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Sets an explicit WebDriver endpoint, overriding per-browser defaults.
    pub fn with_webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Toggles headless mode.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the element wait bound.
    pub fn with_element_wait(mut self, wait: Duration) -> Self {
        self.element_wait = wait;
        self
    }

    /// Sets the wait bound for optional elements.
    pub fn with_optional_wait(mut self, wait: Duration) -> Self {
        self.optional_wait = wait;
        self
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

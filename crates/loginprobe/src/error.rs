// Error types for loginprobe

use std::time::Duration;

use thiserror::Error;

use crate::locator::Role;
use crate::session::BrowserKind;

/// Result type alias for loginprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the login page
#[derive(Debug, Error)]
pub enum Error {
    /// The requested browser kind is not in the supported set
    ///
    /// Raised when parsing a browser parameter or at session creation.
    /// This is the only error that is expected to abort a scenario outright.
    #[error("unsupported browser kind '{0}'; expected 'chrome' or 'firefox'")]
    UnsupportedBrowserKind(String),

    /// Failed to create a WebDriver session
    ///
    /// Common causes: chromedriver/geckodriver not running at the endpoint,
    /// or a stale session occupying the driver.
    /// Start one with `chromedriver --port=9515` or `geckodriver --port 4444`.
    #[error("failed to open {browser} session via {url}: {source}")]
    SessionOpen {
        browser: BrowserKind,
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// The HTTP client backing the WebDriver connection could not be built
    #[error("WebDriver client setup failed: {0}")]
    ClientSetup(String),

    /// Operation attempted on a session that was already closed
    #[error("session is closed")]
    SessionClosed,

    /// Navigation failed at the transport level
    ///
    /// `Session::navigate` logs and suppresses this; `try_navigate` returns it.
    /// Subsequent steps independently detect missing elements, so navigation
    /// failures are non-fatal for a scenario.
    #[error("navigation to '{url}' failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: fantoccini::error::CmdError,
    },

    /// No visible, interactable element matched the role's selectors in time
    ///
    /// Recoverable at the call site: for optional controls (error banner,
    /// password toggle) callers treat this as an assertable "absent" outcome.
    #[error("{role} did not become actionable within {waited:?}")]
    ElementNotActionable { role: Role, waited: Duration },

    /// A WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// Invalid suite configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

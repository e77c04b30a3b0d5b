//! loginprobe: browser-driven UI regression checks for the Janitri
//! dashboard login page.
//!
//! The suite drives a real browser through a W3C WebDriver endpoint
//! (chromedriver or geckodriver), locates the login form through ordered
//! selector fallback lists, and reports on visible behavior: submit
//! enablement, password masking, and error messaging.
//!
//! # Example
//!
//! ```ignore
//! use loginprobe::{BrowserKind, LoginPage, Session, SuiteConfig};
//!
//! #[tokio::main]
//! async fn main() -> loginprobe::Result<()> {
//!     let config = SuiteConfig::from_env()?;
//!     let mut session = Session::open(BrowserKind::Chrome, &config).await?;
//!     session.navigate(config.base_url.as_str()).await;
//!
//!     let page = LoginPage::new(&session, &config);
//!     page.enter_password("not-the-password").await?;
//!     assert!(page.is_password_masked().await?);
//!
//!     session.close().await;
//!     Ok(())
//! }
//! ```
//!
//! Locator and navigation failures surface as observable values
//! (`Option`, `bool`, [`BannerOutcome`]) rather than panics, so scenarios
//! make pass/fail decisions on application behavior, not automation
//! plumbing. Every suppressed failure emits a `tracing` diagnostic naming
//! the selector or action that failed.

pub mod config;
pub mod error;
pub mod locator;
pub mod page;
pub mod scenario;
pub mod session;

#[cfg(test)]
pub(crate) mod testkit;

pub use config::{DEFAULT_BASE_URL, SuiteConfig};
pub use error::{Error, Result};
pub use locator::{Document, Element, Locator, LocatorRule, Role, Selector};
pub use page::{BannerOutcome, LoginPage};
pub use scenario::run_scenario;
pub use session::{BrowserKind, PageSnapshot, Session};

// Scenario runner
//
// One scenario = one session: open, navigate, act, close. The runner closes
// the session on every result path; a panicking body falls back to the
// session's Drop backstop, so teardown happens either way.

use std::future::Future;
use std::sync::Arc;

use crate::config::SuiteConfig;
use crate::error::Result;
use crate::page::LoginPage;
use crate::session::{BrowserKind, Session};

/// Runs one scenario body against a fresh session.
///
/// Navigation failures are suppressed (the body observes their effect as
/// missing elements); only session provisioning errors abort before the
/// body runs.
///
/// # Example
///
/// ```ignore
/// use loginprobe::{run_scenario, BrowserKind, SuiteConfig};
///
/// let config = SuiteConfig::from_env()?;
/// let masked = run_scenario(&config, BrowserKind::Chrome, |page| async move {
///     page.enter_password("secret").await?;
///     page.is_password_masked().await
/// })
/// .await?;
/// ```
pub async fn run_scenario<T, F, Fut>(
    config: &SuiteConfig,
    kind: BrowserKind,
    body: F,
) -> Result<T>
where
    F: FnOnce(LoginPage<Arc<Session>>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let session = Arc::new(Session::open(kind, config).await?);

    if session.navigate(config.base_url.as_str()).await {
        match session.snapshot().await {
            Ok(snap) => tracing::debug!(
                url = %snap.url,
                title = %snap.title,
                source_bytes = snap.source_bytes,
                "login page loaded"
            ),
            Err(e) => tracing::debug!(error = %e, "could not capture page snapshot"),
        }
    }

    let page = LoginPage::new(Arc::clone(&session), config);
    let outcome = body(page).await;

    match Arc::try_unwrap(session) {
        Ok(mut session) => session.close().await,
        Err(session) => {
            // A body that stashed a clone keeps the session alive; Drop
            // releases it once the last handle goes away.
            tracing::warn!(browser = %session.kind(), "scenario body retained a session handle");
            drop(session);
        }
    }
    outcome
}

// Resilient element locator
//
// Production markup is not controlled by the suite, so a semantic role
// ("password field") maps to an ordered fallback list of selectors rather
// than one hard-coded expression. The first selector yielding a visible
// match wins; ties among matches break by document order.
//
// Key characteristics:
// - Lazy: a Locator holds no element handle; every action re-queries
// - Typed: absence is `None`, never a logged-and-swallowed exception
// - Polling waits with explicit timeout; dropping the future cancels it

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::{Error, Result};

/// Semantic UI roles on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The user-id / email input
    UserId,
    /// The password input
    Password,
    /// The submit control
    Submit,
    /// The optional show/hide password control
    PasswordToggle,
    /// The optional error banner shown after a rejected login
    ErrorBanner,
    /// The page heading
    Heading,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::UserId => "user-id field",
            Role::Password => "password field",
            Role::Submit => "submit control",
            Role::PasswordToggle => "password visibility toggle",
            Role::ErrorBanner => "error banner",
            Role::Heading => "page heading",
        };
        f.write_str(name)
    }
}

/// A selector expression understood by the document under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Css(&'static str),
    XPath(&'static str),
}

impl Selector {
    /// The raw selector expression.
    pub fn expr(&self) -> &'static str {
        match self {
            Selector::Css(expr) | Selector::XPath(expr) => expr,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(expr) => write!(f, "css:{expr}"),
            Selector::XPath(expr) => write!(f, "xpath:{expr}"),
        }
    }
}

/// One entry of a role's ordered fallback list: a selector plus a short
/// hint naming the markup variant it targets, used in diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct LocatorRule {
    pub selector: Selector,
    pub hint: &'static str,
}

impl LocatorRule {
    pub const fn css(expr: &'static str, hint: &'static str) -> Self {
        Self {
            selector: Selector::Css(expr),
            hint,
        }
    }

    pub const fn xpath(expr: &'static str, hint: &'static str) -> Self {
        Self {
            selector: Selector::XPath(expr),
            hint,
        }
    }
}

/// Query seam over the live document.
///
/// `Session` implements this against the WebDriver connection; tests provide
/// fakes. Handles must come back in document order.
#[async_trait]
pub trait Document: Send + Sync {
    type Handle: Element;

    async fn query(&self, selector: &Selector) -> Result<Vec<Self::Handle>>;
}

#[async_trait]
impl<'d, D: Document> Document for &'d D {
    type Handle = D::Handle;

    async fn query(&self, selector: &Selector) -> Result<Vec<Self::Handle>> {
        (**self).query(selector).await
    }
}

#[async_trait]
impl<D: Document> Document for std::sync::Arc<D> {
    type Handle = D::Handle;

    async fn query(&self, selector: &Selector) -> Result<Vec<Self::Handle>> {
        (**self).query(selector).await
    }
}

/// A located element, valid until the next navigation or DOM mutation.
#[async_trait]
pub trait Element: Send + Sync {
    async fn is_visible(&self) -> Result<bool>;
    async fn is_interactable(&self) -> Result<bool>;
    async fn click(&self) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    async fn type_text(&self, text: &str) -> Result<()>;
    async fn attribute(&self, name: &str) -> Result<Option<String>>;
    async fn visible_text(&self) -> Result<String>;
}

/// Binds a document, a role and the role's rule list.
///
/// Locators are lazy: nothing is queried until `find` or a wait runs, and
/// every call re-resolves against the current document.
pub struct Locator<'a, D: Document> {
    doc: &'a D,
    role: Role,
    rules: &'static [LocatorRule],
    poll_interval: Duration,
}

impl<'a, D: Document> Locator<'a, D> {
    pub fn new(
        doc: &'a D,
        role: Role,
        rules: &'static [LocatorRule],
        poll_interval: Duration,
    ) -> Self {
        Self {
            doc,
            role,
            rules,
            poll_interval,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Resolves the role against the current document.
    ///
    /// Walks the rule list in order; the first selector yielding at least one
    /// visible match wins, ties broken by document order. Zero visible
    /// matches across all rules is `None`. Individual selector failures are
    /// logged at `debug` and skipped, never propagated.
    pub async fn find(&self) -> Option<D::Handle> {
        for rule in self.rules {
            let candidates = match self.doc.query(&rule.selector).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    tracing::debug!(
                        role = %self.role,
                        selector = %rule.selector,
                        error = %e,
                        "selector query failed; trying next rule"
                    );
                    continue;
                }
            };
            for candidate in candidates {
                match candidate.is_visible().await {
                    Ok(true) => {
                        tracing::debug!(
                            role = %self.role,
                            selector = %rule.selector,
                            hint = rule.hint,
                            "located element"
                        );
                        return Some(candidate);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::debug!(
                            role = %self.role,
                            selector = %rule.selector,
                            error = %e,
                            "visibility probe failed; skipping candidate"
                        );
                    }
                }
            }
        }
        tracing::debug!(role = %self.role, "no visible match for any selector");
        None
    }

    /// Polls `find` until a visible match exists or `timeout` elapses.
    pub async fn wait_until_visible(&self, timeout: Duration) -> Result<D::Handle> {
        self.wait_for(timeout, false).await
    }

    /// Polls `find` until a match is visible and interactable or `timeout`
    /// elapses.
    pub async fn wait_until_actionable(&self, timeout: Duration) -> Result<D::Handle> {
        self.wait_for(timeout, true).await
    }

    async fn wait_for(&self, timeout: Duration, needs_interaction: bool) -> Result<D::Handle> {
        let start = Instant::now();
        loop {
            if let Some(handle) = self.find().await {
                if !needs_interaction {
                    return Ok(handle);
                }
                match handle.is_interactable().await {
                    Ok(true) => return Ok(handle),
                    Ok(false) => {}
                    Err(e) => {
                        tracing::debug!(
                            role = %self.role,
                            error = %e,
                            "interactability probe failed; retrying"
                        );
                    }
                }
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(Error::ElementNotActionable {
                    role: self.role,
                    waited: timeout,
                });
            }
            tokio::time::sleep(self.poll_interval.min(timeout - elapsed)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{FakeDocument, FakeElement};
    use std::sync::atomic::Ordering;

    static TWO_RULES: &[LocatorRule] = &[
        LocatorRule::css("#primary", "primary markup"),
        LocatorRule::css("#fallback", "fallback markup"),
    ];

    const POLL: Duration = Duration::from_millis(20);

    fn locator(doc: &FakeDocument) -> Locator<'_, FakeDocument> {
        Locator::new(doc, Role::Submit, TWO_RULES, POLL)
    }

    #[tokio::test]
    async fn zero_matches_returns_none() {
        let doc = FakeDocument::new();
        assert!(locator(&doc).find().await.is_none());
    }

    #[tokio::test]
    async fn failing_selectors_never_raise() {
        let doc = FakeDocument::new()
            .failing_on("#primary")
            .failing_on("#fallback");
        assert!(locator(&doc).find().await.is_none());
    }

    #[tokio::test]
    async fn first_rule_with_visible_match_wins() {
        // Both rules match something; the earlier rule's match is preferred.
        let doc = FakeDocument::new()
            .on("#primary", vec![FakeElement::visible("pri")])
            .on("#fallback", vec![FakeElement::visible("fb")]);
        let found = locator(&doc).find().await.expect("should locate");
        assert_eq!(found.id, "pri");
    }

    #[tokio::test]
    async fn invisible_match_falls_through_to_later_rule() {
        let doc = FakeDocument::new()
            .on("#primary", vec![FakeElement::hidden("pri")])
            .on("#fallback", vec![FakeElement::visible("fb")]);
        let found = locator(&doc).find().await.expect("should locate");
        assert_eq!(found.id, "fb");
    }

    #[tokio::test]
    async fn failing_selector_falls_through_to_later_rule() {
        let doc = FakeDocument::new()
            .failing_on("#primary")
            .on("#fallback", vec![FakeElement::visible("fb")]);
        let found = locator(&doc).find().await.expect("should locate");
        assert_eq!(found.id, "fb");
    }

    #[tokio::test]
    async fn ties_break_by_document_order() {
        let doc = FakeDocument::new().on(
            "#primary",
            vec![
                FakeElement::hidden("a"),
                FakeElement::visible("b"),
                FakeElement::visible("c"),
            ],
        );
        // First visible candidate in document order, stable across calls.
        let first = locator(&doc).find().await.expect("should locate");
        let second = locator(&doc).find().await.expect("should locate");
        assert_eq!(first.id, "b");
        assert_eq!(second.id, "b");
    }

    #[tokio::test]
    async fn wait_until_visible_accepts_disabled_elements() {
        let doc = FakeDocument::new().on("#primary", vec![FakeElement::disabled("btn")]);
        let found = locator(&doc)
            .wait_until_visible(Duration::from_millis(200))
            .await
            .expect("visible element should satisfy the wait");
        assert_eq!(found.id, "btn");
    }

    #[tokio::test]
    async fn wait_until_actionable_times_out_on_disabled_element() {
        let doc = FakeDocument::new().on("#primary", vec![FakeElement::disabled("btn")]);
        let timeout = Duration::from_millis(250);
        let start = std::time::Instant::now();
        let result = locator(&doc).wait_until_actionable(timeout).await;
        match result {
            Err(Error::ElementNotActionable { role, waited }) => {
                assert_eq!(role, Role::Submit);
                assert_eq!(waited, timeout);
            }
            other => panic!("expected ElementNotActionable, got {other:?}"),
        }
        assert!(start.elapsed() >= timeout);
    }

    #[tokio::test]
    async fn wait_until_actionable_picks_up_mid_poll_enablement() {
        let element = FakeElement::disabled("btn");
        let enabled = element.enabled.clone();
        let doc = FakeDocument::new().on("#primary", vec![element]);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(120)).await;
            enabled.store(true, Ordering::SeqCst);
        });

        let found = locator(&doc)
            .wait_until_actionable(Duration::from_secs(2))
            .await
            .expect("element becomes actionable mid-poll");
        assert_eq!(found.id, "btn");
    }
}

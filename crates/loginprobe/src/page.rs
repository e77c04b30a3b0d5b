// Login page abstraction
//
// Holds a document handle and the ordered role -> selector tables; every
// action re-resolves its element, so a navigation or re-render between
// actions cannot leave the page object holding stale handles.
//
// The rule tables port the production suite's observed markup variants:
// explicit ids first, then common field names, placeholder hints, input
// types, and class-substring probes as the last resort.

use std::fmt;
use std::time::Duration;

use crate::config::SuiteConfig;
use crate::error::{Error, Result};
use crate::locator::{Document, Element, Locator, LocatorRule, Role};

static USER_ID_RULES: &[LocatorRule] = &[
    LocatorRule::css("input#userId", "explicit id"),
    LocatorRule::css(
        "input[name='userId'], input[name='username'], input[name='email']",
        "common field names",
    ),
    LocatorRule::css(
        "input[placeholder*='User'], input[placeholder*='user'], input[placeholder*='Email'], input[placeholder*='email']",
        "placeholder hint",
    ),
    LocatorRule::css("input[type='email']", "email input"),
    LocatorRule::xpath(
        "//input[contains(@class,'user') or contains(@class,'email') or contains(@class,'login')]",
        "class hint",
    ),
    LocatorRule::css("input[type='text']", "any text input"),
];

// type='password' ranks below the name/placeholder probes: a visibility
// toggle rewrites the type attribute, and the field must stay locatable
// in its unmasked state.
static PASSWORD_RULES: &[LocatorRule] = &[
    LocatorRule::css("input#password", "explicit id"),
    LocatorRule::css("input[name='password']", "field name"),
    LocatorRule::css("input[placeholder*='assword']", "placeholder hint"),
    LocatorRule::css("input[type='password']", "masked input"),
    LocatorRule::xpath("//input[contains(@class,'password')]", "class hint"),
];

static SUBMIT_RULES: &[LocatorRule] = &[
    LocatorRule::css("button[type='submit'], input[type='submit']", "submit type"),
    LocatorRule::xpath(
        "//button[contains(normalize-space(.),'Login') or contains(normalize-space(.),'Log in') or contains(normalize-space(.),'Sign in') or contains(normalize-space(.),'Sign In')]",
        "button caption",
    ),
    LocatorRule::css("button[class*='login'], button[class*='submit']", "class hint"),
    LocatorRule::xpath(
        "//*[@role='button'][contains(.,'Login') or contains(.,'Sign')]",
        "aria button",
    ),
];

static PASSWORD_TOGGLE_RULES: &[LocatorRule] = &[
    LocatorRule::css("[data-testid='password-toggle']", "test id"),
    LocatorRule::css(
        "span[class*='eye'], i[class*='eye'], button[class*='password-toggle']",
        "eye icon",
    ),
    LocatorRule::css(
        "span[class*='show'], span[class*='hide'], [class*='toggle']",
        "show/hide control",
    ),
    LocatorRule::xpath("//*[contains(@onclick,'password')]", "inline handler"),
];

static ERROR_BANNER_RULES: &[LocatorRule] = &[
    LocatorRule::css(
        "div[class*='error'], span[class*='error'], div[class*='alert']",
        "class hint",
    ),
    LocatorRule::css("[role='alert']", "aria alert"),
    LocatorRule::xpath(
        "//*[contains(text(),'Invalid') or contains(text(),'Error') or contains(text(),'incorrect') or contains(text(),'failed')]",
        "message text",
    ),
];

static HEADING_RULES: &[LocatorRule] = &[
    LocatorRule::css("h1", "primary heading"),
    LocatorRule::css("h2", "secondary heading"),
    LocatorRule::css("[class*='title'], [class*='heading']", "class hint"),
];

fn rules_for(role: Role) -> &'static [LocatorRule] {
    match role {
        Role::UserId => USER_ID_RULES,
        Role::Password => PASSWORD_RULES,
        Role::Submit => SUBMIT_RULES,
        Role::PasswordToggle => PASSWORD_TOGGLE_RULES,
        Role::ErrorBanner => ERROR_BANNER_RULES,
        Role::Heading => HEADING_RULES,
    }
}

/// Whether the login attempt produced a visible error message.
///
/// Whether the application shows one for invalid credentials is unspecified
/// upstream, so the absence of a banner is a reported outcome, not a
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerOutcome {
    /// A non-empty, trimmed error message was visible.
    Shown(String),
    /// No visible error message within the optional-element wait.
    NotShown,
}

impl BannerOutcome {
    pub fn is_shown(&self) -> bool {
        matches!(self, BannerOutcome::Shown(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            BannerOutcome::Shown(message) => Some(message),
            BannerOutcome::NotShown => None,
        }
    }
}

impl fmt::Display for BannerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BannerOutcome::Shown(message) => write!(f, "error message shown: {message}"),
            BannerOutcome::NotShown => f.write_str("no error message shown"),
        }
    }
}

/// The login page under test.
pub struct LoginPage<D: Document> {
    doc: D,
    element_wait: Duration,
    optional_wait: Duration,
    poll_interval: Duration,
}

impl<D: Document> LoginPage<D> {
    pub fn new(doc: D, config: &SuiteConfig) -> Self {
        Self {
            doc,
            element_wait: config.element_wait,
            optional_wait: config.optional_wait,
            poll_interval: config.poll_interval,
        }
    }

    /// A lazy locator for one of the page's semantic roles.
    pub fn locator(&self, role: Role) -> Locator<'_, D> {
        Locator::new(&self.doc, role, rules_for(role), self.poll_interval)
    }

    pub async fn enter_user_id(&self, user_id: &str) -> Result<()> {
        let field = self
            .locator(Role::UserId)
            .wait_until_actionable(self.element_wait)
            .await?;
        field.clear().await?;
        field.type_text(user_id).await
    }

    pub async fn enter_password(&self, password: &str) -> Result<()> {
        let field = self
            .locator(Role::Password)
            .wait_until_actionable(self.element_wait)
            .await?;
        field.clear().await?;
        field.type_text(password).await
    }

    pub async fn clear_credentials(&self) -> Result<()> {
        for role in [Role::UserId, Role::Password] {
            self.locator(role)
                .wait_until_actionable(self.element_wait)
                .await?
                .clear()
                .await?;
        }
        Ok(())
    }

    pub async fn click_submit(&self) -> Result<()> {
        self.locator(Role::Submit)
            .wait_until_actionable(self.element_wait)
            .await?
            .click()
            .await
    }

    /// Whether the submit control is currently enabled.
    ///
    /// Waits for visibility only: a disabled submit button is a valid,
    /// assertable state.
    pub async fn is_submit_enabled(&self) -> Result<bool> {
        self.locator(Role::Submit)
            .wait_until_visible(self.element_wait)
            .await?
            .is_interactable()
            .await
    }

    /// The password field's `type` attribute.
    pub async fn password_field_type(&self) -> Result<Option<String>> {
        self.locator(Role::Password)
            .wait_until_visible(self.element_wait)
            .await?
            .attribute("type")
            .await
    }

    pub async fn is_password_masked(&self) -> Result<bool> {
        Ok(self.password_field_type().await?.as_deref() == Some("password"))
    }

    /// Clicks the show/hide control if the page has one.
    ///
    /// Returns `Ok(false)` when the control is absent; the toggle is an
    /// optional part of the markup and its absence is recoverable at the
    /// call site.
    pub async fn toggle_password_visibility(&self) -> Result<bool> {
        match self
            .locator(Role::PasswordToggle)
            .wait_until_actionable(self.optional_wait)
            .await
        {
            Ok(toggle) => {
                toggle.click().await?;
                Ok(true)
            }
            Err(Error::ElementNotActionable { .. }) => {
                tracing::debug!("password visibility toggle not present");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Reads the error banner, reporting absence as a valid outcome.
    pub async fn error_banner(&self) -> BannerOutcome {
        match self
            .locator(Role::ErrorBanner)
            .wait_until_visible(self.optional_wait)
            .await
        {
            Ok(banner) => match banner.visible_text().await {
                Ok(text) => {
                    let text = text.trim();
                    if text.is_empty() {
                        tracing::debug!("error banner visible but empty");
                        BannerOutcome::NotShown
                    } else {
                        BannerOutcome::Shown(text.to_string())
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read error banner text");
                    BannerOutcome::NotShown
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "no error banner");
                BannerOutcome::NotShown
            }
        }
    }

    /// Visible heading text, if the page has one.
    pub async fn heading_text(&self) -> Option<String> {
        let heading = self.locator(Role::Heading).find().await?;
        match heading.visible_text().await {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to read heading text");
                None
            }
        }
    }

    /// Whether a visible element for the role appears within the element
    /// wait.
    pub async fn is_visible(&self, role: Role) -> bool {
        self.locator(role)
            .wait_until_visible(self.element_wait)
            .await
            .is_ok()
    }

    /// Fills both fields, submits, and reports the error-banner outcome.
    pub async fn attempt_login(&self, user_id: &str, password: &str) -> Result<BannerOutcome> {
        self.enter_user_id(user_id).await?;
        self.enter_password(password).await?;
        self.click_submit().await?;
        Ok(self.error_banner().await)
    }
}

// Test doubles for the Document/Element seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::locator::{Document, Element, Selector};

/// An element with scripted state. Interaction counters are shared through
/// `Arc` so tests can keep observing after handing the element to a fake
/// document.
#[derive(Clone, Debug)]
pub(crate) struct FakeElement {
    pub id: &'static str,
    pub displayed: bool,
    pub enabled: Arc<AtomicBool>,
    pub attrs: HashMap<&'static str, String>,
    pub text: String,
    pub clicks: Arc<AtomicUsize>,
    pub entered: Arc<Mutex<String>>,
}

impl FakeElement {
    fn new(id: &'static str, displayed: bool, enabled: bool) -> Self {
        Self {
            id,
            displayed,
            enabled: Arc::new(AtomicBool::new(enabled)),
            attrs: HashMap::new(),
            text: String::new(),
            clicks: Arc::new(AtomicUsize::new(0)),
            entered: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn visible(id: &'static str) -> Self {
        Self::new(id, true, true)
    }

    pub fn hidden(id: &'static str) -> Self {
        Self::new(id, false, true)
    }

    /// Visible but not interactable, like a disabled submit button.
    pub fn disabled(id: &'static str) -> Self {
        Self::new(id, true, false)
    }

    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.insert(name, value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

#[async_trait]
impl Element for FakeElement {
    async fn is_visible(&self) -> Result<bool> {
        Ok(self.displayed)
    }

    async fn is_interactable(&self) -> Result<bool> {
        Ok(self.enabled.load(Ordering::SeqCst))
    }

    async fn click(&self) -> Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.entered.lock().expect("entered lock").clear();
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.entered.lock().expect("entered lock").push_str(text);
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.attrs.get(name).cloned())
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// A document answering queries from a scripted selector table.
#[derive(Default)]
pub(crate) struct FakeDocument {
    results: HashMap<&'static str, Vec<FakeElement>>,
    failing: Vec<&'static str>,
    pub queries: AtomicUsize,
}

impl FakeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the result list for a selector expression.
    pub fn on(mut self, expr: &'static str, elements: Vec<FakeElement>) -> Self {
        self.results.insert(expr, elements);
        self
    }

    /// Makes queries for a selector expression fail.
    pub fn failing_on(mut self, expr: &'static str) -> Self {
        self.failing.push(expr);
        self
    }
}

#[async_trait]
impl Document for FakeDocument {
    type Handle = FakeElement;

    async fn query(&self, selector: &Selector) -> Result<Vec<FakeElement>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let expr = selector.expr();
        if self.failing.contains(&expr) {
            return Err(Error::Command(fantoccini::error::CmdError::NotW3C(
                serde_json::json!({"scripted failure": expr}),
            )));
        }
        Ok(self.results.get(expr).cloned().unwrap_or_default())
    }
}

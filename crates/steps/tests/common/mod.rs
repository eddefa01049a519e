//! In-memory browser used by the integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use url::Url;

use browser_steps::{
    BrowserDriver, By, Capabilities, DriverConnector, DriverError, ElementId, Locator, Rect,
};

/// Install a subscriber when RUST_LOG is set, so failures can be traced.
pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_some() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: String,
    pub rect: Rect,
    /// `find_element` reports "no such element" this many times first
    pub hidden_for: u32,
    /// URL the page moves to when the element is clicked or submitted
    pub navigates_to: Option<String>,
    pub value: String,
    pub clicks: u32,
    pub submits: u32,
    pub hovers: u32,
}

impl FakeElement {
    pub fn new(text: &str, rect: Rect) -> Self {
        Self {
            text: text.to_string(),
            rect,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct PageState {
    pub url: String,
    pub title: String,
    pub elements: HashMap<String, FakeElement>,
    pub alert: Option<String>,
    pub cookies: usize,
    pub viewport: Rect,
    pub screenshot: Vec<u8>,
    pub history: Vec<String>,
    pub calls: Vec<String>,
    pub quit: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            title: String::new(),
            elements: HashMap::new(),
            alert: None,
            cookies: 0,
            viewport: Rect::new(0.0, 0.0, 1280.0, 720.0),
            screenshot: b"\x89PNG fake".to_vec(),
            history: Vec::new(),
            calls: Vec::new(),
            quit: false,
        }
    }
}

impl PageState {
    pub fn add(&mut self, by: By, selector: &str, element: FakeElement) {
        self.elements.insert(key(&Locator::new(by, selector)), element);
    }

    pub fn element(&self, by: By, selector: &str) -> &FakeElement {
        &self.elements[&key(&Locator::new(by, selector))]
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }
}

fn key(locator: &Locator) -> String {
    format!("{}={}", locator.by, locator.selector)
}

pub type SharedPage = Arc<Mutex<PageState>>;

pub fn page() -> SharedPage {
    Arc::new(Mutex::new(PageState::default()))
}

#[derive(Clone)]
pub struct FakeDriver {
    page: SharedPage,
}

impl FakeDriver {
    pub fn new(page: SharedPage) -> Self {
        Self { page }
    }

    fn with_element<T>(
        &self,
        element: &ElementId,
        call: &str,
        f: impl FnOnce(&mut FakeElement) -> T,
    ) -> Result<(T, Option<String>), DriverError> {
        let mut page = self.page.lock();
        page.calls.push(call.to_string());
        let el = page
            .elements
            .get_mut(&element.0)
            .ok_or_else(|| DriverError::StaleElement(element.0.clone()))?;
        let out = f(el);
        Ok((out, el.navigates_to.clone()))
    }

    fn go(&self, url: String) {
        let mut page = self.page.lock();
        let previous = std::mem::replace(&mut page.url, url);
        page.history.push(previous);
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("find_element".to_string());
        let id = key(locator);
        match page.elements.get_mut(&id) {
            Some(el) if el.hidden_for > 0 => {
                el.hidden_for -= 1;
                Err(DriverError::NoSuchElement(locator.to_string()))
            }
            Some(_) => Ok(ElementId(id)),
            None => Err(DriverError::NoSuchElement(locator.to_string())),
        }
    }

    async fn element_text(&self, element: &ElementId) -> Result<String, DriverError> {
        Ok(self.with_element(element, "element_text", |el| el.text.clone())?.0)
    }

    async fn click(&self, element: &ElementId) -> Result<(), DriverError> {
        let (_, target) = self.with_element(element, "click", |el| el.clicks += 1)?;
        if let Some(url) = target {
            self.go(url);
        }
        Ok(())
    }

    async fn submit(&self, element: &ElementId) -> Result<(), DriverError> {
        let (_, target) = self.with_element(element, "submit", |el| el.submits += 1)?;
        if let Some(url) = target {
            self.go(url);
        }
        Ok(())
    }

    async fn move_to(&self, element: &ElementId) -> Result<(), DriverError> {
        self.with_element(element, "move_to", |el| el.hovers += 1)?;
        Ok(())
    }

    async fn clear(&self, element: &ElementId) -> Result<(), DriverError> {
        self.with_element(element, "clear", |el| el.value.clear())?;
        Ok(())
    }

    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), DriverError> {
        self.with_element(element, "send_keys", |el| el.value.push_str(text))?;
        Ok(())
    }

    async fn element_rect(&self, element: &ElementId) -> Result<Rect, DriverError> {
        Ok(self.with_element(element, "element_rect", |el| el.rect)?.0)
    }

    async fn navigate(&self, url: &Url) -> Result<(), DriverError> {
        self.page.lock().calls.push("navigate".to_string());
        self.go(url.to_string());
        Ok(())
    }

    async fn back(&self) -> Result<(), DriverError> {
        let mut page = self.page.lock();
        page.calls.push("back".to_string());
        if let Some(previous) = page.history.pop() {
            page.url = previous;
        }
        Ok(())
    }

    async fn forward(&self) -> Result<(), DriverError> {
        self.page.lock().calls.push("forward".to_string());
        Ok(())
    }

    async fn refresh(&self) -> Result<(), DriverError> {
        self.page.lock().calls.push("refresh".to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("current_url".to_string());
        Ok(page.url.clone())
    }

    async fn title(&self) -> Result<String, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("title".to_string());
        Ok(page.title.clone())
    }

    async fn screenshot(&self) -> Result<Vec<u8>, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("screenshot".to_string());
        Ok(page.screenshot.clone())
    }

    async fn delete_all_cookies(&self) -> Result<(), DriverError> {
        let mut page = self.page.lock();
        page.calls.push("delete_all_cookies".to_string());
        page.cookies = 0;
        Ok(())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        let mut page = self.page.lock();
        page.calls.push("quit".to_string());
        page.quit = true;
        Ok(())
    }

    async fn alert_text(&self) -> Result<String, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("alert_text".to_string());
        page.alert.clone().ok_or(DriverError::NoSuchAlert)
    }

    async fn accept_alert(&self) -> Result<(), DriverError> {
        let mut page = self.page.lock();
        page.calls.push("accept_alert".to_string());
        page.alert.take().map(|_| ()).ok_or(DriverError::NoSuchAlert)
    }

    async fn dismiss_alert(&self) -> Result<(), DriverError> {
        let mut page = self.page.lock();
        page.calls.push("dismiss_alert".to_string());
        page.alert.take().map(|_| ()).ok_or(DriverError::NoSuchAlert)
    }

    async fn viewport_rect(&self) -> Result<Rect, DriverError> {
        let mut page = self.page.lock();
        page.calls.push("viewport_rect".to_string());
        Ok(page.viewport)
    }
}

/// Hands out drivers over one shared page
#[derive(Clone)]
pub struct FakeConnector {
    pub page: SharedPage,
    pub refuse: bool,
    pub sessions: Arc<AtomicUsize>,
}

impl FakeConnector {
    pub fn new(page: SharedPage) -> Self {
        Self {
            page,
            refuse: false,
            sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn refusing(page: SharedPage) -> Self {
        Self {
            refuse: true,
            ..Self::new(page)
        }
    }

    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DriverConnector for FakeConnector {
    async fn connect(
        &self,
        _capabilities: &Capabilities,
        address: &Url,
    ) -> Result<Box<dyn BrowserDriver>, DriverError> {
        if self.refuse {
            return Err(DriverError::SessionNotCreated(format!(
                "connection refused: {}",
                address
            )));
        }
        self.sessions.fetch_add(1, Ordering::SeqCst);
        self.page.lock().quit = false;
        Ok(Box::new(FakeDriver::new(self.page.clone())))
    }
}

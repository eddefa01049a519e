//! Browser driver capability
//!
//! The steps never talk to a browser directly. Everything goes through
//! [`BrowserDriver`], and sessions are opened through [`DriverConnector`], so
//! any WebDriver client can be plugged in.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::error::StepError;

/// Capability descriptor sent when a session is created
pub type Capabilities = serde_json::Map<String, serde_json::Value>;

/// Errors reported by a driver implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("no such element: {0}")]
    NoSuchElement(String),

    #[error("stale element reference: {0}")]
    StaleElement(String),

    #[error("element not interactable: {0}")]
    NotInteractable(String),

    #[error("no such alert")]
    NoSuchAlert,

    #[error("session not created: {0}")]
    SessionNotCreated(String),

    #[error("invalid session")]
    InvalidSession,

    #[error("webdriver error: {0}")]
    Protocol(String),
}

/// Element location strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum By {
    Id,
    Name,
    CssSelector,
    XPath,
    LinkText,
    PartialLinkText,
    TagName,
    ClassName,
}

impl By {
    /// Token as written in step phrases
    pub fn as_str(&self) -> &'static str {
        match self {
            By::Id => "id",
            By::Name => "name",
            By::CssSelector => "css selector",
            By::XPath => "xpath",
            By::LinkText => "link text",
            By::PartialLinkText => "partial link text",
            By::TagName => "tag name",
            By::ClassName => "class name",
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for By {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(By::Id),
            "name" => Ok(By::Name),
            "css" | "css selector" => Ok(By::CssSelector),
            "xpath" => Ok(By::XPath),
            "link text" => Ok(By::LinkText),
            "partial link text" => Ok(By::PartialLinkText),
            "tag name" => Ok(By::TagName),
            "class name" => Ok(By::ClassName),
            other => Err(StepError::InvalidLocator(other.to_string())),
        }
    }
}

/// A (strategy, selector) pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub by: By,
    pub selector: String,
}

impl Locator {
    pub fn new(by: By, selector: impl Into<String>) -> Self {
        Self {
            by,
            selector: selector.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.selector, self.by)
    }
}

/// Opaque element reference handed out by [`BrowserDriver::find_element`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True when the two rectangles share a region of non-zero area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Operations the step library needs from a live browser session
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn find_element(&self, locator: &Locator) -> Result<ElementId, DriverError>;

    async fn element_text(&self, element: &ElementId) -> Result<String, DriverError>;
    async fn click(&self, element: &ElementId) -> Result<(), DriverError>;
    async fn submit(&self, element: &ElementId) -> Result<(), DriverError>;
    /// Move the pointer to the element's top-left corner.
    async fn move_to(&self, element: &ElementId) -> Result<(), DriverError>;
    async fn clear(&self, element: &ElementId) -> Result<(), DriverError>;
    async fn send_keys(&self, element: &ElementId, text: &str) -> Result<(), DriverError>;
    async fn element_rect(&self, element: &ElementId) -> Result<Rect, DriverError>;

    async fn navigate(&self, url: &Url) -> Result<(), DriverError>;
    async fn back(&self) -> Result<(), DriverError>;
    async fn forward(&self) -> Result<(), DriverError>;
    async fn refresh(&self) -> Result<(), DriverError>;
    async fn current_url(&self) -> Result<String, DriverError>;
    async fn title(&self) -> Result<String, DriverError>;
    /// PNG-encoded capture of the current window.
    async fn screenshot(&self) -> Result<Vec<u8>, DriverError>;
    async fn delete_all_cookies(&self) -> Result<(), DriverError>;
    async fn quit(&self) -> Result<(), DriverError>;

    async fn alert_text(&self) -> Result<String, DriverError>;
    async fn accept_alert(&self) -> Result<(), DriverError>;
    async fn dismiss_alert(&self) -> Result<(), DriverError>;

    /// Visible part of the document, in the same coordinates as `element_rect`.
    async fn viewport_rect(&self) -> Result<Rect, DriverError>;
}

/// Opens a new driver session against a remote WebDriver endpoint
#[async_trait]
pub trait DriverConnector: Send + Sync {
    async fn connect(
        &self,
        capabilities: &Capabilities,
        address: &Url,
    ) -> Result<Box<dyn BrowserDriver>, DriverError>;
}

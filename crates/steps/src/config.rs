//! Step library configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::driver::Capabilities;
use crate::error::{StepError, StepResult};
use crate::retry::{default_poll_interval, RetryPolicy, DEFAULT_TIMEOUT};

/// Environment variable naming the failure screenshot directory
pub const SCREENSHOT_PATH_ENV: &str = "SCREENSHOT_PATH";
pub const BASE_URL_ENV: &str = "BROWSER_STEPS_BASE_URL";
pub const WEBDRIVER_URL_ENV: &str = "BROWSER_STEPS_WEBDRIVER_URL";
pub const TIMEOUT_ENV: &str = "BROWSER_STEPS_TIMEOUT_MS";
pub const POLL_INTERVAL_ENV: &str = "BROWSER_STEPS_POLL_INTERVAL_MS";

/// Settings shared by every scenario of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StepsConfig {
    /// Total budget for a retried step
    pub timeout_ms: u64,

    /// Wait between attempts (None = timeout / 20)
    pub poll_interval_ms: Option<u64>,

    /// Absolute URL that relative step URLs resolve against
    pub base_url: Option<String>,

    /// Remote WebDriver endpoint
    pub webdriver_url: String,

    /// Capabilities requested when a session is created
    pub capabilities: Capabilities,

    /// Where failure screenshots go (None = skip capture)
    pub screenshot_dir: Option<PathBuf>,
}

impl Default for StepsConfig {
    fn default() -> Self {
        let mut capabilities = Capabilities::new();
        capabilities.insert("browserName".to_string(), "chrome".into());

        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            poll_interval_ms: None,
            base_url: None,
            webdriver_url: "http://localhost:4444".to_string(),
            capabilities,
            screenshot_dir: None,
        }
    }
}

impl StepsConfig {
    /// Load configuration from a TOML file, falling back to defaults when it
    /// does not exist, then overlay the process environment
    pub fn load(path: &Path) -> StepResult<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// [`StepsConfig::load`] with an explicit environment lookup
    pub fn load_with_env<F>(path: &Path, lookup: F) -> StepResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        config.with_env_overrides(lookup)
    }

    pub fn from_toml(content: &str) -> StepResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> StepResult<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> StepResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(SCREENSHOT_PATH_ENV) {
            self.screenshot_dir = Some(PathBuf::from(dir));
        }
        if let Some(url) = get(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
        if let Some(url) = get(WEBDRIVER_URL_ENV) {
            self.webdriver_url = url;
        }
        if let Some(ms) = get(TIMEOUT_ENV) {
            self.timeout_ms = parse_millis(TIMEOUT_ENV, &ms)?;
        }
        if let Some(ms) = get(POLL_INTERVAL_ENV) {
            self.poll_interval_ms = Some(parse_millis(POLL_INTERVAL_ENV, &ms)?);
        }

        Ok(self)
    }

    /// Check every invariant that would otherwise surface mid-scenario
    pub fn validate(&self) -> StepResult<()> {
        self.retry_policy()?;
        self.parsed_base_url()?;
        self.parsed_webdriver_url()?;
        Ok(())
    }

    pub fn retry_policy(&self) -> StepResult<RetryPolicy> {
        let timeout = Duration::from_millis(self.timeout_ms);
        let poll_interval = match self.poll_interval_ms {
            Some(ms) => Duration::from_millis(ms),
            None => default_poll_interval(timeout),
        };
        RetryPolicy::new(timeout, poll_interval)
    }

    pub fn parsed_base_url(&self) -> StepResult<Option<Url>> {
        self.base_url
            .as_deref()
            .map(parse_base_url)
            .transpose()
    }

    pub fn parsed_webdriver_url(&self) -> StepResult<Url> {
        Url::parse(&self.webdriver_url).map_err(|e| {
            StepError::Config(format!("invalid webdriver url '{}': {}", self.webdriver_url, e))
        })
    }
}

/// Parse a base URL, rejecting anything that is not absolute
pub fn parse_base_url(raw: &str) -> StepResult<Url> {
    // `Url` only represents absolute URLs, so a relative input fails to parse
    let url = Url::parse(raw)
        .map_err(|_| StepError::Config(format!("BaseURL must be absolute, got '{}'", raw)))?;
    if url.cannot_be_a_base() {
        return Err(StepError::Config(format!(
            "BaseURL must be absolute, got '{}'",
            raw
        )));
    }
    Ok(url)
}

fn parse_millis(key: &str, value: &str) -> StepResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| {
            StepError::Config(format!(
                "{} must be a number of milliseconds, got '{}'",
                key, value
            ))
        })
}

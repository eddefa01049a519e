//! One browser session per scenario, and the actions steps perform on it

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;

use crate::driver::{BrowserDriver, Locator};
use crate::error::{StepError, StepResult};
use crate::retry::{run_with_cancellation, RetryPolicy};

/// A live driver session plus the settings every step reads
///
/// Sessions are created by the before-scenario hook and consumed by the
/// after-scenario hook. Steps only ever borrow them.
pub struct Session {
    driver: Box<dyn BrowserDriver>,
    policy: RetryPolicy,
    base_url: Option<Url>,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(driver: Box<dyn BrowserDriver>, policy: RetryPolicy) -> Self {
        Self {
            driver,
            policy,
            base_url: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the URL relative step URLs resolve against. It must be absolute.
    pub fn with_base_url(mut self, base_url: Url) -> StepResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(StepError::Config(format!(
                "BaseURL must be absolute, got '{}'",
                base_url
            )));
        }
        self.base_url = Some(base_url);
        Ok(self)
    }

    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Token that aborts any retry loop running on this session at its next
    /// wait.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve a step URL: absolute URLs pass through, relative ones are
    /// joined onto the base URL.
    pub fn resolve_url(&self, raw: &str) -> StepResult<Url> {
        match Url::parse(raw) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => Ok(base.join(raw)?),
                None => Err(StepError::Config(format!(
                    "relative URL '{}' needs a base URL",
                    raw
                ))),
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Run `operation` under the session's retry policy.
    pub async fn retry<F, Fut, T>(&self, operation: F) -> StepResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StepResult<T>>,
    {
        let attempted = run_with_cancellation(&self.policy, &self.cancel, operation).await?;
        if attempted.attempts > 1 {
            debug!(attempts = attempted.attempts, "step passed after retrying");
        }
        Ok(attempted.value)
    }

    pub async fn navigate_to(&self, raw: &str) -> StepResult<()> {
        let url = self.resolve_url(raw)?;
        debug!("Navigating to {}", url);
        self.driver.navigate(&url).await?;
        Ok(())
    }

    pub async fn go_back(&self) -> StepResult<()> {
        Ok(self.driver.back().await?)
    }

    pub async fn go_forward(&self) -> StepResult<()> {
        Ok(self.driver.forward().await?)
    }

    pub async fn refresh(&self) -> StepResult<()> {
        Ok(self.driver.refresh().await?)
    }

    pub async fn assert_url(&self, raw: &str) -> StepResult<()> {
        let expected = self.resolve_url(raw)?;
        let expected = expected.as_str();
        let driver = self.driver();

        self.retry(move || async move {
            let current = driver.current_url().await?;
            if current != expected {
                return Err(StepError::AssertionFailed(format!(
                    "URL does not match. Expected '{}', Found '{}'",
                    expected, current
                )));
            }
            Ok(())
        })
        .await
    }

    pub async fn assert_title(&self, expected: &str) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let title = driver.title().await?;
            if title != expected {
                return Err(StepError::AssertionFailed(format!(
                    "Title does not match. Expected '{}', Found '{}'",
                    expected, title
                )));
            }
            Ok(())
        })
        .await
    }

    pub async fn assert_text(&self, expected: &str, locator: &Locator) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            let text = driver.element_text(&element).await?;
            if text != expected {
                return Err(StepError::AssertionFailed(format!(
                    "Text of {} does not match. Expected '{}', Found '{}'",
                    locator, expected, text
                )));
            }
            Ok(())
        })
        .await
    }

    /// Wait until the element's box does (or does not) overlap the viewport.
    pub async fn assert_visible(&self, locator: &Locator, visible: bool) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            let element_rect = driver.element_rect(&element).await?;
            let viewport = driver.viewport_rect().await?;

            match (element_rect.intersects(&viewport), visible) {
                (false, true) => Err(StepError::AssertionFailed(format!(
                    "Element {} not in the Window area",
                    locator
                ))),
                (true, false) => Err(StepError::AssertionFailed(format!(
                    "Element {} in the Window area",
                    locator
                ))),
                _ => Ok(()),
            }
        })
        .await
    }

    pub async fn assert_alert_text(&self, expected: &str) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let text = driver.alert_text().await?;
            if text != expected {
                return Err(StepError::AssertionFailed(format!(
                    "Alert Text Mismatch. Got '{}', Expected '{}'",
                    text, expected
                )));
            }
            Ok(())
        })
        .await
    }

    /// Clear the element, then type `text` into it.
    pub async fn write(&self, text: &str, locator: &Locator) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            driver.clear(&element).await?;
            driver.send_keys(&element, text).await?;
            Ok(())
        })
        .await
    }

    pub async fn click(&self, locator: &Locator) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            Ok(driver.click(&element).await?)
        })
        .await
    }

    pub async fn submit(&self, locator: &Locator) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            Ok(driver.submit(&element).await?)
        })
        .await
    }

    pub async fn hover(&self, locator: &Locator) -> StepResult<()> {
        let driver = self.driver();

        self.retry(move || async move {
            let element = driver.find_element(locator).await?;
            Ok(driver.move_to(&element).await?)
        })
        .await
    }

    // One-shot commands below are not retried.

    pub async fn clear_cookies(&self) -> StepResult<()> {
        Ok(self.driver.delete_all_cookies().await?)
    }

    pub async fn accept_alert(&self) -> StepResult<()> {
        Ok(self.driver.accept_alert().await?)
    }

    pub async fn dismiss_alert(&self) -> StepResult<()> {
        Ok(self.driver.dismiss_alert().await?)
    }

    pub async fn screenshot(&self) -> StepResult<Vec<u8>> {
        Ok(self.driver.screenshot().await?)
    }

    /// End the browser session.
    pub async fn quit(self) -> StepResult<()> {
        self.cancel.cancel();
        Ok(self.driver.quit().await?)
    }
}

//! Scenario lifecycle: open a session before, clean it up after

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::config::StepsConfig;
use crate::driver::DriverConnector;
use crate::error::{StepError, StepResult};
use crate::registry::StepRegistry;
use crate::retry::RetryPolicy;
use crate::screenshot::save_failure_screenshot;
use crate::session::Session;
use crate::steps;

/// The step catalog bound to a configuration and a way to open sessions
pub struct BrowserSteps {
    config: StepsConfig,
    policy: RetryPolicy,
    base_url: Option<Url>,
    webdriver_url: Url,
    connector: Arc<dyn DriverConnector>,
    registry: StepRegistry,
}

impl BrowserSteps {
    /// Validate `config` and register the built-in steps
    pub fn new(config: StepsConfig, connector: Arc<dyn DriverConnector>) -> StepResult<Self> {
        let policy = config.retry_policy()?;
        let base_url = config.parsed_base_url()?;
        let webdriver_url = config.parsed_webdriver_url()?;
        let registry = steps::registry()?;

        Ok(Self {
            config,
            policy,
            base_url,
            webdriver_url,
            connector,
            registry,
        })
    }

    pub fn config(&self) -> &StepsConfig {
        &self.config
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// For registering project-specific steps next to the built-in ones
    pub fn registry_mut(&mut self) -> &mut StepRegistry {
        &mut self.registry
    }

    /// Open a fresh browser session. Failing here aborts the scenario.
    pub async fn before_scenario(&self) -> StepResult<Session> {
        debug!("Opening browser session at {}", self.webdriver_url);

        let driver = self
            .connector
            .connect(&self.config.capabilities, &self.webdriver_url)
            .await
            .map_err(|e| StepError::SessionStart(e.to_string()))?;

        let session = Session::new(driver, self.policy);
        match &self.base_url {
            Some(base) => session.with_base_url(base.clone()),
            None => Ok(session),
        }
    }

    pub async fn run_step(&self, session: &Session, text: &str) -> StepResult<()> {
        self.registry.dispatch(session, text).await
    }

    /// Screenshot the page if the scenario failed, then always close the
    /// session. Cleanup problems are logged and never replace the step error.
    pub async fn after_scenario(
        &self,
        session: Session,
        scenario: &str,
        failure: Option<&StepError>,
    ) -> Option<PathBuf> {
        let mut screenshot = None;

        if let (Some(_), Some(dir)) = (failure, &self.config.screenshot_dir) {
            match session.screenshot().await {
                Ok(png) => match save_failure_screenshot(dir, scenario, &png) {
                    Ok(path) => {
                        info!("Saved failure screenshot to {}", path.display());
                        screenshot = Some(path);
                    }
                    Err(e) => warn!("Failed to save screenshot for '{}': {}", scenario, e),
                },
                Err(e) => warn!("Failed to capture screenshot for '{}': {}", scenario, e),
            }
        }

        if let Err(e) = session.quit().await {
            warn!("Failed to close browser session for '{}': {}", scenario, e);
        }

        screenshot
    }
}

//! Error types for browser steps

use thiserror::Error;

use crate::driver::DriverError;
use crate::retry::RetryError;

#[derive(Error, Debug)]
pub enum StepError {
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("{0}")]
    AssertionFailed(String),

    #[error("{0}")]
    Retry(Box<RetryError<StepError>>),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid locator strategy: {0}")]
    InvalidLocator(String),

    #[error("Session failed to start: {0}")]
    SessionStart(String),

    #[error("Undefined step: {0}")]
    UndefinedStep(String),

    #[error("Ambiguous step: '{step}' matches both '{first}' and '{second}'")]
    AmbiguousStep {
        step: String,
        first: String,
        second: String,
    },

    #[error("Missing capture {index} for step '{step}'")]
    MissingArgument { step: String, index: usize },

    #[error("Invalid step pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Scenario parse error: {0}")]
    ScenarioParse(String),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<RetryError<StepError>> for StepError {
    fn from(err: RetryError<StepError>) -> Self {
        StepError::Retry(Box::new(err))
    }
}

impl StepError {
    /// Programmer errors that must never be retried.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            StepError::Config(_) | StepError::InvalidLocator(_) | StepError::Url(_)
        )
    }
}

pub type StepResult<T> = Result<T, StepError>;

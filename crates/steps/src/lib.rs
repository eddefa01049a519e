//! Browser Steps
//!
//! Ready-made BDD step definitions that drive a remote browser session:
//! - Binds phrases like `I click "submit" by id` to driver actions
//! - Retries every page-state probe until it passes or a deadline elapses
//! - Opens one session per scenario and screenshots failures
//! - Runs declarative YAML scenarios and reports per-step results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScenarioRunner                         │
//! │    └── run_scenario(scenario) -> ScenarioResult             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BrowserSteps                                               │
//! │    ├── before_scenario() -> Session   (DriverConnector)     │
//! │    ├── run_step(session, phrase)      (StepRegistry)        │
//! │    └── after_scenario(session, name, failure)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session                                                    │
//! │    ├── assert_url / assert_title / assert_visible ...       │
//! │    └── retry(operation) ──> run_with_timeout(policy, op)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  BrowserDriver (injected)                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod hooks;
pub mod registry;
pub mod retry;
pub mod runner;
pub mod scenario;
pub mod screenshot;
pub mod session;
pub mod steps;

pub use config::StepsConfig;
pub use driver::{
    BrowserDriver, By, Capabilities, DriverConnector, DriverError, ElementId, Locator, Rect,
};
pub use error::{StepError, StepResult};
pub use hooks::BrowserSteps;
pub use registry::{Captures, StepFn, StepRegistry};
pub use retry::{
    run_with_cancellation, run_with_timeout, Attempted, RetryError, RetryOutcome, RetryPolicy,
    StopReason,
};
pub use runner::{ScenarioResult, ScenarioRunner, StepReport, StepStatus, SuiteResult};
pub use scenario::Scenario;
pub use session::Session;

//! Runs scenarios one after another, each in its own browser session

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{StepError, StepResult};
use crate::hooks::BrowserSteps;
use crate::scenario::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Skipped,
}

/// Outcome of one step phrase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepReport {
    pub step: String,
    pub status: StepStatus,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Outcome of one scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub steps: Vec<StepReport>,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Sequential scenario runner
pub struct ScenarioRunner {
    steps: BrowserSteps,
    output_dir: PathBuf,
}

impl ScenarioRunner {
    pub fn new(steps: BrowserSteps) -> Self {
        Self::with_output_dir(steps, PathBuf::from("test-results"))
    }

    pub fn with_output_dir(steps: BrowserSteps, output_dir: PathBuf) -> Self {
        Self { steps, output_dir }
    }

    pub fn steps(&self) -> &BrowserSteps {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut BrowserSteps {
        &mut self.steps
    }

    /// Run every scenario found under `dir`
    pub async fn run_dir(&self, dir: &Path) -> StepResult<SuiteResult> {
        let scenarios = Scenario::load_all(dir)?;
        Ok(self.run_scenarios(&scenarios).await)
    }

    /// Run the scenarios under `dir` carrying `tag`
    pub async fn run_tagged(&self, dir: &Path, tag: &str) -> StepResult<SuiteResult> {
        let scenarios: Vec<Scenario> = Scenario::load_all(dir)?
            .into_iter()
            .filter(|s| s.has_tag(tag))
            .collect();
        Ok(self.run_scenarios(&scenarios).await)
    }

    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> SuiteResult {
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());
        let mut passed = 0;
        let mut failed = 0;

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                passed += 1;
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                failed += 1;
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            "Scenario results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        SuiteResult {
            total: scenarios.len(),
            passed,
            failed,
            duration_ms,
            results,
        }
    }

    /// Run one scenario: open a session, run steps until the first failure,
    /// then clean up
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let started_at = Utc::now();
        let start = Instant::now();

        let session = match self.steps.before_scenario().await {
            Ok(session) => session,
            Err(e) => {
                return ScenarioResult {
                    name: scenario.name.clone(),
                    success: false,
                    started_at,
                    duration_ms: start.elapsed().as_millis() as u64,
                    steps: skipped(&scenario.steps),
                    error: Some(e.to_string()),
                    screenshot_path: None,
                };
            }
        };

        let mut reports = Vec::with_capacity(scenario.steps.len());
        let mut failure: Option<StepError> = None;

        for (index, step) in scenario.steps.iter().enumerate() {
            let step_start = Instant::now();
            let result = self.steps.run_step(&session, step).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => reports.push(StepReport {
                    step: step.clone(),
                    status: StepStatus::Passed,
                    duration_ms,
                    error: None,
                }),
                Err(e) => {
                    reports.push(StepReport {
                        step: step.clone(),
                        status: StepStatus::Failed,
                        duration_ms,
                        error: Some(e.to_string()),
                    });
                    reports.extend(skipped(&scenario.steps[index + 1..]));
                    failure = Some(e);
                    break;
                }
            }
        }

        let screenshot_path = self
            .steps
            .after_scenario(session, &scenario.name, failure.as_ref())
            .await;

        ScenarioResult {
            name: scenario.name.clone(),
            success: failure.is_none(),
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            steps: reports,
            error: failure.map(|e| e.to_string()),
            screenshot_path,
        }
    }

    /// Write results as pretty JSON into the output directory
    pub fn write_results(&self, results: &SuiteResult) -> StepResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

fn skipped(steps: &[String]) -> Vec<StepReport> {
    steps
        .iter()
        .map(|step| StepReport {
            step: step.clone(),
            status: StepStatus::Skipped,
            duration_ms: 0,
            error: None,
        })
        .collect()
}

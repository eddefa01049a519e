//! Phrase pattern → step adapter table

use futures::future::BoxFuture;
use regex::Regex;
use tracing::debug;

use crate::driver::{By, Locator};
use crate::error::{StepError, StepResult};
use crate::session::Session;

/// Signature every step adapter has
pub type StepFn = for<'a> fn(&'a Session, &'a Captures) -> BoxFuture<'a, StepResult<()>>;

/// Step text plus the strings its pattern captured, in order
#[derive(Debug, Clone)]
pub struct Captures {
    step: String,
    values: Vec<String>,
}

impl Captures {
    pub fn new(step: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            step: step.into(),
            values,
        }
    }

    pub fn step(&self) -> &str {
        &self.step
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> StepResult<&str> {
        self.values
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| StepError::MissingArgument {
                step: self.step.clone(),
                index,
            })
    }

    /// Build a locator from a selector capture and a strategy capture.
    pub fn locator(&self, selector: usize, by: usize) -> StepResult<Locator> {
        let by: By = self.get(by)?.parse()?;
        Ok(Locator::new(by, self.get(selector)?))
    }
}

struct Binding {
    regex: Regex,
    step: StepFn,
}

/// Ordered set of step bindings
#[derive(Default)]
pub struct StepRegistry {
    bindings: Vec<Binding>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a regular expression to an adapter
    pub fn register(&mut self, pattern: &str, step: StepFn) -> StepResult<&mut Self> {
        let regex = Regex::new(pattern).map_err(|source| StepError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.bindings.push(Binding { regex, step });
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|b| b.regex.as_str())
    }

    /// Find the single binding matching `text` and extract its captures
    pub fn resolve(&self, text: &str) -> StepResult<(StepFn, Captures)> {
        let mut matched: Option<(&Binding, Captures)> = None;

        for binding in &self.bindings {
            let Some(caps) = binding.regex.captures(text) else {
                continue;
            };

            if let Some((first, _)) = &matched {
                return Err(StepError::AmbiguousStep {
                    step: text.to_string(),
                    first: first.regex.as_str().to_string(),
                    second: binding.regex.as_str().to_string(),
                });
            }

            let values = caps
                .iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect();
            matched = Some((binding, Captures::new(text, values)));
        }

        matched
            .map(|(binding, captures)| (binding.step, captures))
            .ok_or_else(|| StepError::UndefinedStep(text.to_string()))
    }

    /// Run the step `text` against `session`
    pub async fn dispatch(&self, session: &Session, text: &str) -> StepResult<()> {
        let (step, captures) = self.resolve(text)?;
        debug!("Running step: {}", text);
        step(session, &captures).await
    }
}

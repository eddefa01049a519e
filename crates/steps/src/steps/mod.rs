//! The built-in step catalog
//!
//! Each adapter pulls its arguments out of the phrase captures and hands them
//! to one [`Session`](crate::session::Session) action. Locator strategies are
//! parsed before any retrying starts, so a bad strategy fails immediately.

mod assertion;
mod interaction;
mod navigation;
mod process;

use crate::error::StepResult;
use crate::registry::StepRegistry;

/// Trailing `by <strategy>` clause shared by every element step
pub const BY_OPTION: &str =
    r"by (id|name|css selector|css|xpath|link text|partial link text|tag name|class name)";

/// Register every built-in step
pub fn register_all(registry: &mut StepRegistry) -> StepResult<()> {
    navigation::register(registry)?;
    assertion::register(registry)?;
    process::register(registry)?;
    interaction::register(registry)?;
    Ok(())
}

/// Registry holding the full catalog
pub fn registry() -> StepResult<StepRegistry> {
    let mut registry = StepRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

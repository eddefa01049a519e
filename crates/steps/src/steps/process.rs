//! Alert handling. These are single commands and are not retried.

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::StepResult;
use crate::registry::{Captures, StepRegistry};
use crate::session::Session;

pub(super) fn register(registry: &mut StepRegistry) -> StepResult<()> {
    registry
        .register(r"^I accept alert$", accept_alert)?
        .register(r"^I dismiss alert$", dismiss_alert)?;
    Ok(())
}

fn accept_alert<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.accept_alert().boxed()
}

fn dismiss_alert<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.dismiss_alert().boxed()
}

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::{StepError, StepResult};
use crate::registry::{Captures, StepRegistry};
use crate::session::Session;

pub(super) fn register(registry: &mut StepRegistry) -> StepResult<()> {
    registry
        .register(r#"^I navigate to "([^"]*)"$"#, navigate_to)?
        .register(r"^I go back$", go_back)?
        .register(r"^I go forward$", go_forward)?
        .register(r"^I refresh the page$", refresh)?
        .register(r"^I wait for (\d+) seconds?$", wait_for)?;
    Ok(())
}

fn navigate_to<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move { session.navigate_to(args.get(0)?).await }.boxed()
}

fn go_back<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.go_back().boxed()
}

fn go_forward<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.go_forward().boxed()
}

fn refresh<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.refresh().boxed()
}

fn wait_for<'a>(_: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let raw = args.get(0)?;
        let seconds: u64 = raw
            .parse()
            .map_err(|_| StepError::Config(format!("'{}' is not a number of seconds", raw)))?;
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        Ok(())
    }
    .boxed()
}

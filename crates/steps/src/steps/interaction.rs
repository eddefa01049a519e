use futures::future::BoxFuture;
use futures::FutureExt;

use super::BY_OPTION;
use crate::error::StepResult;
use crate::registry::{Captures, StepRegistry};
use crate::session::Session;

pub(super) fn register(registry: &mut StepRegistry) -> StepResult<()> {
    registry
        .register(r"^I am a anonymous user$", anonymous_user)?
        .register(&format!(r#"^I write "([^"]*)" to "([^"]*)" {}$"#, BY_OPTION), write_to)?
        .register(&format!(r#"^I click "([^"]*)" {}$"#, BY_OPTION), click)?
        .register(&format!(r#"^I submit "([^"]*)" {}$"#, BY_OPTION), submit)?
        .register(&format!(r#"^I move to "([^"]*)" {}$"#, BY_OPTION), move_to)?;
    Ok(())
}

/// Drops every cookie; a one-shot command.
fn anonymous_user<'a>(session: &'a Session, _: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    session.clear_cookies().boxed()
}

fn write_to<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(1, 2)?;
        session.write(args.get(0)?, &locator).await
    }
    .boxed()
}

fn click<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(0, 1)?;
        session.click(&locator).await
    }
    .boxed()
}

fn submit<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(0, 1)?;
        session.submit(&locator).await
    }
    .boxed()
}

fn move_to<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(0, 1)?;
        session.hover(&locator).await
    }
    .boxed()
}

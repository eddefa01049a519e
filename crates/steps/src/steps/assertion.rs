use futures::future::BoxFuture;
use futures::FutureExt;

use super::BY_OPTION;
use crate::error::StepResult;
use crate::registry::{Captures, StepRegistry};
use crate::session::Session;

pub(super) fn register(registry: &mut StepRegistry) -> StepResult<()> {
    registry
        .register(r#"^I should be in "([^"]*)"$"#, should_be_in)?
        .register(r#"^I should see page title as "(.*?)"$"#, should_see_title)?
        .register(
            &format!(r#"^I should see "([^"]*)" in "([^"]*)" {}$"#, BY_OPTION),
            should_see_text_in,
        )?
        .register(&format!(r#"^I should see "([^"]*)" {}$"#, BY_OPTION), should_see)?
        .register(&format!(r#"^I should not see "([^"]*)" {}$"#, BY_OPTION), should_not_see)?
        .register(r#"I should see alert text as "(.*?)"$"#, should_see_alert)?;
    Ok(())
}

fn should_be_in<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move { session.assert_url(args.get(0)?).await }.boxed()
}

fn should_see_title<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move { session.assert_title(args.get(0)?).await }.boxed()
}

fn should_see_text_in<'a>(
    session: &'a Session,
    args: &'a Captures,
) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(1, 2)?;
        session.assert_text(args.get(0)?, &locator).await
    }
    .boxed()
}

fn should_see<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(0, 1)?;
        session.assert_visible(&locator, true).await
    }
    .boxed()
}

fn should_not_see<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move {
        let locator = args.locator(0, 1)?;
        session.assert_visible(&locator, false).await
    }
    .boxed()
}

fn should_see_alert<'a>(session: &'a Session, args: &'a Captures) -> BoxFuture<'a, StepResult<()>> {
    async move { session.assert_alert_text(args.get(0)?).await }.boxed()
}

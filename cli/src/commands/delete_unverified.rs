//! Delete unverified users command.

use anyhow::{Context as _, Result, bail};
use inquire::Confirm;
use tracing::instrument;

use crate::commands::users::{NOT_SIGNED_IN_TEXT, ensure_succeeded};
use crate::context::AppContext;
use crate::output::Output;

#[instrument(skip_all, name = "delete_unverified")]
pub async fn run_delete_unverified(ctx: &AppContext, yes: bool) -> Result<()> {
    let out = Output::new();

    if !ctx.session.is_logged_in() {
        bail!(NOT_SIGNED_IN_TEXT);
    }

    if !yes {
        let confirmed = Confirm::new("Delete every unverified user?")
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if !confirmed {
            out.dim("Nothing deleted.");
            return Ok(());
        }
    }

    let mut runtime = ctx.users_runtime(None);
    runtime.apply(|c| c.delete_unverified());
    runtime.settle().await;

    let result = ensure_succeeded(&runtime);
    if result.is_ok() {
        out.status(runtime.controller().status());
    }

    runtime.shutdown().await;
    result
}

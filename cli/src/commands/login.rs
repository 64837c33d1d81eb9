//! Login, logout and registration commands.

use anyhow::{Context as _, Result, anyhow};
use inquire::{Password, PasswordDisplayMode, Text};
use tracing::{info, instrument};
use userdesk_business::auth::{self, SIGNING_IN_TEXT};

use crate::context::AppContext;
use crate::output::Output;

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Text::new("Email:")
            .prompt()
            .context("Failed to read email"),
    }
}

fn prompt_password() -> Result<String> {
    Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read password")
}

#[instrument(skip_all, name = "login")]
pub async fn run_login(ctx: &AppContext, email: Option<String>) -> Result<()> {
    let out = Output::new();

    out.header("Login to userdesk");
    out.newline();

    let email = prompt_email(email)?;
    let password = prompt_password()?;

    out.dim(SIGNING_IN_TEXT);
    auth::login(&ctx.client, &email, &password)
        .await
        .map_err(|e| anyhow!(e.message))?;

    info!("Signed in as {email}");
    out.success(format!("Signed in as {email}"));
    Ok(())
}

#[instrument(skip_all, name = "logout")]
pub fn run_logout(ctx: &AppContext) {
    let out = Output::new();

    if !ctx.session.is_logged_in() {
        out.info("Not currently signed in.");
        return;
    }

    auth::logout(&ctx.session);
    out.success("Signed out");
}

#[instrument(skip_all, name = "register")]
pub async fn run_register(
    ctx: &AppContext,
    name: Option<String>,
    email: Option<String>,
) -> Result<()> {
    let out = Output::new();

    out.header("Create an account");
    out.newline();

    let name = match name {
        Some(name) => name,
        None => Text::new("Name:").prompt().context("Failed to read name")?,
    };
    let email = prompt_email(email)?;
    let password = Password::new("Password:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read password")?;

    let text = auth::register(&ctx.client, &name, &email, &password)
        .await
        .map_err(|e| anyhow!(e.message))?;

    out.success(text);
    Ok(())
}

#[instrument(skip_all, name = "confirm")]
pub async fn run_confirm(ctx: &AppContext, email: &str, token: &str) -> Result<()> {
    let text = auth::confirm_email(&ctx.client, email, token)
        .await
        .map_err(|e| anyhow!(e.message))?;

    Output::new().success(text);
    Ok(())
}

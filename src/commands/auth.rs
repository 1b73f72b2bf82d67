//! `login`, `logout` and `whoami`

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::cli::OutputOptions;
use crate::error::{FolioError, Result};
use crate::types::User;

fn describe(user: &User) -> String {
    let role = match user.role.as_deref() {
        Some(role) if !role.is_empty() => role.to_string(),
        _ => "no role".to_string(),
    };
    format!("{} <{}> ({})", user.name.bold(), user.email, role.cyan())
}

/// Sign in and continue at the route that sent the user to login, if any
pub async fn cmd_login(
    ctx: &AppContext,
    email: &str,
    password: &str,
    output: OutputOptions,
) -> Result<()> {
    let api = ctx.api()?;
    let user = api.login(email, password).await?;

    let pending = match ctx.session.store() {
        Some(store) => store.take_route()?,
        None => None,
    };
    let landing = ctx
        .guard()
        .after_login(pending.as_deref(), ctx.session.role().as_deref());

    CommandOutput::new(json!({
        "action": "login",
        "user": user,
        "landing": landing,
    }))
    .with_text(format!(
        "Logged in as {}\nContinue at {}",
        describe(&user),
        landing.cyan()
    ))
    .print(output)
}

pub fn cmd_logout(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let was_authenticated = ctx.session.is_authenticated();
    ctx.session.clear()?;

    let text = if was_authenticated {
        "Logged out".to_string()
    } else {
        "Not logged in".dimmed().to_string()
    };
    CommandOutput::new(json!({
        "action": "logout",
        "was_authenticated": was_authenticated,
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_whoami(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let user = ctx.session.current().ok_or(FolioError::NotAuthenticated)?;
    CommandOutput::new(json!(user))
        .with_text(describe(&user))
        .print(output)
}

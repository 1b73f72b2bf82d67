//! Access inspection (`folio access check|menu`)

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput};
use crate::access::{Navigation, default_menu, filter_menu};
use crate::cli::OutputOptions;
use crate::display::format_menu;
use crate::error::Result;

/// `--role` when given, otherwise the signed-in user's role
fn effective_role(ctx: &AppContext, role: Option<&str>) -> Option<String> {
    role.map(str::to_string).or_else(|| ctx.session.role())
}

pub fn cmd_access_check(
    ctx: &AppContext,
    path: &str,
    role: Option<&str>,
    output: OutputOptions,
) -> Result<()> {
    let role = effective_role(ctx, role);
    let navigation = ctx.guard().check(path, role.as_deref());
    let who = role.as_deref().unwrap_or("anonymous");

    let (outcome, target, text) = match &navigation {
        Navigation::Allow => (
            "allow",
            path.to_string(),
            format!("{} {path} is open to {who}", "✓".green()),
        ),
        Navigation::Login { to, .. } => (
            "login",
            to.clone(),
            format!(
                "{} {path} needs a session, login at {to} resumes here",
                "→".yellow()
            ),
        ),
        Navigation::Redirect { to } => (
            "redirect",
            to.clone(),
            format!("{} {path} is closed to {who}, redirects to {to}", "✗".red()),
        ),
    };

    CommandOutput::new(json!({
        "path": path,
        "role": role,
        "outcome": outcome,
        "target": target,
    }))
    .with_text(text)
    .print(output)
}

pub fn cmd_access_menu(ctx: &AppContext, role: Option<&str>, output: OutputOptions) -> Result<()> {
    let role = effective_role(ctx, role);
    let menu = filter_menu(ctx.permissions(), &default_menu(), role.as_deref());

    let text = if menu.is_empty() {
        "(no menu entries)".dimmed().to_string()
    } else {
        format_menu(&menu).trim_end().to_string()
    };
    CommandOutput::new(json!({
        "role": role,
        "menu": menu,
    }))
    .with_text(text)
    .print(output)
}

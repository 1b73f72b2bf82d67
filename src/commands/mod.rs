//! One handler per CLI subcommand.
//!
//! Handlers receive an [`AppContext`] holding the loaded configuration and
//! the session handle; nothing here reads global state.

mod access;
mod auth;
mod board;
mod config;
mod tasks;

pub use access::{cmd_access_check, cmd_access_menu};
pub use auth::{cmd_login, cmd_logout, cmd_whoami};
pub use board::cmd_board;
pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use tasks::{
    EditOptions, NewTaskOptions, TASKS_ROUTE, cmd_task_create, cmd_task_edit, cmd_task_ls,
    cmd_task_move, cmd_task_rm, cmd_task_show,
};

use owo_colors::OwoColorize;
use serde_json::{Value, json};

use crate::access::{Navigation, PermissionTable, RouteGuard};
use crate::api::ApiClient;
use crate::board::TaskBoard;
use crate::cli::OutputOptions;
use crate::config::Config;
use crate::display::format_toast;
use crate::error::{FolioError, Result};
use crate::notify::Notifications;
use crate::session::{SessionHandle, SessionStore};

/// Output of a command in both machine and human form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Write pending toasts to stderr in text mode; JSON mode discards them
pub fn report_toasts(notifications: &Notifications, output: OutputOptions) {
    for toast in notifications.drain() {
        if !output.json {
            eprintln!("{}", format_toast(&toast));
        }
    }
}

/// Everything a command needs, loaded once per invocation
pub struct AppContext {
    pub config: Config,
    pub session: SessionHandle,
    permissions: PermissionTable,
}

impl AppContext {
    /// Load configuration and the stored session from disk
    pub fn load() -> Result<Self> {
        let config = Config::load()?;
        let session = SessionHandle::load(SessionStore::open_default()?)?;
        Ok(Self::new(config, session))
    }

    pub fn new(config: Config, session: SessionHandle) -> Self {
        let permissions = config.permission_table();
        Self {
            config,
            session,
            permissions,
        }
    }

    pub fn permissions(&self) -> &PermissionTable {
        &self.permissions
    }

    pub fn guard(&self) -> RouteGuard<'_> {
        RouteGuard::new(
            &self.permissions,
            &self.config.default_route,
            &self.config.login_route,
        )
    }

    pub fn api(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config, self.session.clone())
    }

    pub fn board(&self) -> Result<TaskBoard<ApiClient>> {
        Ok(TaskBoard::new(self.api()?))
    }

    /// Run the route guard for `path`.
    ///
    /// Returns `Ok(false)` after printing the redirect target (as JSON under
    /// `--json`) when the signed-in role may not open the route. Without a
    /// session the route is remembered for the next login and
    /// `NotAuthenticated` is returned.
    pub fn enter_route(&self, path: &str, output: OutputOptions) -> Result<bool> {
        let role = self.session.role();
        match self.guard().check(path, role.as_deref()) {
            Navigation::Allow => Ok(true),
            Navigation::Login { to, from } => {
                if let Some(store) = self.session.store() {
                    store.remember_route(&from)?;
                }
                tracing::debug!(%to, %from, "login required");
                Err(FolioError::NotAuthenticated)
            }
            Navigation::Redirect { to } => {
                let notice =
                    format!("'{path}' is not available for your role, redirected to {to}");
                CommandOutput::new(json!({
                    "path": path,
                    "allowed": false,
                    "redirect": to,
                }))
                .with_text(notice.dimmed().to_string())
                .print(output)?;
                Ok(false)
            }
        }
    }
}

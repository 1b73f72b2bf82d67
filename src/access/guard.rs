//! Route guard deciding whether a navigation attempt proceeds.

use super::PermissionTable;

/// Outcome of a guarded navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Render the requested route
    Allow,
    /// No session: go to the login route, resuming `from` afterwards
    Login { to: String, from: String },
    /// Authenticated but not permitted: silently land on the default route
    Redirect { to: String },
}

impl Navigation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Navigation::Allow)
    }
}

/// Consults the permission table for the current session's role.
#[derive(Debug, Clone)]
pub struct RouteGuard<'a> {
    table: &'a PermissionTable,
    default_route: &'a str,
    login_route: &'a str,
}

impl<'a> RouteGuard<'a> {
    pub fn new(table: &'a PermissionTable, default_route: &'a str, login_route: &'a str) -> Self {
        Self {
            table,
            default_route,
            login_route,
        }
    }

    /// Decide where an attempt to open `path` ends up.
    ///
    /// `role` is `None` when there is no session at all; an authenticated
    /// user without a role is passed as `Some("")` and gets redirected.
    pub fn check(&self, path: &str, role: Option<&str>) -> Navigation {
        let Some(role) = role else {
            tracing::debug!(path, "unauthenticated navigation, sending to login");
            return Navigation::Login {
                to: self.login_route.to_string(),
                from: path.to_string(),
            };
        };

        if self.table.is_allowed(path, Some(role)) {
            Navigation::Allow
        } else {
            tracing::debug!(path, role, "navigation denied by role");
            Navigation::Redirect {
                to: self.default_route.to_string(),
            }
        }
    }

    /// Where to go right after a successful login.
    pub fn after_login(&self, from: Option<&str>, role: Option<&str>) -> String {
        match from {
            Some(path) if path != self.login_route && self.table.is_allowed(path, role) => {
                path.to_string()
            }
            _ => self.default_route.to_string(),
        }
    }
}

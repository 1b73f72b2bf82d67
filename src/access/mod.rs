//! Role based access to console routes.
//!
//! A static permission table maps each role to one of three shapes: full
//! access, full access minus an exclusion list, or an explicit allow list.
//! The route guard and the navigation menu both consult it.

pub mod guard;
pub mod menu;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

pub use guard::{Navigation, RouteGuard};
pub use menu::{MenuGroup, MenuItem, default_menu, filter_menu};

pub const ROLE_SUPER_ADMIN: &str = "superAdmin";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// What a single role may reach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PermissionRepr", into = "PermissionRepr")]
pub enum Permission {
    /// Every route
    All,
    /// Every route except these
    Exclude(Vec<String>),
    /// Only these routes
    Allow(Vec<String>),
}

/// On-disk shape: `"all"`, `{exclude: [...]}` or `{allow: [...]}`
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum PermissionRepr {
    Keyword(String),
    Exclude { exclude: Vec<String> },
    Allow { allow: Vec<String> },
}

impl TryFrom<PermissionRepr> for Permission {
    type Error = String;

    fn try_from(repr: PermissionRepr) -> Result<Self, Self::Error> {
        match repr {
            PermissionRepr::Keyword(k) if k == "all" => Ok(Permission::All),
            PermissionRepr::Keyword(k) => Err(format!("unknown permission keyword '{k}'")),
            PermissionRepr::Exclude { exclude } => Ok(Permission::Exclude(exclude)),
            PermissionRepr::Allow { allow } => Ok(Permission::Allow(allow)),
        }
    }
}

impl From<Permission> for PermissionRepr {
    fn from(p: Permission) -> Self {
        match p {
            Permission::All => PermissionRepr::Keyword("all".to_string()),
            Permission::Exclude(exclude) => PermissionRepr::Exclude { exclude },
            Permission::Allow(allow) => PermissionRepr::Allow { allow },
        }
    }
}

/// Role name to permission mapping, read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionTable {
    roles: BTreeMap<String, Permission>,
}

impl Default for PermissionTable {
    fn default() -> Self {
        let mut roles = BTreeMap::new();
        roles.insert(ROLE_SUPER_ADMIN.to_string(), Permission::All);
        roles.insert(
            ROLE_ADMIN.to_string(),
            Permission::Exclude(vec!["/users".to_string()]),
        );
        roles.insert(
            ROLE_USER.to_string(),
            Permission::Allow(
                [
                    "/dashboard",
                    "/tasks",
                    "/notes",
                    "/goals",
                    "/expenses",
                    "/chat",
                ]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            ),
        );
        Self { roles }
    }
}

impl PermissionTable {
    pub fn new(roles: impl IntoIterator<Item = (String, Permission)>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Permission that governs `role`, if any.
    ///
    /// Full access is only granted on an exact role match. Exclusion and
    /// allow lists are matched case-insensitively, so `Admin` is governed
    /// by the `admin` entry while `SUPERADMIN` gets nothing.
    pub fn resolve(&self, role: &str) -> Option<&Permission> {
        if let Some(p) = self.roles.get(role) {
            return Some(p);
        }
        let wanted = UniCase::new(role);
        self.roles
            .iter()
            .find(|(name, _)| UniCase::new(name.as_str()) == wanted)
            .map(|(_, p)| p)
            .filter(|p| !matches!(p, Permission::All))
    }

    /// Whether `role` may navigate to `path`. A missing or empty role is
    /// always denied.
    pub fn is_allowed(&self, path: &str, role: Option<&str>) -> bool {
        let Some(role) = role.filter(|r| !r.is_empty()) else {
            return false;
        };
        match self.resolve(role) {
            Some(Permission::All) => true,
            Some(Permission::Exclude(excluded)) => !excluded.iter().any(|p| p == path),
            Some(Permission::Allow(allowed)) => allowed.iter().any(|p| p == path),
            None => false,
        }
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &Permission)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v))
    }
}

//! Navigation menu and its role filter.

use serde::Serialize;

use super::{Permission, PermissionTable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub title: String,
    pub path: String,
}

impl MenuItem {
    pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuGroup {
    pub title: String,
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    pub fn new(title: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }
}

/// The console's sidebar
pub fn default_menu() -> Vec<MenuGroup> {
    vec![
        MenuGroup::new("Overview", vec![MenuItem::new("Dashboard", "/dashboard")]),
        MenuGroup::new(
            "Content",
            vec![
                MenuItem::new("Blogs", "/blogs"),
                MenuItem::new("Projects", "/projects"),
                MenuItem::new("Notes", "/notes"),
            ],
        ),
        MenuGroup::new(
            "Productivity",
            vec![
                MenuItem::new("Tasks", "/tasks"),
                MenuItem::new("Goals", "/goals"),
                MenuItem::new("Expenses", "/expenses"),
                MenuItem::new("Chat", "/chat"),
            ],
        ),
        MenuGroup::new(
            "Administration",
            vec![
                MenuItem::new("Users", "/users"),
                MenuItem::new("Settings", "/settings"),
            ],
        ),
    ]
}

/// Keep only the entries `role` may open.
///
/// Without a role nothing is rendered. For allow-list roles, groups that end
/// up empty are dropped entirely; other roles keep the group header.
pub fn filter_menu(
    table: &PermissionTable,
    groups: &[MenuGroup],
    role: Option<&str>,
) -> Vec<MenuGroup> {
    let Some(role) = role.filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    let drop_empty = matches!(table.resolve(role), Some(Permission::Allow(_)));

    groups
        .iter()
        .map(|group| MenuGroup {
            title: group.title.clone(),
            items: group
                .items
                .iter()
                .filter(|item| table.is_allowed(&item.path, Some(role)))
                .cloned()
                .collect(),
        })
        .filter(|group| !(drop_empty && group.items.is_empty()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(groups: &[MenuGroup]) -> Vec<&str> {
        groups.iter().map(|g| g.title.as_str()).collect()
    }

    #[test]
    fn test_super_admin_sees_everything() {
        let table = PermissionTable::default();
        let menu = default_menu();
        assert_eq!(filter_menu(&table, &menu, Some("superAdmin")), menu);
    }

    #[test]
    fn test_admin_loses_users_entry_only() {
        let table = PermissionTable::default();
        let filtered = filter_menu(&table, &default_menu(), Some("admin"));
        assert_eq!(filtered.len(), 4);
        let admin = filtered.iter().find(|g| g.title == "Administration").unwrap();
        assert_eq!(admin.items, vec![MenuItem::new("Settings", "/settings")]);
    }

    #[test]
    fn test_user_role_drops_empty_groups() {
        let table = PermissionTable::default();
        let groups = vec![
            MenuGroup::new("Overview", vec![MenuItem::new("Dashboard", "/dashboard")]),
            MenuGroup::new("People", vec![MenuItem::new("Users", "/users")]),
        ];
        let filtered = filter_menu(&table, &groups, Some("user"));
        assert_eq!(titles(&filtered), vec!["Overview"]);
    }

    #[test]
    fn test_admin_keeps_empty_group_header() {
        let table = PermissionTable::default();
        let groups = vec![MenuGroup::new(
            "People",
            vec![MenuItem::new("Users", "/users")],
        )];
        let filtered = filter_menu(&table, &groups, Some("admin"));
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].items.is_empty());
    }

    #[test]
    fn test_no_role_no_menu() {
        let table = PermissionTable::default();
        assert!(filter_menu(&table, &default_menu(), None).is_empty());
    }
}

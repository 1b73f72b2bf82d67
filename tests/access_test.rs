use folio::access::{
    MenuGroup, MenuItem, Navigation, Permission, PermissionTable, RouteGuard, default_menu,
    filter_menu,
};

const ALL_PATHS: &[&str] = &[
    "/dashboard",
    "/blogs",
    "/projects",
    "/notes",
    "/tasks",
    "/goals",
    "/expenses",
    "/chat",
    "/users",
    "/settings",
    "/not-a-route",
];

#[test]
fn test_super_admin_may_open_every_path() {
    let table = PermissionTable::default();
    for path in ALL_PATHS {
        assert!(table.is_allowed(path, Some("superAdmin")), "{path}");
    }
}

#[test]
fn test_admin_excluded_from_users_only() {
    let table = PermissionTable::default();
    assert!(!table.is_allowed("/users", Some("admin")));
    assert!(table.is_allowed("/dashboard", Some("admin")));
    assert!(table.is_allowed("/settings", Some("admin")));
}

#[test]
fn test_user_limited_to_allow_list() {
    let table = PermissionTable::default();
    assert!(table.is_allowed("/tasks", Some("user")));
    assert!(!table.is_allowed("/users", Some("user")));
    assert!(!table.is_allowed("/blogs", Some("user")));
}

#[test]
fn test_no_role_is_denied_everywhere() {
    let table = PermissionTable::default();
    for path in ALL_PATHS {
        assert!(!table.is_allowed(path, None), "{path}");
        assert!(!table.is_allowed(path, Some("")), "{path}");
    }
}

#[test]
fn test_unknown_role_is_denied() {
    let table = PermissionTable::default();
    assert!(!table.is_allowed("/dashboard", Some("guest")));
}

#[test]
fn test_full_access_needs_exact_role_name() {
    let table = PermissionTable::default();
    assert!(!table.is_allowed("/dashboard", Some("SuperAdmin")));
    assert!(table.is_allowed("/dashboard", Some("Admin")));
    assert!(!table.is_allowed("/users", Some("Admin")));
}

#[test]
fn test_custom_table() {
    let table = PermissionTable::new([
        (
            "editor".to_string(),
            Permission::Allow(vec!["/blogs".to_string()]),
        ),
        ("owner".to_string(), Permission::All),
    ]);
    assert!(table.is_allowed("/blogs", Some("editor")));
    assert!(!table.is_allowed("/tasks", Some("editor")));
    assert!(table.is_allowed("/users", Some("owner")));
    assert!(!table.is_allowed("/dashboard", Some("admin")));
}

// ============================================================================
// Route guard
// ============================================================================

#[test]
fn test_guard_sends_anonymous_visitor_to_login() {
    let table = PermissionTable::default();
    let guard = RouteGuard::new(&table, "/dashboard", "/login");

    assert_eq!(
        guard.check("/expenses", None),
        Navigation::Login {
            to: "/login".to_string(),
            from: "/expenses".to_string(),
        }
    );
}

#[test]
fn test_guard_redirects_denied_role_to_default_route() {
    let table = PermissionTable::default();
    let guard = RouteGuard::new(&table, "/dashboard", "/login");

    assert_eq!(
        guard.check("/users", Some("admin")),
        Navigation::Redirect {
            to: "/dashboard".to_string()
        }
    );
    assert!(guard.check("/users", Some("superAdmin")).is_allowed());
    assert!(!guard.check("/tasks", Some("")).is_allowed());
}

#[test]
fn test_after_login_resumes_permitted_route() {
    let table = PermissionTable::default();
    let guard = RouteGuard::new(&table, "/dashboard", "/login");

    assert_eq!(guard.after_login(Some("/tasks"), Some("user")), "/tasks");
    assert_eq!(guard.after_login(Some("/users"), Some("user")), "/dashboard");
    assert_eq!(guard.after_login(Some("/login"), Some("superAdmin")), "/dashboard");
    assert_eq!(guard.after_login(None, Some("admin")), "/dashboard");
}

// ============================================================================
// Menu
// ============================================================================

#[test]
fn test_menu_group_with_no_permitted_items_is_absent_for_user() {
    let table = PermissionTable::default();
    let groups = vec![
        MenuGroup::new("Overview", vec![MenuItem::new("Dashboard", "/dashboard")]),
        MenuGroup::new("Administration", vec![MenuItem::new("Users", "/users")]),
    ];

    let filtered = filter_menu(&table, &groups, Some("user"));
    assert_eq!(filtered.len(), 1);
    assert!(filtered.iter().all(|g| g.title != "Administration"));
}

#[test]
fn test_default_menu_for_user() {
    let table = PermissionTable::default();
    let filtered = filter_menu(&table, &default_menu(), Some("user"));

    let titles: Vec<_> = filtered.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Overview", "Content", "Productivity"]);

    let content = &filtered[1];
    assert_eq!(content.items, vec![MenuItem::new("Notes", "/notes")]);
    assert!(filtered.iter().all(|g| !g.items.is_empty()));
}

#[test]
fn test_menu_filter_does_not_touch_input() {
    let table = PermissionTable::default();
    let menu = default_menu();
    filter_menu(&table, &menu, Some("user"));
    assert_eq!(menu, default_menu());
}

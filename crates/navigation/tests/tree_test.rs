//! Navigation tree integration tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use serde_json::json;
use waymark_navigation::RouteParams;
use waymark_test_utils::TestGate;

use common::{navigation, navigation_for, sample_items};

#[test]
fn dashboard_and_users_round_trip() {
    let nav = navigation(vec![
        json!({"label": "Dashboard", "route": "dashboard"}),
        json!({"label": "Users", "route": "users.index", "children": [
            {"label": "All Users", "route": "users.index"},
            {"label": "Roles", "route": "roles.index"}
        ]}),
    ]);

    let tree = nav.tree(&RouteParams::new(), Some("users.index"), None);

    assert_eq!(tree.len(), 2);
    assert!(!tree[0].is_active());
    assert!(tree[1].is_active());
    assert!(tree[1].children()[0].is_active());
    assert!(!tree[1].children()[1].is_active());
}

#[test]
fn breadcrumb_only_items_stay_out_of_the_tree() {
    let nav = navigation(sample_items());
    let tree = nav.tree(
        &RouteParams::new(),
        Some("users.edit"),
        Some(&RouteParams::new().with("user", 42)),
    );

    let users = &tree[1];
    assert_eq!(users.children().len(), 2);
    assert!(users.children().iter().all(|child| child.label.as_deref() != Some("Edit")));
    // The hidden edit item still activates its parent.
    assert!(users.is_active());
    assert!(!users.children()[0].is_active());
}

#[test]
fn nav_only_items_render() {
    let nav = navigation(vec![json!({
        "label": "Admin",
        "navOnly": true,
        "children": [{"label": "Roles", "route": "roles.index"}]
    })]);
    let tree = nav.tree(&RouteParams::new(), Some("roles.index"), None);

    assert_eq!(tree.len(), 1);
    assert!(tree[0].is_active());
    assert_eq!(tree[0].url, None);
}

#[test]
fn active_state_reaches_the_root() {
    let nav = navigation(vec![json!({
        "label": "Settings",
        "children": [{
            "label": "Account",
            "children": [{"label": "Profile", "route": "settings.profile"}]
        }]
    })]);
    let tree = nav.tree(&RouteParams::new(), Some("settings.profile"), None);

    assert!(tree[0].is_active());
    assert!(tree[0].children()[0].is_active());
    assert!(tree[0].children()[0].children()[0].is_active());
}

#[test]
fn node_ids_are_unique() {
    let nav = navigation(sample_items());
    let tree = nav.tree(&RouteParams::new(), None, None);

    let mut ids = Vec::new();
    let mut stack: Vec<_> = tree.iter().collect();
    while let Some(node) = stack.pop() {
        ids.push(node.id.clone());
        stack.extend(node.children());
    }
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn route_params_fill_urls() {
    let nav = navigation(vec![json!({"label": "Profile", "route": "users.show"})]);

    let tree = nav.tree(&RouteParams::new().with("user", 7), None, None);
    assert_eq!(tree[0].url.as_deref(), Some("/users/7"));

    let missing = nav.tree(&RouteParams::new(), None, None);
    assert_eq!(missing[0].url.as_deref(), Some("#"));
}

#[test]
fn hidden_items_and_their_children_are_dropped() {
    let nav = navigation_for(
        vec![
            json!({"label": "Reports", "route": "dashboard", "can": "view reports", "children": [
                {"label": "Daily", "route": "dashboard"}
            ]}),
            json!({"label": "Roles", "route": "roles.index", "can": "manage roles"}),
            json!({"label": "Login", "route": "home", "visible": false}),
        ],
        TestGate::user("5", &["view reports"]).failing("manage roles"),
    );
    let tree = nav.tree(&RouteParams::new(), None, None);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].label.as_deref(), Some("Reports"));
    assert_eq!(tree[0].children().len(), 1);
}

#[test]
fn tree_serializes_for_the_frontend() {
    let nav = navigation(vec![
        json!({"label": "Inbox", "route": "dashboard", "badge": 4}),
        json!({"divider": "large"}),
        json!({"label": "Logout", "route": "logout", "method": "post"}),
    ]);
    let value = serde_json::to_value(nav.tree(&RouteParams::new(), None, None)).unwrap();

    assert_eq!(
        value,
        json!([
            {
                "id": "nav-main-0",
                "label": "Inbox",
                "isActive": false,
                "url": "/dashboard",
                "children": [],
                "badge": 4
            },
            {"id": "nav-main-1", "url": null, "divider": "large"},
            {
                "id": "nav-main-2",
                "label": "Logout",
                "isActive": false,
                "url": "/logout",
                "method": "post",
                "children": []
            }
        ])
    );
}

//! Waymark test utilities.
//!
//! Fixtures for integration tests: a route table covering the sample
//! navigations, bound entities, a configurable gate, and registry builders.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Value, json};
use waymark_navigation::error::AuthorizationError;
use waymark_navigation::{
    Gate, NavigationRegistry, NavigationServices, NavigationSet, RequestState, RouteEntity,
    RouteTable, UserContext,
};

/// Routes used by the sample navigations.
pub fn test_routes() -> RouteTable {
    RouteTable::new()
        .with_route("home", "/")
        .with_route("dashboard", "/dashboard")
        .with_route("users.index", "/users")
        .with_route("users.show", "/users/{user}")
        .with_route("users.edit", "/users/{user}/edit")
        .with_route("roles.index", "/roles")
        .with_route("settings", "/settings")
        .with_route("settings.profile", "/settings/profile")
        .with_route("posts.index", "/posts/{page?}")
        .with_route("logout", "/logout")
}

/// The dashboard and users navigation used across tests.
pub fn sample_items() -> Vec<Value> {
    vec![
        json!({"label": "Dashboard", "route": "dashboard", "icon": "home"}),
        json!({
            "label": "Users",
            "route": "users.index",
            "icon": "users",
            "children": [
                {"label": "All Users", "route": "users.index"},
                {"label": "Roles", "route": "roles.index"},
                {
                    "label": {"template": "Edit {name}"},
                    "route": "users.edit",
                    "params": {"user": "*"},
                    "breadcrumbOnly": true
                }
            ]
        }),
    ]
}

/// A bound model, e.g. the user in `/users/{user}/edit`.
#[derive(Debug, Clone)]
pub struct TestEntity {
    pub id: u64,
    pub name: String,
    pub slug: Option<String>,
}

/// Create a test entity keyed by its id.
pub fn test_entity(id: u64, name: &str) -> TestEntity {
    TestEntity {
        id,
        name: name.to_string(),
        slug: None,
    }
}

impl TestEntity {
    /// Key routes by slug instead of id.
    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }
}

impl RouteEntity for TestEntity {
    fn route_key(&self) -> Option<String> {
        Some(self.slug.clone().unwrap_or_else(|| self.id.to_string()))
    }

    fn display(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(json!(self.id)),
            "name" => Some(json!(self.name)),
            "slug" => self.slug.as_ref().map(|slug| json!(slug)),
            _ => None,
        }
    }
}

/// Gate with a fixed user and optional failing abilities.
#[derive(Debug, Clone, Default)]
pub struct TestGate {
    user: Option<UserContext>,
    failing: HashSet<String>,
}

impl TestGate {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed-in user holding `permissions`.
    pub fn user(id: &str, permissions: &[&str]) -> Self {
        Self {
            user: Some(UserContext::new(id, permissions.iter().copied())),
            failing: HashSet::new(),
        }
    }

    /// Make checks for `ability` return an error.
    pub fn failing(mut self, ability: &str) -> Self {
        self.failing.insert(ability.to_string());
        self
    }
}

impl Gate for TestGate {
    fn current_user(&self) -> Option<UserContext> {
        self.user.clone()
    }

    fn can(
        &self,
        user: &UserContext,
        ability: &str,
        _subject: Option<&Value>,
    ) -> Result<bool, AuthorizationError> {
        if self.failing.contains(ability) {
            return Err(AuthorizationError {
                ability: ability.to_string(),
                message: "test gate failure".to_string(),
            });
        }
        Ok(user.has_permission(ability))
    }
}

/// Services over [`test_routes`], with the given gate and request state.
pub fn test_services(gate: TestGate, request: Arc<RequestState>) -> NavigationServices {
    NavigationServices::new(Arc::new(test_routes()))
        .with_gate(Arc::new(gate))
        .with_request(request)
}

/// Registry with the sample items registered statically as `main`.
pub fn test_registry() -> NavigationRegistry {
    let statics = NavigationSet::new().with("main", sample_items());
    NavigationRegistry::new(
        statics,
        test_services(TestGate::anonymous(), Arc::new(RequestState::new())),
    )
}

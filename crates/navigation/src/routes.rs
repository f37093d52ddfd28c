//! Route name to URL resolution, and the ambient request context.
//!
//! Navigation only ever goes from a route name to a URL. The application
//! router plugs in through [`UrlResolver`]; [`RouteTable`] is a standalone
//! implementation for config-driven setups and the CLI.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::RouteError;
use crate::params::RouteParams;

/// Turns route names into URLs.
pub trait UrlResolver: Send + Sync {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError>;

    fn has_route(&self, route: &str) -> bool;
}

/// Current route name and parameters of the request being served.
///
/// A registry holds one context for every navigation it builds. Hosts that
/// serve requests concurrently implement this over request-scoped storage
/// (a task or thread local), or pass the route explicitly to
/// `build_tree` and `build_breadcrumbs`.
pub trait RequestContext: Send + Sync {
    fn current_route(&self) -> Option<String>;

    fn current_route_params(&self) -> RouteParams;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param { name: String, optional: bool },
}

/// A URL pattern such as `/users/{user}/edit` or `/posts/{page?}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .map(|part| {
                match part.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
                    Some(name) => match name.strip_suffix('?') {
                        Some(name) => Segment::Param {
                            name: name.to_string(),
                            optional: true,
                        },
                        None => Segment::Param {
                            name: name.to_string(),
                            optional: false,
                        },
                    },
                    None => Segment::Literal(part.to_string()),
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Fill the placeholders. Parameters not named by the pattern become a
    /// query string, in name order.
    pub fn build(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        let mut parts = Vec::with_capacity(self.segments.len());
        let mut used = Vec::new();
        let mut missing = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => parts.push(text.clone()),
                Segment::Param { name, optional } => {
                    match params.get(name).and_then(|value| value.as_segment()) {
                        Some(value) => {
                            parts.push(urlencoding::encode(&value).into_owned());
                            used.push(name.as_str());
                        }
                        None if *optional => {}
                        None => missing.push(name.clone()),
                    }
                }
            }
        }

        if !missing.is_empty() {
            return Err(RouteError::MissingParameters {
                route: route.to_string(),
                missing,
            });
        }

        let mut url = parts.join("/");
        if url.is_empty() {
            url.push('/');
        }

        let query: Vec<String> = params
            .iter()
            .filter(|(name, _)| !used.contains(name))
            .filter_map(|(name, value)| {
                value.as_segment().map(|value| {
                    format!(
                        "{}={}",
                        urlencoding::encode(name),
                        urlencoding::encode(&value)
                    )
                })
            })
            .collect();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Ok(url)
    }
}

/// Named routes mapped to URL patterns.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RoutePattern>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, name: impl Into<String>, pattern: &str) -> Self {
        self.insert(name, pattern);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, pattern: &str) {
        self.routes.insert(name.into(), RoutePattern::parse(pattern));
    }

    pub fn get(&self, name: &str) -> Option<&RoutePattern> {
        self.routes.get(name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<K: Into<String>, P: AsRef<str>> FromIterator<(K, P)> for RouteTable {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, pattern) in iter {
            table.insert(name, pattern.as_ref());
        }
        table
    }
}

impl UrlResolver for RouteTable {
    fn resolve(&self, route: &str, params: &RouteParams) -> Result<String, RouteError> {
        self.routes
            .get(route)
            .ok_or_else(|| RouteError::UnknownRoute {
                route: route.to_string(),
            })?
            .build(route, params)
    }

    fn has_route(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }
}

/// Request context set by the host before building navigation.
///
/// One current route shared by every caller: suited to single-request
/// hosts such as the CLI and tests, not to concurrent request handling.
#[derive(Debug, Default)]
pub struct RequestState {
    inner: RwLock<(Option<String>, RouteParams)>,
}

impl RequestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, route: impl Into<String>, params: RouteParams) {
        *self.inner.write() = (Some(route.into()), params);
    }

    pub fn clear(&self) {
        *self.inner.write() = (None, RouteParams::new());
    }
}

impl RequestContext for RequestState {
    fn current_route(&self) -> Option<String> {
        self.inner.read().0.clone()
    }

    fn current_route_params(&self) -> RouteParams {
        self.inner.read().1.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route("dashboard", "/dashboard")
            .with_route("home", "/")
            .with_route("users.edit", "/users/{user}/edit")
            .with_route("posts.index", "/posts/{page?}")
    }

    #[test]
    fn static_routes_resolve() {
        let urls = table();
        assert_eq!(urls.resolve("dashboard", &RouteParams::new()).unwrap(), "/dashboard");
        assert_eq!(urls.resolve("home", &RouteParams::new()).unwrap(), "/");
    }

    #[test]
    fn placeholders_are_filled() {
        let params = RouteParams::new().with("user", 42);
        assert_eq!(table().resolve("users.edit", &params).unwrap(), "/users/42/edit");
    }

    #[test]
    fn entities_use_route_key() {
        let params = RouteParams::new().with("user", json!({"id": 7, "name": "Ada"}));
        assert_eq!(table().resolve("users.edit", &params).unwrap(), "/users/7/edit");
    }

    #[test]
    fn missing_required_parameter() {
        let err = table().resolve("users.edit", &RouteParams::new()).unwrap_err();
        assert_eq!(
            err,
            RouteError::MissingParameters {
                route: "users.edit".to_string(),
                missing: vec!["user".to_string()],
            }
        );
    }

    #[test]
    fn optional_parameter_is_dropped() {
        let urls = table();
        assert_eq!(urls.resolve("posts.index", &RouteParams::new()).unwrap(), "/posts");
        let params = RouteParams::new().with("page", 2);
        assert_eq!(urls.resolve("posts.index", &params).unwrap(), "/posts/2");
    }

    #[test]
    fn extra_parameters_become_query() {
        let params = RouteParams::new().with("tab", "roles").with("q", "a b");
        assert_eq!(
            table().resolve("dashboard", &params).unwrap(),
            "/dashboard?q=a%20b&tab=roles"
        );
    }

    #[test]
    fn unknown_route() {
        let err = table().resolve("nope", &RouteParams::new()).unwrap_err();
        assert_eq!(err, RouteError::UnknownRoute { route: "nope".to_string() });
        assert!(!table().has_route("nope"));
    }

    #[test]
    fn request_state_round_trip() {
        let state = RequestState::new();
        assert_eq!(state.current_route(), None);

        state.enter("users.edit", RouteParams::new().with("user", 5));
        assert_eq!(state.current_route().as_deref(), Some("users.edit"));
        assert!(state.current_route_params().contains("user"));

        state.clear();
        assert!(state.current_route_params().is_empty());
    }
}

//! Navigation error types.
//!
//! Configuration problems are reported eagerly with the offending payload and
//! a hint on how to fix it. Route and authorization failures are recoverable
//! and normally absorbed by the tree and breadcrumb builders.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Base URL for documentation anchors attached to configuration errors.
pub const DOCS_BASE_URL: &str = "https://docs.rs/waymark-navigation/latest/waymark_navigation/";

/// Which item invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidItemKind {
    /// No label, no children and no custom metadata.
    MissingContent,
    /// Both `route` and `url` were given.
    BothRouteAndUrl,
    /// Both `breadcrumbOnly` and `navOnly` were set.
    ConflictingVisibility,
    /// `params` without a `route`.
    ParamsWithoutRoute,
    /// `method` outside get/post/put/patch/delete.
    InvalidMethod,
    /// A key held a value of the wrong type, or the item was not an object or shorthand list.
    MalformedShape,
}

/// A navigation item configuration that cannot be turned into an item.
#[derive(Debug, Clone, Error)]
pub struct InvalidItemError {
    kind: InvalidItemKind,
    message: String,
    item: Value,
    suggestion: String,
    docs_section: &'static str,
}

impl InvalidItemError {
    fn new(
        kind: InvalidItemKind,
        message: impl Into<String>,
        item: Value,
        suggestion: impl Into<String>,
        docs_section: &'static str,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            item,
            suggestion: suggestion.into(),
            docs_section,
        }
    }

    pub fn missing_content(item: Value) -> Self {
        Self::new(
            InvalidItemKind::MissingContent,
            "Navigation item must have a label, children, or custom metadata.",
            item,
            "Add a \"label\" with display text, a \"children\" list, or custom keys like \"separator\" for structural entries.",
            "#configuration",
        )
    }

    pub fn both_route_and_url(item: Value) -> Self {
        Self::new(
            InvalidItemKind::BothRouteAndUrl,
            "Navigation item cannot have both \"route\" and \"url\".",
            item,
            "Use \"route\" for named application routes (e.g. \"users.index\") or \"url\" for external links (e.g. \"https://docs.example.com\"), but not both.",
            "#routing",
        )
    }

    pub fn conflicting_visibility(item: Value) -> Self {
        Self::new(
            InvalidItemKind::ConflictingVisibility,
            "Navigation item cannot be both \"breadcrumbOnly\" and \"navOnly\".",
            item,
            "Use \"breadcrumbOnly\" for entries that only belong in breadcrumbs (like edit pages), or \"navOnly\" for entries that only belong in menus.",
            "#breadcrumbs",
        )
    }

    pub fn params_without_route(item: Value) -> Self {
        Self::new(
            InvalidItemKind::ParamsWithoutRoute,
            "Navigation item \"params\" can only be used with a \"route\".",
            item,
            "Either add a \"route\" key or remove \"params\". Params drive route matching and URL generation.",
            "#route-parameters",
        )
    }

    pub fn invalid_method(item: Value, method: &str, valid: &[&str]) -> Self {
        Self::new(
            InvalidItemKind::InvalidMethod,
            format!("Invalid HTTP method \"{method}\"."),
            item,
            format!(
                "Valid methods are: {}. Use \"post\" for form submissions, \"delete\" for destructive actions.",
                valid.join(", ")
            ),
            "#action-items",
        )
    }

    pub fn malformed(item: Value, key: &str, expected: &str) -> Self {
        Self::new(
            InvalidItemKind::MalformedShape,
            format!("Navigation item key \"{key}\" must be {expected}."),
            item,
            "Check the item against the documented keys, or use the shorthand form [label, route or url, icon, children].",
            "#configuration",
        )
    }

    pub fn kind(&self) -> InvalidItemKind {
        self.kind
    }

    /// The offending item configuration.
    pub fn item(&self) -> &Value {
        &self.item
    }

    /// How to fix the item.
    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }

    pub fn docs_url(&self) -> String {
        format!("{DOCS_BASE_URL}{}", self.docs_section)
    }
}

impl fmt::Display for InvalidItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} See: {}", self.message, self.suggestion, self.docs_url())
    }
}

/// Failure to turn a route name into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route '{route}' is not defined")]
    UnknownRoute { route: String },

    #[error("missing required parameters for route '{route}': {}", missing.join(", "))]
    MissingParameters { route: String, missing: Vec<String> },
}

/// The authorization collaborator could not answer an ability check.
#[derive(Debug, Clone, Error)]
#[error("authorization check '{ability}' failed: {message}")]
pub struct AuthorizationError {
    pub ability: String,
    pub message: String,
}

/// Errors surfaced by the navigation registry.
#[derive(Debug, Clone, Error)]
pub enum NavigationError {
    /// An item in a named navigation failed validation.
    #[error("navigation '{navigation}': {source}")]
    InvalidItem {
        navigation: String,
        #[source]
        source: InvalidItemError,
    },
}

/// Result type alias using NavigationError.
pub type NavigationResult<T> = Result<T, NavigationError>;

/// Failure reading or writing the icon store.
#[derive(Debug, Error)]
pub enum IconStoreError {
    #[error("failed to access icon store at {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("icon store at {path} is not a JSON object of name to SVG")]
    Format {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure loading a navigation configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read navigation config {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported navigation config format: {path} (expected .yaml, .yml, .toml or .json)")]
    UnsupportedFormat { path: String },

    #[error("invalid navigation config {path}")]
    Parse {
        path: String,
        #[source]
        source: ConfigParseError,
    },
}

/// Why a navigation config document was rejected.
#[derive(Debug, Error)]
pub enum ConfigParseError {
    #[error("malformed YAML")]
    Yaml(#[from] serde_yml::Error),

    #[error("malformed TOML")]
    Toml(#[from] toml::de::Error),

    #[error("malformed JSON")]
    Json(#[from] serde_json::Error),

    #[error("navigation '{name}' must be a list of items")]
    NotAList { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_includes_suggestion_and_docs() {
        let err = InvalidItemError::both_route_and_url(json!({"label": "X"}));
        let text = err.to_string();

        assert!(text.starts_with("Navigation item cannot have both"));
        assert!(text.contains("but not both."));
        assert!(text.ends_with(&format!("See: {DOCS_BASE_URL}#routing")));
    }

    #[test]
    fn invalid_method_lists_choices() {
        let err = InvalidItemError::invalid_method(json!({}), "fetch", &["get", "post"]);

        assert_eq!(err.kind(), InvalidItemKind::InvalidMethod);
        assert!(err.to_string().contains("\"fetch\""));
        assert!(err.suggestion().contains("get, post"));
        assert_eq!(err.docs_url(), format!("{DOCS_BASE_URL}#action-items"));
    }

    #[test]
    fn route_error_messages() {
        let err = RouteError::MissingParameters {
            route: "users.edit".to_string(),
            missing: vec!["user".to_string(), "tab".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing required parameters for route 'users.edit': user, tab"
        );
    }
}

//! Literal and computed labels, and visibility conditions.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::params::{RouteEntity, RouteParams, scalar_to_string};

/// Callback producing a label from the current route parameters.
pub type LabelFn = Arc<dyn Fn(LabelArgs<'_>) -> String + Send + Sync>;

/// Callback deciding whether an item is shown.
pub type VisibilityFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// What a computed label is called with.
///
/// When exactly one route parameter is an entity, the label receives that
/// entity; otherwise it receives the whole parameter bag.
#[derive(Debug, Clone, Copy)]
pub enum LabelArgs<'a> {
    Entity(&'a dyn RouteEntity),
    Params(&'a RouteParams),
}

impl<'a> LabelArgs<'a> {
    pub(crate) fn for_params(params: &'a RouteParams) -> Self {
        let mut entities = params.entities();
        match (entities.next(), entities.next()) {
            (Some(entity), None) => Self::Entity(&**entity),
            _ => Self::Params(params),
        }
    }

    /// Look up a named value: an entity attribute or a route parameter.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self {
            Self::Entity(entity) => entity.attribute(name),
            Self::Params(params) => params.get(name).map(|value| value.to_json()),
        }
    }
}

/// An item label.
#[derive(Clone)]
pub enum Label {
    Text(String),
    Computed(LabelFn),
}

impl Label {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(LabelArgs<'_>) -> String + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    /// A computed label filling `{name}` placeholders from [`LabelArgs::get`].
    ///
    /// Unknown placeholders render as empty text.
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::computed(move |args| render_template(&template, &args))
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Computed(_) => None,
        }
    }

    pub fn resolve(&self, params: &RouteParams) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Computed(f) => f(LabelArgs::for_params(params)),
        }
    }

    /// JSON stand-in used in error payloads and config dumps.
    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Text(text) => Value::String(text.clone()),
            Self::Computed(_) => Value::String("[closure]".to_string()),
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// When an item is shown.
#[derive(Clone)]
pub enum Visibility {
    Static(bool),
    Computed(VisibilityFn),
    /// Only while a user is signed in.
    Authenticated,
    /// Only while nobody is signed in.
    Guest,
}

impl Visibility {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self::Computed(Arc::new(f))
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Static(visible) => Value::Bool(*visible),
            Self::Computed(_) => Value::String("[closure]".to_string()),
            Self::Authenticated => Value::String("authenticated".to_string()),
            Self::Guest => Value::String("guest".to_string()),
        }
    }
}

impl PartialEq for Visibility {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => a == b,
            (Self::Computed(a), Self::Computed(b)) => Arc::ptr_eq(a, b),
            (Self::Authenticated, Self::Authenticated) | (Self::Guest, Self::Guest) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(visible) => f.debug_tuple("Static").field(visible).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
            Self::Authenticated => f.write_str("Authenticated"),
            Self::Guest => f.write_str("Guest"),
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Self::Static(visible)
    }
}

fn render_template(template: &str, args: &LabelArgs<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let name = after[..close].trim();
        if let Some(value) = args.get(name) {
            out.push_str(&scalar_to_string(&value).unwrap_or_default());
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

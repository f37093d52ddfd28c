//! Route parameter bags.
//!
//! A request's route parameters are either plain JSON scalars or bound
//! entities (a user, a post) that know how to present themselves in a URL.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Marker accepting any value for a route parameter.
pub const WILDCARD: &str = "*";

/// A bound model in the route parameters.
pub trait RouteEntity: fmt::Debug + Send + Sync {
    /// Value used when the entity fills a route parameter.
    fn route_key(&self) -> Option<String> {
        None
    }

    /// String form, used when there is no route key.
    fn display(&self) -> Option<String> {
        None
    }

    /// Named attribute, used by label templates.
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// An entity backed by a JSON object, keyed by one of its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonEntity {
    fields: Map<String, Value>,
    key_field: String,
}

impl JsonEntity {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            key_field: "id".to_string(),
        }
    }

    /// Use a different field as the route key (e.g. "slug").
    pub fn keyed_by(mut self, field: impl Into<String>) -> Self {
        self.key_field = field.into();
        self
    }
}

impl RouteEntity for JsonEntity {
    fn route_key(&self) -> Option<String> {
        self.fields.get(&self.key_field).and_then(scalar_to_string)
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }
}

/// One route parameter value.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Value(Value),
    Entity(Arc<dyn RouteEntity>),
}

impl ParamValue {
    pub fn entity(entity: impl RouteEntity + 'static) -> Self {
        Self::Entity(Arc::new(entity))
    }

    /// JSON objects become [`JsonEntity`] values; everything else stays a scalar.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self::entity(JsonEntity::new(fields)),
            other => Self::Value(other),
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, Self::Entity(_))
    }

    /// Text placed into a URL segment or query string.
    pub fn as_segment(&self) -> Option<String> {
        match self {
            Self::Value(value) => scalar_to_string(value),
            Self::Entity(entity) => entity.route_key().or_else(|| entity.display()),
        }
    }

    /// Replace an entity by its route key, falling back to its string form.
    ///
    /// Entities exposing neither are passed through unchanged.
    pub fn to_route_value(&self) -> ParamValue {
        match self {
            Self::Entity(entity) => match entity.route_key().or_else(|| entity.display()) {
                Some(key) => Self::Value(Value::String(key)),
                None => self.clone(),
            },
            Self::Value(_) => self.clone(),
        }
    }

    /// Compare against a configured literal.
    ///
    /// Scalars compare by their URL text so a literal `5` matches a
    /// request parameter `"5"`.
    pub fn matches_literal(&self, literal: &Value) -> bool {
        match (self.as_segment(), scalar_to_string(literal)) {
            (Some(actual), Some(expected)) => actual == expected,
            _ => matches!(self, Self::Value(value) if value == literal),
        }
    }

    /// JSON view of the value, for label templates and diagnostics.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Value(value) => value.clone(),
            Self::Entity(entity) => entity
                .route_key()
                .or_else(|| entity.display())
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Entity(a), Self::Entity(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        Self::from_json(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Value(Value::String(value.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Value(Value::String(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Value(Value::Bool(value))
    }
}

impl<E: RouteEntity + 'static> From<Arc<E>> for ParamValue {
    fn from(entity: Arc<E>) -> Self {
        Self::Entity(entity)
    }
}

/// Named route parameters, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteParams(BTreeMap<String, ParamValue>);

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// A key holding JSON null counts as absent.
    pub fn contains(&self, name: &str) -> bool {
        self.0
            .get(name)
            .is_some_and(|value| !matches!(value, ParamValue::Value(Value::Null)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entity-typed values only.
    pub fn entities(&self) -> impl Iterator<Item = &Arc<dyn RouteEntity>> {
        self.0.values().filter_map(|value| match value {
            ParamValue::Entity(entity) => Some(entity),
            ParamValue::Value(_) => None,
        })
    }

    /// Build from a JSON object; non-objects yield an empty bag.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(name, value)| (name.clone(), ParamValue::from_json(value.clone())))
                .collect(),
            _ => Self::new(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Titled(&'static str);

    impl RouteEntity for Titled {
        fn display(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn json_objects_become_entities() {
        let value = ParamValue::from_json(json!({"id": 42, "name": "Ada"}));
        assert!(value.is_entity());
        assert_eq!(value.as_segment().as_deref(), Some("42"));
    }

    #[test]
    fn keyed_by_uses_other_field() {
        let fields = json!({"id": 1, "slug": "hello"});
        let entity = JsonEntity::new(fields.as_object().unwrap().clone()).keyed_by("slug");
        assert_eq!(entity.route_key().as_deref(), Some("hello"));
    }

    #[test]
    fn route_value_prefers_key_then_display() {
        let keyed = ParamValue::from_json(json!({"id": 7}));
        assert_eq!(keyed.to_route_value(), ParamValue::from("7"));

        let titled = ParamValue::entity(Titled("intro"));
        assert_eq!(titled.to_route_value(), ParamValue::from("intro"));
    }

    #[test]
    fn bare_entity_passes_through() {
        #[derive(Debug)]
        struct Opaque;
        impl RouteEntity for Opaque {}

        let value = ParamValue::entity(Opaque);
        let resolved = value.to_route_value();
        assert_eq!(resolved, value);
    }

    #[test]
    fn literal_matching_is_textual() {
        assert!(ParamValue::from("5").matches_literal(&json!(5)));
        assert!(ParamValue::from(5).matches_literal(&json!("5")));
        assert!(!ParamValue::from(6).matches_literal(&json!(5)));
        assert!(ParamValue::from_json(json!({"id": 9})).matches_literal(&json!(9)));
    }

    #[test]
    fn null_counts_as_missing() {
        let params = RouteParams::new()
            .with("user", Value::Null)
            .with("team", 3);
        assert!(!params.contains("user"));
        assert!(params.contains("team"));
        assert!(!params.contains("post"));
    }

    #[test]
    fn from_json_reads_object() {
        let params = RouteParams::from_json(&json!({"user": {"id": 1}, "tab": "roles"}));
        assert_eq!(params.len(), 2);
        assert_eq!(params.entities().count(), 1);
    }
}

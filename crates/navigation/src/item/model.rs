//! Parsed, validated navigation items.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use super::label::{Label, Visibility};
use super::raw::{ItemFields, RESERVED_KEYS, RawItem};
use crate::error::InvalidItemError;
use crate::params::WILDCARD;

/// HTTP method for action items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub const ALL: [&'static str; 5] = ["get", "post", "put", "patch", "delete"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization requirement on an item.
#[derive(Debug, Clone, PartialEq)]
pub enum AbilityCheck {
    Ability(String),
    WithSubject(String, Value),
}

impl AbilityCheck {
    pub fn ability(&self) -> &str {
        match self {
            Self::Ability(ability) | Self::WithSubject(ability, _) => ability,
        }
    }

    pub fn subject(&self) -> Option<&Value> {
        match self {
            Self::Ability(_) => None,
            Self::WithSubject(_, subject) => Some(subject),
        }
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Ability(ability) => Value::String(ability.clone()),
            Self::WithSubject(ability, subject) => {
                Value::Array(vec![Value::String(ability.clone()), subject.clone()])
            }
        }
    }
}

/// Expected value for one route parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamMatch {
    Wildcard,
    Literal(Value),
}

impl ParamMatch {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    pub(crate) fn to_json(&self) -> Value {
        match self {
            Self::Wildcard => Value::String(WILDCARD.to_string()),
            Self::Literal(value) => value.clone(),
        }
    }
}

impl From<Value> for ParamMatch {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) if s == WILDCARD => Self::Wildcard,
            other => Self::Literal(other),
        }
    }
}

/// One configured navigation entry.
///
/// Items are only built through [`ItemModel::parse`] and friends, so every
/// instance satisfies the configuration invariants. They are never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemModel {
    label: Option<Label>,
    route: Option<String>,
    url: Option<String>,
    method: Option<Method>,
    icon: Option<String>,
    children: Vec<ItemModel>,
    visible: Option<Visibility>,
    authorization: Option<AbilityCheck>,
    breadcrumb_only: bool,
    nav_only: bool,
    params: Option<BTreeMap<String, ParamMatch>>,
    meta: Map<String, Value>,
}

impl ItemModel {
    /// Parse any supported raw shape.
    pub fn parse(raw: impl Into<RawItem>) -> Result<Self, InvalidItemError> {
        match raw.into() {
            RawItem::Fields(fields) => Self::from_fields(fields),
            RawItem::Shorthand(shorthand) => Self::from_fields(shorthand.into_fields()),
            RawItem::Json(value) => Self::from_fields(ItemFields::from_value(&value)?),
        }
    }

    /// Parse a list of raw items, stopping at the first invalid one.
    pub fn parse_all<I, R>(raw: I) -> Result<Vec<Self>, InvalidItemError>
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        raw.into_iter().map(Self::parse).collect()
    }

    /// Validate the canonical associative form.
    pub fn from_fields(fields: ItemFields) -> Result<Self, InvalidItemError> {
        let label = fields
            .label
            .clone()
            .filter(|label| label.as_text() != Some(""));
        let meta: Map<String, Value> = fields
            .meta
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if label.is_none() && fields.children.is_empty() && meta.is_empty() {
            return Err(InvalidItemError::missing_content(fields.to_value()));
        }
        if fields.route.is_some() && fields.url.is_some() {
            return Err(InvalidItemError::both_route_and_url(fields.to_value()));
        }
        if fields.breadcrumb_only && fields.nav_only {
            return Err(InvalidItemError::conflicting_visibility(fields.to_value()));
        }
        if fields.params.is_some() && fields.route.is_none() {
            return Err(InvalidItemError::params_without_route(fields.to_value()));
        }
        let method = match fields.method.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<Method>() {
                Ok(method) => Some(method),
                Err(()) => {
                    return Err(InvalidItemError::invalid_method(
                        fields.to_value(),
                        raw,
                        &Method::ALL,
                    ));
                }
            },
        };

        let ItemFields {
            route,
            url,
            icon,
            children,
            visible,
            can,
            breadcrumb_only,
            nav_only,
            params,
            ..
        } = fields;

        Ok(Self {
            label,
            route,
            url,
            method,
            icon,
            children: Self::parse_all(children)?,
            visible,
            authorization: can,
            breadcrumb_only,
            nav_only,
            params: params.map(|params| {
                params
                    .into_iter()
                    .map(|(key, value)| (key, ParamMatch::from(value)))
                    .collect()
            }),
            meta,
        })
    }

    /// Back to the associative form. Parsing the result yields an equal item.
    pub fn to_fields(&self) -> ItemFields {
        ItemFields {
            label: self.label.clone(),
            route: self.route.clone(),
            url: self.url.clone(),
            method: self.method.map(|method| method.as_str().to_string()),
            icon: self.icon.clone(),
            children: self
                .children
                .iter()
                .map(|child| RawItem::Fields(child.to_fields()))
                .collect(),
            visible: self.visible.clone(),
            can: self.authorization.clone(),
            breadcrumb_only: self.breadcrumb_only,
            nav_only: self.nav_only,
            params: self.params.as_ref().map(|params| {
                params
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect()
            }),
            meta: self.meta.clone(),
        }
    }

    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Literal label text, if the label is not computed.
    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().and_then(Label::as_text)
    }

    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn method(&self) -> Option<Method> {
        self.method
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn children(&self) -> &[ItemModel] {
        &self.children
    }

    pub fn visible(&self) -> Option<&Visibility> {
        self.visible.as_ref()
    }

    pub fn authorization(&self) -> Option<&AbilityCheck> {
        self.authorization.as_ref()
    }

    pub fn is_breadcrumb_only(&self) -> bool {
        self.breadcrumb_only
    }

    pub fn is_nav_only(&self) -> bool {
        self.nav_only
    }

    pub fn params(&self) -> Option<&BTreeMap<String, ParamMatch>> {
        self.params.as_ref()
    }

    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn has_wildcard_params(&self) -> bool {
        self.params
            .as_ref()
            .is_some_and(|params| params.values().any(ParamMatch::is_wildcard))
    }

    pub fn has_dynamic_label(&self) -> bool {
        self.label.as_ref().is_some_and(Label::is_computed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::InvalidItemKind;
    use crate::item::raw::Shorthand;
    use serde_json::json;

    #[test]
    fn parses_full_form_with_meta() {
        let item = ItemModel::parse(json!({
            "label": "Inbox",
            "route": "inbox",
            "badge": 3,
            "badgeColor": "red"
        }))
        .unwrap();

        assert_eq!(item.label_text(), Some("Inbox"));
        assert_eq!(item.route(), Some("inbox"));
        assert_eq!(item.meta().get("badge"), Some(&json!(3)));
        assert_eq!(item.meta().len(), 2);
    }

    #[test]
    fn missing_content_is_rejected() {
        let err = ItemModel::parse(json!({})).unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::MissingContent);
        assert_eq!(err.item(), &json!({}));
    }

    #[test]
    fn empty_label_counts_as_missing() {
        let err = ItemModel::parse(json!({"label": ""})).unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::MissingContent);
    }

    #[test]
    fn route_and_url_conflict() {
        let err = ItemModel::parse(json!({"label": "X", "route": "a", "url": "b"})).unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::BothRouteAndUrl);
        assert_eq!(err.item()["route"], json!("a"));
    }

    #[test]
    fn breadcrumb_and_nav_only_conflict() {
        let err = ItemModel::parse(json!({
            "label": "X",
            "breadcrumbOnly": true,
            "navOnly": true
        }))
        .unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::ConflictingVisibility);
    }

    #[test]
    fn params_need_route() {
        let err = ItemModel::parse(json!({"label": "X", "params": {"id": 1}})).unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::ParamsWithoutRoute);
    }

    #[test]
    fn method_is_normalized() {
        let item = ItemModel::parse(json!({"label": "Logout", "route": "logout", "method": "POST"}))
            .unwrap();
        assert_eq!(item.method(), Some(Method::Post));

        let err = ItemModel::parse(json!({"label": "X", "route": "x", "method": "fetch"}))
            .unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::InvalidMethod);
    }

    #[test]
    fn meta_only_items_are_valid() {
        let item = ItemModel::parse(json!({"separator": true})).unwrap();
        assert!(item.label().is_none());
        assert_eq!(item.meta().get("separator"), Some(&json!(true)));
    }

    #[test]
    fn children_only_items_are_valid() {
        let item = ItemModel::parse(json!({"children": [["Profile", "settings.profile"]]})).unwrap();
        assert_eq!(item.children().len(), 1);
    }

    #[test]
    fn invalid_child_fails_parent() {
        let err = ItemModel::parse(json!({
            "label": "Settings",
            "children": [{"label": "Bad", "route": "a", "url": "b"}]
        }))
        .unwrap_err();
        assert_eq!(err.kind(), InvalidItemKind::BothRouteAndUrl);
        assert_eq!(err.item()["label"], json!("Bad"));
    }

    #[test]
    fn wildcard_params_detected() {
        let item = ItemModel::parse(json!({
            "label": "Edit",
            "route": "users.edit",
            "params": {"user": "*", "tab": "main"},
            "breadcrumbOnly": true
        }))
        .unwrap();

        assert!(item.has_wildcard_params());
        let params = item.params().unwrap();
        assert_eq!(params["user"], ParamMatch::Wildcard);
        assert_eq!(params["tab"], ParamMatch::Literal(json!("main")));
    }

    #[test]
    fn to_fields_round_trips() {
        let item = ItemModel::parse(json!({
            "label": "Users",
            "route": "users.index",
            "method": "get",
            "icon": "users",
            "can": ["viewAny", "users"],
            "params": {"team": "*"},
            "breadcrumbOnly": true,
            "badge": "new",
            "children": [{"label": "Roles", "route": "roles.index"}]
        }))
        .unwrap();

        let again = ItemModel::parse(item.to_fields()).unwrap();
        assert_eq!(again, item);
    }

    #[test]
    fn shorthand_and_full_forms_agree() {
        let shorthand = ItemModel::parse(
            Shorthand::new("Docs")
                .target("https://docs.example.com")
                .icon("book"),
        )
        .unwrap();
        let full = ItemModel::parse(json!({
            "label": "Docs",
            "url": "https://docs.example.com",
            "icon": "book"
        }))
        .unwrap();

        assert_eq!(shorthand, full);
        assert_eq!(full.route(), None);
    }
}

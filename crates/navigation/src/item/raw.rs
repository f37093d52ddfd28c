//! Raw item configuration.
//!
//! Three shapes reach the parser: the associative [`ItemFields`] form, the
//! positional [`Shorthand`] form, and JSON values read from configuration
//! files. JSON is the only place where the shape is detected structurally.

use serde_json::{Map, Value};

use super::label::{Label, Visibility};
use super::model::AbilityCheck;
use crate::error::InvalidItemError;

/// Keys with a fixed meaning. Every other key is passed through as metadata.
pub const RESERVED_KEYS: [&str; 11] = [
    "label",
    "route",
    "url",
    "method",
    "icon",
    "children",
    "visible",
    "can",
    "breadcrumbOnly",
    "navOnly",
    "params",
];

/// Any raw item shape accepted by [`ItemModel::parse`](super::ItemModel::parse).
#[derive(Debug, Clone)]
pub enum RawItem {
    Fields(ItemFields),
    Shorthand(Shorthand),
    Json(Value),
}

impl From<ItemFields> for RawItem {
    fn from(fields: ItemFields) -> Self {
        Self::Fields(fields)
    }
}

impl From<Shorthand> for RawItem {
    fn from(shorthand: Shorthand) -> Self {
        Self::Shorthand(shorthand)
    }
}

impl From<Value> for RawItem {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl RawItem {
    /// JSON view of the configuration, with callbacks shown as placeholders.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Fields(fields) => fields.to_value(),
            Self::Shorthand(shorthand) => shorthand.clone().into_fields().to_value(),
            Self::Json(value) => value.clone(),
        }
    }
}

/// The canonical associative item form.
#[derive(Debug, Clone, Default)]
pub struct ItemFields {
    pub label: Option<Label>,
    pub route: Option<String>,
    pub url: Option<String>,
    pub method: Option<String>,
    pub icon: Option<String>,
    pub children: Vec<RawItem>,
    pub visible: Option<Visibility>,
    pub can: Option<AbilityCheck>,
    pub breadcrumb_only: bool,
    pub nav_only: bool,
    pub params: Option<Map<String, Value>>,
    pub meta: Map<String, Value>,
}

impl ItemFields {
    /// Read one item from configuration JSON.
    ///
    /// Objects use the associative keys. Arrays whose first element is a
    /// label are read as shorthand `[label, route or url, icon, children]`.
    pub fn from_value(value: &Value) -> Result<Self, InvalidItemError> {
        match value {
            Value::Object(map) => Self::from_object(value, map),
            Value::Array(items) if is_shorthand(items) => {
                Shorthand::from_array(value, items).map(Shorthand::into_fields)
            }
            _ => Err(InvalidItemError::malformed(
                value.clone(),
                "item",
                "an object or a shorthand list starting with a label",
            )),
        }
    }

    fn from_object(raw: &Value, map: &Map<String, Value>) -> Result<Self, InvalidItemError> {
        let mut fields = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "label" => fields.label = label_from_json(raw, value)?,
                "route" => fields.route = optional_string(raw, key, value)?,
                "url" => fields.url = optional_string(raw, key, value)?,
                "method" => fields.method = optional_string(raw, key, value)?,
                "icon" => fields.icon = optional_string(raw, key, value)?,
                "children" => fields.children = children_from_json(raw, value)?,
                "visible" => {
                    fields.visible = match value {
                        Value::Null => None,
                        Value::Bool(visible) => Some(Visibility::Static(*visible)),
                        Value::String(s) if s == "authenticated" => Some(Visibility::Authenticated),
                        Value::String(s) if s == "guest" => Some(Visibility::Guest),
                        _ => {
                            return Err(InvalidItemError::malformed(
                                raw.clone(),
                                key,
                                "a boolean, \"authenticated\" or \"guest\"",
                            ));
                        }
                    }
                }
                "can" => fields.can = ability_from_json(raw, value)?,
                "breadcrumbOnly" => fields.breadcrumb_only = flag(raw, key, value)?,
                "navOnly" => fields.nav_only = flag(raw, key, value)?,
                "params" => {
                    fields.params = match value {
                        Value::Null => None,
                        Value::Object(params) => Some(params.clone()),
                        _ => {
                            return Err(InvalidItemError::malformed(raw.clone(), key, "an object"));
                        }
                    }
                }
                _ => {
                    fields.meta.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(fields)
    }

    /// JSON view of the fields, metadata merged at the top level.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();

        if let Some(label) = &self.label {
            out.insert("label".to_string(), label.to_json());
        }
        if let Some(route) = &self.route {
            out.insert("route".to_string(), Value::String(route.clone()));
        }
        if let Some(url) = &self.url {
            out.insert("url".to_string(), Value::String(url.clone()));
        }
        if let Some(method) = &self.method {
            out.insert("method".to_string(), Value::String(method.clone()));
        }
        if let Some(icon) = &self.icon {
            out.insert("icon".to_string(), Value::String(icon.clone()));
        }
        if !self.children.is_empty() {
            out.insert(
                "children".to_string(),
                Value::Array(self.children.iter().map(RawItem::to_value).collect()),
            );
        }
        if let Some(visible) = &self.visible {
            out.insert("visible".to_string(), visible.to_json());
        }
        if let Some(can) = &self.can {
            out.insert("can".to_string(), can.to_json());
        }
        if self.breadcrumb_only {
            out.insert("breadcrumbOnly".to_string(), Value::Bool(true));
        }
        if self.nav_only {
            out.insert("navOnly".to_string(), Value::Bool(true));
        }
        if let Some(params) = &self.params {
            out.insert("params".to_string(), Value::Object(params.clone()));
        }
        for (key, value) in &self.meta {
            out.insert(key.clone(), value.clone());
        }

        Value::Object(out)
    }
}

/// Positional `[label, route or url, icon, children]` form.
#[derive(Debug, Clone)]
pub struct Shorthand {
    label: Label,
    target: Option<String>,
    icon: Option<String>,
    children: Vec<RawItem>,
}

impl Shorthand {
    pub fn new(label: impl Into<Label>) -> Self {
        Self {
            label: label.into(),
            target: None,
            icon: None,
            children: Vec::new(),
        }
    }

    /// Route name, or URL when it starts with `http://` or `https://`.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn children<I, R>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn into_fields(self) -> ItemFields {
        let (route, url) = match self.target {
            Some(target) if is_external(&target) => (None, Some(target)),
            Some(target) => (Some(target), None),
            None => (None, None),
        };

        ItemFields {
            label: Some(self.label),
            route,
            url,
            icon: self.icon,
            children: self.children,
            ..ItemFields::default()
        }
    }

    fn from_array(raw: &Value, items: &[Value]) -> Result<Self, InvalidItemError> {
        let label = label_from_json(raw, &items[0])?
            .ok_or_else(|| InvalidItemError::malformed(raw.clone(), "0", "a label"))?;
        let mut shorthand = Self::new(label);

        if let Some(target) = items.get(1) {
            shorthand.target = optional_string(raw, "1", target)?;
        }
        if let Some(icon) = items.get(2) {
            shorthand.icon = optional_string(raw, "2", icon)?;
        }
        if let Some(children) = items.get(3) {
            shorthand.children = children_from_json(raw, children)?;
        }

        Ok(shorthand)
    }
}

fn is_external(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

fn is_shorthand(items: &[Value]) -> bool {
    (1..=4).contains(&items.len()) && is_label_value(&items[0])
}

fn is_label_value(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Object(map) => map.len() == 1 && map.get("template").is_some_and(Value::is_string),
        _ => false,
    }
}

/// Strings are literal labels; `{"template": "Edit {name}"}` is computed.
fn label_from_json(raw: &Value, value: &Value) -> Result<Option<Label>, InvalidItemError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(Label::Text(text.clone()))),
        Value::Object(map) => match map.get("template") {
            Some(Value::String(template)) if map.len() == 1 => Ok(Some(Label::template(template.clone()))),
            _ => Err(InvalidItemError::malformed(
                raw.clone(),
                "label",
                "a string or {\"template\": \"...\"}",
            )),
        },
        _ => Err(InvalidItemError::malformed(
            raw.clone(),
            "label",
            "a string or {\"template\": \"...\"}",
        )),
    }
}

fn optional_string(raw: &Value, key: &str, value: &Value) -> Result<Option<String>, InvalidItemError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(InvalidItemError::malformed(raw.clone(), key, "a string")),
    }
}

fn flag(raw: &Value, key: &str, value: &Value) -> Result<bool, InvalidItemError> {
    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        _ => Err(InvalidItemError::malformed(raw.clone(), key, "a boolean")),
    }
}

fn children_from_json(raw: &Value, value: &Value) -> Result<Vec<RawItem>, InvalidItemError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(children) => Ok(children.iter().cloned().map(RawItem::Json).collect()),
        _ => Err(InvalidItemError::malformed(raw.clone(), "children", "a list")),
    }
}

fn ability_from_json(raw: &Value, value: &Value) -> Result<Option<AbilityCheck>, InvalidItemError> {
    match value {
        Value::Null => Ok(None),
        Value::String(ability) => Ok(Some(AbilityCheck::Ability(ability.clone()))),
        Value::Array(pair) => match pair.as_slice() {
            [Value::String(ability)] => Ok(Some(AbilityCheck::Ability(ability.clone()))),
            [Value::String(ability), subject] => {
                Ok(Some(AbilityCheck::WithSubject(ability.clone(), subject.clone())))
            }
            _ => Err(InvalidItemError::malformed(
                raw.clone(),
                "can",
                "an ability name or [ability, subject]",
            )),
        },
        _ => Err(InvalidItemError::malformed(
            raw.clone(),
            "can",
            "an ability name or [ability, subject]",
        )),
    }
}

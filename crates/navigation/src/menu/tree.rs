//! Navigation tree output.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use super::NavigationServices;
use super::matching::{is_descendant_route, route_matches};
use crate::item::{ItemModel, Method};
use crate::params::RouteParams;
use crate::visibility::VisibilityResolver;

/// One rendered navigation entry.
///
/// Structural entries (separators, dividers) have no label, and serialize
/// without `label`, `isActive` and `children`. Metadata is merged into the
/// serialized node; a metadata key named like a generated key (`id`,
/// `isActive`) replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct NavNode {
    pub id: String,
    pub label: Option<String>,
    pub is_active: Option<bool>,
    pub url: Option<String>,
    pub method: Option<Method>,
    pub icon: Option<String>,
    pub children: Option<Vec<NavNode>>,
    pub meta: Map<String, Value>,
}

impl Serialize for NavNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let generated = |key: &str| !self.meta.contains_key(key);

        if generated("id") {
            map.serialize_entry("id", &self.id)?;
        }
        if let Some(label) = &self.label
            && generated("label")
        {
            map.serialize_entry("label", label)?;
        }
        if let Some(is_active) = self.is_active
            && generated("isActive")
        {
            map.serialize_entry("isActive", &is_active)?;
        }
        if generated("url") {
            map.serialize_entry("url", &self.url)?;
        }
        if let Some(method) = self.method
            && generated("method")
        {
            map.serialize_entry("method", &method)?;
        }
        if let Some(icon) = &self.icon
            && generated("icon")
        {
            map.serialize_entry("icon", icon)?;
        }
        if let Some(children) = &self.children
            && generated("children")
        {
            map.serialize_entry("children", children)?;
        }
        for (key, value) in &self.meta {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl NavNode {
    pub fn is_active(&self) -> bool {
        self.is_active.unwrap_or(false)
    }

    /// Child nodes; empty for structural entries.
    pub fn children(&self) -> &[NavNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Builds the visible, annotated tree for one navigation.
pub struct TreeBuilder<'a> {
    navigation: &'a str,
    services: &'a NavigationServices,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(navigation: &'a str, services: &'a NavigationServices) -> Self {
        Self {
            navigation,
            services,
        }
    }

    /// `route_params` fill URLs; `current_route` and `current_params` drive
    /// the active state.
    pub fn build(
        &self,
        items: &[ItemModel],
        route_params: &RouteParams,
        current_route: Option<&str>,
        current_params: &RouteParams,
    ) -> Vec<NavNode> {
        let visibility = VisibilityResolver::new(self.services.gate.as_ref());
        let state = BuildState {
            visibility,
            route_params,
            current_route,
            current_params,
        };
        self.build_level(&state, items, None)
    }

    fn build_level(
        &self,
        state: &BuildState<'_>,
        items: &[ItemModel],
        parent_id: Option<&str>,
    ) -> Vec<NavNode> {
        items
            .iter()
            .enumerate()
            .filter(|(_, item)| self.include_in_tree(state, item))
            .map(|(index, item)| {
                let id = match parent_id {
                    Some(parent) => format!("{parent}-{index}"),
                    None => format!("nav-{}-{index}", self.navigation),
                };
                let children = self.build_level(state, item.children(), Some(&id));
                self.build_node(state, item, id, children)
            })
            .collect()
    }

    fn include_in_tree(&self, state: &BuildState<'_>, item: &ItemModel) -> bool {
        if !state.visibility.is_visible(item) {
            return false;
        }
        if item.is_breadcrumb_only() {
            return false;
        }
        if item.has_wildcard_params() || item.has_dynamic_label() {
            if self.services.debug {
                warn!(
                    navigation = %self.navigation,
                    label = item.label_text().unwrap_or("[closure]"),
                    route = item.route().unwrap_or_default(),
                    "navigation item skipped: items with wildcard params or dynamic labels should be breadcrumbOnly"
                );
            }
            return false;
        }
        true
    }

    fn build_node(
        &self,
        state: &BuildState<'_>,
        item: &ItemModel,
        id: String,
        children: Vec<NavNode>,
    ) -> NavNode {
        let label = item.label_text().map(str::to_string);
        let is_active = label
            .as_ref()
            .map(|_| is_active(item, state.current_route, state.current_params));
        let children = if label.is_some() || !children.is_empty() {
            Some(children)
        } else {
            None
        };

        NavNode {
            id,
            label,
            is_active,
            url: self.resolve_url(item, state.route_params),
            method: item.method(),
            icon: item.icon().map(|icon| self.services.icons.compile(icon)),
            children,
            meta: item.meta().clone(),
        }
    }

    fn resolve_url(&self, item: &ItemModel, params: &RouteParams) -> Option<String> {
        match item.route() {
            Some(route) => Some(
                self.services
                    .resolve_or_placeholder(self.navigation, route, params),
            ),
            None => item.url().map(str::to_string),
        }
    }
}

struct BuildState<'a> {
    visibility: VisibilityResolver<'a>,
    route_params: &'a RouteParams,
    current_route: Option<&'a str>,
    current_params: &'a RouteParams,
}

/// Active when the item's route matches, the current route sits below it,
/// or any child is active. Children hidden from the tree still count.
fn is_active(item: &ItemModel, current_route: Option<&str>, current_params: &RouteParams) -> bool {
    let Some(current) = current_route else {
        return false;
    };

    if let Some(route) = item.route()
        && (route_matches(item, current, current_params) || is_descendant_route(route, current))
    {
        return true;
    }

    item.children()
        .iter()
        .any(|child| is_active(child, current_route, current_params))
}

//! Fluent builders for navigation items and whole navigations.
//!
//! ```
//! use waymark_navigation::item::Item;
//!
//! let users = Item::make("Users")
//!     .route("users.index")
//!     .icon("users")
//!     .child(Item::to("All Users", "users.index"))
//!     .child(Item::to("Roles", "roles.index"));
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

use super::label::{Label, LabelArgs, Visibility};
use super::model::AbilityCheck;
use super::raw::{ItemFields, RawItem, Shorthand};
use crate::error::NavigationResult;
use crate::navigation::Navigation;
use crate::registry::NavigationRegistry;

/// Builder for a single item. Converts into the associative form.
#[derive(Debug, Clone, Default)]
pub struct Item {
    fields: ItemFields,
}

impl Item {
    pub fn make(label: impl Into<Label>) -> Self {
        let mut item = Self::default();
        item.fields.label = Some(label.into());
        item
    }

    /// Item pointing at a named route.
    pub fn to(label: impl Into<Label>, route: impl Into<String>) -> Self {
        Self::make(label).route(route)
    }

    /// Link to an external URL.
    pub fn external(label: impl Into<Label>, url: impl Into<String>) -> Self {
        Self::make(label).url(url)
    }

    /// Route submitted with a non-GET method, e.g. a logout button.
    pub fn action(label: impl Into<Label>, route: impl Into<String>, method: impl Into<String>) -> Self {
        Self::make(label).route(route).method(method)
    }

    pub fn separator() -> Self {
        Self::default().meta("separator", true)
    }

    pub fn divider(spacing: impl Into<String>) -> Self {
        Self::default().meta("divider", spacing.into())
    }

    /// Collapsible section header, expanded by default.
    pub fn group<I, R>(label: impl Into<Label>, children: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        Self::make(label)
            .meta("group", true)
            .meta("collapsible", true)
            .meta("collapsed", false)
            .children(children)
    }

    pub fn label(mut self, label: impl Into<Label>) -> Self {
        self.fields.label = Some(label.into());
        self
    }

    /// Label computed from the route parameters when breadcrumbs are built.
    pub fn label_with<F>(mut self, f: F) -> Self
    where
        F: Fn(LabelArgs<'_>) -> String + Send + Sync + 'static,
    {
        self.fields.label = Some(Label::Computed(Arc::new(f)));
        self
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.fields.route = Some(route.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.fields.url = Some(url.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.fields.method = Some(method.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.fields.icon = Some(icon.into());
        self
    }

    pub fn children<I, R>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        self.fields.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn child(mut self, child: impl Into<RawItem>) -> Self {
        self.fields.children.push(child.into());
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.fields.visible = Some(Visibility::Static(visible));
        self
    }

    pub fn visible_when<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.fields.visible = Some(Visibility::computed(f));
        self
    }

    pub fn when_authenticated(mut self) -> Self {
        self.fields.visible = Some(Visibility::Authenticated);
        self
    }

    pub fn when_guest(mut self) -> Self {
        self.fields.visible = Some(Visibility::Guest);
        self
    }

    pub fn can(mut self, ability: impl Into<String>) -> Self {
        self.fields.can = Some(AbilityCheck::Ability(ability.into()));
        self
    }

    pub fn can_on(mut self, ability: impl Into<String>, subject: impl Into<Value>) -> Self {
        self.fields.can = Some(AbilityCheck::WithSubject(ability.into(), subject.into()));
        self
    }

    pub fn breadcrumb_only(mut self) -> Self {
        self.fields.breadcrumb_only = true;
        self
    }

    pub fn nav_only(mut self) -> Self {
        self.fields.nav_only = true;
        self
    }

    /// Route parameters; use `"*"` to accept any value.
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let params: Map<String, Value> = params
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.fields.params = Some(params);
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.meta.insert(key.into(), value.into());
        self
    }

    pub fn badge(self, count: impl Into<Value>, color: impl Into<String>) -> Self {
        self.meta("badge", count).meta("badgeColor", color.into())
    }

    pub fn collapsible(self, collapsible: bool) -> Self {
        self.meta("collapsible", collapsible)
    }

    pub fn collapsed(self) -> Self {
        self.meta("collapsed", true).meta("collapsible", true)
    }

    pub fn into_fields(self) -> ItemFields {
        self.fields
    }
}

impl From<Item> for ItemFields {
    fn from(item: Item) -> Self {
        item.fields
    }
}

impl From<Item> for RawItem {
    fn from(item: Item) -> Self {
        RawItem::Fields(item.fields)
    }
}

impl From<Shorthand> for ItemFields {
    fn from(shorthand: Shorthand) -> Self {
        shorthand.into_fields()
    }
}

/// Registers a navigation at runtime, one item at a time.
///
/// `child` nests one level under the most recent root item. Deeper trees
/// go through [`NavigationBuilder::add`] with a nested [`Item`].
#[must_use = "call `done` to register the navigation"]
pub struct NavigationBuilder<'a> {
    name: String,
    registry: &'a NavigationRegistry,
    items: Vec<ItemFields>,
    parent: Option<usize>,
}

impl<'a> NavigationBuilder<'a> {
    pub(crate) fn new(name: impl Into<String>, registry: &'a NavigationRegistry) -> Self {
        Self {
            name: name.into(),
            registry,
            items: Vec::new(),
            parent: None,
        }
    }

    fn push_root(mut self, fields: ItemFields) -> Self {
        self.items.push(fields);
        self.parent = Some(self.items.len() - 1);
        self
    }

    pub fn item(self, label: impl Into<Label>, route: Option<&str>, icon: Option<&str>) -> Self {
        let fields = link_fields(label.into(), route, icon);
        self.push_root(fields)
    }

    pub fn external(self, label: impl Into<Label>, url: impl Into<String>, icon: Option<&str>) -> Self {
        let mut item = Item::external(label, url);
        if let Some(icon) = icon {
            item = item.icon(icon);
        }
        self.push_root(item.into_fields())
    }

    pub fn action(
        self,
        label: impl Into<Label>,
        route: impl Into<String>,
        method: impl Into<String>,
        icon: Option<&str>,
    ) -> Self {
        let mut item = Item::action(label, route, method);
        if let Some(icon) = icon {
            item = item.icon(icon);
        }
        self.push_root(item.into_fields())
    }

    /// Add under the last root item, or as a root item when there is none.
    pub fn child(mut self, label: impl Into<Label>, route: Option<&str>, icon: Option<&str>) -> Self {
        let fields = link_fields(label.into(), route, icon);
        match self.parent.and_then(|index| self.items.get_mut(index)) {
            Some(parent) => {
                parent.children.push(RawItem::Fields(fields));
                self
            }
            None => self.push_root(fields),
        }
    }

    pub fn separator(mut self) -> Self {
        self.items.push(Item::separator().into_fields());
        self.parent = None;
        self
    }

    pub fn divider(mut self, spacing: impl Into<String>) -> Self {
        self.items.push(Item::divider(spacing).into_fields());
        self.parent = None;
        self
    }

    pub fn add(self, item: impl Into<ItemFields>) -> Self {
        self.push_root(item.into())
    }

    /// The configured items, without registering them.
    pub fn into_items(self) -> Vec<RawItem> {
        self.items.into_iter().map(RawItem::Fields).collect()
    }

    pub fn done(self) -> &'a NavigationRegistry {
        let registry = self.registry;
        let name = self.name.clone();
        registry.register_navigation(name, self.into_items());
        registry
    }

    /// Register and return the built navigation.
    pub fn get(self) -> NavigationResult<Arc<Navigation>> {
        let name = self.name.clone();
        self.done().get(&name)
    }
}

fn link_fields(label: Label, route: Option<&str>, icon: Option<&str>) -> ItemFields {
    ItemFields {
        label: Some(label),
        route: route.map(str::to_string),
        icon: icon.map(str::to_string),
        ..ItemFields::default()
    }
}

//! A named, parsed navigation.

use crate::error::{NavigationError, NavigationResult};
use crate::item::{ItemModel, RawItem};
use crate::menu::{Breadcrumb, BreadcrumbResolver, NavNode, NavigationServices, TreeBuilder};
use crate::params::RouteParams;

/// One navigation: its name, its validated item forest, and the
/// collaborators used to render it.
#[derive(Debug)]
pub struct Navigation {
    name: String,
    items: Vec<ItemModel>,
    services: NavigationServices,
}

impl Navigation {
    /// Parse `items`. The first invalid item fails the whole navigation.
    pub fn new<I, R>(name: impl Into<String>, items: I, services: NavigationServices) -> NavigationResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        let name = name.into();
        let items = ItemModel::parse_all(items).map_err(|source| NavigationError::InvalidItem {
            navigation: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            items,
            services,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[ItemModel] {
        &self.items
    }

    pub fn services(&self) -> &NavigationServices {
        &self.services
    }

    /// The visible tree.
    ///
    /// `current_route` defaults to the request's route. `current_params`
    /// defaults to the request's parameters when absent or empty.
    pub fn tree(
        &self,
        route_params: &RouteParams,
        current_route: Option<&str>,
        current_params: Option<&RouteParams>,
    ) -> Vec<NavNode> {
        let request_route = match current_route {
            Some(_) => None,
            None => self.services.request.current_route(),
        };
        let current_route = current_route.or(request_route.as_deref());
        let current_params = self.params_or_request(current_params);

        TreeBuilder::new(&self.name, &self.services).build(
            &self.items,
            route_params,
            current_route,
            &current_params,
        )
    }

    /// The trail to `route`, or to the request's route when `None`.
    ///
    /// `params` default to the request's parameters when absent or empty.
    pub fn breadcrumbs(&self, route: Option<&str>, params: Option<&RouteParams>) -> Vec<Breadcrumb> {
        let request_route = match route {
            Some(_) => None,
            None => self.services.request.current_route(),
        };
        let Some(route) = route.or(request_route.as_deref()) else {
            return Vec::new();
        };
        let params = self.params_or_request(params);

        BreadcrumbResolver::new(&self.name, &self.services).resolve(&self.items, route, &params)
    }

    fn params_or_request(&self, params: Option<&RouteParams>) -> RouteParams {
        match params {
            Some(params) if !params.is_empty() => params.clone(),
            _ => self.services.request.current_route_params(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::InvalidItemKind;
    use crate::routes::{RequestState, RouteTable};
    use serde_json::json;
    use std::sync::Arc;

    fn services(request: Arc<RequestState>) -> NavigationServices {
        let routes = RouteTable::new()
            .with_route("dashboard", "/dashboard")
            .with_route("users.index", "/users")
            .with_route("users.edit", "/users/{user}/edit");
        NavigationServices::new(Arc::new(routes)).with_request(request)
    }

    #[test]
    fn invalid_item_names_the_navigation() {
        let err = Navigation::new(
            "main",
            vec![json!({"label": "X", "route": "a", "url": "b"})],
            services(Arc::new(RequestState::new())),
        )
        .unwrap_err();

        let NavigationError::InvalidItem { navigation, source } = err;
        assert_eq!(navigation, "main");
        assert_eq!(source.kind(), InvalidItemKind::BothRouteAndUrl);
    }

    #[test]
    fn defaults_come_from_the_request() {
        let request = Arc::new(RequestState::new());
        let nav = Navigation::new(
            "main",
            vec![
                json!({"label": "Dashboard", "route": "dashboard"}),
                json!({"label": "Users", "route": "users.index", "children": [
                    {"label": "Edit", "route": "users.edit", "params": {"user": "*"}, "breadcrumbOnly": true}
                ]}),
            ],
            services(Arc::clone(&request)),
        )
        .unwrap();

        assert!(nav.breadcrumbs(None, None).is_empty());

        request.enter("users.edit", RouteParams::new().with("user", 9));
        let tree = nav.tree(&RouteParams::new(), None, None);
        assert!(!tree[0].is_active());
        assert!(tree[1].is_active());

        let trail = nav.breadcrumbs(None, None);
        assert_eq!(trail.len(), 2);
        assert_eq!(trail[1].url.as_deref(), Some("/users/9/edit"));
    }

    #[test]
    fn explicit_route_overrides_request() {
        let request = Arc::new(RequestState::new());
        request.enter("users.index", RouteParams::new());
        let nav = Navigation::new(
            "main",
            vec![json!({"label": "Dashboard", "route": "dashboard"})],
            services(request),
        )
        .unwrap();

        assert!(nav.tree(&RouteParams::new(), Some("dashboard"), None)[0].is_active());
    }
}

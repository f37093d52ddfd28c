//! Breadcrumb trails.

use serde::Serialize;

use super::NavigationServices;
use super::matching::route_matches;
use crate::item::{ItemModel, Label, ParamMatch};
use crate::params::RouteParams;

/// One step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Path entry whose label is resolved once the target is found.
struct PendingCrumb<'i> {
    id: String,
    label: Option<&'i Label>,
    route: Option<String>,
    url: Option<String>,
}

/// Finds the path from the root of a forest to a target route.
///
/// Visibility is not consulted: a breadcrumb shows where the user is, not
/// where they may go.
pub struct BreadcrumbResolver<'a> {
    navigation: &'a str,
    services: &'a NavigationServices,
}

impl<'a> BreadcrumbResolver<'a> {
    pub fn new(navigation: &'a str, services: &'a NavigationServices) -> Self {
        Self {
            navigation,
            services,
        }
    }

    /// Depth-first, declaration order; the first match wins. Returns an
    /// empty trail when no item matches.
    pub fn resolve(
        &self,
        items: &[ItemModel],
        target_route: &str,
        route_params: &RouteParams,
    ) -> Vec<Breadcrumb> {
        let mut path = Vec::new();
        if self.search(items, target_route, route_params, &mut path) {
            path.into_iter()
                .map(|crumb| Breadcrumb {
                    id: crumb.id,
                    label: crumb
                        .label
                        .map(|label| label.resolve(route_params))
                        .unwrap_or_default(),
                    route: crumb.route,
                    url: crumb.url,
                })
                .collect()
        } else {
            Vec::new()
        }
    }

    fn search<'i>(
        &self,
        items: &'i [ItemModel],
        target_route: &str,
        route_params: &RouteParams,
        path: &mut Vec<PendingCrumb<'i>>,
    ) -> bool {
        for (index, item) in items.iter().enumerate() {
            if item.is_nav_only() {
                if self.search(item.children(), target_route, route_params, path) {
                    return true;
                }
                continue;
            }

            path.push(self.pending(item, path.len(), index, route_params));

            if route_matches(item, target_route, route_params) {
                return true;
            }
            if self.search(item.children(), target_route, route_params, path) {
                return true;
            }

            path.pop();
        }
        false
    }

    fn pending<'i>(
        &self,
        item: &'i ItemModel,
        depth: usize,
        index: usize,
        route_params: &RouteParams,
    ) -> PendingCrumb<'i> {
        let url = match item.route() {
            Some(route) => {
                let params = match item.params() {
                    Some(expected) if item.is_breadcrumb_only() => {
                        resolve_wildcard_params(expected, route_params)
                    }
                    _ => route_params.clone(),
                };
                Some(
                    self.services
                        .resolve_or_placeholder(self.navigation, route, &params),
                )
            }
            None => item.url().map(str::to_string),
        };

        PendingCrumb {
            id: format!("breadcrumb-{}-{depth}-{index}", self.navigation),
            label: item.label(),
            route: item.route().map(str::to_string),
            url,
        }
    }
}

/// Concrete parameters for a breadcrumb-only item's URL.
///
/// Wildcards take the current value, reduced to its route key or string form
/// when it is an entity. Literals are kept. Wildcards with no current value
/// are left out.
fn resolve_wildcard_params(
    expected: &std::collections::BTreeMap<String, ParamMatch>,
    current: &RouteParams,
) -> RouteParams {
    let mut resolved = RouteParams::new();
    for (name, matcher) in expected {
        match matcher {
            ParamMatch::Wildcard => {
                if current.contains(name)
                    && let Some(value) = current.get(name)
                {
                    resolved.insert(name.clone(), value.to_route_value());
                }
            }
            ParamMatch::Literal(value) => resolved.insert(name.clone(), value.clone()),
        }
    }
    resolved
}

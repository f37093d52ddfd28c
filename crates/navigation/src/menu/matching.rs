use crate::item::{ItemModel, ParamMatch};
use crate::params::RouteParams;

/// Whether `item` stands for `route` with the given parameters.
///
/// Route names must be equal. When the item declares `params`, each entry
/// must be satisfied: `*` needs the key present, a literal needs an equal
/// value.
pub fn route_matches(item: &ItemModel, route: &str, params: &RouteParams) -> bool {
    if item.route() != Some(route) {
        return false;
    }

    let Some(expected) = item.params() else {
        return true;
    };

    expected.iter().all(|(name, matcher)| match matcher {
        ParamMatch::Wildcard => params.contains(name),
        ParamMatch::Literal(literal) => {
            params.contains(name)
                && params
                    .get(name)
                    .is_some_and(|value| value.matches_literal(literal))
        }
    })
}

/// `current` sits below `route` at a `.` boundary (`users` -> `users.roles`).
pub fn is_descendant_route(route: &str, current: &str) -> bool {
    current
        .strip_prefix(route)
        .is_some_and(|rest| rest.starts_with('.'))
}

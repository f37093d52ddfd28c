//! Tree and breadcrumb building over a parsed item forest.

mod breadcrumb;
mod matching;
mod tree;

use std::sync::Arc;

use tracing::warn;

use crate::icons::{IconCompiler, PassthroughIcons};
use crate::params::RouteParams;
use crate::routes::{RequestContext, RequestState, UrlResolver};
use crate::visibility::{Gate, PermissionGate};

pub use breadcrumb::{Breadcrumb, BreadcrumbResolver};
pub use matching::{is_descendant_route, route_matches};
pub use tree::{NavNode, TreeBuilder};

/// Collaborators shared by every navigation built from one registry.
#[derive(Clone)]
pub struct NavigationServices {
    pub urls: Arc<dyn UrlResolver>,
    pub gate: Arc<dyn Gate>,
    pub icons: Arc<dyn IconCompiler>,
    pub request: Arc<dyn RequestContext>,
    /// Log route failures and skipped items.
    pub debug: bool,
}

impl NavigationServices {
    /// Anonymous user, pass-through icons, empty request context.
    pub fn new(urls: Arc<dyn UrlResolver>) -> Self {
        Self {
            urls,
            gate: Arc::new(PermissionGate::anonymous()),
            icons: Arc::new(PassthroughIcons),
            request: Arc::new(RequestState::new()),
            debug: false,
        }
    }

    pub fn with_gate(mut self, gate: Arc<dyn Gate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_icons(mut self, icons: Arc<dyn IconCompiler>) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_request(mut self, request: Arc<dyn RequestContext>) -> Self {
        self.request = request;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolve a route, falling back to `#` when the resolver fails.
    pub(crate) fn resolve_or_placeholder(
        &self,
        navigation: &str,
        route: &str,
        params: &RouteParams,
    ) -> String {
        match self.urls.resolve(route, params) {
            Ok(url) => url,
            Err(e) => {
                if self.debug {
                    warn!(
                        navigation = %navigation,
                        route = %route,
                        error = %e,
                        "navigation route error"
                    );
                }
                "#".to_string()
            }
        }
    }
}

impl std::fmt::Debug for NavigationServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationServices")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io;

    use parking_lot::Mutex;
    use serde_json::json;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;
    use crate::item::ItemModel;
    use crate::routes::RouteTable;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logged<T>(f: impl FnOnce() -> T) -> (T, String) {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&captured.0.lock()).into_owned();
        (result, text)
    }

    fn services(debug: bool) -> NavigationServices {
        let routes = RouteTable::new()
            .with_route("dashboard", "/dashboard")
            .with_route("users.edit", "/users/{user}/edit");
        NavigationServices::new(Arc::new(routes)).with_debug(debug)
    }

    #[test]
    fn route_errors_warn_only_in_debug() {
        let quiet = services(false);
        let (url, log) = logged(|| quiet.resolve_or_placeholder("main", "missing.route", &RouteParams::new()));
        assert_eq!(url, "#");
        assert!(log.is_empty(), "unexpected log: {log}");

        let loud = services(true);
        let (url, log) = logged(|| loud.resolve_or_placeholder("main", "missing.route", &RouteParams::new()));
        assert_eq!(url, "#");
        assert!(log.contains("navigation route error"));
        assert!(log.contains("missing.route"));
    }

    #[test]
    fn skipped_items_warn_only_in_debug() {
        let items = ItemModel::parse_all(vec![
            json!({"label": "Edit", "route": "users.edit", "params": {"user": "*"}}),
            json!({"label": "Dashboard", "route": "dashboard"}),
        ])
        .unwrap();
        let build = |services: &NavigationServices| {
            TreeBuilder::new("main", services).build(&items, &RouteParams::new(), None, &RouteParams::new())
        };

        let quiet = services(false);
        let (tree, log) = logged(|| build(&quiet));
        assert_eq!(tree.len(), 1);
        assert!(log.is_empty(), "unexpected log: {log}");

        let loud = services(true);
        let (tree, log) = logged(|| build(&loud));
        assert_eq!(tree.len(), 1);
        assert!(log.contains("navigation item skipped"));
        assert!(log.contains("users.edit"));
    }
}

//! Waymark navigation engine.
//!
//! Builds navigation menus and breadcrumb trails from declarative item
//! configuration. Items are parsed and validated once per navigation
//! ([`item::ItemModel`]), then rendered per request into a visible tree with
//! resolved URLs and active state ([`menu::TreeBuilder`]) or into the path
//! leading to a route ([`menu::BreadcrumbResolver`]).
//!
//! Most callers go through a [`NavigationRegistry`]:
//!
//! ```
//! use std::sync::Arc;
//! use waymark_navigation::{NavigationRegistry, NavigationServices, NavigationSet, RouteParams, RouteTable};
//! use waymark_navigation::item::Item;
//!
//! let routes = RouteTable::new()
//!     .with_route("dashboard", "/dashboard")
//!     .with_route("users.index", "/users");
//! let registry = NavigationRegistry::new(
//!     NavigationSet::new(),
//!     NavigationServices::new(Arc::new(routes)),
//! );
//! registry.register_navigation("main", [
//!     Item::to("Dashboard", "dashboard"),
//!     Item::to("Users", "users.index"),
//! ]);
//!
//! let tree = registry
//!     .build_tree("main", &RouteParams::new(), Some("users.index"), None)
//!     .unwrap_or_default();
//! assert!(tree[1].is_active());
//! ```

pub mod config;
pub mod error;
pub mod icons;
pub mod item;
pub mod menu;
pub mod navigation;
pub mod params;
pub mod registry;
pub mod routes;
pub mod validate;
pub mod visibility;

pub use error::{InvalidItemError, InvalidItemKind, NavigationError, NavigationResult, RouteError};
pub use menu::{Breadcrumb, NavNode, NavigationServices};
pub use navigation::Navigation;
pub use params::{ParamValue, RouteEntity, RouteParams};
pub use registry::{NavigationRegistry, NavigationSet};
pub use routes::{RequestContext, RequestState, RouteTable, UrlResolver};
pub use visibility::{Gate, PermissionGate, UserContext};

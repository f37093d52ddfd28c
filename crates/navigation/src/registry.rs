//! Named navigation registry.
//!
//! Navigations come from two places: the static configuration the registry
//! was created with, and runtime registrations, which take precedence for
//! the same name. Built navigations are cached per name until their
//! configuration changes or the cache is cleared.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::NavigationResult;
use crate::item::{NavigationBuilder, RawItem};
use crate::menu::{Breadcrumb, NavNode, NavigationServices};
use crate::navigation::Navigation;
use crate::params::RouteParams;
use crate::validate::{self, ValidationReport};

/// Raw item lists by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct NavigationSet {
    entries: Vec<(String, Arc<[RawItem]>)>,
}

impl NavigationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<I, R>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        self.insert(name, items);
        self
    }

    /// Replace the items for `name`, keeping its position if already present.
    pub fn insert<I, R>(&mut self, name: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        let name = name.into();
        let items: Arc<[RawItem]> = items.into_iter().map(Into::into).collect();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = items,
            None => self.entries.push((name, items)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<[RawItem]>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, items)| items)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry of named navigations.
///
/// Cheap to clone; clones share registrations and the cache.
#[derive(Clone)]
pub struct NavigationRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    statics: NavigationSet,
    /// Swapped wholesale on every registration.
    runtime: RwLock<Arc<NavigationSet>>,
    cache: DashMap<String, Arc<Navigation>>,
    services: NavigationServices,
}

impl NavigationRegistry {
    pub fn new(statics: NavigationSet, services: NavigationServices) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                statics,
                runtime: RwLock::new(Arc::new(NavigationSet::new())),
                cache: DashMap::new(),
                services,
            }),
        }
    }

    pub fn services(&self) -> &NavigationServices {
        &self.inner.services
    }

    /// Start a runtime registration.
    pub fn register(&self, name: impl Into<String>) -> NavigationBuilder<'_> {
        NavigationBuilder::new(name, self)
    }

    /// Replace the runtime items for `name` and drop its cached build.
    pub fn register_navigation<I, R>(&self, name: impl Into<String>, items: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<RawItem>,
    {
        let name = name.into();
        let mut runtime = self.inner.runtime.write();
        let mut next = NavigationSet::clone(&*runtime);
        next.insert(name.clone(), items);
        *runtime = Arc::new(next);
        self.inner.cache.remove(&name);

        info!(navigation = %name, "registered navigation");
    }

    /// The built navigation for `name`. Unknown names yield an empty
    /// navigation, which is never cached.
    pub fn get(&self, name: &str) -> NavigationResult<Arc<Navigation>> {
        if let Some(cached) = self.inner.cache.get(name) {
            return Ok(Arc::clone(cached.value()));
        }

        let snapshot: Arc<NavigationSet> = self.inner.runtime.read().clone();
        let Some(items) = snapshot
            .get(name)
            .or_else(|| self.inner.statics.get(name))
            .cloned()
        else {
            return Ok(Arc::new(Navigation::new(
                name,
                Vec::<RawItem>::new(),
                self.inner.services.clone(),
            )?));
        };

        let navigation = Arc::new(Navigation::new(
            name,
            items.iter().cloned(),
            self.inner.services.clone(),
        )?);
        debug!(navigation = %name, items = navigation.items().len(), "built navigation");

        // A registration that raced with this build owns the cache entry.
        let runtime = self.inner.runtime.read();
        if Arc::ptr_eq(&snapshot, &*runtime) {
            self.inner
                .cache
                .insert(name.to_string(), Arc::clone(&navigation));
        }

        Ok(navigation)
    }

    pub fn build_tree(
        &self,
        name: &str,
        route_params: &RouteParams,
        current_route: Option<&str>,
        current_params: Option<&RouteParams>,
    ) -> NavigationResult<Vec<NavNode>> {
        Ok(self
            .get(name)?
            .tree(route_params, current_route, current_params))
    }

    /// Breadcrumbs for `route`, or the request's route when `None`.
    ///
    /// Without a navigation name every navigation is searched in
    /// registration order and the first non-empty trail wins.
    pub fn build_breadcrumbs(
        &self,
        name: Option<&str>,
        route: Option<&str>,
        params: Option<&RouteParams>,
    ) -> NavigationResult<Vec<Breadcrumb>> {
        if let Some(name) = name {
            return Ok(self.get(name)?.breadcrumbs(route, params));
        }

        for name in self.navigation_names() {
            let trail = self.get(&name)?.breadcrumbs(route, params);
            if !trail.is_empty() {
                return Ok(trail);
            }
        }
        Ok(Vec::new())
    }

    pub fn has_navigation(&self, name: &str) -> bool {
        self.inner.runtime.read().contains(name) || self.inner.statics.contains(name)
    }

    /// Static names first, then names registered only at runtime.
    pub fn navigation_names(&self) -> Vec<String> {
        let runtime: Arc<NavigationSet> = self.inner.runtime.read().clone();
        let mut names: Vec<String> = self.inner.statics.names().map(str::to_string).collect();
        names.extend(
            runtime
                .names()
                .filter(|name| !self.inner.statics.contains(name))
                .map(str::to_string),
        );
        names
    }

    /// Drop one cached navigation, or all of them.
    pub fn clear_cache(&self, name: Option<&str>) {
        match name {
            Some(name) => {
                self.inner.cache.remove(name);
            }
            None => self.inner.cache.clear(),
        }
    }

    /// Forget every runtime registration and every cached build.
    pub fn clear_registrations(&self) {
        let mut runtime = self.inner.runtime.write();
        *runtime = Arc::new(NavigationSet::new());
        self.inner.cache.clear();

        info!("cleared runtime navigation registrations");
    }

    /// Check every route used by every navigation against the URL resolver.
    pub fn validate(&self) -> NavigationResult<ValidationReport> {
        let mut report = ValidationReport::default();
        for name in self.navigation_names() {
            let navigation = self.get(&name)?;
            validate::check_navigation(&navigation, self.inner.services.urls.as_ref(), &mut report);
        }
        Ok(report)
    }
}

impl std::fmt::Debug for NavigationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationRegistry")
            .field("statics", &self.inner.statics.len())
            .field("cached", &self.inner.cache.len())
            .finish_non_exhaustive()
    }
}

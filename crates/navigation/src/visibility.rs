//! Item visibility: static flags, predicates, and ability checks.

use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::error::AuthorizationError;
use crate::item::{AbilityCheck, ItemModel, Visibility};

/// Ability that grants every other ability.
pub const ADMIN_PERMISSION: &str = "administer site";

/// The signed-in user, as seen by navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub id: String,
    pub permissions: HashSet<String>,
}

impl UserContext {
    pub fn new<I, P>(id: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            id: id.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_permission(ADMIN_PERMISSION)
    }
}

/// Authentication and authorization, as consumed by navigation.
pub trait Gate: Send + Sync {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<UserContext>;

    /// Whether `user` may perform `ability`, optionally on `subject`.
    fn can(
        &self,
        user: &UserContext,
        ability: &str,
        subject: Option<&Value>,
    ) -> Result<bool, AuthorizationError>;
}

/// Permission-set gate: admins pass every check, everyone else needs the
/// ability in their permission set. Subjects are not consulted.
#[derive(Debug, Clone, Default)]
pub struct PermissionGate {
    user: Option<UserContext>,
}

impl PermissionGate {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn for_user(user: UserContext) -> Self {
        Self { user: Some(user) }
    }
}

impl Gate for PermissionGate {
    fn current_user(&self) -> Option<UserContext> {
        self.user.clone()
    }

    fn can(
        &self,
        user: &UserContext,
        ability: &str,
        _subject: Option<&Value>,
    ) -> Result<bool, AuthorizationError> {
        Ok(user.is_admin() || user.has_permission(ability))
    }
}

/// Decides whether an item is shown.
pub struct VisibilityResolver<'a> {
    gate: &'a dyn Gate,
}

impl<'a> VisibilityResolver<'a> {
    pub fn new(gate: &'a dyn Gate) -> Self {
        Self { gate }
    }

    /// Both the `visible` condition and the `can` check must pass.
    pub fn is_visible(&self, item: &ItemModel) -> bool {
        self.passes_visibility(item.visible()) && self.passes_gate(item.authorization())
    }

    fn passes_visibility(&self, visible: Option<&Visibility>) -> bool {
        match visible {
            None => true,
            Some(Visibility::Static(visible)) => *visible,
            Some(Visibility::Computed(predicate)) => predicate(),
            Some(Visibility::Authenticated) => self.gate.current_user().is_some(),
            Some(Visibility::Guest) => self.gate.current_user().is_none(),
        }
    }

    /// A gate that cannot answer hides the item.
    fn passes_gate(&self, check: Option<&AbilityCheck>) -> bool {
        let Some(check) = check else {
            return true;
        };
        let Some(user) = self.gate.current_user() else {
            return false;
        };

        match self.gate.can(&user, check.ability(), check.subject()) {
            Ok(allowed) => allowed,
            Err(e) => {
                warn!(
                    ability = %check.ability(),
                    user = %user.id,
                    error = %e,
                    "authorization check failed, hiding navigation item"
                );
                false
            }
        }
    }
}

//! Navigation item configuration and the validated item model.
//!
//! Raw configuration comes in as [`ItemFields`], [`Shorthand`], an [`Item`]
//! builder, or JSON read from a config file. [`ItemModel::parse`] normalizes
//! all of them and enforces the item invariants.

mod builder;
mod label;
mod model;
mod raw;

pub use builder::{Item, NavigationBuilder};
pub use label::{Label, LabelArgs, LabelFn, Visibility, VisibilityFn};
pub use model::{AbilityCheck, ItemModel, Method, ParamMatch};
pub use raw::{ItemFields, RESERVED_KEYS, RawItem, Shorthand};

//! Icon compilation.
//!
//! Item icons are plain names (`"users"`, `"log-out"`). An [`IconCompiler`]
//! turns a name into whatever the frontend renders, usually inline SVG read
//! from the [`IconStore`]. Names without a compiled form pass through as-is.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::IconStoreError;
use crate::item::{ItemFields, RawItem};

/// Maps an icon name to its rendered form.
pub trait IconCompiler: Send + Sync {
    fn compile(&self, name: &str) -> String;
}

/// Returns every icon name unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughIcons;

impl IconCompiler for PassthroughIcons {
    fn compile(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Precompiled icons persisted as a JSON object of name to SVG.
///
/// Reads go through a shared snapshot; [`IconStore::save`] writes the file
/// and swaps in a new snapshot.
#[derive(Debug)]
pub struct IconStore {
    path: PathBuf,
    icons: RwLock<Arc<HashMap<String, String>>>,
}

impl IconStore {
    /// Load the store at `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, IconStoreError> {
        let path = path.into();
        let icons = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| IconStoreError::Io {
                path: path.display().to_string(),
                source,
            })?;
            let icons: HashMap<String, String> =
                serde_json::from_str(&content).map_err(|source| IconStoreError::Format {
                    path: path.display().to_string(),
                    source,
                })?;
            debug!(path = %path.display(), count = icons.len(), "loaded icon store");
            icons
        } else {
            debug!(path = %path.display(), "icon store not found, starting empty");
            HashMap::new()
        };

        Ok(Self {
            path,
            icons: RwLock::new(Arc::new(icons)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole store on disk and in memory.
    pub fn save(&self, icons: HashMap<String, String>) -> Result<(), IconStoreError> {
        let io_error = |source| IconStoreError::Io {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let sorted: BTreeMap<&String, &String> = icons.iter().collect();
        let json = serde_json::to_string_pretty(&sorted).map_err(|source| IconStoreError::Format {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_error)?;

        info!(path = %self.path.display(), count = icons.len(), "saved icon store");
        *self.icons.write() = Arc::new(icons);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.icons.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.icons.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.icons.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.read().is_empty()
    }
}

impl IconCompiler for IconStore {
    fn compile(&self, name: &str) -> String {
        self.get(name).unwrap_or_else(|| name.to_string())
    }
}

/// Every icon name used in `items`, children included, in first-seen order.
pub fn extract_icons<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a RawItem>,
{
    let mut seen = HashSet::new();
    let mut icons = Vec::new();
    for item in items {
        collect_icons(item, &mut seen, &mut icons);
    }
    icons
}

fn collect_icons(item: &RawItem, seen: &mut HashSet<String>, icons: &mut Vec<String>) {
    let fields = match item {
        RawItem::Fields(fields) => fields.clone(),
        RawItem::Shorthand(shorthand) => shorthand.clone().into_fields(),
        // Malformed entries are reported by the parser, not here.
        RawItem::Json(value) => match ItemFields::from_value(value) {
            Ok(fields) => fields,
            Err(_) => return,
        },
    };

    if let Some(icon) = fields.icon
        && seen.insert(icon.clone())
    {
        icons.push(icon);
    }
    for child in &fields.children {
        collect_icons(child, seen, icons);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::item::{Item, Shorthand};
    use serde_json::json;

    fn temp_path(test: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("waymark-icons-{}-{test}", std::process::id()))
            .join("icons.json")
    }

    #[test]
    fn missing_file_is_empty_store() {
        let store = IconStore::load(temp_path("missing")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.compile("users"), "users");
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("save");
        let store = IconStore::load(&path).unwrap();
        store
            .save(HashMap::from([("users".to_string(), "<svg>u</svg>".to_string())]))
            .unwrap();
        assert_eq!(store.compile("users"), "<svg>u</svg>");

        let reloaded = IconStore::load(&path).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains("users"));

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2]").unwrap();

        let err = IconStore::load(&path).unwrap_err();
        assert!(matches!(err, IconStoreError::Format { .. }));

        fs::remove_dir_all(path.parent().unwrap()).ok();
    }

    #[test]
    fn extracts_unique_icons_in_order() {
        let items: Vec<RawItem> = vec![
            Item::to("Home", "home").icon("house").into(),
            Shorthand::new("Users")
                .target("users.index")
                .icon("users")
                .children([Item::to("Roles", "roles.index").icon("shield")])
                .into(),
            json!({"label": "Team", "route": "team", "icon": "users"}).into(),
            json!({"separator": true}).into(),
        ];

        assert_eq!(extract_icons(&items), vec!["house", "users", "shield"]);
    }
}

//! Settings from the environment, and navigation config files.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigParseError};
use crate::registry::NavigationSet;
use crate::routes::RouteTable;

/// Runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Log route failures and skipped items (default: false).
    pub debug: bool,

    /// Navigation config file (default: ./navigation.yaml).
    pub config_path: PathBuf,

    /// Compiled icon store (default: ./storage/navigation/icons.json).
    pub icons_path: PathBuf,
}

impl Settings {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self> {
        let debug = match env::var("NAVIGATION_DEBUG") {
            Ok(value) => parse_flag(&value).context("NAVIGATION_DEBUG must be a boolean")?,
            Err(_) => false,
        };

        let config_path = env::var("NAVIGATION_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./navigation.yaml"));

        let icons_path = env::var("NAVIGATION_ICONS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./storage/navigation/icons.json"));

        Ok(Self {
            debug,
            config_path,
            icons_path,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognized boolean value: {other}"),
    }
}

/// Config file syntax, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// A navigation config file.
///
/// ```yaml
/// navigations:
///   main:
///     - label: Dashboard
///       route: dashboard
///     - [Docs, "https://docs.example.com", book]
/// routes:
///   dashboard: /dashboard
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationConfig {
    /// Item lists by navigation name, in file order.
    #[serde(default)]
    pub navigations: Map<String, Value>,

    /// Route name to URL pattern.
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

impl NavigationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: display.clone(),
        })?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        Self::parse(&content, format).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }

    /// Parse config text.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigParseError> {
        let config: Self = match format {
            ConfigFormat::Yaml => serde_yml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };

        if let Some((name, _)) = config
            .navigations
            .iter()
            .find(|(_, items)| !items.is_array())
        {
            return Err(ConfigParseError::NotAList { name: name.clone() });
        }
        Ok(config)
    }

    /// Static navigations for a registry.
    pub fn navigation_set(&self) -> NavigationSet {
        let mut set = NavigationSet::new();
        for (name, items) in &self.navigations {
            let items = items.as_array().cloned().unwrap_or_default();
            set.insert(name.clone(), items);
        }
        set
    }

    pub fn route_table(&self) -> RouteTable {
        self.routes.iter().collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::routes::UrlResolver;
    use crate::params::RouteParams;

    const YAML: &str = r#"
navigations:
  main:
    - label: Dashboard
      route: dashboard
    - [Docs, "https://docs.example.com", book]
  footer:
    - label: Privacy
      url: /privacy
routes:
  dashboard: /dashboard
  users.edit: /users/{user}/edit
"#;

    #[test]
    fn format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("nav.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("nav.TOML")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("nav.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("nav.ini")), None);
    }

    #[test]
    fn yaml_keeps_navigation_order() {
        let config = NavigationConfig::parse(YAML, ConfigFormat::Yaml).unwrap();
        let set = config.navigation_set();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["main", "footer"]);
        assert_eq!(set.get("main").unwrap().len(), 2);
    }

    #[test]
    fn routes_build_a_table() {
        let config = NavigationConfig::parse(YAML, ConfigFormat::Yaml).unwrap();
        let routes = config.route_table();

        let params = RouteParams::new().with("user", 3);
        assert_eq!(routes.resolve("users.edit", &params).unwrap(), "/users/3/edit");
    }

    #[test]
    fn toml_config() {
        let config = NavigationConfig::parse(
            r#"
[[navigations.main]]
label = "Dashboard"
route = "dashboard"

[routes]
dashboard = "/dashboard"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.navigations["main"][0]["route"], "dashboard");
        assert_eq!(config.routes["dashboard"], "/dashboard");
    }

    #[test]
    fn navigation_must_be_a_list() {
        let err = NavigationConfig::parse(r#"{"navigations": {"main": {"label": "X"}}}"#, ConfigFormat::Json)
            .unwrap_err();
        assert!(matches!(&err, ConfigParseError::NotAList { name } if name == "main"));
        assert_eq!(err.to_string(), "navigation 'main' must be a list of items");
    }

    #[test]
    fn syntax_errors_keep_their_source() {
        let err = NavigationConfig::parse("navigations = [", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigParseError::Toml(_)));
        assert!(std::error::Error::source(&err).is_some());

        let err = NavigationConfig::parse("navigations: [", ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigParseError::Yaml(_)));
    }

    #[test]
    fn unsupported_extension() {
        let err = NavigationConfig::load(Path::new("navigation.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}

//! Subcommands of the `waymark` binary.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use waymark_navigation::config::{NavigationConfig, Settings};
use waymark_navigation::icons::{IconStore, extract_icons};
use waymark_navigation::{NavigationRegistry, NavigationServices, RouteParams};

/// Inspect and validate navigation configuration.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Navigation config file (overrides NAVIGATION_CONFIG).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log route failures and skipped items.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check every navigation route against the configured routes.
    Validate,

    /// Print a navigation tree.
    Tree {
        /// Navigation name.
        name: String,

        /// Current route, for active state.
        #[arg(long)]
        route: Option<String>,

        /// Current route parameter, as name=value (value may be JSON).
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,

        /// Parameter used to build URLs, as name=value.
        #[arg(long = "route-param", value_parser = parse_param)]
        route_params: Vec<(String, Value)>,
    },

    /// Print the breadcrumb trail to a route.
    Breadcrumbs {
        /// Target route name.
        route: String,

        /// Search only this navigation.
        #[arg(long)]
        navigation: Option<String>,

        /// Route parameter, as name=value (value may be JSON).
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, Value)>,
    },

    /// List the icons used by every navigation.
    Icons,
}

#[derive(Debug, Serialize)]
struct IconUsage {
    name: String,
    compiled: bool,
}

pub fn run(cli: Cli, settings: Settings) -> Result<ExitCode> {
    let config_path = cli.config.unwrap_or(settings.config_path);
    let config = NavigationConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    info!(
        path = %config_path.display(),
        navigations = config.navigations.len(),
        routes = config.routes.len(),
        "loaded navigation config"
    );

    let icons = Arc::new(
        IconStore::load(&settings.icons_path).context("failed to load icon store")?,
    );
    let registry = build_registry(&config, Arc::clone(&icons), cli.debug || settings.debug);

    match cli.command {
        Command::Validate => {
            let report = registry.validate().context("navigation config is invalid")?;
            print_json(&report)?;
            if report.is_valid() {
                Ok(ExitCode::SUCCESS)
            } else {
                warn!(count = report.invalid.len(), "found invalid navigation routes");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Tree {
            name,
            route,
            params,
            route_params,
        } => {
            let current: RouteParams = params.into_iter().collect();
            let route_params: RouteParams = route_params.into_iter().collect();
            let tree = registry
                .build_tree(&name, &route_params, route.as_deref(), Some(&current))
                .with_context(|| format!("failed to build navigation '{name}'"))?;
            print_json(&tree)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Breadcrumbs {
            route,
            navigation,
            params,
        } => {
            let params: RouteParams = params.into_iter().collect();
            let trail = registry
                .build_breadcrumbs(navigation.as_deref(), Some(&route), Some(&params))
                .context("failed to build breadcrumbs")?;
            print_json(&trail)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Icons => {
            let set = config.navigation_set();
            let items = set
                .names()
                .filter_map(|name| set.get(name))
                .flat_map(|items| items.iter());
            let used: Vec<IconUsage> = extract_icons(items)
                .into_iter()
                .map(|name| IconUsage {
                    compiled: icons.contains(&name),
                    name,
                })
                .collect();
            print_json(&used)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Registry over the config's navigations and routes, rendering icons from
/// the store.
fn build_registry(config: &NavigationConfig, icons: Arc<IconStore>, debug: bool) -> NavigationRegistry {
    let services = NavigationServices::new(Arc::new(config.route_table()))
        .with_icons(icons)
        .with_debug(debug);
    NavigationRegistry::new(config.navigation_set(), services)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// `name=value`; the value is read as JSON when it parses, else as text.
fn parse_param(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

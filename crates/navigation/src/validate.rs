//! Route validation across navigations.

use serde::Serialize;

use crate::item::ItemModel;
use crate::navigation::Navigation;
use crate::routes::UrlResolver;

/// An item whose route the resolver does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRoute {
    pub navigation: String,
    /// Labels from the root down to the item, e.g. `Users > Invalid Child`.
    pub path: String,
    pub route: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub navigations: Vec<String>,
    pub invalid: Vec<InvalidRoute>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }
}

pub(crate) fn check_navigation(
    navigation: &Navigation,
    urls: &dyn UrlResolver,
    report: &mut ValidationReport,
) {
    report.navigations.push(navigation.name().to_string());
    check_items(navigation.name(), navigation.items(), urls, &mut Vec::new(), report);
}

fn check_items<'i>(
    navigation: &str,
    items: &'i [ItemModel],
    urls: &dyn UrlResolver,
    labels: &mut Vec<&'i str>,
    report: &mut ValidationReport,
) {
    for item in items {
        labels.push(item_label(item));

        if let Some(route) = item.route()
            && !urls.has_route(route)
        {
            report.invalid.push(InvalidRoute {
                navigation: navigation.to_string(),
                path: labels.join(" > "),
                route: route.to_string(),
            });
        }
        check_items(navigation, item.children(), urls, labels, report);

        labels.pop();
    }
}

fn item_label(item: &ItemModel) -> &str {
    match item.label() {
        Some(label) => label.as_text().unwrap_or("[dynamic]"),
        None => "[untitled]",
    }
}

//! Shareable links to portal pages.

use course_portal_catalog_models::Module;

use crate::route::Route;

/// Builds a link to `route` on the page at `base_url`. Any fragment
/// already on `base_url` is replaced.
#[must_use]
pub fn share_link(base_url: &str, route: &Route) -> String {
    let base = base_url.split_once('#').map_or(base_url, |(head, _)| head);
    format!("{}{route}", base.trim())
}

/// One-line message for pasting into a chat.
#[must_use]
pub fn share_message(module: &Module, link: &str) -> String {
    format!(
        "{} {}: {} file(s) on the course portal {link}",
        module.code,
        module.name,
        module.resources.len()
    )
}

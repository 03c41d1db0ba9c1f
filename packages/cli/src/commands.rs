//! Subcommand implementations shared by the flag-driven CLI and the
//! interactive menu.

use std::time::Duration;

use course_portal::download::resolve_download;
use course_portal::route::Route;
use course_portal::search::{ResourceFilter, search_resources};
use course_portal::share::{share_link, share_message};
use course_portal::view::{ViewOptions, render, render_recent};
use course_portal_feed::canonical::{canon_download, canon_view};
use course_portal_feed::seed::all_seeds;

use crate::session::Session;

/// How long the download spinner shows before the link is printed.
const DOWNLOAD_DELAY: Duration = Duration::from_millis(800);

/// Prints `route` rendered from the current state.
pub fn view(session: &Session, route: &Route, options: &ViewOptions) {
    print!("{}", render(route, &session.portal.view_context(), options));
}

/// Prints the most recently added files.
pub fn recent(session: &Session) {
    print!("{}", render_recent(&session.portal.view_context()));
}

/// Prints every resource matching `query` and `filter`.
pub fn search(session: &Session, query: &str, filter: ResourceFilter) {
    let hits = search_resources(session.portal.modules(), query, filter);
    if hits.is_empty() {
        println!("No files match '{query}'.");
        return;
    }
    println!("{} file(s) match '{query}':", hits.len());
    for hit in hits {
        println!(
            "  [{}] {} ({}) {}/{}",
            hit.module_code, hit.resource.title, hit.resource.resource_type, hit.module_id,
            hit.resource.id
        );
    }
}

/// Prints a share link and message for a module.
///
/// # Errors
///
/// Returns an error if no module has `module_id`.
pub fn share(session: &Session, module_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let module = session
        .portal
        .module(module_id)
        .ok_or_else(|| course_portal::PortalError::UnknownModule {
            id: module_id.to_string(),
        })?;
    let link = share_link(
        &session.config.share_base_url,
        &Route::Module(module.id.clone()),
    );
    println!("{link}");
    println!("{}", share_message(module, &link));
    Ok(())
}

/// Resolves a resource and prints its download link after a short
/// spinner.
///
/// # Errors
///
/// Returns an error if the module or resource is unknown or the resource
/// has no link.
pub async fn download(
    session: &Session,
    module_id: &str,
    resource_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_download(&session.portal, module_id, resource_id)?;

    let spinner = course_portal_cli_utils::spinner(
        &session.multi,
        &format!("Preparing {} ({})", target.title, target.module_code),
    );
    tokio::time::sleep(DOWNLOAD_DELAY).await;
    spinner.finish_and_clear();

    println!("Download: {}", target.download_url);
    println!("View:     {}", target.view_url);
    Ok(())
}

/// Prints both canonical forms of a share link.
pub fn canonicalize(url: &str) {
    println!("download: {}", canon_download(url));
    println!("view:     {}", canon_view(url));
}

/// Lists the seeded modules.
pub fn seeds() {
    let seeds = all_seeds();
    println!("{:<8} {:<8} NAME", "ID", "CODE");
    println!("{}", "-".repeat(60));
    for seed in &seeds {
        println!("{:<8} {:<8} {}", seed.id, seed.code, seed.name);
    }
}

/// Removes the cached snapshot.
///
/// # Errors
///
/// Returns an error if the cache file cannot be removed.
pub fn clear_cache(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    session.portal.clear_cache()?;
    println!("Cleared cached snapshot '{}'.", session.portal.cache().key());
    Ok(())
}

//! Plain-text rendering of each portal page.

use std::fmt::Write as _;

use course_portal_catalog_models::{Module, RecentEntry, ResourceType};

use crate::route::Route;
use crate::search::{ResourceFilter, filter_modules, filter_resources};

/// Borrowed portal state a view is rendered from.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Held modules.
    pub modules: &'a [Module],
    /// Recent uploads, newest first.
    pub recent: &'a [RecentEntry],
    /// Sync failure to show as a banner.
    pub sync_error: Option<&'a str>,
    /// When the data was synced, in epoch milliseconds.
    pub last_synced_at: Option<i64>,
}

/// Search state applied to listing pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Text query; empty shows everything.
    pub query: String,
    /// Resource type filter for module pages.
    pub filter: ResourceFilter,
}

/// Renders `route` as text.
#[must_use]
pub fn render(route: &Route, ctx: &ViewContext<'_>, options: &ViewOptions) -> String {
    let mut out = String::new();
    if let Some(error) = ctx.sync_error {
        writeln!(out, "!! Could not load course files: {error}\n").unwrap();
    }

    match route {
        Route::Home => render_home(&mut out, ctx),
        Route::Modules => render_modules(&mut out, ctx, options),
        Route::About => render_about(&mut out),
        Route::Module(id) => match ctx.modules.iter().find(|m| &m.id == id) {
            Some(module) => render_module(&mut out, module, options),
            None => render_not_found(&mut out, id),
        },
    }
    out
}

fn synced_label(millis: Option<i64>) -> String {
    millis
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map_or_else(
            || "never".to_string(),
            |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
}

fn render_home(out: &mut String, ctx: &ViewContext<'_>) {
    let notes: usize = ctx.modules.iter().map(|m| m.count_of(ResourceType::Notes)).sum();
    let papers: usize = ctx
        .modules
        .iter()
        .map(|m| m.count_of(ResourceType::PastPaper))
        .sum();

    writeln!(out, "Course Portal").unwrap();
    writeln!(
        out,
        "{} module(s), {notes} note(s), {papers} past paper(s)",
        ctx.modules.len()
    )
    .unwrap();
    writeln!(out, "Last synced: {}", synced_label(ctx.last_synced_at)).unwrap();

    writeln!(out).unwrap();
    write_recent(out, ctx.recent);
}

/// Renders only the recently added files, newest first.
#[must_use]
pub fn render_recent(ctx: &ViewContext<'_>) -> String {
    let mut out = String::new();
    if let Some(error) = ctx.sync_error {
        writeln!(out, "!! Could not load course files: {error}\n").unwrap();
    }
    write_recent(&mut out, ctx.recent);
    out
}

fn write_recent(out: &mut String, recent: &[RecentEntry]) {
    writeln!(out, "Recently added:").unwrap();
    if recent.is_empty() {
        writeln!(out, "  (nothing yet)").unwrap();
    }
    for entry in recent {
        writeln!(
            out,
            "  [{}] {} ({}) {}",
            entry.module_code,
            entry.resource.title,
            entry.resource.resource_type,
            Route::Module(entry.module_id.clone()),
        )
        .unwrap();
    }
}

fn render_modules(out: &mut String, ctx: &ViewContext<'_>, options: &ViewOptions) {
    let modules = filter_modules(ctx.modules, &options.query);
    writeln!(out, "Modules ({})", modules.len()).unwrap();
    if modules.is_empty() {
        writeln!(out, "  No modules match '{}'", options.query).unwrap();
    }
    for module in modules {
        writeln!(
            out,
            "  {:<8} {:<40} {} note(s), {} past paper(s)  {}",
            module.code,
            module.name,
            module.count_of(ResourceType::Notes),
            module.count_of(ResourceType::PastPaper),
            Route::Module(module.id.clone()),
        )
        .unwrap();
    }
}

fn render_module(out: &mut String, module: &Module, options: &ViewOptions) {
    writeln!(out, "{} {}", module.code, module.name).unwrap();
    writeln!(out, "{}", module.description).unwrap();

    let shown = filter_resources(&module.resources, &options.query, options.filter);
    if shown.is_empty() {
        writeln!(out, "\nNo files match this filter.").unwrap();
        return;
    }

    for resource_type in ResourceType::all() {
        let group: Vec<_> = shown
            .iter()
            .filter(|r| r.resource_type == *resource_type)
            .collect();
        if group.is_empty() {
            continue;
        }
        writeln!(out, "\n{resource_type} ({})", group.len()).unwrap();
        for resource in group {
            writeln!(out, "  {} {}", resource.id, resource.title).unwrap();
            if resource.is_downloadable() {
                writeln!(out, "      view:     {}", resource.view_url).unwrap();
                writeln!(out, "      download: {}", resource.download_url).unwrap();
            } else {
                writeln!(out, "      (no link)").unwrap();
            }
        }
    }
}

fn render_about(out: &mut String) {
    writeln!(out, "About").unwrap();
    writeln!(
        out,
        "Lecture notes and past papers shared by students, grouped by module.\n\
         Files are listed from a shared spreadsheet and hosted on Google Drive."
    )
    .unwrap();
}

fn render_not_found(out: &mut String, id: &str) {
    writeln!(out, "Module '{id}' not found.").unwrap();
    writeln!(out, "Browse all modules at {}", Route::Modules).unwrap();
}

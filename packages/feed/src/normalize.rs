//! Feed normalization: CSV text → modules with resources.
//!
//! Two sources are reconciled by normalized module code:
//!
//! 1. the seed list, which supplies identity and copy for known modules;
//! 2. the feed, which supplies every resource and introduces any module
//!    the seed list does not know about.
//!
//! Rows missing a code or a title are skipped. Modules that end up with no
//! resources are dropped, seeded or not.

use std::collections::BTreeMap;

use course_portal_catalog_models::{Module, RecentEntry, Resource, SeedModule};

use crate::FeedError;
use crate::canonical::{PLACEHOLDER_URL, canon_download, canon_view};
use crate::columns::ColumnMap;
use crate::csv_line::{split_fields, split_lines};
use crate::progress::{NullProgress, ProgressCallback};
use crate::recency::select_recent;
use crate::type_mapping::map_resource_type;

/// Description given to modules that only the feed knows about.
pub const PLACEHOLDER_DESCRIPTION: &str = "Lecture notes and past papers shared for this module.";

/// Prefix of identifiers for modules synthesized from the feed.
pub const DYNAMIC_ID_PREFIX: &str = "dyn-";

/// Result of one normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCatalog {
    /// Modules with at least one resource: seeded modules in seed order,
    /// then synthesized modules in order of first appearance.
    pub modules: Vec<Module>,
    /// Most recent resources, newest first.
    pub recent: Vec<RecentEntry>,
    /// Data rows read (excluding the header).
    pub rows_read: usize,
    /// Data rows skipped for a missing code or title.
    pub rows_skipped: usize,
}

impl NormalizedCatalog {
    /// Total number of resources across all modules.
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.modules.iter().map(|m| m.resources.len()).sum()
    }
}

/// Normalizes a module code into its mapping key: whitespace removed,
/// lowercased.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Builds a module for a code absent from the seed list.
fn synthesize_module(key: &str, code: &str) -> Module {
    let code = code.to_uppercase();
    Module {
        id: format!("{DYNAMIC_ID_PREFIX}{key}"),
        name: format!("Module {code}"),
        code,
        description: PLACEHOLDER_DESCRIPTION.to_string(),
        resources: Vec::new(),
    }
}

/// Modules keyed by normalized code, remembering insertion order.
#[derive(Default)]
struct ModuleTable {
    modules: Vec<Module>,
    index: BTreeMap<String, usize>,
}

impl ModuleTable {
    fn seeded(seeds: &[SeedModule]) -> Self {
        let mut table = Self::default();
        for seed in seeds {
            let key = normalize_code(&seed.code);
            if table.index.contains_key(&key) {
                log::warn!("Duplicate seed code '{}' ignored ({})", seed.code, seed.id);
                continue;
            }
            table.insert(key, seed.to_module());
        }
        table
    }

    fn insert(&mut self, key: String, module: Module) -> usize {
        let idx = self.modules.len();
        self.modules.push(module);
        self.index.insert(key, idx);
        idx
    }

    fn get_or_synthesize(&mut self, code: &str) -> &mut Module {
        let key = normalize_code(code);
        let existing = self.index.get(&key).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                let module = synthesize_module(&key, code);
                log::debug!("Synthesized module {} for code '{code}'", module.id);
                self.insert(key, module)
            }
        };
        &mut self.modules[idx]
    }
}

/// Normalizes feed text into modules and recent entries.
///
/// # Errors
///
/// Returns [`FeedError::NotEnoughRows`] when the text has no data row
/// after the header.
pub fn normalize_feed(
    text: &str,
    seeds: &[SeedModule],
    recent_limit: usize,
) -> Result<NormalizedCatalog, FeedError> {
    normalize_feed_with_progress(text, seeds, recent_limit, &NullProgress)
}

/// Like [`normalize_feed`], reporting one unit of progress per data row.
///
/// # Errors
///
/// Returns [`FeedError::NotEnoughRows`] when the text has no data row
/// after the header.
pub fn normalize_feed_with_progress(
    text: &str,
    seeds: &[SeedModule],
    recent_limit: usize,
    progress: &dyn ProgressCallback,
) -> Result<NormalizedCatalog, FeedError> {
    let lines = split_lines(text);
    let Some((header, rows)) = lines.split_first() else {
        return Err(FeedError::NotEnoughRows { lines: 0 });
    };
    if rows.is_empty() {
        return Err(FeedError::NotEnoughRows { lines: lines.len() });
    }

    let columns = ColumnMap::from_header_line(header);
    if columns.code.is_none() || columns.title.is_none() {
        log::warn!("Feed is missing a code or title column ({columns:?}); every row will be skipped");
    }

    progress.set_total(rows.len() as u64);

    let mut table = ModuleTable::seeded(seeds);
    let mut flat: Vec<RecentEntry> = Vec::new();
    let mut rows_skipped = 0;

    for (idx, line) in rows.iter().enumerate() {
        progress.inc(1);
        let row = split_fields(line);

        let code = ColumnMap::value(&row, columns.code);
        let title = ColumnMap::value(&row, columns.title);
        if code.is_empty() || title.is_empty() {
            rows_skipped += 1;
            continue;
        }

        let url = ColumnMap::value(&row, columns.url);
        let url = if url.is_empty() { PLACEHOLDER_URL } else { url };

        let resource = Resource {
            id: format!("f-{idx}"),
            title: title.to_string(),
            resource_type: map_resource_type(ColumnMap::value(&row, columns.resource_type)),
            download_url: canon_download(url),
            view_url: canon_view(url),
        };

        let module = table.get_or_synthesize(code);
        flat.push(RecentEntry {
            resource: resource.clone(),
            module_code: module.code.clone(),
            module_id: module.id.clone(),
            row_index: idx,
        });
        module.resources.push(resource);
    }

    let modules: Vec<Module> = table
        .modules
        .into_iter()
        .filter(|m| !m.resources.is_empty())
        .collect();

    let catalog = NormalizedCatalog {
        modules,
        recent: select_recent(flat, recent_limit),
        rows_read: rows.len(),
        rows_skipped,
    };

    log::info!(
        "Normalized {} module(s), {} resource(s) from {} row(s) ({} skipped)",
        catalog.modules.len(),
        catalog.resource_count(),
        catalog.rows_read,
        catalog.rows_skipped,
    );

    Ok(catalog)
}

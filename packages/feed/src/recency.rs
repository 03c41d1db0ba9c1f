//! "Recent files" selection.
//!
//! Recency is feed position, not a timestamp: rows further down the
//! spreadsheet were added later.

use course_portal_catalog_models::RecentEntry;

/// Number of recent entries shown by default.
pub const DEFAULT_RECENT_LIMIT: usize = 3;

/// Keeps the `limit` entries with the highest row index, newest first.
#[must_use]
pub fn select_recent(mut entries: Vec<RecentEntry>, limit: usize) -> Vec<RecentEntry> {
    entries.sort_by(|a, b| b.row_index.cmp(&a.row_index));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use course_portal_catalog_models::{Resource, ResourceType};

    use super::*;

    fn entry(row_index: usize) -> RecentEntry {
        RecentEntry {
            resource: Resource {
                id: format!("f-{row_index}"),
                title: format!("File {row_index}"),
                resource_type: ResourceType::Notes,
                download_url: "#".to_string(),
                view_url: "#".to_string(),
            },
            module_code: "CS101".to_string(),
            module_id: "cs101".to_string(),
            row_index,
        }
    }

    #[test]
    fn picks_three_highest_rows_descending() {
        let entries = vec![entry(0), entry(3), entry(1), entry(4), entry(2)];
        let rows: Vec<usize> = select_recent(entries, DEFAULT_RECENT_LIMIT)
            .iter()
            .map(|e| e.row_index)
            .collect();
        assert_eq!(rows, vec![4, 3, 2]);
    }

    #[test]
    fn fewer_entries_than_limit() {
        let rows: Vec<usize> = select_recent(vec![entry(0), entry(1)], 3)
            .iter()
            .map(|e| e.row_index)
            .collect();
        assert_eq!(rows, vec![1, 0]);
    }

    #[test]
    fn zero_limit_selects_nothing() {
        assert!(select_recent(vec![entry(0)], 0).is_empty());
    }
}

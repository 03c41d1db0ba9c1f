//! Header-name inference for the four columns the normalizer reads.
//!
//! Spreadsheet owners rename and reorder columns freely, so columns are
//! found by name rather than position:
//!
//! | Column  | Rule                                   |
//! |---------|----------------------------------------|
//! | `code`  | first header containing `code`/`module` |
//! | `type`  | header exactly `type`                  |
//! | `title` | header exactly `title`                 |
//! | `url`   | first header containing `url`/`link`   |

use crate::csv_line::{BOM, split_fields};

/// Resolved column indices. `None` means the column is absent and every
/// row reads it as an empty string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    /// Module code column.
    pub code: Option<usize>,
    /// Resource type column.
    pub resource_type: Option<usize>,
    /// Resource title column.
    pub title: Option<usize>,
    /// Share/download link column.
    pub url: Option<usize>,
}

impl ColumnMap {
    /// Resolves columns from already-cleaned, lowercased header names.
    #[must_use]
    pub fn resolve(headers: &[String]) -> Self {
        Self {
            code: first_header(headers, |h| h.contains("code") || h.contains("module")),
            resource_type: first_header(headers, |h| h == "type"),
            title: first_header(headers, |h| h == "title"),
            url: first_header(headers, |h| h.contains("url") || h.contains("link")),
        }
    }

    /// Parses the header line and resolves columns from it.
    #[must_use]
    pub fn from_header_line(line: &str) -> Self {
        let line = line.strip_prefix(BOM).unwrap_or(line);
        let headers: Vec<String> = split_fields(line)
            .into_iter()
            .map(|h| h.to_lowercase())
            .collect();
        log::debug!("Feed headers: {headers:?}");
        Self::resolve(&headers)
    }

    /// Reads a column from a row, yielding `""` for absent columns and
    /// short rows.
    #[must_use]
    pub fn value<'a>(row: &'a [String], column: Option<usize>) -> &'a str {
        column
            .and_then(|i| row.get(i))
            .map_or("", String::as_str)
    }
}

fn first_header(headers: &[String], pred: impl Fn(&str) -> bool) -> Option<usize> {
    headers.iter().position(|h| pred(h.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_conventional_headers() {
        let map = ColumnMap::from_header_line("Code,Type,Title,URL");
        assert_eq!(
            map,
            ColumnMap {
                code: Some(0),
                resource_type: Some(1),
                title: Some(2),
                url: Some(3),
            }
        );
    }

    #[test]
    fn module_code_header_resolves_to_code() {
        let map = ColumnMap::from_header_line("Title,Module Code,Drive Link");
        assert_eq!(map.code, Some(1));
        assert_eq!(map.title, Some(0));
        assert_eq!(map.url, Some(2));
        assert_eq!(map.resource_type, None);
    }

    #[test]
    fn title_requires_exact_match() {
        let map = ColumnMap::from_header_line("Module Code,Resource Title,Type,Link");
        assert_eq!(map.title, None);
        assert_eq!(map.resource_type, Some(2));
    }

    #[test]
    fn first_matching_header_wins() {
        let map = ColumnMap::from_header_line("module,course code,url,backup link");
        assert_eq!(map.code, Some(0));
        assert_eq!(map.url, Some(2));
    }

    #[test]
    fn quoted_headers_are_cleaned() {
        let map = ColumnMap::from_header_line(r#""Code", "Title" ,"Type""#);
        assert_eq!(map.code, Some(0));
        assert_eq!(map.title, Some(1));
        assert_eq!(map.resource_type, Some(2));
    }

    #[test]
    fn bom_before_first_header_is_ignored() {
        let map = ColumnMap::from_header_line("\u{feff}Title,Code");
        assert_eq!(map.title, Some(0));
        assert_eq!(map.code, Some(1));
    }

    #[test]
    fn absent_and_out_of_range_columns_read_empty() {
        let row = vec!["CS101".to_string()];
        assert_eq!(ColumnMap::value(&row, Some(0)), "CS101");
        assert_eq!(ColumnMap::value(&row, Some(3)), "");
        assert_eq!(ColumnMap::value(&row, None), "");
    }
}

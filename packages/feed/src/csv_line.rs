//! Line and field splitting for spreadsheet CSV exports.
//!
//! The feed is split into lines first and each line into fields
//! afterwards. A comma separates fields only outside a double-quoted span.
//! Doubled quotes inside a quoted span are not treated as escapes.

/// Byte-order mark some spreadsheet exports put before the header.
pub const BOM: char = '\u{feff}';

/// Splits feed text into lines on LF or CRLF, dropping blank lines and a
/// leading byte-order mark.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// Splits a line on commas that are not inside double quotes.
///
/// Returned fields are raw: untrimmed and still quoted.
#[must_use]
pub fn split_raw(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);

    fields
}

/// Trims a raw field and strips one surrounding quote from each end.
#[must_use]
pub fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.trim().to_string()
}

/// Splits a line into cleaned fields.
#[must_use]
pub fn split_fields(line: &str) -> Vec<String> {
    split_raw(line).into_iter().map(clean_field).collect()
}

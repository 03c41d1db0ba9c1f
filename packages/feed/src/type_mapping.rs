//! Resource type mapping.
//!
//! The feed's type column is free text ("Lecture Note", "notes",
//! "Exam 2022", "Past paper", or nothing at all). Anything mentioning
//! "note" is lecture material; everything else is treated as a past paper.

use course_portal_catalog_models::ResourceType;

/// Maps a raw type-column value to a [`ResourceType`]. Case-insensitive.
#[must_use]
pub fn map_resource_type(raw: &str) -> ResourceType {
    if raw.to_lowercase().contains("note") {
        ResourceType::Notes
    } else {
        ResourceType::PastPaper
    }
}

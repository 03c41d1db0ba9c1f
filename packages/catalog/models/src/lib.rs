#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Course module and resource types.
//!
//! The feed normalizer produces [`Module`] records, each owning the
//! [`Resource`] files parsed from the spreadsheet feed. A [`Snapshot`] is
//! the unit persisted to the local cache and restored on warm start.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Kind of academic file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ResourceType {
    /// Lecture notes, slides, handouts
    #[serde(rename = "Notes")]
    #[strum(serialize = "Notes")]
    Notes,
    /// Past examination papers
    #[serde(rename = "Past Paper")]
    #[strum(serialize = "Past Paper")]
    PastPaper,
}

impl ResourceType {
    /// All resource types, in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Notes, Self::PastPaper]
    }
}

/// A single downloadable academic file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Position-derived identifier (`f-<row>`). Not stable across feeds.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Notes or past paper.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    /// Direct-download URL, or `"#"` when the feed had none.
    pub download_url: String,
    /// Viewer URL, or `"#"` when the feed had none.
    pub view_url: String,
}

impl Resource {
    /// Whether this resource has a usable download link.
    #[must_use]
    pub fn is_downloadable(&self) -> bool {
        !self.download_url.is_empty() && self.download_url != "#"
    }
}

/// A course unit grouping its resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Unique identifier used for routing (`#/module/{id}`).
    pub id: String,
    /// Display course code (e.g. `"CS101"`).
    pub code: String,
    /// Human-readable module name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Files belonging to this module, in feed order.
    pub resources: Vec<Resource>,
}

impl Module {
    /// Number of resources of the given type.
    #[must_use]
    pub fn count_of(&self, resource_type: ResourceType) -> usize {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .count()
    }

    /// Looks up one of this module's resources by id.
    #[must_use]
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }
}

/// A resource denormalized with its owning module, used for the
/// "recent files" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEntry {
    /// The resource itself.
    #[serde(flatten)]
    pub resource: Resource,
    /// Display code of the owning module.
    pub module_code: String,
    /// Identifier of the owning module.
    pub module_id: String,
    /// Zero-based data row index in the feed. Higher is more recent.
    pub row_index: usize,
}

/// A known module from the hand-maintained seed list.
///
/// Seeds provide the identity and copy for a module; the feed provides
/// its resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedModule {
    /// Stable identifier.
    pub id: String,
    /// Display course code.
    pub code: String,
    /// Human-readable module name.
    pub name: String,
    /// Short description.
    pub description: String,
}

impl SeedModule {
    /// Creates an empty [`Module`] from this seed.
    #[must_use]
    pub fn to_module(&self) -> Module {
        Module {
            id: self.id.clone(),
            code: self.code.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            resources: Vec::new(),
        }
    }
}

/// The persisted result of one successful ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Modules with at least one resource.
    pub modules: Vec<Module>,
    /// Most recently ingested resources, newest first.
    pub recent: Vec<RecentEntry>,
    /// When the snapshot was taken, in epoch milliseconds.
    pub time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(id: &str, resource_type: ResourceType, url: &str) -> Resource {
        Resource {
            id: id.to_string(),
            title: format!("Title {id}"),
            resource_type,
            download_url: url.to_string(),
            view_url: url.to_string(),
        }
    }

    #[test]
    fn resource_type_display_matches_feed_spelling() {
        assert_eq!(ResourceType::Notes.to_string(), "Notes");
        assert_eq!(ResourceType::PastPaper.to_string(), "Past Paper");
        assert_eq!(
            "Past Paper".parse::<ResourceType>().unwrap(),
            ResourceType::PastPaper
        );
    }

    #[test]
    fn resource_serializes_with_camel_case_and_type_key() {
        let json = serde_json::to_value(resource("f-0", ResourceType::PastPaper, "#")).unwrap();
        assert_eq!(json["type"], "Past Paper");
        assert_eq!(json["downloadUrl"], "#");
        assert_eq!(json["viewUrl"], "#");
    }

    #[test]
    fn recent_entry_flattens_resource_fields() {
        let entry = RecentEntry {
            resource: resource("f-4", ResourceType::Notes, "https://x/uc?export=download&id=A"),
            module_code: "CS101".to_string(),
            module_id: "dyn-cs101".to_string(),
            row_index: 4,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "f-4");
        assert_eq!(json["moduleCode"], "CS101");
        assert_eq!(json["rowIndex"], 4);

        let back: RecentEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn placeholder_url_is_not_downloadable() {
        assert!(!resource("f-1", ResourceType::Notes, "#").is_downloadable());
        assert!(!resource("f-1", ResourceType::Notes, "").is_downloadable());
        assert!(resource("f-1", ResourceType::Notes, "https://a/b").is_downloadable());
    }

    #[test]
    fn module_counts_resources_by_type() {
        let module = Module {
            id: "m".to_string(),
            code: "M".to_string(),
            name: "Module M".to_string(),
            description: String::new(),
            resources: vec![
                resource("f-0", ResourceType::Notes, "#"),
                resource("f-1", ResourceType::PastPaper, "#"),
                resource("f-2", ResourceType::Notes, "#"),
            ],
        };
        assert_eq!(module.count_of(ResourceType::Notes), 2);
        assert_eq!(module.count_of(ResourceType::PastPaper), 1);
        assert_eq!(module.resource("f-1").unwrap().title, "Title f-1");
        assert!(module.resource("f-9").is_none());
    }
}

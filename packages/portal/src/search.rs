//! Case-insensitive search over modules and their resources.

use course_portal_catalog_models::{Module, Resource, ResourceType};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which resource types a listing shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ResourceFilter {
    /// Every resource.
    #[default]
    All,
    /// Notes only.
    Notes,
    /// Past papers only.
    PastPapers,
}

impl ResourceFilter {
    /// Every filter, in menu order.
    pub const ALL: &[Self] = &[Self::All, Self::Notes, Self::PastPapers];

    /// Whether resources of `resource_type` pass this filter.
    #[must_use]
    pub const fn admits(self, resource_type: ResourceType) -> bool {
        match self {
            Self::All => true,
            Self::Notes => matches!(resource_type, ResourceType::Notes),
            Self::PastPapers => matches!(resource_type, ResourceType::PastPaper),
        }
    }
}

/// A resource found by [`search_resources`], with its owning module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceHit<'a> {
    /// Id of the owning module.
    pub module_id: &'a str,
    /// Code of the owning module.
    pub module_code: &'a str,
    /// The matching resource.
    pub resource: &'a Resource,
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Modules whose code, name, description or any resource title contains
/// `query`. An empty query matches everything.
#[must_use]
pub fn filter_modules<'a>(modules: &'a [Module], query: &str) -> Vec<&'a Module> {
    let needle = query.trim().to_lowercase();
    modules
        .iter()
        .filter(|m| {
            needle.is_empty()
                || contains_folded(&m.code, &needle)
                || contains_folded(&m.name, &needle)
                || contains_folded(&m.description, &needle)
                || m.resources.iter().any(|r| contains_folded(&r.title, &needle))
        })
        .collect()
}

/// Resources admitted by `filter` whose title contains `query`.
#[must_use]
pub fn filter_resources<'a>(
    resources: &'a [Resource],
    query: &str,
    filter: ResourceFilter,
) -> Vec<&'a Resource> {
    let needle = query.trim().to_lowercase();
    resources
        .iter()
        .filter(|r| filter.admits(r.resource_type))
        .filter(|r| needle.is_empty() || contains_folded(&r.title, &needle))
        .collect()
}

/// Every resource across `modules` matching `query` and `filter`, in
/// module order.
#[must_use]
pub fn search_resources<'a>(
    modules: &'a [Module],
    query: &str,
    filter: ResourceFilter,
) -> Vec<ResourceHit<'a>> {
    modules
        .iter()
        .flat_map(|m| {
            filter_resources(&m.resources, query, filter)
                .into_iter()
                .map(move |resource| ResourceHit {
                    module_id: &m.id,
                    module_code: &m.code,
                    resource,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn resource(id: &str, title: &str, resource_type: ResourceType) -> Resource {
        Resource {
            id: id.to_string(),
            title: title.to_string(),
            resource_type,
            download_url: "#".to_string(),
            view_url: "#".to_string(),
        }
    }

    fn modules() -> Vec<Module> {
        vec![
            Module {
                id: "cs101".to_string(),
                code: "CS101".to_string(),
                name: "Introduction to Programming".to_string(),
                description: "Variables, loops and functions".to_string(),
                resources: vec![
                    resource("f-0", "Week 1 Slides", ResourceType::Notes),
                    resource("f-1", "2022 Final Exam", ResourceType::PastPaper),
                ],
            },
            Module {
                id: "ma201".to_string(),
                code: "MA201".to_string(),
                name: "Linear Algebra".to_string(),
                description: "Vector spaces".to_string(),
                resources: vec![resource("f-2", "Eigenvalues Notes", ResourceType::Notes)],
            },
        ]
    }

    #[test]
    fn filter_parses_from_kebab_case() {
        assert_eq!(ResourceFilter::from_str("all").unwrap(), ResourceFilter::All);
        assert_eq!(ResourceFilter::from_str("notes").unwrap(), ResourceFilter::Notes);
        assert_eq!(
            ResourceFilter::from_str("Past-Papers").unwrap(),
            ResourceFilter::PastPapers
        );
        assert!(ResourceFilter::from_str("slides").is_err());
        assert_eq!(ResourceFilter::PastPapers.to_string(), "past-papers");
    }

    #[test]
    fn empty_query_matches_every_module() {
        let modules = modules();
        assert_eq!(filter_modules(&modules, "").len(), 2);
        assert_eq!(filter_modules(&modules, "   ").len(), 2);
    }

    #[test]
    fn module_search_covers_code_name_description_and_titles() {
        let modules = modules();
        let ids = |q: &str| {
            filter_modules(&modules, q)
                .iter()
                .map(|m| m.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids("cs1"), vec!["cs101"]);
        assert_eq!(ids("LINEAR"), vec!["ma201"]);
        assert_eq!(ids("vector"), vec!["ma201"]);
        assert_eq!(ids("final exam"), vec!["cs101"]);
        assert!(ids("chemistry").is_empty());
    }

    #[test]
    fn resource_filter_applies_type_and_title() {
        let modules = modules();
        let all = &modules[0].resources;
        assert_eq!(filter_resources(all, "", ResourceFilter::All).len(), 2);
        assert_eq!(filter_resources(all, "", ResourceFilter::Notes)[0].id, "f-0");
        assert_eq!(filter_resources(all, "", ResourceFilter::PastPapers)[0].id, "f-1");
        assert!(filter_resources(all, "week", ResourceFilter::PastPapers).is_empty());
    }

    #[test]
    fn search_spans_modules() {
        let modules = modules();
        let hits = search_resources(&modules, "notes", ResourceFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].module_code, "MA201");

        let notes = search_resources(&modules, "", ResourceFilter::Notes);
        assert_eq!(
            notes.iter().map(|h| h.resource.id.as_str()).collect::<Vec<_>>(),
            vec!["f-0", "f-2"]
        );
    }
}

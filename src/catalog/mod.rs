//! Video catalog module
//!
//! Loads instructional videos from the structured data file, optionally
//! enriches YouTube entries with platform metadata, and filters the result
//! by category and free-text search.

pub mod cache;
pub mod loader;
pub mod schema;

pub use cache::CatalogCache;
pub use loader::{
    CatalogLoader, EntryOutcome, EntryStatus, LoadReport, LoadWarning, ProvisionalReason,
    SkipReason,
};
pub use schema::{DataDocument, EntryError, EntryFields};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Category value meaning "no category restriction"
pub const ALL_CATEGORIES: &str = "All";

/// A single catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    /// Playable link; never empty for records held by a [`Catalog`]
    pub url: String,
    pub description: String,
    /// Human readable duration, e.g. `05:30`
    pub duration: String,
    pub category: String,
    /// Remote URL or `file:///` reference
    pub thumbnail: String,
    pub tags: Vec<String>,
}

impl VideoRecord {
    /// Case-insensitive substring match against title, description and tags.
    /// `needle` must already be lowercase.
    fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
    }
}

/// In-memory video collection plus its derived category list
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    videos: Vec<VideoRecord>,
    categories: Vec<String>,
    version: String,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Build a catalog; records with an empty URL are dropped and categories
    /// are derived from the records that remain.
    pub fn new(videos: Vec<VideoRecord>, version: impl Into<String>) -> Self {
        let videos: Vec<VideoRecord> = videos.into_iter().filter(|v| !v.url.is_empty()).collect();
        let categories = videos
            .iter()
            .map(|v| v.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Self {
            videos,
            categories,
            version: version.into(),
            loaded_at: Utc::now(),
        }
    }

    /// Empty catalog, as produced for a missing data file
    pub fn empty() -> Self {
        Self::new(Vec::new(), schema::DEFAULT_VERSION)
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    /// Sorted, de-duplicated category names
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Version declared by the data file
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// First record with the given id
    pub fn get(&self, id: &str) -> Option<&VideoRecord> {
        self.videos.iter().find(|v| v.id == id)
    }

    /// Records matching `category` and `query`, in catalog order.
    ///
    /// An empty category or [`ALL_CATEGORIES`] applies no category restriction;
    /// an empty query applies no text restriction.
    pub fn filter(&self, category: &str, query: &str) -> Vec<&VideoRecord> {
        self.filter_with_all(ALL_CATEGORIES, category, query)
    }

    /// Like [`Catalog::filter`], with `all_label` as the "every category" choice
    pub fn filter_with_all(&self, all_label: &str, category: &str, query: &str) -> Vec<&VideoRecord> {
        let category = Some(category).filter(|c| !c.is_empty() && *c != all_label);
        let needle = Some(query)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        self.videos
            .iter()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .filter(|v| needle.as_deref().map_or(true, |n| v.matches_lowercase(n)))
            .collect()
    }

    /// Warning text when the data file version differs from `expected`
    pub fn version_warning(&self, expected: &str) -> Option<String> {
        if self.version == expected {
            return None;
        }
        Some(format!(
            "Video data file version mismatch. Expected '{}', but found '{}'. \
             Functionality might be limited or incorrect. Please update your data file.",
            expected, self.version
        ))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str, title: &str, tags: &[&str]) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{}.mp4", id),
            description: format!("About {}", title),
            duration: "05:00".to_string(),
            category: category.to_string(),
            thumbnail: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn sample() -> Catalog {
        Catalog::new(
            vec![
                record("a", "Drill", "Slow March", &["parade"]),
                record("b", "Medical", "Bandaging", &["first aid"]),
                record("c", "Drill", "Quick March", &[]),
                record("d", "Navigation", "Compass Work", &["map reading"]),
            ],
            "1.0",
        )
    }

    fn ids(records: &[&VideoRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_filter_with_configured_all_label() {
        let catalog = sample();

        assert_eq!(catalog.filter_with_all("Todos", "Todos", "").len(), 4);
        assert_eq!(ids(&catalog.filter_with_all("Todos", "Drill", "march")), vec!["a", "c"]);
        assert!(catalog.filter_with_all("Todos", "All", "").is_empty());
    }

    #[test]
    fn test_categories_sorted_and_unique() {
        assert_eq!(sample().categories(), &["Drill", "Medical", "Navigation"]);
    }

    #[test]
    fn test_empty_url_records_dropped() {
        let mut bad = record("x", "Drill", "No Link", &[]);
        bad.url.clear();
        let catalog = Catalog::new(vec![bad], "1.0");
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
    }

    #[test]
    fn test_filter_all_preserves_order() {
        let catalog = sample();
        assert_eq!(ids(&catalog.filter("All", "")), vec!["a", "b", "c", "d"]);
        assert_eq!(ids(&catalog.filter("", "")), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_filter_by_category() {
        assert_eq!(ids(&sample().filter("Drill", "")), vec!["a", "c"]);
        assert!(sample().filter("drill", "").is_empty());
    }

    #[test]
    fn test_filter_query_case_insensitive() {
        let catalog = sample();
        assert_eq!(ids(&catalog.filter("All", "FIRST AID")), vec!["b"]);
        assert_eq!(ids(&catalog.filter("All", "march")), vec!["a", "c"]);
        assert_eq!(ids(&catalog.filter("All", "about compass")), vec!["d"]);
    }

    #[test]
    fn test_filter_composes_with_and() {
        let catalog = sample();
        assert_eq!(ids(&catalog.filter("Drill", "quick")), vec!["c"]);
        assert!(catalog.filter("Medical", "march").is_empty());
    }

    #[test]
    fn test_version_warning() {
        let catalog = Catalog::new(Vec::new(), "2.0");
        assert!(catalog.version_warning("1.0").unwrap().contains("found '2.0'"));
        assert!(sample().version_warning("1.0").is_none());
    }

    #[test]
    fn test_get_by_id() {
        assert_eq!(sample().get("d").map(|r| r.title.as_str()), Some("Compass Work"));
        assert!(sample().get("zzz").is_none());
    }
}

//! YouTube integration module
//!
//! Identifier extraction, duration formatting and the metadata fetcher used to
//! enrich catalog entries that point at YouTube videos.

pub mod client;
pub mod duration;
pub mod id;

pub use client::YouTubeClient;
pub use duration::format_duration;
pub use id::{canonical_watch_url, extract_video_id, extract_video_id_opt};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Canonical metadata for one video as reported by the platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemoteMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Raw ISO-8601 duration, e.g. `PT5M30S`
    pub duration: String,
    pub thumbnail: String,
    pub tags: Vec<String>,
}

/// Batch metadata lookup
///
/// Ids the platform does not know are left out of the result rather than
/// reported as errors.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, ids: &[String], credential: &str) -> Result<Vec<RemoteMetadata>>;
}

//! Video Guides - instructional video catalog
//!
//! Loads a categorised list of instructional videos from a JSON data file,
//! enriches YouTube entries with metadata from the YouTube Data API, and
//! filters the catalog by category and free-text search.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod display;
pub mod error;
pub mod youtube;

// Re-export main types for easy access
pub use crate::admin::{AppendOutcome, CatalogAdmin, ManualEntry};
pub use crate::catalog::{Catalog, CatalogCache, CatalogLoader, LoadReport, VideoRecord};
pub use crate::config::Config;
pub use crate::error::{CatalogError, Result};
pub use crate::youtube::{extract_video_id, format_duration, MetadataFetcher, RemoteMetadata, YouTubeClient};

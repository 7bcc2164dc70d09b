//! Catalog loading and YouTube enrichment pipeline

use super::schema::{DataDocument, EntryError, EntryFields};
use super::{Catalog, VideoRecord};
use crate::config::{Config, SUPPORTED_VERSION};
use crate::error::{CatalogError, Result};
use crate::youtube::{
    canonical_watch_url, extract_video_id_opt, format_duration, MetadataFetcher, RemoteMetadata,
    YouTubeClient,
};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const LOADING_TITLE: &str = "Loading title...";
pub const LOADING_DESCRIPTION: &str = "Loading description...";
pub const UNTITLED_VIDEO: &str = "Untitled Video";
pub const NO_DESCRIPTION: &str = "No description available.";
pub const UNKNOWN_DURATION: &str = "N/A";

/// Why an entry did not make it into the catalog
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Invalid(EntryError),
    EmptyUrl,
    MalformedDuration(String),
}

/// Why a YouTube entry kept its placeholder values
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionalReason {
    FetchFailed(String),
    NotReturned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    /// Built from local fields only
    Loaded,
    /// Merged with YouTube metadata
    Enriched,
    /// Queued for enrichment but appended with placeholders
    Provisional(ProvisionalReason),
    Skipped(SkipReason),
}

/// What happened to one entry of the data file
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub category: String,
    pub index: usize,
    pub id: Option<String>,
    pub status: EntryStatus,
}

impl EntryOutcome {
    pub fn is_in_catalog(&self) -> bool {
        !matches!(self.status, EntryStatus::Skipped(_))
    }
}

/// File-level conditions that did not stop the load
#[derive(Debug, Clone, PartialEq)]
pub enum LoadWarning {
    UnreadableDataFile(String),
    NotAList(String),
    VersionMismatch { expected: String, found: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::UnreadableDataFile(reason) => {
                write!(f, "data file could not be read: {}", reason)
            }
            LoadWarning::NotAList(category) => {
                write!(f, "category '{}' is not a list and was ignored", category)
            }
            LoadWarning::VersionMismatch { expected, found } => write!(
                f,
                "data file version mismatch: expected '{}', found '{}'",
                expected, found
            ),
        }
    }
}

/// Result of a load: the catalog plus per-entry outcomes and warnings
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub catalog: Catalog,
    pub outcomes: Vec<EntryOutcome>,
    pub warnings: Vec<LoadWarning>,
}

impl LoadReport {
    fn empty(warnings: Vec<LoadWarning>) -> Self {
        Self {
            catalog: Catalog::empty(),
            outcomes: Vec::new(),
            warnings,
        }
    }

    pub fn skipped(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_in_catalog())
    }

    pub fn provisional(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, EntryStatus::Provisional(_)))
    }
}

/// YouTube entry waiting for the category's batch fetch
struct PendingRecord {
    index: usize,
    record: VideoRecord,
    title_override: Option<String>,
    description_override: Option<String>,
}

struct Enrichment {
    fetcher: Arc<dyn MetadataFetcher>,
    credential: String,
}

/// Builds a [`Catalog`] from the structured data file
pub struct CatalogLoader {
    enrichment: Option<Enrichment>,
    fetch_timeout: Option<Duration>,
    supported_version: String,
}

impl CatalogLoader {
    /// Loader without YouTube enrichment
    pub fn new() -> Self {
        Self {
            enrichment: None,
            fetch_timeout: None,
            supported_version: SUPPORTED_VERSION.to_string(),
        }
    }

    /// Loader configured from [`Config`]; enrichment is enabled when an API
    /// key is present.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut loader = Self::new().with_supported_version(&config.catalog.supported_version);

        if config.youtube.fetch_timeout_seconds > 0 {
            loader = loader.with_fetch_timeout(Duration::from_secs(config.youtube.fetch_timeout_seconds));
        }

        if let Some(credential) = config.youtube.credential() {
            let client = YouTubeClient::new(&config.youtube)?;
            loader = loader.with_fetcher(Arc::new(client), credential);
        }

        Ok(loader)
    }

    /// Enable enrichment through `fetcher`. A blank credential leaves
    /// enrichment disabled.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn MetadataFetcher>, credential: impl Into<String>) -> Self {
        let credential = credential.into();
        self.enrichment = if credential.trim().is_empty() {
            None
        } else {
            Some(Enrichment { fetcher, credential })
        };
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn with_supported_version(mut self, version: &str) -> Self {
        self.supported_version = version.to_string();
        self
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enrichment.is_some()
    }

    /// Load the data file at `path`. A missing file yields an empty catalog;
    /// an unreadable one yields an empty catalog plus a warning.
    pub async fn load_file(&self, path: &Path) -> LoadReport {
        if !path.exists() {
            info!("📭 Data file not found, starting with empty catalog: {}", path.display());
            return LoadReport::empty(Vec::new());
        }

        info!("📄 Loading video catalog from: {}", path.display());
        match tokio::fs::read_to_string(path).await {
            Ok(text) => self.load_str(&text).await,
            Err(e) => {
                warn!("Failed to read data file {}: {}", path.display(), e);
                LoadReport::empty(vec![LoadWarning::UnreadableDataFile(e.to_string())])
            }
        }
    }

    /// Load from data file contents
    pub async fn load_str(&self, text: &str) -> LoadReport {
        match DataDocument::parse(text) {
            Ok(document) => self.load_document(document).await,
            Err(e) => {
                warn!("Failed to parse data file: {}", e);
                LoadReport::empty(vec![LoadWarning::UnreadableDataFile(e.to_string())])
            }
        }
    }

    /// Load from an already parsed document
    pub async fn load_document(&self, document: DataDocument) -> LoadReport {
        let mut warnings = Vec::new();
        let mut records = Vec::new();
        let mut outcomes = Vec::new();

        if document.version != self.supported_version {
            warn!(
                "⚠️ Data file version '{}' differs from supported '{}'",
                document.version, self.supported_version
            );
            warnings.push(LoadWarning::VersionMismatch {
                expected: self.supported_version.clone(),
                found: document.version.clone(),
            });
        }

        for key in &document.ignored_keys {
            warn!("Category '{}' is not a list, ignoring", key);
            warnings.push(LoadWarning::NotAList(key.clone()));
        }

        for section in document.categories {
            self.load_category(&section.name, section.entries, &mut records, &mut outcomes)
                .await;
        }

        let catalog = Catalog::new(records, document.version);
        info!(
            "📚 Loaded {} videos in {} categories ({} skipped)",
            catalog.len(),
            catalog.categories().len(),
            outcomes.iter().filter(|o| !o.is_in_catalog()).count()
        );

        LoadReport {
            catalog,
            outcomes,
            warnings,
        }
    }

    async fn load_category(
        &self,
        category: &str,
        entries: Vec<std::result::Result<EntryFields, EntryError>>,
        records: &mut Vec<VideoRecord>,
        outcomes: &mut Vec<EntryOutcome>,
    ) {
        let mut pending = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let fields = match entry {
                Ok(fields) => fields,
                Err(e) => {
                    debug!("Skipping {}[{}]: {}", category, index, e);
                    outcomes.push(EntryOutcome {
                        category: category.to_string(),
                        index,
                        id: None,
                        status: EntryStatus::Skipped(SkipReason::Invalid(e)),
                    });
                    continue;
                }
            };

            let youtube_id =
                extract_video_id_opt(fields.url()).or_else(|| extract_video_id_opt(fields.id()));

            match (youtube_id, self.enrichment.is_some()) {
                (Some(youtube_id), true) => {
                    pending.push(provisional_record(category, index, &youtube_id, fields));
                }
                (youtube_id, _) => {
                    let record = manual_record(category, index, youtube_id, fields);
                    let status = if record.url.is_empty() {
                        debug!("Skipping {}[{}]: no URL", category, index);
                        EntryStatus::Skipped(SkipReason::EmptyUrl)
                    } else {
                        EntryStatus::Loaded
                    };
                    outcomes.push(EntryOutcome {
                        category: category.to_string(),
                        index,
                        id: Some(record.id.clone()),
                        status: status.clone(),
                    });
                    if status == EntryStatus::Loaded {
                        records.push(record);
                    }
                }
            }
        }

        if !pending.is_empty() {
            self.enrich_pending(category, pending, records, outcomes).await;
        }
    }

    async fn enrich_pending(
        &self,
        category: &str,
        pending: Vec<PendingRecord>,
        records: &mut Vec<VideoRecord>,
        outcomes: &mut Vec<EntryOutcome>,
    ) {
        let mut seen = HashSet::new();
        let ids: Vec<String> = pending
            .iter()
            .map(|p| p.record.id.clone())
            .filter(|id| seen.insert(id.clone()))
            .collect();

        info!("🌐 Fetching YouTube metadata for {} videos in '{}'", ids.len(), category);

        let remote = match self.fetch_batch(&ids).await {
            Ok(metadata) => metadata
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect::<HashMap<_, _>>(),
            Err(e) => {
                warn!("⚠️ Metadata fetch failed for '{}', using placeholders: {}", category, e);
                let reason = e.to_string();
                for p in pending {
                    push_provisional(category, p, ProvisionalReason::FetchFailed(reason.clone()), records, outcomes);
                }
                return;
            }
        };

        for p in pending {
            let Some(meta) = remote.get(&p.record.id) else {
                debug!("No metadata returned for {}", p.record.id);
                push_provisional(category, p, ProvisionalReason::NotReturned, records, outcomes);
                continue;
            };

            let index = p.index;
            let id = p.record.id.clone();
            let status = match merge_remote(p, meta) {
                Ok(record) => {
                    records.push(record);
                    EntryStatus::Enriched
                }
                Err(e) => {
                    warn!("Skipping {}[{}]: {}", category, index, e);
                    EntryStatus::Skipped(SkipReason::MalformedDuration(meta.duration.clone()))
                }
            };
            outcomes.push(EntryOutcome {
                category: category.to_string(),
                index,
                id: Some(id),
                status,
            });
        }
    }

    async fn fetch_batch(&self, ids: &[String]) -> Result<Vec<RemoteMetadata>> {
        let enrichment = self.enrichment.as_ref().ok_or(CatalogError::MissingCredential)?;
        let request = enrichment.fetcher.fetch(ids, &enrichment.credential);

        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| CatalogError::Timeout(limit))?,
            None => request.await,
        }
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn push_provisional(
    category: &str,
    pending: PendingRecord,
    reason: ProvisionalReason,
    records: &mut Vec<VideoRecord>,
    outcomes: &mut Vec<EntryOutcome>,
) {
    outcomes.push(EntryOutcome {
        category: category.to_string(),
        index: pending.index,
        id: Some(pending.record.id.clone()),
        status: EntryStatus::Provisional(reason),
    });
    records.push(pending.record);
}

/// Placeholder record for a YouTube entry, keyed by the YouTube id and
/// pointing at the canonical watch URL
fn provisional_record(category: &str, index: usize, youtube_id: &str, fields: EntryFields) -> PendingRecord {
    let title_override = fields.title_override().map(str::to_string);
    let description_override = fields.description_override().map(str::to_string);
    let thumbnail = fields.thumbnail().unwrap_or_default().to_string();

    PendingRecord {
        index,
        record: VideoRecord {
            id: youtube_id.to_string(),
            title: fields.title.unwrap_or_else(|| LOADING_TITLE.to_string()),
            url: canonical_watch_url(youtube_id),
            description: fields.description.unwrap_or_else(|| LOADING_DESCRIPTION.to_string()),
            duration: fields.duration.unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
            category: category.to_string(),
            thumbnail,
            tags: merge_tags(&fields.tags, &[]),
        },
        title_override,
        description_override,
    }
}

/// Final record built from local fields only
fn manual_record(category: &str, index: usize, youtube_id: Option<String>, fields: EntryFields) -> VideoRecord {
    let id = fields
        .id()
        .map(str::to_string)
        .or(youtube_id)
        .unwrap_or_else(|| fallback_id(category, index));

    VideoRecord {
        id,
        url: fields.url().unwrap_or_default().to_string(),
        thumbnail: fields.thumbnail().unwrap_or_default().to_string(),
        tags: merge_tags(&fields.tags, &[]),
        title: fields.title.unwrap_or_else(|| UNTITLED_VIDEO.to_string()),
        description: fields.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        duration: fields.duration.unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        category: category.to_string(),
    }
}

/// `manual_<category>_<index>` with the category lowercased and spaces
/// replaced by underscores
pub fn fallback_id(category: &str, index: usize) -> String {
    format!("manual_{}_{}", category.to_lowercase().replace(' ', "_"), index)
}

/// Overrides beat remote text; a local thumbnail beats the remote one
fn merge_remote(pending: PendingRecord, remote: &RemoteMetadata) -> Result<VideoRecord> {
    let mut record = pending.record;

    record.duration = format_duration(&remote.duration)?;
    record.title = pending.title_override.unwrap_or_else(|| remote.title.clone());
    record.description = pending
        .description_override
        .unwrap_or_else(|| remote.description.clone());
    if record.thumbnail.is_empty() {
        record.thumbnail = remote.thumbnail.clone();
    }
    record.tags = merge_tags(&record.tags, &remote.tags);

    Ok(record)
}

/// Case-sensitive union keeping first occurrence order
pub fn merge_tags(local: &[String], remote: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    local
        .iter()
        .chain(remote.iter())
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}

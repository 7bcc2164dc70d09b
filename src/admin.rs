//! Administrative append path for the video data file
//!
//! Appends go straight to the file; an already-loaded catalog only sees them
//! after a reload.

use crate::catalog::schema::{EntryFields, DEFAULT_VERSION, VERSION_KEY};
use crate::error::{CatalogError, Result};
use crate::youtube::{extract_video_id, format_duration, MetadataFetcher, RemoteMetadata};
use serde_json::{Map, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Why an automatic add fell back to manual entry
#[derive(Debug, Clone, PartialEq)]
pub enum ManualReason {
    NotYouTube,
    NoCredential,
    NotFound,
    FetchFailed(String),
}

/// Result of [`CatalogAdmin::add_from_url`]
#[derive(Debug, Clone, PartialEq)]
pub enum AppendOutcome {
    Added(EntryFields),
    NeedsManualEntry(ManualReason),
}

/// Fields captured by the manual entry form
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub title: String,
    pub url: String,
    pub description: String,
    pub duration: String,
    /// Comma separated
    pub tags: String,
}

/// One line of the per-category listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingRow {
    pub title: String,
    pub url: String,
    pub duration: String,
}

pub struct CatalogAdmin {
    data_file: PathBuf,
    fetcher: Option<Arc<dyn MetadataFetcher>>,
    credential: Option<String>,
}

impl CatalogAdmin {
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            data_file,
            fetcher: None,
            credential: None,
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn MetadataFetcher>, credential: Option<String>) -> Self {
        self.fetcher = Some(fetcher);
        self.credential = credential.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Category keys in file order
    pub async fn categories(&self) -> Result<Vec<String>> {
        let document = self.read_document().await?;
        Ok(document.keys().filter(|k| *k != VERSION_KEY).cloned().collect())
    }

    /// Title, URL and duration of every entry, grouped by category
    pub async fn listing(&self) -> Result<Vec<(String, Vec<ListingRow>)>> {
        let document = self.read_document().await?;
        let mut listing = Vec::new();

        for (category, entries) in document.iter().filter(|(k, _)| *k != VERSION_KEY) {
            let rows: Vec<ListingRow> = entries
                .as_array()
                .map(|items| items.iter().map(listing_row).collect())
                .unwrap_or_default();
            listing.push((category.clone(), rows));
        }

        Ok(listing)
    }

    /// Look the URL up on YouTube and append the fetched metadata.
    ///
    /// Nothing is written unless the URL resolves, a credential is configured
    /// and the platform returns the video.
    pub async fn add_from_url(&self, category: &str, url: &str) -> Result<AppendOutcome> {
        let category = validate_category(category)?;

        let Some(video_id) = extract_video_id(url.trim()) else {
            return Ok(AppendOutcome::NeedsManualEntry(ManualReason::NotYouTube));
        };
        let (Some(fetcher), Some(credential)) = (&self.fetcher, &self.credential) else {
            return Ok(AppendOutcome::NeedsManualEntry(ManualReason::NoCredential));
        };

        let details = match fetcher.fetch(&[video_id.clone()], credential).await {
            Ok(details) => details,
            Err(e) => {
                warn!("Metadata fetch for {} failed: {}", video_id, e);
                return Ok(AppendOutcome::NeedsManualEntry(ManualReason::FetchFailed(e.to_string())));
            }
        };
        let Some(remote) = details.into_iter().find(|d| d.id == video_id) else {
            return Ok(AppendOutcome::NeedsManualEntry(ManualReason::NotFound));
        };

        let entry = entry_from_remote(remote, url.trim());
        self.append(category, &entry).await?;
        Ok(AppendOutcome::Added(entry))
    }

    /// Append a hand-entered video; title and URL are required
    pub async fn add_manual(&self, category: &str, manual: ManualEntry) -> Result<EntryFields> {
        let category = validate_category(category)?;

        let title = manual.title.trim();
        let url = manual.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(CatalogError::InvalidEntry("title and url are required".to_string()));
        }

        let entry = EntryFields {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            description: Some(manual.description.trim().to_string()),
            duration: Some(manual.duration.trim().to_string()),
            tags: parse_tags(&manual.tags),
            ..EntryFields::default()
        };

        self.append(category, &entry).await?;
        Ok(entry)
    }

    async fn append(&self, category: &str, entry: &EntryFields) -> Result<()> {
        let mut document = self.read_document().await?;

        let slot = document
            .entry(category.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(items) = slot else {
            return Err(CatalogError::InvalidEntry(format!(
                "category '{}' is not a list",
                category
            )));
        };
        items.push(serde_json::to_value(entry)?);

        self.write_document(document).await?;
        info!("➕ Added video to '{}' in {}", category, self.data_file.display());
        Ok(())
    }

    /// Current file contents; a missing file starts from `{"version": "1.0"}`
    async fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.data_file.exists() {
            debug!("Data file {} missing, starting fresh", self.data_file.display());
            let mut document = Map::new();
            document.insert(VERSION_KEY.to_string(), Value::String(DEFAULT_VERSION.to_string()));
            return Ok(document);
        }

        let text = tokio::fs::read_to_string(&self.data_file).await?;
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(CatalogError::InvalidEntry(
                "top-level value must be an object".to_string(),
            )),
        }
    }

    /// Write through a temp file in the same directory, then persist over
    /// the target
    async fn write_document(&self, document: Map<String, Value>) -> Result<()> {
        let path = self.data_file.clone();
        let body = serde_json::to_string_pretty(&Value::Object(document))?;

        tokio::task::spawn_blocking(move || -> Result<()> {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&dir)?;

            let mut tmp = NamedTempFile::new_in(&dir)?;
            tmp.write_all(body.as_bytes())?;
            tmp.write_all(b"\n")?;
            tmp.persist(&path).map_err(|e| CatalogError::Io(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| CatalogError::Io(std::io::Error::other(e)))?
    }
}

/// Trimmed category name, or an error when it is empty or reserved
fn validate_category(category: &str) -> Result<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(CatalogError::InvalidEntry("category name is required".to_string()));
    }
    if category == VERSION_KEY {
        return Err(CatalogError::InvalidEntry(format!(
            "'{}' is reserved and cannot be a category",
            VERSION_KEY
        )));
    }
    Ok(category)
}

fn listing_row(value: &Value) -> ListingRow {
    let field = |key: &str, default: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    ListingRow {
        title: field("title", "Untitled"),
        url: field("url", ""),
        duration: field("duration", "N/A"),
    }
}

fn entry_from_remote(remote: RemoteMetadata, url: &str) -> EntryFields {
    let duration = format_duration(&remote.duration).unwrap_or_else(|e| {
        warn!("Keeping raw duration for {}: {}", remote.id, e);
        remote.duration.clone()
    });

    EntryFields {
        id: Some(remote.id),
        title: Some(remote.title),
        url: Some(url.to_string()),
        description: Some(remote.description),
        duration: Some(duration),
        thumbnail: Some(remote.thumbnail),
        tags: remote.tags,
        ..EntryFields::default()
    }
}

/// Split comma-separated tags, dropping blanks
pub fn parse_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

//! Text rendering of catalog records for the CLI

use crate::catalog::VideoRecord;
use std::path::PathBuf;

pub const PLACEHOLDER_NOT_FOUND: &str =
    "https://via.placeholder.com/320x180.png?text=Thumbnail+Not+Found";
pub const PLACEHOLDER_NO_THUMBNAIL: &str =
    "https://via.placeholder.com/320x180.png?text=No+Thumbnail";

/// Descriptions longer than this are collapsed unless full output is asked for
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;

const LOCAL_FILE_PREFIX: &str = "file:///";

/// Where a thumbnail should be loaded from
#[derive(Debug, Clone, PartialEq)]
pub enum ThumbnailSource {
    Remote(String),
    Local(PathBuf),
    Placeholder(&'static str),
}

impl ThumbnailSource {
    pub fn resolve(thumbnail: &str) -> Self {
        if thumbnail.is_empty() {
            return Self::Placeholder(PLACEHOLDER_NO_THUMBNAIL);
        }

        match thumbnail.strip_prefix(LOCAL_FILE_PREFIX) {
            Some(rest) => {
                let path = PathBuf::from(format!("/{}", rest));
                if path.exists() {
                    Self::Local(path)
                } else {
                    Self::Placeholder(PLACEHOLDER_NOT_FOUND)
                }
            }
            None => Self::Remote(thumbnail.to_string()),
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Self::Remote(url) => url.clone(),
            Self::Local(path) => path.display().to_string(),
            Self::Placeholder(url) => url.to_string(),
        }
    }
}

/// Description text, collapsed to a preview when long
pub fn description_preview(description: &str, full: bool) -> String {
    if full || description.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return description.to_string();
    }
    let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{}…", preview.trim_end())
}

/// Multi-line card for one video
pub fn render_card(video: &VideoRecord, full: bool) -> String {
    let mut card = String::new();

    card.push_str(&format!("#### {}\n", video.title));
    card.push_str(&format!(
        "Thumbnail: {}\n",
        ThumbnailSource::resolve(&video.thumbnail).as_display()
    ));
    card.push_str(&format!(
        "Duration: {} | Category: {}\n",
        video.duration, video.category
    ));
    if !video.description.is_empty() {
        card.push_str(&description_preview(&video.description, full));
        card.push('\n');
    }
    card.push_str(&format!("▶️ {}\n", video.url));

    card
}

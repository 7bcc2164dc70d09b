//! Error types shared across the catalog, fetcher and admin layers

/// Result type for video guide operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error types for video guide operations
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("YouTube API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("YouTube API key not configured")]
    MissingCredential,

    #[error("Metadata fetch timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Malformed duration: {0}")]
    MalformedDuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
}

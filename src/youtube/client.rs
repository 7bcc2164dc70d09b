use super::{MetadataFetcher, RemoteMetadata};
use crate::config::YouTubeConfig;
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Thumbnail sizes in order of preference
const THUMBNAIL_PREFERENCE: [&str; 4] = ["maxres", "high", "medium", "default"];

/// YouTube Data API v3 client for the `videos` resource
#[derive(Clone)]
pub struct YouTubeClient {
    client: reqwest::Client,
    endpoint: String,
    max_batch_size: usize,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: Snippet,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl YouTubeClient {
    pub fn new(config: &YouTubeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.api_endpoint.clone(),
            max_batch_size: config.max_batch_size.max(1),
        })
    }

    fn request_url(&self, ids: &[String], api_key: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("part", "snippet,contentDetails"),
                ("id", ids.join(",").as_str()),
                ("key", api_key),
            ],
        )
        .map_err(|e| CatalogError::InvalidConfig(format!("bad API endpoint {}: {}", self.endpoint, e)))
    }

    async fn fetch_chunk(&self, ids: &[String], api_key: &str) -> Result<Vec<RemoteMetadata>> {
        let url = self.request_url(ids, api_key)?;
        debug!("Requesting {} videos from {}", ids.len(), self.endpoint);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(CatalogError::Api { status, message });
        }

        let body: VideoListResponse = response.json().await?;
        Ok(body.items.into_iter().map(VideoItem::into_metadata).collect())
    }
}

impl VideoItem {
    fn into_metadata(self) -> RemoteMetadata {
        let mut snippet = self.snippet;
        let thumbnail = THUMBNAIL_PREFERENCE
            .iter()
            .find_map(|size| snippet.thumbnails.remove(*size))
            .map(|thumb| thumb.url)
            .unwrap_or_default();

        RemoteMetadata {
            id: self.id,
            title: snippet.title,
            description: snippet.description,
            duration: self.content_details.map(|details| details.duration).unwrap_or_default(),
            thumbnail,
            tags: snippet.tags,
        }
    }
}

#[async_trait]
impl MetadataFetcher for YouTubeClient {
    async fn fetch(&self, ids: &[String], credential: &str) -> Result<Vec<RemoteMetadata>> {
        if credential.trim().is_empty() {
            return Err(CatalogError::MissingCredential);
        }

        let mut results = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(self.max_batch_size) {
            results.extend(self.fetch_chunk(chunk, credential).await?);
        }

        info!("📺 Fetched metadata for {}/{} videos", results.len(), ids.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> YouTubeClient {
        YouTubeClient::new(&YouTubeConfig::default()).unwrap()
    }

    /// Local HTTP server answering every request with `status` and `body`.
    /// Returns the endpoint and the request lines it received.
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/youtube/v3/videos", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let request_line = String::from_utf8_lossy(&head)
                    .lines()
                    .next()
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(request_line);

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
            }
        });

        (endpoint, requests)
    }

    fn client_for(endpoint: String, max_batch_size: usize) -> YouTubeClient {
        YouTubeClient::new(&YouTubeConfig {
            api_endpoint: endpoint,
            max_batch_size,
            ..YouTubeConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_url_joins_ids() {
        let url = client()
            .request_url(&["aaaaaaaaaaa".to_string(), "bbbbbbbbbbb".to_string()], "secret")
            .unwrap();

        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["part"], "snippet,contentDetails");
        assert_eq!(params["id"], "aaaaaaaaaaa,bbbbbbbbbbb");
        assert_eq!(params["key"], "secret");
        assert!(url.as_str().starts_with("https://www.googleapis.com/youtube/v3/videos?"));
    }

    #[test]
    fn test_item_conversion_prefers_large_thumbnail() {
        let json = r#"{
            "items": [{
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Map Reading Basics",
                    "description": "Grid references explained",
                    "thumbnails": {
                        "default": {"url": "https://i.ytimg.com/default.jpg"},
                        "high": {"url": "https://i.ytimg.com/high.jpg"}
                    },
                    "tags": ["map", "navigation"]
                },
                "contentDetails": {"duration": "PT12M4S"}
            }]
        }"#;

        let body: VideoListResponse = serde_json::from_str(json).unwrap();
        let meta: Vec<RemoteMetadata> = body.items.into_iter().map(VideoItem::into_metadata).collect();

        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].id, "dQw4w9WgXcQ");
        assert_eq!(meta[0].title, "Map Reading Basics");
        assert_eq!(meta[0].duration, "PT12M4S");
        assert_eq!(meta[0].thumbnail, "https://i.ytimg.com/high.jpg");
        assert_eq!(meta[0].tags, vec!["map", "navigation"]);
    }

    #[test]
    fn test_item_conversion_tolerates_missing_fields() {
        let json = r#"{"items": [{"id": "abcdefghijk", "snippet": {}}]}"#;
        let body: VideoListResponse = serde_json::from_str(json).unwrap();
        let meta = body.items.into_iter().next().unwrap().into_metadata();

        assert_eq!(meta.title, "");
        assert_eq!(meta.duration, "");
        assert_eq!(meta.thumbnail, "");
        assert!(meta.tags.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_splits_ids_into_batches() {
        let (endpoint, requests) = serve("200 OK", r#"{"items": []}"#).await;
        let ids = ["aaaaaaaaaaa", "bbbbbbbbbbb", "ccccccccccc"].map(String::from);

        let result = client_for(endpoint, 2).fetch(&ids, "secret").await.unwrap();
        assert!(result.is_empty());

        let requests = requests.lock().unwrap().clone();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].starts_with("GET /youtube/v3/videos?"));
        assert!(requests[0].contains("id=aaaaaaaaaaa%2Cbbbbbbbbbbb&"));
        assert!(requests[1].contains("id=ccccccccccc&"));
        assert!(requests.iter().all(|r| r.contains("key=secret")));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let (endpoint, _) = serve(
            "403 Forbidden",
            r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#,
        )
        .await;

        let result = client_for(endpoint, 50)
            .fetch(&["dQw4w9WgXcQ".to_string()], "secret")
            .await;

        match result {
            Err(CatalogError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "quotaExceeded");
            }
            other => panic!("expected API error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[tokio::test]
    async fn test_blank_credential_rejected() {
        let result = client().fetch(&["dQw4w9WgXcQ".to_string()], "  ").await;
        assert!(matches!(result, Err(CatalogError::MissingCredential)));
    }
}

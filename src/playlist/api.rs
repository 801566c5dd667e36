//! YouTube Data API v3 `playlistItems.list` client.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const PLAYLIST_ITEMS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

/// Page size the browser asks for
pub const REQUESTED_PAGE_SIZE: u32 = 200;
/// Largest `maxResults` the service accepts
pub const SERVICE_PAGE_LIMIT: u32 = 50;

const PARTS: &str = "snippet,contentDetails";

#[derive(Debug, Error)]
pub enum PlaylistError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Thumbnail could not be decoded: {0}")]
    Image(#[from] image::ImageError),

    #[error("Fetch cancelled")]
    Cancelled,
}

/// Parameters for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub playlist_id: String,
    pub page_token: Option<String>,
    pub max_results: u32,
}

impl PageRequest {
    pub fn new(playlist_id: impl Into<String>, page_token: Option<String>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            page_token,
            max_results: REQUESTED_PAGE_SIZE.min(SERVICE_PAGE_LIMIT),
        }
    }

    /// Query string pairs, without the API key
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("part", PARTS.to_string()),
            ("maxResults", self.max_results.to_string()),
            ("playlistId", self.playlist_id.clone()),
        ];
        if let Some(token) = &self.page_token {
            query.push(("pageToken", token.clone()));
        }
        query
    }
}

/// Entry as delivered by a page, before it gets its playlist index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub video_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub items: Vec<PageEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    items: Vec<WireItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl PlaylistPage {
    /// Parses a `playlistItems.list` JSON body. Entries without a video id
    /// are dropped.
    pub fn from_json(body: &str) -> Result<Self, PlaylistError> {
        let response: ListResponse = serde_json::from_str(body)?;

        let items = response
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet;
                match snippet.resource_id.video_id {
                    Some(video_id) => Some(PageEntry {
                        video_id,
                        title: snippet.title,
                    }),
                    None => {
                        log::debug!("Skipping playlist entry without video id: {:?}", snippet.title);
                        None
                    }
                }
            })
            .collect();

        Ok(Self {
            items,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

/// Anything that can serve playlist pages
pub trait PlaylistSource {
    fn fetch_page(
        &self,
        request: &PageRequest,
    ) -> impl Future<Output = Result<PlaylistPage, PlaylistError>> + Send;
}

/// Credentials for the video API. Never compiled in.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    /// OAuth client id; unused for public playlists, kept for logging
    pub client_id: Option<String>,
}

pub struct YouTubeClient {
    client: reqwest::Client,
    credentials: ApiCredentials,
    endpoint: String,
}

impl YouTubeClient {
    pub fn new(credentials: ApiCredentials) -> Result<Self, PlaylistError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        if let Some(client_id) = &credentials.client_id {
            log::debug!("YouTube client id configured: {}", client_id);
        }

        Ok(Self {
            client,
            credentials,
            endpoint: PLAYLIST_ITEMS_ENDPOINT.to_string(),
        })
    }

    /// Point at a different API host
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Raw bytes of a thumbnail image
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PlaylistError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlaylistError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl PlaylistSource for YouTubeClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PlaylistPage, PlaylistError> {
        log::debug!(
            "Fetching playlist page (playlist={}, token={:?})",
            request.playlist_id,
            request.page_token
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&request.query())
            .query(&[("key", self.credentials.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlaylistError::Status {
                status: status.as_u16(),
                body,
            });
        }

        PlaylistPage::from_json(&body)
    }
}

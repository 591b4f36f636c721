pub mod raw;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{Album, Playlist, SearchPage, Song};
use raw::{Envelope, OneOrMany, RawAlbum, RawPlaylist, RawSearch, RawSong};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("API reported failure: {0}")]
    Unsuccessful(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),
}

/// Remote catalogue operations the player depends on.
#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn get_song(&self, id: &str) -> Result<Song, ApiError>;
    async fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Song>, ApiError>;
    async fn search_songs(&self, query: &str, page: u32, limit: u32)
    -> Result<SearchPage, ApiError>;
    async fn get_album(&self, id: &str) -> Result<Album, ApiError>;
    async fn get_playlist(&self, id: &str) -> Result<Playlist, ApiError>;
}

pub struct ApiService {
    client: Client,
    base_url: String,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("saavtui/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ApiError> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let parsed = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        parsed.map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(url = url.as_str(), "api_request");
        let response = self.client.get(url.clone()).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ApiError::NotFound(url.to_string())),
            status if !status.is_success() => {
                warn!(url = url.as_str(), status = status.as_u16(), "api_bad_status");
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            _ => {}
        }

        let envelope: Envelope<T> = response.json().await?;
        if !envelope.is_success() {
            return Err(ApiError::Unsuccessful(
                envelope
                    .message
                    .unwrap_or_else(|| format!("unsuccessful response from {url}")),
            ));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::NotFound(url.to_string()))
    }
}

#[async_trait]
impl MusicApi for ApiService {
    async fn get_song(&self, id: &str) -> Result<Song, ApiError> {
        let url = self.url(&format!("songs/{id}"), &[])?;
        let data: OneOrMany<RawSong> = self.fetch(url).await?;

        raw::normalize_songs(data.into_vec())
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("song {id}")))
    }

    async fn get_recommendations(&self, id: &str, limit: usize) -> Result<Vec<Song>, ApiError> {
        let limit = limit.to_string();
        let url = self.url(&format!("songs/{id}/suggestions"), &[("limit", limit.as_str())])?;
        let data: Vec<RawSong> = self.fetch(url).await?;

        Ok(raw::normalize_songs(data)
            .into_iter()
            .filter(|s| s.id != id)
            .collect())
    }

    async fn search_songs(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchPage, ApiError> {
        let page = page.to_string();
        let limit = limit.to_string();
        let url = self.url(
            "search/songs",
            &[("query", query), ("page", page.as_str()), ("limit", limit.as_str())],
        )?;
        let data: RawSearch = self.fetch(url).await?;
        Ok(raw::normalize_search(data))
    }

    async fn get_album(&self, id: &str) -> Result<Album, ApiError> {
        let url = self.url("albums", &[("id", id)])?;
        let data: RawAlbum = self.fetch(url).await?;
        Ok(raw::normalize_album(data))
    }

    async fn get_playlist(&self, id: &str) -> Result<Playlist, ApiError> {
        let url = self.url("playlists", &[("id", id)])?;
        let data: RawPlaylist = self.fetch(url).await?;
        Ok(raw::normalize_playlist(data))
    }
}

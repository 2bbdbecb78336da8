//! HTTP client for the TMDB catalog API

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::model::ContentKind;
use crate::config::TmdbConfig;

use super::types::{
    GenreListResponse, ListingItem, ListingResponse, VideosResponse, select_video, video_url,
};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("upstream request failed: {0}")]
    RequestFailed(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("upstream response malformed: {0}")]
    MalformedBody(String),

    #[error("upstream connection timeout")]
    Timeout,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Lowercased genre name -> upstream genre id
pub type GenreMap = HashMap<String, i64>;

/// The seam between the aggregator and the live upstream.
///
/// All operations are fallible as a unit: a call that exhausts its retries
/// surfaces one `ProviderError` which the aggregator converts into a
/// fallback decision, never into a client-facing error.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Genre listing for one content kind
    async fn genre_map(&self, kind: ContentKind) -> Result<GenreMap>;

    /// Ordered items for one category endpoint, e.g. `movie/popular` or
    /// `discover/movie` with a `with_genres` parameter
    async fn category_listing(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<ListingItem>>;

    /// Watch URL of the best available video, or `None` when the item has
    /// no qualifying video. Absence is a valid state, not a failure.
    async fn trailer_url(&self, kind: ContentKind, external_id: i64) -> Result<Option<String>>;
}

/// Production TMDB client: authenticated requests with per-call timeout and
/// a small bounded retry with linear backoff.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
    region: Option<String>,
    attempts: u32,
    backoff: Duration,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            language: config.language.clone(),
            region: config.region.clone(),
            attempts: config.retry_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
        })
    }

    /// Issue one GET with retry; the caller's path is relative to the base URL
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.get_json_once(path, params).await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(path, attempt, "Upstream call succeeded after retry");
                    }
                    return Ok(value);
                }
                // Every failure kind is treated as transient: non-2xx
                // statuses and malformed bodies retry like timeouts do
                Err(error) if attempt >= self.attempts => {
                    warn!(path, attempt, error = %error, "Upstream call failed");
                    return Err(error);
                }
                Err(error) => {
                    warn!(path, attempt, error = %error, "Upstream call failed, retrying");

                    // Linear backoff between attempts
                    tokio::time::sleep(self.backoff * attempt).await;
                }
            }
        }
    }

    async fn get_json_once<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&[("language", self.language.as_str())]);

        if let Some(region) = &self.region {
            request = request.query(&[("region", region.as_str())]);
        }
        if !params.is_empty() {
            request = request.query(params);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::MalformedBody(e.to_string()))
    }

    fn genre_path(kind: ContentKind) -> &'static str {
        match kind {
            ContentKind::Movie => "genre/movie/list",
            ContentKind::Series => "genre/tv/list",
        }
    }

    fn videos_path(kind: ContentKind, external_id: i64) -> String {
        match kind {
            ContentKind::Movie => format!("movie/{external_id}/videos"),
            ContentKind::Series => format!("tv/{external_id}/videos"),
        }
    }
}

#[async_trait]
impl CatalogProvider for TmdbClient {
    async fn genre_map(&self, kind: ContentKind) -> Result<GenreMap> {
        let response: GenreListResponse = self.get_json(Self::genre_path(kind), &[]).await?;

        Ok(response
            .genres
            .into_iter()
            .map(|genre| (genre.name.to_lowercase(), genre.id))
            .collect())
    }

    async fn category_listing(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Vec<ListingItem>> {
        let response: ListingResponse = self.get_json(path, params).await?;
        Ok(response.results)
    }

    async fn trailer_url(&self, kind: ContentKind, external_id: i64) -> Result<Option<String>> {
        let response: VideosResponse = self
            .get_json(&Self::videos_path(kind, external_id), &[])
            .await?;

        Ok(select_video(&response.results).map(video_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GENRE_BODY: &str = r#"{"genres":[{"id":28,"name":"Action"}]}"#;

    /// Serves one scripted response per hit, repeating the last entry
    fn scripted_router(hits: Arc<AtomicUsize>, responses: &'static [(u16, &'static str)]) -> Router {
        Router::new().route(
            "/genre/movie/list",
            get(move || {
                let hits = Arc::clone(&hits);
                async move {
                    let hit = hits.fetch_add(1, Ordering::SeqCst);
                    let (status, body) = responses[hit.min(responses.len() - 1)];
                    (StatusCode::from_u16(status).unwrap(), body.to_string())
                }
            }),
        )
    }

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn client_for(addr: SocketAddr) -> TmdbClient {
        let config = TmdbConfig {
            base_url: format!("http://{addr}"),
            retry_attempts: 2,
            retry_backoff_ms: 1,
            ..Default::default()
        };
        TmdbClient::new(&config, "k".to_string()).unwrap()
    }

    #[tokio::test]
    async fn server_error_is_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = serve(scripted_router(
            Arc::clone(&hits),
            &[(500, ""), (200, GENRE_BODY)],
        ))
        .await;

        let genres = client_for(addr).genre_map(ContentKind::Movie).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(genres.get("action"), Some(&28));
    }

    #[tokio::test]
    async fn malformed_body_is_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = serve(scripted_router(
            Arc::clone(&hits),
            &[(200, "not json"), (200, GENRE_BODY)],
        ))
        .await;

        let genres = client_for(addr).genre_map(ContentKind::Movie).await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(genres.len(), 1);
    }

    #[tokio::test]
    async fn exhausted_attempts_surface_last_error() {
        let hits = Arc::new(AtomicUsize::new(0));
        let addr = serve(scripted_router(Arc::clone(&hits), &[(500, "")])).await;

        let result = client_for(addr).genre_map(ContentKind::Movie).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(matches!(result, Err(ProviderError::Status(500))));
    }

    #[test]
    fn client_builds_from_config() {
        let config = TmdbConfig::default();
        let client = TmdbClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(client.base_url, "https://api.themoviedb.org/3");
        assert_eq!(client.attempts, 2);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = TmdbConfig {
            base_url: "http://localhost:9999/v3/".to_string(),
            ..Default::default()
        };
        let client = TmdbClient::new(&config, "k".to_string()).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/v3");
    }

    #[test]
    fn paths_cover_both_kinds() {
        assert_eq!(TmdbClient::genre_path(ContentKind::Movie), "genre/movie/list");
        assert_eq!(TmdbClient::genre_path(ContentKind::Series), "genre/tv/list");
        assert_eq!(
            TmdbClient::videos_path(ContentKind::Series, 1399),
            "tv/1399/videos"
        );
    }
}

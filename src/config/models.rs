use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Path for the embedded catalog store. The server still starts if the
    /// store cannot be opened; listings then fall through to the seed
    /// catalog.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: default_store_path(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/catalog")
}

/// Upstream (TMDB) provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    /// API key, loaded from the `TMDB_API_KEY` environment variable only.
    /// When absent the upstream path is disabled and listings are served
    /// from the store or seed catalog.
    #[serde(skip)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout for upstream calls
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Total attempts per upstream call (1 initial + retries)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Linear backoff base between attempts
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Cooldown window after an upstream failure before it is retried
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Items kept per category row, clamped to [6, 40] at request time
    #[serde(default = "default_per_category")]
    pub per_category: usize,
    #[serde(default = "default_language")]
    pub language: String,
    pub region: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            cooldown_ms: default_cooldown_ms(),
            per_category: default_per_category(),
            language: default_language(),
            region: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_cooldown_ms() -> u64 {
    300_000
}

fn default_per_category() -> usize {
    16
}

fn default_language() -> String {
    "en-US".to_string()
}

/// Catalog listing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Result limit applied when the request carries none (store/seed paths)
    #[serde(default = "default_default_limit")]
    pub default_limit: usize,
    /// Hard cap on the request-supplied limit
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
    /// Genre names promoted to discovery rows when the upstream genre map
    /// resolves them; unresolved names are skipped silently
    #[serde(default = "default_genre_rows")]
    pub genre_rows: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_limit: default_default_limit(),
            max_limit: default_max_limit(),
            genre_rows: default_genre_rows(),
        }
    }
}

fn default_default_limit() -> usize {
    50
}

fn default_max_limit() -> usize {
    500
}

fn default_genre_rows() -> Vec<String> {
    ["Action", "Comedy", "Horror", "Romance", "Documentary"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

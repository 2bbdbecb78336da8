//! Wire types for the TMDB v3 API.
//!
//! Only the fields the normalizer consumes are modeled; everything else in
//! the upstream payloads is ignored. Movies carry `title`/`release_date`,
//! series carry `name`/`first_air_date`; both shapes deserialize into
//! [`ListingItem`].

use serde::Deserialize;

/// One raw item from a listing endpoint (trending, popular, discover, ...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingItem {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

#[derive(Debug, Deserialize)]
pub struct ListingResponse {
    #[serde(default)]
    pub results: Vec<ListingItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenreEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<GenreEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoEntry {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct VideosResponse {
    #[serde(default)]
    pub results: Vec<VideoEntry>,
}

/// Pick the best available video: first match in priority order
/// Trailer > Teaser > Clip, restricted to YouTube-hosted entries.
pub fn select_video(videos: &[VideoEntry]) -> Option<&VideoEntry> {
    for wanted in ["Trailer", "Teaser", "Clip"] {
        if let Some(video) = videos
            .iter()
            .find(|v| v.site == "YouTube" && v.kind == wanted)
        {
            return Some(video);
        }
    }
    None
}

/// Watch URL for a selected video
pub fn video_url(video: &VideoEntry) -> String {
    format!("https://www.youtube.com/watch?v={}", video.key)
}

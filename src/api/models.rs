//! API models for the ReelBox listing and trailer endpoints.
//!
//! The listing endpoint (`GET /movies`) accepts free-form query parameters
//! and always answers `200` with `{count, source, data}`; the trailer
//! endpoint returns `{data: {trailerUrl}}` or a structured error. Query
//! parameters arrive as strings and are parsed leniently: unparseable
//! values behave as if the parameter were absent rather than failing the
//! request, matching how a browsing front end uses this surface.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::{ContentKind, ContentRecord, ListingQuery, ListingSource};
use crate::observability::MetricsSnapshot;

/// Raw query parameters of `GET /movies`
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub featured: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "perCategory", alias = "per_category")]
    pub per_category: Option<String>,
    /// `source=db` forces the store/seed path regardless of upstream health
    pub source: Option<String>,
}

impl ListingParams {
    pub fn into_query(self) -> ListingQuery {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        ListingQuery {
            search: non_empty(self.search),
            category: non_empty(self.category),
            kind: non_empty(self.content_type)
                .map(|value| ContentKind::parse_lenient(&value)),
            featured: match self.featured.as_deref() {
                Some("true") | Some("1") => Some(true),
                Some("false") | Some("0") => Some(false),
                _ => None,
            },
            limit: self.limit.and_then(|v| v.parse().ok()),
            per_category: self.per_category.and_then(|v| v.parse().ok()),
            force_store: self.source.as_deref() == Some("db"),
        }
    }
}

/// Listing response: one source, normalized records, `count == data.len()`
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub count: usize,
    pub source: ListingSource,
    pub data: Vec<ContentRecord>,
}

#[derive(Debug, Serialize)]
pub struct TrailerResponse {
    pub data: TrailerData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerData {
    pub trailer_url: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, String>,
    pub version: String,
    pub metrics: MetricsSnapshot,
}

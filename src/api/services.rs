use std::time::Instant;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use super::{
    error::ApiError,
    models::{HealthResponse, ListingParams, ListingResponse, TrailerData, TrailerResponse},
    state::AppState,
};
use crate::catalog::ContentKind;

/// Catalog listing endpoint (GET /movies)
///
/// Always answers `200`: the aggregator tries the upstream provider, the
/// document store, and the seed catalog in order and serves whichever tier
/// is available. Exactly one source wins per request; `count` always equals
/// the length of `data`.
pub async fn list_content(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> impl IntoResponse {
    let query = params.into_query();
    let listing = state.aggregator.list(&query).await;

    Json(ListingResponse {
        count: listing.records.len(),
        source: listing.source,
        data: listing.records,
    })
}

/// Dedicated trailer lookup (GET /movies/tmdb-trailer/{type}/{id})
///
/// Unlike the listing path this endpoint has no fallback tier, so failures
/// surface as structured errors:
/// - `400` when the type is not `movie`/`series` or the id is not numeric
/// - `503` when no upstream API key is configured
/// - `404` when the upstream is reachable but has no qualifying video
pub async fn get_trailer(
    State(state): State<AppState>,
    Path((content_type, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    // Parameter validation comes before the configuration check so malformed
    // requests are rejected consistently with or without an API key.
    let kind = ContentKind::parse_strict(&content_type).ok_or_else(|| {
        ApiError::InvalidParam(format!(
            "type must be 'movie' or 'series', got '{content_type}'"
        ))
    })?;

    let external_id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::InvalidParam(format!("id must be numeric, got '{id}'")))?;

    let provider = state
        .aggregator
        .provider()
        .ok_or_else(|| ApiError::UpstreamUnavailable("no TMDB API key configured".to_string()))?;

    state.metrics.trailer_lookup();

    let trailer = provider
        .trailer_url(kind, external_id)
        .await
        .map_err(|e| ApiError::UpstreamError(e.to_string()))?;

    match trailer {
        Some(trailer_url) => Ok(Json(TrailerResponse {
            data: TrailerData { trailer_url },
        })),
        None => Err(ApiError::NotFound(format!(
            "no trailer for {} {external_id}",
            kind.as_str()
        ))),
    }
}

/// Health check endpoint (GET /health)
///
/// Reports each component's state. Fallback tiers mean a degraded
/// dependency does not make the service unhealthy, so this always
/// answers `200`; the component map tells the rest of the story.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    use std::collections::HashMap;

    let now = Instant::now();
    let mut components = HashMap::new();

    components.insert("api".to_string(), "healthy".to_string());
    components.insert(
        "store".to_string(),
        if state.aggregator.store_ready() {
            "ready"
        } else {
            "unavailable"
        }
        .to_string(),
    );
    components.insert(
        "upstream".to_string(),
        match state.aggregator.provider() {
            Some(_) => format!("configured ({})", state.aggregator.health().state_label(now)),
            None => "unconfigured".to_string(),
        },
    );

    let degraded = !state.aggregator.store_ready()
        || (state.aggregator.provider().is_some()
            && state.aggregator.health().state_label(now) == "open");

    let response = HealthResponse {
        status: if degraded { "degraded" } else { "healthy" }.to_string(),
        components,
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    };

    Json(response)
}

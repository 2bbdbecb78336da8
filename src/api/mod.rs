mod error;
pub mod models;
pub mod services;
pub mod state;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

pub use error::ApiError;

/// Build the full application router. Shared between the server
/// entrypoint and the integration tests.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/movies", get(services::list_content))
        .route(
            "/movies/tmdb-trailer/{content_type}/{id}",
            get(services::get_trailer),
        )
        .route("/health", get(services::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The API is consumed by a browser front end on another origin
        .layer(CorsLayer::permissive())
}

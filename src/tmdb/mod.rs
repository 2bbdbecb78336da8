//! Upstream catalog provider (TMDB)
//!
//! [`CatalogProvider`] is the seam the aggregator consumes; [`TmdbClient`]
//! is the production implementation speaking the TMDB v3 REST API with
//! per-call timeouts and bounded retry. Tests substitute their own provider
//! through the trait.

mod client;
pub mod types;

pub use client::{CatalogProvider, GenreMap, ProviderError, Result, TmdbClient};
pub use types::{GenreEntry, ListingItem, VideoEntry};

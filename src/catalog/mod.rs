//! Catalog aggregation core
//!
//! One listing request is served from exactly one of three sources, tried in
//! order: the live TMDB upstream, the embedded document store, and the
//! immutable seed catalog. The aggregator owns the fallback policy; the
//! health tracker gates whether the upstream is attempted at all; the
//! normalization layer folds all three raw shapes into [`model::ContentRecord`].

pub mod aggregator;
pub mod health;
pub mod model;
pub mod normalize;
pub mod seed;
pub mod store;

pub use aggregator::{Aggregator, Listing, ListingSource};
pub use health::UpstreamHealth;
pub use model::{ContentKind, ContentRecord, ListingQuery, SourceTag};
pub use store::{CatalogStore, StoredContent};

//! Canonical content model shared by all catalog sources.
//!
//! Every source shape (upstream item, store document, seed record) is folded
//! into [`ContentRecord`] before it leaves the aggregator. Record ids carry a
//! source prefix so the id spaces of the three sources can never collide and
//! any id can be traced back to the source that produced it.

use serde::{Deserialize, Serialize};

/// Per-category item cap bounds for the upstream path
pub const PER_CATEGORY_MIN: usize = 6;
pub const PER_CATEGORY_MAX: usize = 40;

/// Content kind. Unrecognized source values fold into `Movie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Series => "series",
        }
    }

    /// Lenient parse used for filters and stored documents: anything that
    /// is not a recognized series spelling is a movie.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "series" | "tv" => ContentKind::Series,
            _ => ContentKind::Movie,
        }
    }

    /// Strict parse used where an invalid kind is a client error
    /// (the trailer endpoint).
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(ContentKind::Movie),
            "series" => Some(ContentKind::Series),
            _ => None,
        }
    }

    /// Display label doubling as the `duration` field of normalized records
    pub fn duration_label(&self) -> &'static str {
        match self {
            ContentKind::Movie => "Movie",
            ContentKind::Series => "Series",
        }
    }
}

/// Which source produced a given record id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTag {
    Tmdb,
    Store,
    Seed,
}

impl SourceTag {
    pub fn prefix(&self) -> &'static str {
        match self {
            SourceTag::Tmdb => "tmdb-",
            SourceTag::Store => "db-",
            SourceTag::Seed => "seed-",
        }
    }

    /// Recover the producing source from a record id. Prefixes are disjoint
    /// and stable, so this is a total round-trip for well-formed ids.
    pub fn parse_id(id: &str) -> Option<SourceTag> {
        [SourceTag::Tmdb, SourceTag::Store, SourceTag::Seed]
            .into_iter()
            .find(|tag| id.starts_with(tag.prefix()))
    }
}

/// Canonical content record, the uniform output of all three normalizers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub year: i32,
    pub rating: String,
    pub duration: String,
    pub image: String,
    pub backdrop: String,
    pub trailer_url: String,
    pub featured: bool,
}

/// Filters for one listing request
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub kind: Option<ContentKind>,
    pub featured: Option<bool>,
    pub limit: Option<usize>,
    pub per_category: Option<usize>,
    /// `source=db` override: skip the upstream regardless of health
    pub force_store: bool,
}

impl ListingQuery {
    /// Effective result limit for the store/seed paths: requested value
    /// clamped to [1, max], or the configured default when absent.
    pub fn effective_limit(&self, default_limit: usize, max_limit: usize) -> usize {
        match self.limit {
            Some(limit) => limit.clamp(1, max_limit),
            None => default_limit,
        }
    }

    /// Effective per-category cap for the upstream path, clamped to [6, 40]
    pub fn effective_per_category(&self, default_per_category: usize) -> usize {
        self.per_category
            .unwrap_or(default_per_category)
            .clamp(PER_CATEGORY_MIN, PER_CATEGORY_MAX)
    }
}

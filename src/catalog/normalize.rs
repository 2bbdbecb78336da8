//! Normalization layer: three pure mappers, one per source shape.
//!
//! Ids are prefixed per source (`tmdb-`, `db-`, `seed-`) so the three id
//! spaces can never collide. The derivation is deterministic: the same
//! source item yields the same id on every request.

use chrono::{Datelike, Utc};

use crate::tmdb::ListingItem;

use super::model::{ContentKind, ContentRecord, SourceTag};
use super::seed::SeedRecord;
use super::store::StoredContent;

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Poster at w500, falling back to the backdrop at a lower resolution
fn upstream_image(item: &ListingItem) -> String {
    if let Some(path) = &item.poster_path {
        format!("{IMAGE_BASE}/w500{path}")
    } else if let Some(path) = &item.backdrop_path {
        format!("{IMAGE_BASE}/w300{path}")
    } else {
        String::new()
    }
}

/// Backdrop at w1280, falling back to whatever the image resolved to
fn upstream_backdrop(item: &ListingItem, image: &str) -> String {
    match &item.backdrop_path {
        Some(path) => format!("{IMAGE_BASE}/w1280{path}"),
        None => image.to_string(),
    }
}

/// Year from the first four characters of the release date, else the
/// current year
fn parse_year(date: Option<&str>) -> i32 {
    date.and_then(|d| d.get(..4))
        .and_then(|y| y.parse().ok())
        .unwrap_or_else(|| Utc::now().year())
}

/// Upstream item -> canonical record
pub fn from_upstream(item: &ListingItem, kind: ContentKind, category: &str) -> ContentRecord {
    let title = item
        .title
        .clone()
        .or_else(|| item.name.clone())
        .unwrap_or_default();
    let date = item.release_date.as_deref().or(item.first_air_date.as_deref());
    let image = upstream_image(item);
    let backdrop = upstream_backdrop(item, &image);

    ContentRecord {
        id: format!("{}{}-{}", SourceTag::Tmdb.prefix(), kind.as_str(), item.id),
        title,
        description: item.overview.clone(),
        category: category.to_string(),
        kind,
        year: parse_year(date),
        rating: if item.adult { "18+" } else { "13+" }.to_string(),
        duration: kind.duration_label().to_string(),
        image,
        backdrop,
        trailer_url: String::new(),
        featured: false,
    }
}

/// Store document -> canonical record
pub fn from_store(document: &StoredContent) -> ContentRecord {
    let backdrop = if document.backdrop.is_empty() {
        document.image.clone()
    } else {
        document.backdrop.clone()
    };

    ContentRecord {
        id: format!("{}{}", SourceTag::Store.prefix(), document.id),
        title: document.title.clone(),
        description: document.description.clone(),
        category: document.category.clone(),
        kind: document.kind,
        year: document.year,
        rating: document.rating.clone(),
        duration: document.duration.clone(),
        image: document.image.clone(),
        backdrop,
        trailer_url: document.trailer_url.clone(),
        featured: document.featured,
    }
}

/// Seed record -> canonical record; the id is the slugged title
pub fn from_seed(record: &SeedRecord) -> ContentRecord {
    ContentRecord {
        id: format!("{}{}", SourceTag::Seed.prefix(), slug(record.title)),
        title: record.title.to_string(),
        description: record.description.to_string(),
        category: record.category.to_string(),
        kind: record.kind,
        year: record.year,
        rating: record.rating.to_string(),
        duration: record.duration.to_string(),
        image: record.image.to_string(),
        backdrop: record.backdrop.to_string(),
        trailer_url: String::new(),
        featured: record.featured,
    }
}

/// Lowercased, whitespace-to-hyphen title slug
fn slug(title: &str) -> String {
    title.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

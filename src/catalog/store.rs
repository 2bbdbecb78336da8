//! Fjall-backed persistent catalog store.
//!
//! Content documents live in a single `content` partition, keyed by UUIDv7.
//! The hyphenated-lowercase key encoding sorts chronologically, so a reverse
//! scan yields documents newest-first without a secondary index. Documents
//! are written out of band; the aggregation path only reads them.

use std::path::Path;

use chrono::{DateTime, Utc};
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use super::model::{ContentKind, ListingQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// One persisted content document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredContent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ContentKind,
    pub year: i32,
    pub rating: String,
    pub duration: String,
    pub image: String,
    pub backdrop: String,
    #[serde(default)]
    pub trailer_url: String,
    #[serde(default)]
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredContent {
    /// Build a fresh document with a time-ordered id and current timestamps
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        kind: ContentKind,
        year: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            category: category.into(),
            kind,
            year,
            rating: "13+".to_string(),
            duration: kind.duration_label().to_string(),
            image: String::new(),
            backdrop: String::new(),
            trailer_url: String::new(),
            featured: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Embedded document store for catalog content
#[derive(Clone)]
pub struct CatalogStore {
    keyspace: Keyspace,
    content: PartitionHandle,
}

impl CatalogStore {
    /// Open or create a catalog store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening catalog store at: {}", path.display());

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let keyspace = Config::new(path).open()?;
        let content = keyspace.open_partition("content", PartitionCreateOptions::default())?;

        Ok(Self { keyspace, content })
    }

    /// Connection-state query; an opened embedded store is always ready
    pub fn is_ready(&self) -> bool {
        true
    }

    /// Insert or replace a content document
    pub fn upsert(&self, document: StoredContent) -> Result<()> {
        let value = serde_json::to_vec(&document)?;
        self.content.insert(document.id.to_string(), value)?;
        debug!(id = %document.id, title = %document.title, "Upserted content document");
        Ok(())
    }

    /// Get a content document by id
    pub fn get(&self, id: &Uuid) -> Result<Option<StoredContent>> {
        match self.content.get(id.to_string())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    /// Delete a content document by id
    pub fn delete(&self, id: &Uuid) -> Result<()> {
        self.content.remove(id.to_string())?;
        Ok(())
    }

    /// Filtered, newest-first, limit-capped listing query.
    ///
    /// Search matches title or description case-insensitively (the store's
    /// native text search is broader than the seed tier's title-only match);
    /// category and kind are exact; featured filters on the flag.
    pub fn find(&self, query: &ListingQuery, limit: usize) -> Result<Vec<StoredContent>> {
        let search = query.search.as_deref().map(str::to_lowercase);
        let mut results = Vec::new();

        for item in self.content.iter().rev() {
            let (_key, value) = item?;
            let document: StoredContent = serde_json::from_slice(&value)?;

            if let Some(kind) = query.kind {
                if document.kind != kind {
                    continue;
                }
            }
            if let Some(category) = query.category.as_deref() {
                if document.category != category {
                    continue;
                }
            }
            if let Some(needle) = search.as_deref() {
                let title_hit = document.title.to_lowercase().contains(needle);
                let description_hit = document.description.to_lowercase().contains(needle);
                if !title_hit && !description_hit {
                    continue;
                }
            }
            if let Some(featured) = query.featured {
                if document.featured != featured {
                    continue;
                }
            }

            results.push(document);
            if results.len() >= limit {
                break;
            }
        }

        Ok(results)
    }

    /// Persist all pending writes to disk
    pub fn persist(&self) -> Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }
}

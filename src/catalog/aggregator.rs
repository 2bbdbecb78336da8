//! Catalog aggregator: the per-request fallback policy.
//!
//! Each listing request is served by exactly one source, tried in order:
//! upstream provider, document store, seed catalog. Every failure inside the
//! pipeline is absorbed and converted into a fallback decision; a listing
//! request never surfaces an upstream or store error to the caller.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::CatalogConfig;
use crate::observability::Metrics;
use crate::tmdb::{CatalogProvider, GenreMap, ListingItem, ProviderError};

use super::health::UpstreamHealth;
use super::model::{ContentKind, ContentRecord, ListingQuery};
use super::normalize;
use super::seed;
use super::store::CatalogStore;

/// Fixed editorial rows fetched on every upstream pass, in display order
const EDITORIAL_ROWS: &[(&str, ContentKind, &str)] = &[
    ("Trending Now", ContentKind::Movie, "trending/movie/week"),
    ("Popular Movies", ContentKind::Movie, "movie/popular"),
    ("Top Rated Movies", ContentKind::Movie, "movie/top_rated"),
    ("Popular Series", ContentKind::Series, "tv/popular"),
    ("Top Rated Series", ContentKind::Series, "tv/top_rated"),
];

/// Trailer enrichment scope: first rows and items of the upstream response
const ENRICH_ROWS: usize = 2;
const ENRICH_ITEMS_PER_ROW: usize = 3;

/// Which source ultimately served a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingSource {
    Tmdb,
    Db,
    Seed,
}

/// One served listing: a single-source, normalized record set
#[derive(Debug, Clone)]
pub struct Listing {
    pub source: ListingSource,
    pub records: Vec<ContentRecord>,
}

/// One planned category fetch on the upstream path
#[derive(Debug, Clone)]
struct CategoryPlan {
    name: String,
    kind: ContentKind,
    path: String,
    params: Vec<(String, String)>,
}

/// Orchestrates the three catalog sources for listing requests
pub struct Aggregator {
    provider: Option<Arc<dyn CatalogProvider>>,
    store: Option<CatalogStore>,
    health: Arc<UpstreamHealth>,
    metrics: Arc<Metrics>,
    catalog: CatalogConfig,
    per_category_default: usize,
}

impl Aggregator {
    pub fn new(
        provider: Option<Arc<dyn CatalogProvider>>,
        store: Option<CatalogStore>,
        health: Arc<UpstreamHealth>,
        metrics: Arc<Metrics>,
        catalog: CatalogConfig,
        per_category_default: usize,
    ) -> Self {
        Self {
            provider,
            store,
            health,
            metrics,
            catalog,
            per_category_default,
        }
    }

    /// Serve one listing request. Infallible by design: under any
    /// single-dependency outage the request still yields the best
    /// available tier.
    pub async fn list(&self, query: &ListingQuery) -> Listing {
        if !query.force_store {
            if let Some(provider) = &self.provider {
                if self.health.is_eligible(Instant::now()) {
                    let per_category = query.effective_per_category(self.per_category_default);

                    match self.try_upstream(provider, per_category).await {
                        Ok(records) => {
                            self.health.record_success();
                            self.metrics.listing_served_upstream();
                            return Listing {
                                source: ListingSource::Tmdb,
                                records,
                            };
                        }
                        Err(error) => {
                            warn!(error = %error, "Upstream listing failed, falling back");
                            self.health.record_failure(Instant::now());
                            self.metrics.upstream_failure();
                        }
                    }
                } else {
                    debug!("Upstream in cooldown, serving from fallback tier");
                }
            }
        }

        let limit = query.effective_limit(self.catalog.default_limit, self.catalog.max_limit);

        if let Some(store) = &self.store {
            match store.find(query, limit) {
                Ok(documents) => {
                    self.health.record_recovery();
                    self.metrics.listing_served_store();
                    let records = documents.iter().map(normalize::from_store).collect();
                    return Listing {
                        source: ListingSource::Db,
                        records,
                    };
                }
                Err(error) => {
                    warn!(error = %error, "Catalog store query failed, serving seed catalog");
                }
            }
        }

        // Any successful fallback-served response clears the failure streak;
        // the cooldown deadline stands until it expires.
        self.health.record_recovery();
        self.metrics.listing_served_seed();
        let records = seed::filter(query, limit)
            .into_iter()
            .map(normalize::from_seed)
            .collect();
        Listing {
            source: ListingSource::Seed,
            records,
        }
    }

    /// Full upstream pass: genre maps, category fan-out, bounded trailer
    /// enrichment, normalization. Any genre or category failure fails the
    /// whole pass; trailer failures only leave that item unenriched.
    async fn try_upstream(
        &self,
        provider: &Arc<dyn CatalogProvider>,
        per_category: usize,
    ) -> Result<Vec<ContentRecord>, ProviderError> {
        let (movie_genres, series_genres) = tokio::join!(
            provider.genre_map(ContentKind::Movie),
            provider.genre_map(ContentKind::Series)
        );
        let movie_genres = movie_genres?;
        let series_genres = series_genres?;

        let plan = self.build_plan(&movie_genres, &series_genres);

        let mut fetches = JoinSet::new();
        for (index, category) in plan.iter().enumerate() {
            let provider = Arc::clone(provider);
            let path = category.path.clone();
            let params = category.params.clone();
            fetches.spawn(async move { (index, provider.category_listing(&path, &params).await) });
        }

        let mut raw_rows: Vec<Vec<ListingItem>> = vec![Vec::new(); plan.len()];
        while let Some(joined) = fetches.join_next().await {
            let (index, result) =
                joined.map_err(|e| ProviderError::RequestFailed(e.to_string()))?;
            let mut items = result?;
            items.truncate(per_category);
            raw_rows[index] = items;
        }

        let mut rows: Vec<Vec<ContentRecord>> = plan
            .iter()
            .zip(&raw_rows)
            .map(|(category, items)| {
                items
                    .iter()
                    .map(|item| normalize::from_upstream(item, category.kind, &category.name))
                    .collect()
            })
            .collect();

        self.enrich_trailers(provider, &plan, &raw_rows, &mut rows).await;

        // Exactly the first item of the first category is featured
        if let Some(first) = rows.iter_mut().flatten().next() {
            first.featured = true;
        }

        Ok(rows.into_iter().flatten().collect())
    }

    /// Fixed editorial rows plus one discovery row per configured genre name
    /// the upstream resolved. Unresolved genre names are skipped silently.
    fn build_plan(&self, movie_genres: &GenreMap, series_genres: &GenreMap) -> Vec<CategoryPlan> {
        let mut plan: Vec<CategoryPlan> = EDITORIAL_ROWS
            .iter()
            .map(|(name, kind, path)| CategoryPlan {
                name: name.to_string(),
                kind: *kind,
                path: path.to_string(),
                params: Vec::new(),
            })
            .collect();

        for genre_name in &self.catalog.genre_rows {
            let lookup = genre_name.to_lowercase();
            let resolved = movie_genres
                .get(&lookup)
                .or_else(|| series_genres.get(&lookup));

            match resolved {
                Some(genre_id) => plan.push(CategoryPlan {
                    name: genre_name.clone(),
                    kind: ContentKind::Movie,
                    path: "discover/movie".to_string(),
                    params: vec![("with_genres".to_string(), genre_id.to_string())],
                }),
                None => debug!(genre = %genre_name, "Genre not in upstream map, skipping row"),
            }
        }

        plan
    }

    /// Resolve trailers for a small leading subset of the response,
    /// settle-all: individual lookup failures leave that item's trailer
    /// empty and never fail the request.
    async fn enrich_trailers(
        &self,
        provider: &Arc<dyn CatalogProvider>,
        plan: &[CategoryPlan],
        raw_rows: &[Vec<ListingItem>],
        rows: &mut [Vec<ContentRecord>],
    ) {
        let mut lookups = JoinSet::new();

        for (row_index, items) in raw_rows.iter().enumerate().take(ENRICH_ROWS) {
            let kind = plan[row_index].kind;
            for (item_index, item) in items.iter().enumerate().take(ENRICH_ITEMS_PER_ROW) {
                let provider = Arc::clone(provider);
                let external_id = item.id;
                lookups.spawn(async move {
                    (
                        row_index,
                        item_index,
                        provider.trailer_url(kind, external_id).await,
                    )
                });
            }
        }

        while let Some(joined) = lookups.join_next().await {
            let Ok((row_index, item_index, result)) = joined else {
                continue;
            };

            match result {
                Ok(Some(url)) => rows[row_index][item_index].trailer_url = url,
                Ok(None) => {}
                Err(error) => {
                    self.metrics.trailer_lookup_failed();
                    debug!(error = %error, "Trailer lookup failed, leaving item unenriched");
                }
            }
        }
    }

    /// Provider handle for the dedicated trailer endpoint
    pub fn provider(&self) -> Option<&Arc<dyn CatalogProvider>> {
        self.provider.as_ref()
    }

    pub fn health(&self) -> &Arc<UpstreamHealth> {
        &self.health
    }

    pub fn store_ready(&self) -> bool {
        self.store.as_ref().is_some_and(|store| store.is_ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::StoredContent;
    use std::time::Duration;
    use tempfile::TempDir;

    fn seed_only_aggregator() -> Aggregator {
        Aggregator::new(
            None,
            None,
            Arc::new(UpstreamHealth::new(Duration::from_secs(300))),
            Arc::new(Metrics::new()),
            CatalogConfig::default(),
            16,
        )
    }

    fn store_aggregator() -> (Aggregator, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = CatalogStore::open(temp_dir.path().join("catalog")).unwrap();
        store
            .upsert(StoredContent::new(
                "Store Movie",
                "from the store",
                "Drama",
                ContentKind::Movie,
                2021,
            ))
            .unwrap();

        let aggregator = Aggregator::new(
            None,
            Some(store),
            Arc::new(UpstreamHealth::new(Duration::from_secs(300))),
            Arc::new(Metrics::new()),
            CatalogConfig::default(),
            16,
        );
        (aggregator, temp_dir)
    }

    #[tokio::test]
    async fn no_provider_no_store_serves_seed() {
        let aggregator = seed_only_aggregator();
        let listing = aggregator.list(&ListingQuery::default()).await;

        assert_eq!(listing.source, ListingSource::Seed);
        assert!(!listing.records.is_empty());
        assert_eq!(listing.records.len(), seed::all().len());
    }

    #[tokio::test]
    async fn seed_listing_respects_kind_and_limit() {
        let aggregator = seed_only_aggregator();
        let query = ListingQuery {
            kind: Some(ContentKind::Movie),
            limit: Some(5),
            ..Default::default()
        };

        let listing = aggregator.list(&query).await;
        assert_eq!(listing.source, ListingSource::Seed);
        assert!(listing.records.len() <= 5);
        assert!(listing.records.iter().all(|r| r.kind == ContentKind::Movie));
    }

    #[tokio::test]
    async fn store_tier_wins_over_seed() {
        let (aggregator, _temp) = store_aggregator();
        let listing = aggregator.list(&ListingQuery::default()).await;

        assert_eq!(listing.source, ListingSource::Db);
        assert_eq!(listing.records.len(), 1);
        assert_eq!(listing.records[0].title, "Store Movie");
        assert!(listing.records[0].id.starts_with("db-"));
    }

    #[tokio::test]
    async fn store_response_count_matches_records() {
        let (aggregator, _temp) = store_aggregator();
        let query = ListingQuery {
            search: Some("store".to_string()),
            ..Default::default()
        };

        let listing = aggregator.list(&query).await;
        assert_eq!(listing.records.len(), 1);
    }

    #[tokio::test]
    async fn seed_serving_clears_failure_streak_but_not_cooldown() {
        let aggregator = seed_only_aggregator();
        let now = Instant::now();
        aggregator.health.record_failure(now);
        assert_eq!(aggregator.health.failure_streak(), 1);

        let listing = aggregator.list(&ListingQuery::default()).await;
        assert_eq!(listing.source, ListingSource::Seed);
        assert_eq!(aggregator.health.failure_streak(), 0);
        assert!(!aggregator.health.is_eligible(now));
    }

    #[tokio::test]
    async fn store_serving_clears_failure_streak_but_not_cooldown() {
        let (aggregator, _temp) = store_aggregator();
        let now = Instant::now();
        aggregator.health.record_failure(now);
        assert_eq!(aggregator.health.failure_streak(), 1);

        let listing = aggregator.list(&ListingQuery::default()).await;
        assert_eq!(listing.source, ListingSource::Db);
        assert_eq!(aggregator.health.failure_streak(), 0);
        // The cooldown window still stands
        assert!(!aggregator.health.is_eligible(now));
    }
}

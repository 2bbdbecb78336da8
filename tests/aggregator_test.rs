use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use reelbox::catalog::{
    Aggregator, ContentKind, ListingQuery, ListingSource, UpstreamHealth,
};
use reelbox::config::CatalogConfig;
use reelbox::observability::Metrics;
use reelbox::tmdb::{CatalogProvider, GenreMap, ListingItem, ProviderError};

/// In-memory provider standing in for the live TMDB API.
///
/// Resolves two of the configured genre rows (Action, Comedy) so the
/// fan-out plan is the five editorial rows plus two discovery rows.
struct StubProvider {
    items_per_category: usize,
    trailer: Option<String>,
    fail_genres: bool,
    fail_listings: bool,
    /// Upstream passes started (genre lookups are the entry point)
    passes: AtomicUsize,
}

impl StubProvider {
    fn healthy(items_per_category: usize) -> Self {
        Self {
            items_per_category,
            trailer: Some("https://www.youtube.com/watch?v=stub".to_string()),
            fail_genres: false,
            fail_listings: false,
            passes: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail_genres: true,
            ..Self::healthy(4)
        }
    }

    fn pass_count(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogProvider for StubProvider {
    async fn genre_map(&self, kind: ContentKind) -> Result<GenreMap, ProviderError> {
        self.passes.fetch_add(1, Ordering::SeqCst);
        if self.fail_genres {
            return Err(ProviderError::Timeout);
        }

        let mut map = HashMap::new();
        match kind {
            ContentKind::Movie => {
                map.insert("action".to_string(), 28);
                map.insert("comedy".to_string(), 35);
            }
            ContentKind::Series => {
                map.insert("drama".to_string(), 18);
            }
        }
        Ok(map)
    }

    async fn category_listing(
        &self,
        path: &str,
        _params: &[(String, String)],
    ) -> Result<Vec<ListingItem>, ProviderError> {
        if self.fail_listings {
            return Err(ProviderError::Status(500));
        }

        // Stable per-category id base so repeated passes yield identical ids
        let base = path.bytes().map(i64::from).sum::<i64>() * 1000;
        Ok((0..self.items_per_category)
            .map(|offset| ListingItem {
                id: base + offset as i64,
                title: Some(format!("Item {}", base + offset as i64)),
                release_date: Some("2021-03-01".to_string()),
                poster_path: Some("/poster.jpg".to_string()),
                backdrop_path: Some("/backdrop.jpg".to_string()),
                ..Default::default()
            })
            .collect())
    }

    async fn trailer_url(
        &self,
        _kind: ContentKind,
        _external_id: i64,
    ) -> Result<Option<String>, ProviderError> {
        Ok(self.trailer.clone())
    }
}

fn aggregator_with(provider: Arc<StubProvider>) -> Aggregator {
    Aggregator::new(
        Some(provider),
        None,
        Arc::new(UpstreamHealth::new(Duration::from_secs(300))),
        Arc::new(Metrics::new()),
        CatalogConfig::default(),
        16,
    )
}

#[tokio::test]
async fn healthy_upstream_serves_tmdb_listing() {
    let provider = Arc::new(StubProvider::healthy(4));
    let aggregator = aggregator_with(Arc::clone(&provider));

    let listing = aggregator.list(&ListingQuery::default()).await;

    assert_eq!(listing.source, ListingSource::Tmdb);
    // 5 editorial rows + Action + Comedy, 4 items each
    assert_eq!(listing.records.len(), 7 * 4);
    assert!(listing.records.iter().all(|r| r.id.starts_with("tmdb-")));
    assert_eq!(provider.pass_count(), 2); // one genre lookup per kind
}

#[tokio::test]
async fn exactly_first_upstream_record_is_featured() {
    let provider = Arc::new(StubProvider::healthy(4));
    let aggregator = aggregator_with(provider);

    let listing = aggregator.list(&ListingQuery::default()).await;

    assert!(listing.records[0].featured);
    assert_eq!(listing.records.iter().filter(|r| r.featured).count(), 1);
}

#[tokio::test]
async fn upstream_rows_keep_plan_order() {
    let provider = Arc::new(StubProvider::healthy(3));
    let aggregator = aggregator_with(provider);

    let listing = aggregator.list(&ListingQuery::default()).await;

    // The first row is always Trending Now, regardless of fetch completion order
    assert_eq!(listing.records[0].category, "Trending Now");
    assert_eq!(listing.records[3].category, "Popular Movies");
    let last = listing.records.last().unwrap();
    assert_eq!(last.category, "Comedy");
}

#[tokio::test]
async fn per_category_is_clamped_to_floor() {
    let provider = Arc::new(StubProvider::healthy(10));
    let aggregator = aggregator_with(provider);

    let query = ListingQuery {
        per_category: Some(3),
        ..Default::default()
    };
    let listing = aggregator.list(&query).await;

    // 3 is below the floor of 6, so each of the 7 rows carries 6 items
    assert_eq!(listing.records.len(), 7 * 6);
}

#[tokio::test]
async fn trailer_enrichment_covers_leading_items_only() {
    let provider = Arc::new(StubProvider::healthy(5));
    let aggregator = aggregator_with(provider);

    let listing = aggregator.list(&ListingQuery::default()).await;

    // First three items of the first row are enriched, the fourth is not
    assert!(!listing.records[0].trailer_url.is_empty());
    assert!(!listing.records[2].trailer_url.is_empty());
    assert!(listing.records[3].trailer_url.is_empty());
    // Third row (index 10 with 5 items per row) is past the enrichment scope
    assert!(listing.records[10].trailer_url.is_empty());
}

#[tokio::test]
async fn absent_trailer_leaves_item_unenriched() {
    let provider = Arc::new(StubProvider {
        trailer: None,
        ..StubProvider::healthy(4)
    });
    let aggregator = aggregator_with(provider);

    let listing = aggregator.list(&ListingQuery::default()).await;

    assert_eq!(listing.source, ListingSource::Tmdb);
    assert!(listing.records.iter().all(|r| r.trailer_url.is_empty()));
}

#[tokio::test]
async fn repeated_passes_yield_identical_ids() {
    let provider = Arc::new(StubProvider::healthy(4));
    let aggregator = aggregator_with(provider);

    let first = aggregator.list(&ListingQuery::default()).await;
    let second = aggregator.list(&ListingQuery::default()).await;

    let first_ids: Vec<_> = first.records.iter().map(|r| &r.id).collect();
    let second_ids: Vec<_> = second.records.iter().map(|r| &r.id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn upstream_failure_falls_back_and_opens_breaker() {
    let provider = Arc::new(StubProvider::failing());
    let aggregator = aggregator_with(Arc::clone(&provider));

    let listing = aggregator.list(&ListingQuery::default()).await;

    // No store configured, so the fallback lands on the seed catalog. The
    // seed-served response clears the streak again, but the cooldown the
    // failure armed keeps the upstream ineligible.
    assert_eq!(listing.source, ListingSource::Seed);
    assert_eq!(aggregator.health().failure_streak(), 0);
    assert!(!aggregator.health().is_eligible(Instant::now()));
}

#[tokio::test]
async fn breaker_cooldown_suppresses_upstream_attempts() {
    let provider = Arc::new(StubProvider::failing());
    let aggregator = aggregator_with(Arc::clone(&provider));

    aggregator.list(&ListingQuery::default()).await;
    let passes_after_first = provider.pass_count();
    assert!(passes_after_first >= 1);

    // Second request inside the cooldown window must not touch the upstream
    let listing = aggregator.list(&ListingQuery::default()).await;
    assert_eq!(listing.source, ListingSource::Seed);
    assert_eq!(provider.pass_count(), passes_after_first);
}

#[tokio::test]
async fn category_fetch_failure_fails_the_whole_pass() {
    let provider = Arc::new(StubProvider {
        fail_listings: true,
        ..StubProvider::healthy(4)
    });
    let aggregator = aggregator_with(provider);

    let listing = aggregator.list(&ListingQuery::default()).await;

    // No partial upstream responses: the pass fails as a unit
    assert_eq!(listing.source, ListingSource::Seed);
    assert!(!aggregator.health().is_eligible(Instant::now()));
}

#[tokio::test]
async fn force_store_never_touches_upstream() {
    let provider = Arc::new(StubProvider::healthy(4));
    let aggregator = aggregator_with(Arc::clone(&provider));

    let query = ListingQuery {
        force_store: true,
        ..Default::default()
    };
    let listing = aggregator.list(&query).await;

    assert_ne!(listing.source, ListingSource::Tmdb);
    assert_eq!(provider.pass_count(), 0);
}

#[tokio::test]
async fn upstream_success_resets_breaker_after_expired_cooldown() {
    let provider = Arc::new(StubProvider::healthy(4));
    let aggregator = Aggregator::new(
        Some(Arc::clone(&provider) as Arc<dyn CatalogProvider>),
        None,
        Arc::new(UpstreamHealth::new(Duration::from_millis(0))),
        Arc::new(Metrics::new()),
        CatalogConfig::default(),
        16,
    );

    // Zero cooldown: the breaker re-arms eligibility immediately
    aggregator.health().record_failure(Instant::now() - Duration::from_millis(1));
    assert_eq!(aggregator.health().failure_streak(), 1);

    let listing = aggregator.list(&ListingQuery::default()).await;

    assert_eq!(listing.source, ListingSource::Tmdb);
    assert_eq!(aggregator.health().failure_streak(), 0);
}

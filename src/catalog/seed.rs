//! Last-resort seed catalog.
//!
//! A static list of content loaded once at process start. Served when both
//! the upstream provider and the document store are unavailable, with the
//! request filters applied in-memory. Search here is a case-insensitive
//! substring match on the title only; the store's text search is broader.
//! That divergence matches the observed behavior of both tiers and is kept
//! deliberately.

use std::sync::LazyLock;

use super::model::{ContentKind, ListingQuery};

/// One seed entry. No timestamps; the seed set is immutable.
#[derive(Debug, Clone)]
pub struct SeedRecord {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub kind: ContentKind,
    pub year: i32,
    pub rating: &'static str,
    pub duration: &'static str,
    pub image: &'static str,
    pub backdrop: &'static str,
    pub featured: bool,
}

macro_rules! seed {
    ($title:expr, $slug:expr, $desc:expr, $category:expr, $kind:expr, $year:expr, $rating:expr, $duration:expr, $featured:expr) => {
        SeedRecord {
            title: $title,
            description: $desc,
            category: $category,
            kind: $kind,
            year: $year,
            rating: $rating,
            duration: $duration,
            image: concat!("https://static.reelbox.dev/posters/", $slug, ".jpg"),
            backdrop: concat!("https://static.reelbox.dev/backdrops/", $slug, ".jpg"),
            featured: $featured,
        }
    };
}

static SEED_CATALOG: LazyLock<Vec<SeedRecord>> = LazyLock::new(|| {
    use ContentKind::{Movie, Series};

    vec![
        seed!(
            "Midnight Circuit",
            "midnight-circuit",
            "A getaway driver takes one last job the night the city grid goes dark.",
            "Trending Now",
            Movie,
            2023,
            "18+",
            "2h 9m",
            true
        ),
        seed!(
            "The Glass Harbor",
            "the-glass-harbor",
            "Two rival shipwrights race to finish a lighthouse before the winter storms.",
            "Trending Now",
            Movie,
            2021,
            "13+",
            "1h 54m",
            false
        ),
        seed!(
            "Paper Satellites",
            "paper-satellites",
            "An amateur radio club stumbles onto a signal nobody else can hear.",
            "Sci-Fi",
            Movie,
            2019,
            "13+",
            "2h 1m",
            false
        ),
        seed!(
            "Verdigris",
            "verdigris",
            "A restorer discovers a forgery hidden beneath a museum's prize painting.",
            "Drama",
            Movie,
            2020,
            "13+",
            "1h 47m",
            false
        ),
        seed!(
            "Redline Sierra",
            "redline-sierra",
            "Rally drivers cross three countries with a stolen ledger in the trunk.",
            "Action",
            Movie,
            2022,
            "18+",
            "2h 12m",
            false
        ),
        seed!(
            "The Last Apiary",
            "the-last-apiary",
            "A beekeeper fights to save the valley's final hives from a land grab.",
            "Documentary",
            Movie,
            2018,
            "13+",
            "1h 38m",
            false
        ),
        seed!(
            "Hollowmere",
            "hollowmere",
            "A village's drowned church resurfaces, and so does what was buried with it.",
            "Horror",
            Movie,
            2024,
            "18+",
            "1h 52m",
            false
        ),
        seed!(
            "Counterweight",
            "counterweight",
            "Inside the orbital elevator's control room, every shift is a negotiation.",
            "Sci-Fi",
            Series,
            2023,
            "13+",
            "3 Seasons",
            false
        ),
        seed!(
            "Ashway District",
            "ashway-district",
            "Detectives work the same block across four decades of a changing city.",
            "Crime",
            Series,
            2021,
            "18+",
            "4 Seasons",
            false
        ),
        seed!(
            "Sourdough Summer",
            "sourdough-summer",
            "Eight bakers, one coastal town, and a wood-fired oven that plays favorites.",
            "Reality",
            Series,
            2022,
            "13+",
            "2 Seasons",
            false
        ),
        seed!(
            "The Cartographers",
            "the-cartographers",
            "A mapmaking family charts coastlines that keep refusing to stay put.",
            "Drama",
            Series,
            2020,
            "13+",
            "3 Seasons",
            false
        ),
        seed!(
            "Night Market",
            "night-market",
            "Street vendors in a sleepless city trade recipes, rumors, and debts.",
            "Trending Now",
            Series,
            2024,
            "13+",
            "1 Season",
            false
        ),
    ]
});

/// The full immutable seed catalog
pub fn all() -> &'static [SeedRecord] {
    &SEED_CATALOG
}

/// Apply listing filters to the seed catalog in-memory.
///
/// Kind and category are exact matches; search is a case-insensitive
/// substring match on the title; featured filters on the flag when given.
pub fn filter(query: &ListingQuery, limit: usize) -> Vec<&'static SeedRecord> {
    let search = query.search.as_deref().map(str::to_lowercase);

    SEED_CATALOG
        .iter()
        .filter(|record| match query.kind {
            Some(kind) => record.kind == kind,
            None => true,
        })
        .filter(|record| match query.category.as_deref() {
            Some(category) => record.category == category,
            None => true,
        })
        .filter(|record| match search.as_deref() {
            Some(needle) => record.title.to_lowercase().contains(needle),
            None => true,
        })
        .filter(|record| match query.featured {
            Some(featured) => record.featured == featured,
            None => true,
        })
        .take(limit)
        .collect()
}

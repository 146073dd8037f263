use std::sync::Mutex;
use std::time::Duration;

use moka::sync::Cache;

use super::domain::ProductRecord;

const MAX_LISTINGS: u64 = 10_000;
/// moka rejects time-to-live values beyond 1000 years.
const MAX_TIME_TO_LIVE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Listings the catalog service caches between writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    AllProducts,
    /// Lowercased, trimmed category name.
    Category(String),
}

/// Cache seam injected into the catalog service.
///
/// Readers capture [`CatalogCache::generation`] before loading from storage and hand it back to
/// [`CatalogCache::store`]; a listing loaded before an invalidation is never stored after it.
pub trait CatalogCache: Send + Sync {
    fn generation(&self) -> u64;
    fn cached(&self, key: &CacheKey) -> Option<Vec<ProductRecord>>;
    /// Returns `false` when `generation` is stale and the listing was dropped.
    fn store(&self, key: CacheKey, products: Vec<ProductRecord>, generation: u64) -> bool;
    fn invalidate_all(&self);
}

/// Product listings held for a fixed time-to-live.
pub struct ProductListingCache {
    listings: Cache<CacheKey, Vec<ProductRecord>>,
    time_to_live: Duration,
    // Held across the generation check and the insert so invalidation cannot interleave.
    generation: Mutex<u64>,
}

impl ProductListingCache {
    pub fn new(time_to_live: Duration) -> Self {
        let time_to_live = time_to_live.min(MAX_TIME_TO_LIVE);
        let listings = Cache::builder()
            .max_capacity(MAX_LISTINGS)
            .time_to_live(time_to_live)
            .build();
        Self {
            listings,
            time_to_live,
            generation: Mutex::new(0),
        }
    }

    pub fn time_to_live(&self) -> Duration {
        self.time_to_live
    }

    /// Approximate until [`ProductListingCache::run_pending_tasks`] has run.
    pub fn entry_count(&self) -> u64 {
        self.listings.entry_count()
    }

    /// Flush moka's pending maintenance, evicting expired and invalidated listings.
    pub fn run_pending_tasks(&self) {
        self.listings.run_pending_tasks();
    }
}

impl CatalogCache for ProductListingCache {
    fn generation(&self) -> u64 {
        *self.generation.lock().expect("cache generation mutex poisoned")
    }

    fn cached(&self, key: &CacheKey) -> Option<Vec<ProductRecord>> {
        self.listings.get(key)
    }

    fn store(&self, key: CacheKey, products: Vec<ProductRecord>, generation: u64) -> bool {
        let current = self.generation.lock().expect("cache generation mutex poisoned");
        if *current != generation {
            return false;
        }
        self.listings.insert(key, products);
        true
    }

    fn invalidate_all(&self) {
        let mut current = self.generation.lock().expect("cache generation mutex poisoned");
        *current = current.wrapping_add(1);
        self.listings.invalidate_all();
    }
}

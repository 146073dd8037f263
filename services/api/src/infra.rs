use ecobrand::catalog::{
    CatalogService, InMemoryProductRepository, InMemorySearchHistory, ProductListingCache, UserId,
};
use ecobrand::config::CatalogConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type MemoryCatalogService =
    CatalogService<InMemoryProductRepository, InMemorySearchHistory, ProductListingCache>;

/// Build a catalog backed by in-process storage. The cache handle is returned separately so the
/// server can run its eviction maintenance on a timer.
pub(crate) fn in_memory_catalog(
    config: &CatalogConfig,
) -> (Arc<MemoryCatalogService>, Arc<ProductListingCache>) {
    let cache = Arc::new(ProductListingCache::new(config.cache_ttl()));
    let service = CatalogService::new(
        Arc::new(InMemoryProductRepository::default()),
        Arc::new(InMemorySearchHistory::default()),
        cache.clone(),
        config.clone(),
    );
    (Arc::new(service), cache)
}

pub(crate) fn parse_user(raw: &str) -> Result<UserId, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("user id cannot be blank".to_string());
    }
    Ok(UserId(trimmed.to_string()))
}

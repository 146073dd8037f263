use crate::cli::ServeArgs;
use crate::infra::{in_memory_catalog, AppState};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ecobrand::catalog::ProductListingCache;
use ecobrand::config::AppConfig;
use ecobrand::error::AppError;
use ecobrand::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let (catalog_service, listing_cache) = in_memory_catalog(&config.catalog);
    tokio::spawn(maintain_listing_cache(
        listing_cache,
        config.catalog.cache_purge_interval(),
    ));

    let app = with_catalog_routes(catalog_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "eco-score service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn maintain_listing_cache(cache: Arc<ProductListingCache>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    // first tick completes immediately
    ticker.tick().await;
    loop {
        ticker.tick().await;
        cache.run_pending_tasks();
        debug!(listings = cache.entry_count(), "catalog listing cache maintained");
    }
}

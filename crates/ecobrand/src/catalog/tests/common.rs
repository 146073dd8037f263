use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::catalog::domain::{ProductDraft, ProductId, ProductRecord, UserId};
use crate::catalog::repository::{ProductRepository, RepositoryError};
use crate::catalog::{
    catalog_router, CatalogService, InMemoryProductRepository, InMemorySearchHistory,
    ProductListingCache,
};
use crate::config::CatalogConfig;
use crate::scoring::RawEnvironmentalProfile;

pub(super) type MemoryService =
    CatalogService<InMemoryProductRepository, InMemorySearchHistory, ProductListingCache>;

pub(super) fn owner() -> UserId {
    UserId("admin-7".to_string())
}

pub(super) fn build_service() -> (MemoryService, InMemoryProductRepository, InMemorySearchHistory)
{
    let repository = InMemoryProductRepository::default();
    let history = InMemorySearchHistory::default();
    let service = CatalogService::new(
        Arc::new(repository.clone()),
        Arc::new(history.clone()),
        Arc::new(ProductListingCache::new(Duration::from_secs(300))),
        CatalogConfig::default(),
    );
    (service, repository, history)
}

/// Only `recyclabilityLevel = high` is usable: 95 / A.
pub(super) fn recyclable_profile() -> RawEnvironmentalProfile {
    RawEnvironmentalProfile {
        recyclability_level: Some("High".to_string()),
        ..RawEnvironmentalProfile::default()
    }
}

/// Only `recyclabilityLevel = medium` is usable: 60 / C.
pub(super) fn middling_profile() -> RawEnvironmentalProfile {
    RawEnvironmentalProfile {
        recyclability_level: Some("medium".to_string()),
        ..RawEnvironmentalProfile::default()
    }
}

/// Heavy footprint with poor recyclability: 11.07 / E.
pub(super) fn heavy_profile() -> RawEnvironmentalProfile {
    RawEnvironmentalProfile {
        carbon_footprint_kg: Some(300.0.into()),
        water_consumption_liters: Some(5000.0.into()),
        energy_usage_kwh: Some(80.0.into()),
        recyclability_level: Some("low".to_string()),
        ..RawEnvironmentalProfile::default()
    }
}

pub(super) fn draft(name: &str, category: &str, profile: RawEnvironmentalProfile) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        category: category.to_string(),
        profile,
        ..ProductDraft::default()
    }
}

pub(super) fn create(service: &MemoryService, draft: ProductDraft) -> ProductRecord {
    service
        .create(draft, Some(owner()))
        .expect("product creation succeeds")
}

pub(super) struct ConflictRepository;

impl ProductRepository for ConflictRepository {
    fn insert(&self, _record: ProductRecord) -> Result<ProductRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: ProductRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete(&self, _id: &ProductId) -> Result<bool, RepositoryError> {
        Ok(false)
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ProductRepository for UnavailableRepository {
    fn insert(&self, _record: ProductRecord) -> Result<ProductRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn update(&self, _record: ProductRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn fetch(&self, _id: &ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn delete(&self, _id: &ProductId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

/// In-memory storage whose next `list` call blocks after loading its snapshot until resumed.
#[derive(Default, Clone)]
pub(super) struct PausingRepository {
    inner: InMemoryProductRepository,
    pause: Arc<Mutex<Option<(Sender<()>, Receiver<()>)>>>,
}

impl PausingRepository {
    /// Returns a receiver signalled once the snapshot is loaded and a sender that resumes it.
    pub(super) fn pause_next_list(&self) -> (Receiver<()>, Sender<()>) {
        let (loaded_tx, loaded_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel();
        *self.pause.lock().expect("pause mutex poisoned") = Some((loaded_tx, resume_rx));
        (loaded_rx, resume_tx)
    }
}

impl ProductRepository for PausingRepository {
    fn insert(&self, record: ProductRecord) -> Result<ProductRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: ProductRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        self.inner.delete(id)
    }

    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError> {
        let snapshot = self.inner.list()?;
        let pause = self.pause.lock().expect("pause mutex poisoned").take();
        if let Some((loaded, resume)) = pause {
            loaded.send(()).expect("test waits for the snapshot");
            resume.recv().expect("test resumes the listing");
        }
        Ok(snapshot)
    }
}

pub(super) fn service_with<R>(repository: R) -> CatalogService<R, InMemorySearchHistory, ProductListingCache>
where
    R: ProductRepository + 'static,
{
    CatalogService::new(
        Arc::new(repository),
        Arc::new(InMemorySearchHistory::default()),
        Arc::new(ProductListingCache::new(Duration::from_secs(300))),
        CatalogConfig::default(),
    )
}

pub(super) fn router_with_service(service: MemoryService) -> Router {
    catalog_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_error_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}

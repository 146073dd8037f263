use super::domain::{ProductId, ProductRecord, SearchRecord, UserId};

/// Storage abstraction for products so the service can be exercised without a database.
pub trait ProductRepository: Send + Sync {
    fn insert(&self, record: ProductRecord) -> Result<ProductRecord, RepositoryError>;
    fn update(&self, record: ProductRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, RepositoryError>;
    /// Returns `false` when nothing was stored under `id`.
    fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError>;
    /// Every stored product, newest first.
    fn list(&self) -> Result<Vec<ProductRecord>, RepositoryError>;
}

/// Append-only log of product searches.
pub trait SearchHistory: Send + Sync {
    fn record(&self, entry: SearchRecord) -> Result<(), RepositoryError>;
    /// Most recent searches by `user`, newest first.
    fn recent(&self, user: &UserId, limit: usize) -> Result<Vec<SearchRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

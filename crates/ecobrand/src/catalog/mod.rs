//! Product catalog built around the eco-score engine: storage seams, listing cache, search,
//! better-alternative ranking, and the HTTP router.

pub mod alternatives;
pub mod cache;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

pub use alternatives::AlternativeQuery;
pub use cache::{CacheKey, CatalogCache, ProductListingCache};
pub use domain::{
    split_ingredients, CategorizedProducts, ImportSummary, ProductDraft, ProductId,
    ProductRecord, ProductUpdate, RecomputeSummary, SearchRecord, UserId,
};
pub use memory::{InMemoryProductRepository, InMemorySearchHistory};
pub use repository::{ProductRepository, RepositoryError, SearchHistory};
pub use router::{catalog_router, USER_ID_HEADER};
pub use service::{sanitize_input, CatalogService, CatalogServiceError};
pub use views::{AlternativeView, CategorizedView, EcoColor, FactorView, ProductView};

#[cfg(test)]
mod tests;

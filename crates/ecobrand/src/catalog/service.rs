use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::alternatives::{rank_alternatives, AlternativeQuery};
use super::cache::{CacheKey, CatalogCache};
use super::domain::{
    CategorizedProducts, ImportSummary, ProductDraft, ProductId, ProductRecord, ProductUpdate,
    RecomputeSummary, SearchRecord, UserId,
};
use super::repository::{ProductRepository, RepositoryError, SearchHistory};
use super::views::AlternativeView;
use crate::config::CatalogConfig;
use crate::scoring::{EcoAssessment, EcoScoreEngine, ImpactLevel, RawEnvironmentalProfile};

/// Service composing the eco-score engine with product storage, search history, and the
/// listing cache.
pub struct CatalogService<R, H, C> {
    repository: Arc<R>,
    history: Arc<H>,
    cache: Arc<C>,
    engine: EcoScoreEngine,
    config: CatalogConfig,
}

static PRODUCT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_product_id() -> ProductId {
    let id = PRODUCT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProductId(format!("prod-{id:06}"))
}

/// Trim and strip angle brackets from user supplied text.
pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| *ch != '<' && *ch != '>')
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| sanitize_input(&value))
        .filter(|value| !value.is_empty())
}

impl<R, H, C> CatalogService<R, H, C>
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    pub fn new(repository: Arc<R>, history: Arc<H>, cache: Arc<C>, config: CatalogConfig) -> Self {
        Self::with_engine(repository, history, cache, config, EcoScoreEngine::standard())
    }

    pub fn with_engine(
        repository: Arc<R>,
        history: Arc<H>,
        cache: Arc<C>,
        config: CatalogConfig,
        engine: EcoScoreEngine,
    ) -> Self {
        Self {
            repository,
            history,
            cache,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn engine(&self) -> &EcoScoreEngine {
        &self.engine
    }

    /// Score an unsaved attribute bag, returning the full computation trail.
    pub fn preview(&self, raw: &RawEnvironmentalProfile) -> EcoAssessment {
        self.engine.assess(&raw.normalize())
    }

    /// Score and store a new product owned by `owner`.
    pub fn create(
        &self,
        draft: ProductDraft,
        owner: Option<UserId>,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let owner = owner
            .filter(|user| !user.0.trim().is_empty())
            .ok_or(CatalogServiceError::MissingOwner)?;
        let name = sanitize_input(&draft.name);
        if name.is_empty() {
            return Err(CatalogServiceError::InvalidProduct(
                "product name is required".to_string(),
            ));
        }

        let profile = draft.profile.normalize();
        let eco = self.engine.score(&profile);
        let now = Utc::now();
        let record = ProductRecord {
            id: next_product_id(),
            name,
            category: sanitize_input(&draft.category),
            image_url: non_blank(draft.image_url),
            analysis_date: draft.analysis_date.unwrap_or_else(|| now.date_naive()),
            profile,
            eco,
            ingredients: draft.ingredients,
            uploaded_by: owner,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(record)?;
        self.cache.invalidate_all();
        info!(
            product_id = %stored.id,
            score = ?stored.eco.score,
            letter = ?stored.eco.letter,
            "product created"
        );
        Ok(stored)
    }

    /// Apply `update` and recompute the eco score from the resulting attributes.
    pub fn update(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut record = self
            .repository
            .fetch(id)?
            .ok_or_else(|| CatalogServiceError::NotFound(id.clone()))?;

        if let Some(name) = update.name {
            let name = sanitize_input(&name);
            if name.is_empty() {
                return Err(CatalogServiceError::InvalidProduct(
                    "product name cannot be blank".to_string(),
                ));
            }
            record.name = name;
        }
        if let Some(category) = update.category {
            record.category = sanitize_input(&category);
        }
        if update.image_url.is_some() {
            record.image_url = non_blank(update.image_url);
        }
        if let Some(date) = update.analysis_date {
            record.analysis_date = date;
        }
        if let Some(ingredients) = update.ingredients {
            record.ingredients = ingredients;
        }
        if let Some(raw) = update.profile {
            record.profile = raw.normalize();
        }

        record.eco = self.engine.score(&record.profile);
        record.updated_at = Utc::now();
        self.repository.update(record.clone())?;
        self.cache.invalidate_all();
        info!(product_id = %record.id, score = ?record.eco.score, "product updated");
        Ok(record)
    }

    pub fn delete(&self, id: &ProductId) -> Result<(), CatalogServiceError> {
        if !self.repository.delete(id)? {
            return Err(CatalogServiceError::NotFound(id.clone()));
        }
        self.cache.invalidate_all();
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Delete every listed product, skipping unknown ids. Returns how many were removed.
    pub fn bulk_delete(&self, ids: &[ProductId]) -> Result<usize, CatalogServiceError> {
        let mut removed = 0;
        for id in ids {
            if self.repository.delete(id)? {
                removed += 1;
            }
        }
        self.cache.invalidate_all();
        info!(requested = ids.len(), removed, "bulk delete completed");
        Ok(removed)
    }

    pub fn get(&self, id: &ProductId) -> Result<ProductRecord, CatalogServiceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| CatalogServiceError::NotFound(id.clone()))
    }

    /// Every product, newest first.
    pub fn list(&self) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        if let Some(products) = self.cache.cached(&CacheKey::AllProducts) {
            debug!(count = products.len(), "serving cached product listing");
            return Ok(products);
        }

        let generation = self.cache.generation();
        let products = self.repository.list()?;
        if !self.cache.store(CacheKey::AllProducts, products.clone(), generation) {
            debug!("catalog changed during load; listing not cached");
        }
        Ok(products)
    }

    /// Products whose category matches `category` ignoring case and surrounding whitespace.
    pub fn list_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let wanted = category.trim().to_lowercase();
        if wanted.is_empty() {
            return Ok(Vec::new());
        }

        let key = CacheKey::Category(wanted.clone());
        if let Some(products) = self.cache.cached(&key) {
            debug!(category = %wanted, "serving cached category listing");
            return Ok(products);
        }

        let generation = self.cache.generation();
        let products: Vec<ProductRecord> = self
            .repository
            .list()?
            .into_iter()
            .filter(|record| record.category.trim().to_lowercase() == wanted)
            .collect();
        self.cache.store(key, products.clone(), generation);
        Ok(products)
    }

    pub fn list_by_owner(&self, owner: &UserId) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|record| &record.uploaded_by == owner)
            .collect())
    }

    pub fn count(&self) -> Result<usize, CatalogServiceError> {
        Ok(self.list()?.len())
    }

    /// Bucket products by their overall environmental impact rating.
    pub fn categorized(&self) -> Result<CategorizedProducts, CatalogServiceError> {
        let mut categorized = CategorizedProducts::default();
        for record in self.list()? {
            match record.impact_level() {
                Some(ImpactLevel::Low) => categorized.low.push(record),
                Some(ImpactLevel::Moderate) => categorized.moderate.push(record),
                Some(ImpactLevel::High) => categorized.high.push(record),
                None => categorized.uncategorized += 1,
            }
        }
        debug!(
            low = categorized.low.len(),
            moderate = categorized.moderate.len(),
            high = categorized.high.len(),
            uncategorized = categorized.uncategorized,
            "categorized products"
        );
        Ok(categorized)
    }

    /// Case-insensitive name search. Every non-blank query is written to the search history.
    pub fn search(
        &self,
        query: &str,
        user: Option<&UserId>,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let query = sanitize_input(query);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let needle = query.to_lowercase();
        let matches: Vec<ProductRecord> = self
            .list()?
            .into_iter()
            .filter(|record| record.name.to_lowercase().contains(&needle))
            .take(self.config.search_limit)
            .collect();

        let first = matches.first();
        self.history.record(SearchRecord {
            user_id: user.cloned(),
            query: query.clone(),
            created_at: Utc::now(),
            product_id: first.map(|record| record.id.clone()),
            searched_product_name: first.map(|record| record.name.clone()),
            is_found: first.is_some(),
            eco_score: first.and_then(ProductRecord::eco_score),
            eco_letter: first.and_then(ProductRecord::eco_letter),
        })?;

        info!(query = %query, hits = matches.len(), "product search");
        Ok(matches)
    }

    /// Distinct product names containing `query`, for type-ahead.
    pub fn suggestions(&self, query: &str) -> Result<Vec<String>, CatalogServiceError> {
        let needle = sanitize_input(query).to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        Ok(self
            .list()?
            .into_iter()
            .map(|record| record.name)
            .filter(|name| name.to_lowercase().contains(&needle))
            .filter(|name| seen.insert(name.clone()))
            .take(self.config.suggestion_limit)
            .collect())
    }

    pub fn search_history(&self, user: &UserId) -> Result<Vec<SearchRecord>, CatalogServiceError> {
        Ok(self.history.recent(user, self.config.history_limit)?)
    }

    /// Rescore every stored product with the current engine.
    pub fn recompute_all(&self) -> Result<RecomputeSummary, CatalogServiceError> {
        let mut summary = RecomputeSummary::default();
        for mut record in self.repository.list()? {
            summary.processed += 1;
            let eco = self.engine.score(&record.profile);
            if eco != record.eco {
                record.eco = eco;
                record.updated_at = Utc::now();
                self.repository.update(record)?;
                summary.changed += 1;
            }
        }

        if summary.changed > 0 {
            self.cache.invalidate_all();
        }
        info!(
            processed = summary.processed,
            changed = summary.changed,
            "eco scores recomputed"
        );
        Ok(summary)
    }

    /// Create every draft on behalf of `owner`. Drafts the catalog rejects are skipped.
    pub fn import(
        &self,
        drafts: Vec<ProductDraft>,
        owner: &UserId,
    ) -> Result<ImportSummary, CatalogServiceError> {
        let mut summary = ImportSummary::default();
        for draft in drafts {
            match self.create(draft, Some(owner.clone())) {
                Ok(record) => {
                    summary.imported += 1;
                    if record.eco.is_scored() {
                        summary.scored += 1;
                    } else {
                        summary.unscored += 1;
                    }
                }
                Err(CatalogServiceError::InvalidProduct(reason)) => {
                    warn!(%reason, "skipping imported product");
                    summary.skipped += 1;
                }
                Err(other) => return Err(other),
            }
        }

        info!(
            imported = summary.imported,
            scored = summary.scored,
            unscored = summary.unscored,
            skipped = summary.skipped,
            "catalog import completed"
        );
        Ok(summary)
    }

    /// Suggest better-scoring substitutes for the product named by `query`.
    pub fn alternatives(
        &self,
        query: &AlternativeQuery,
    ) -> Result<Vec<AlternativeView>, CatalogServiceError> {
        let product_id = query
            .product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let product_name = query
            .product_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        let products = self.list()?;
        let base = match (product_id, product_name) {
            (None, None) => return Err(CatalogServiceError::MissingAlternativeTarget),
            (id, name) => products
                .iter()
                .find(|record| id.is_some_and(|id| record.id.0 == id))
                .or_else(|| {
                    products.iter().find(|record| {
                        name.is_some_and(|name| record.name.trim().eq_ignore_ascii_case(name))
                    })
                }),
        };
        let base = base.ok_or_else(|| {
            CatalogServiceError::NotFound(ProductId(
                product_id.or(product_name).unwrap_or_default().to_string(),
            ))
        })?;

        let count = match query.count {
            None | Some(0) => self.config.default_alternatives,
            Some(count) => count,
        }
        .clamp(1, self.config.max_alternatives.max(1));

        let ranked = rank_alternatives(base, &products, count);
        debug!(base = %base.id, returned = ranked.len(), "ranked alternatives");
        Ok(ranked.into_iter().map(AlternativeView::from).collect())
    }
}

/// Service errors surfaced to the router and CLI.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("an owning user id is required")]
    MissingOwner,
    #[error("invalid product: {0}")]
    InvalidProduct(String),
    #[error("productId or productName is required")]
    MissingAlternativeTarget,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

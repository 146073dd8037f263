use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::alternatives::AlternativeQuery;
use super::cache::CatalogCache;
use super::domain::{ProductDraft, ProductId, ProductUpdate, UserId};
use super::repository::{ProductRepository, SearchHistory};
use super::service::{CatalogService, CatalogServiceError};
use super::views::{CategorizedView, ProductView};
use crate::error::AppError;
use crate::scoring::RawEnvironmentalProfile;

/// Header carrying the authenticated user id, set by the upstream gateway.
pub const USER_ID_HEADER: &str = "x-user-id";

type SharedService<R, H, C> = Arc<CatalogService<R, H, C>>;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BulkDeleteRequest {
    ids: Vec<String>,
}

/// Router builder exposing the eco-score preview and catalog endpoints.
pub fn catalog_router<R, H, C>(service: SharedService<R, H, C>) -> Router
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    Router::new()
        .route("/api/v1/eco-score", post(preview_handler::<R, H, C>))
        .route(
            "/api/v1/products",
            get(list_handler::<R, H, C>).post(create_handler::<R, H, C>),
        )
        .route(
            "/api/v1/products/:product_id",
            get(get_handler::<R, H, C>)
                .put(update_handler::<R, H, C>)
                .delete(delete_handler::<R, H, C>),
        )
        .route("/api/v1/catalog/search", get(search_handler::<R, H, C>))
        .route(
            "/api/v1/catalog/suggestions",
            get(suggestions_handler::<R, H, C>),
        )
        .route(
            "/api/v1/catalog/categorized",
            get(categorized_handler::<R, H, C>),
        )
        .route(
            "/api/v1/catalog/categories/:category",
            get(category_handler::<R, H, C>),
        )
        .route(
            "/api/v1/catalog/alternatives",
            get(alternatives_handler::<R, H, C>),
        )
        .route(
            "/api/v1/catalog/bulk-delete",
            post(bulk_delete_handler::<R, H, C>),
        )
        .route(
            "/api/v1/catalog/recompute",
            post(recompute_handler::<R, H, C>),
        )
        .route("/api/v1/catalog/history", get(history_handler::<R, H, C>))
        .with_state(service)
}

fn user_from_headers(headers: &HeaderMap) -> Option<UserId> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()))
}

fn error_response(error: CatalogServiceError) -> Response {
    AppError::from(error).into_response()
}

pub(crate) async fn preview_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    axum::Json(profile): axum::Json<RawEnvironmentalProfile>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    let assessment = service.preview(&profile);
    (StatusCode::OK, axum::Json(assessment)).into_response()
}

pub(crate) async fn list_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.list() {
        Ok(records) => {
            let views: Vec<ProductView> = records.iter().map(ProductView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<ProductDraft>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.create(draft, user_from_headers(&headers)) {
        Ok(record) => (StatusCode::CREATED, axum::Json(ProductView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Path(product_id): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.get(&ProductId(product_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(ProductView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Path(product_id): Path<String>,
    axum::Json(update): axum::Json<ProductUpdate>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.update(&ProductId(product_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(ProductView::from(&record))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Path(product_id): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.delete(&ProductId(product_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn search_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    let user = user_from_headers(&headers);
    match service.search(&params.q, user.as_ref()) {
        Ok(records) => {
            let views: Vec<ProductView> = records.iter().map(ProductView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn suggestions_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.suggestions(&params.q) {
        Ok(names) => (StatusCode::OK, axum::Json(names)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn categorized_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.categorized() {
        Ok(categorized) => {
            (StatusCode::OK, axum::Json(CategorizedView::from(&categorized))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn category_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Path(category): Path<String>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.list_by_category(&category) {
        Ok(records) => {
            let views: Vec<ProductView> = records.iter().map(ProductView::from).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn alternatives_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    Query(query): Query<AlternativeQuery>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.alternatives(&query) {
        Ok(alternatives) => (StatusCode::OK, axum::Json(alternatives)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn bulk_delete_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    axum::Json(request): axum::Json<BulkDeleteRequest>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    let ids: Vec<ProductId> = request.ids.into_iter().map(ProductId).collect();
    match service.bulk_delete(&ids) {
        Ok(deleted) => {
            let payload = json!({
                "requested": ids.len(),
                "deleted": deleted,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recompute_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    match service.recompute_all() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, H, C>(
    State(service): State<SharedService<R, H, C>>,
    headers: HeaderMap,
) -> Response
where
    R: ProductRepository + 'static,
    H: SearchHistory + 'static,
    C: CatalogCache + 'static,
{
    let Some(user) = user_from_headers(&headers) else {
        return error_response(CatalogServiceError::MissingOwner);
    };
    match service.search_history(&user) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::catalog::router::{create_handler, list_handler};
use crate::catalog::{InMemorySearchHistory, ProductListingCache, USER_ID_HEADER};

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(USER_ID_HEADER, "admin-7")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn eco_score_route_returns_assessment() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/eco-score",
            json!({
                "carbonFootprintKg": "300 kg",
                "waterConsumptionLiters": 5000,
                "energyUsageKwh": 80,
                "recyclabilityLevel": "Low"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("score").and_then(Value::as_f64), Some(11.07));
    assert_eq!(payload.get("letter"), Some(&json!("E")));
    assert_eq!(
        payload
            .get("components")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(4)
    );
}

#[tokio::test]
async fn eco_score_route_returns_nulls_for_empty_profile() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request("POST", "/api/v1/eco-score", json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("score"), Some(&Value::Null));
    assert_eq!(payload.get("letter"), Some(&Value::Null));
}

#[tokio::test]
async fn create_route_requires_user_header() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/products")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(&json!({ "name": "Cup" })).unwrap(),
        ))
        .unwrap();
    let response = router.oneshot(request).await.expect("route executes");

    assert_error_status(&response, StatusCode::UNAUTHORIZED);
    let payload = read_json_body(response).await;
    assert!(payload.get("error").and_then(Value::as_str).is_some());
}

#[tokio::test]
async fn product_lifecycle_over_http() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let created = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/products",
            json!({
                "name": "Glass Bottle",
                "category": "Kitchen",
                "analysis_date": "2024-03-01",
                "profile": { "recyclabilityLevel": "High" },
                "ingredients": "glass, cork"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(created.status(), StatusCode::CREATED);
    let payload = read_json_body(created).await;
    assert_eq!(payload.get("eco"), Some(&json!("95/100")));
    assert_eq!(payload.get("eco_color"), Some(&json!("#1b9e3e")));
    assert_eq!(payload.get("date"), Some(&json!("2024-03-01")));
    assert_eq!(payload.get("impact"), Some(&json!("N/A")));
    let id = payload
        .get("id")
        .and_then(Value::as_str)
        .expect("id present")
        .to_string();

    let updated = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/products/{id}"),
            json!({ "profile": { "recyclabilityLevel": "low" } }),
        ))
        .await
        .expect("route executes");
    assert_eq!(updated.status(), StatusCode::OK);
    let payload = read_json_body(updated).await;
    assert_eq!(payload.get("eco_letter"), Some(&json!("E")));
    assert_eq!(payload.get("eco"), Some(&json!("20/100")));

    let deleted = router
        .clone()
        .oneshot(
            Request::delete(format!("/api/v1/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let fetched = router
        .oneshot(
            Request::get(format!("/api/v1/products/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_error_status(&fetched, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_route_rejects_blank_names() {
    let (service, _, _) = build_service();
    let record = create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    let router = router_with_service(service);

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/products/{}", record.id),
            json!({ "name": "   " }),
        ))
        .await
        .expect("route executes");

    assert_error_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn search_and_history_routes_track_the_user() {
    let (service, _, _) = build_service();
    create(&service, draft("Bamboo Cup", "Kitchen", recyclable_profile()));
    let router = router_with_service(service);

    let search = router
        .clone()
        .oneshot(
            Request::get("/api/v1/catalog/search?q=bamboo")
                .header(USER_ID_HEADER, "admin-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(search.status(), StatusCode::OK);
    let hits = read_json_body(search).await;
    assert_eq!(hits.as_array().map(Vec::len), Some(1));

    let history = router
        .clone()
        .oneshot(
            Request::get("/api/v1/catalog/history")
                .header(USER_ID_HEADER, "admin-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(history.status(), StatusCode::OK);
    let entries = read_json_body(history).await;
    assert_eq!(entries[0]["query"], json!("bamboo"));
    assert_eq!(entries[0]["is_found"], json!(true));

    let anonymous = router
        .oneshot(
            Request::get("/api/v1/catalog/history")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_error_status(&anonymous, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn alternatives_route_requires_a_target() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/catalog/alternatives?count=3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_error_status(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn categorized_and_bulk_delete_routes() {
    let (service, _, _) = build_service();
    let cup = create(&service, draft("Cup", "Kitchen", recyclable_profile()));
    create(&service, draft("Pan", "Kitchen", recyclable_profile()));
    let router = router_with_service(service);

    let categorized = router
        .clone()
        .oneshot(
            Request::get("/api/v1/catalog/categorized")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(categorized.status(), StatusCode::OK);
    let payload = read_json_body(categorized).await;
    assert_eq!(payload["uncategorized"], json!(2));

    let deleted = router
        .oneshot(json_request(
            "POST",
            "/api/v1/catalog/bulk-delete",
            json!({ "ids": [cup.id.0, "prod-unknown"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(deleted.status(), StatusCode::OK);
    let payload = read_json_body(deleted).await;
    assert_eq!(payload["requested"], json!(2));
    assert_eq!(payload["deleted"], json!(1));
}

#[tokio::test]
async fn create_handler_returns_conflict_on_duplicate() {
    let service = Arc::new(service_with(ConflictRepository));
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, HeaderValue::from_static("admin-7"));

    let response = create_handler::<ConflictRepository, InMemorySearchHistory, ProductListingCache>(
        State(service),
        headers,
        axum::Json(draft("Cup", "Kitchen", recyclable_profile())),
    )
    .await;

    assert_error_status(&response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(service_with(UnavailableRepository));

    let response =
        list_handler::<UnavailableRepository, InMemorySearchHistory, ProductListingCache>(State(
            service,
        ))
        .await;

    assert_error_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
}

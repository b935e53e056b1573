use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::offers::router::remove_handler;
use crate::offers::OfferDeskService;

fn post_json(uri: &str, payload: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn query_payload() -> Value {
    json!({
        "borrower": {
            "id": "B-100",
            "first_name": "Olena",
            "last_name": "Koval",
            "monthly_income": "50000",
            "credit_score": 750
        },
        "requested_amount": "150000",
        "term_months": 60
    })
}

fn decimal(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal rendered as string")
        .parse()
        .expect("valid decimal")
}

fn payload_ids(payload: &Value) -> Vec<String> {
    payload
        .as_array()
        .expect("array payload")
        .iter()
        .map(|view| view["id"].as_str().expect("id").to_string())
        .collect()
}

#[tokio::test]
async fn list_route_renders_offer_views() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/offers"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload_ids(&payload), ["A", "B", "C"]);
    assert_eq!(decimal(&payload[1]["payments"]["monthly"]), dec!(4660));
    assert_eq!(payload[2]["kind"], "MORTGAGE");
    assert_eq!(payload[2]["metric"]["metric"], "loan_to_value");
}

#[tokio::test]
async fn lenders_route_lists_and_filters_by_rating() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/lenders"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(3));
    assert_eq!(payload[1]["name"], "Beta Bank");
    assert_eq!(payload[1]["license_number"], "Beta Bank-001");

    let response = router
        .oneshot(get("/api/v1/lenders?min_rating=4.6"))
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
    assert_eq!(payload[0]["name"], "Beta Bank");
    assert_eq!(payload[0]["rating"], 4.8);
}

#[tokio::test]
async fn best_route_orders_matching_offers_by_rate() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/offers/search/best", &query_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(payload_ids(&read_json_body(response).await), ["C", "B"]);
}

#[tokio::test]
async fn matching_route_returns_empty_list_for_incomplete_query() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/offers/search/matching",
            &json!({ "term_months": 60 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await, json!([]));
}

#[tokio::test]
async fn range_route_reads_query_parameters() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/offers/search/range?min=100000&max=200000"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(payload_ids(&read_json_body(response).await), ["B", "A"]);
}

#[tokio::test]
async fn optimal_route_returns_not_found_without_candidates() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/offers/select/optimal",
            &json!({ "preferences": { "prefer_early_repayment": true } }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn optimal_route_selects_cheapest_offer() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/offers/select/optimal",
            &json!({ "query": query_payload() }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], "C");
    assert_eq!(payload["lender"], "Gamma Bank");
}

#[tokio::test]
async fn top_route_honours_requested_count() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/offers/select/top?n=1", &query_payload()))
        .await
        .expect("route executes");

    assert_eq!(payload_ids(&read_json_body(response).await), ["C"]);
}

#[tokio::test]
async fn kind_route_matches_case_insensitively() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/offers/select/kind/consumer"))
        .await
        .expect("route executes");

    assert_eq!(payload_ids(&read_json_body(response).await), ["B", "A"]);
}

#[tokio::test]
async fn add_route_creates_offer_and_rejects_empty_ids() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let offer = json!({
        "id": "CAR9",
        "lender": { "name": "Gamma Bank", "license_number": "G-9", "rating": 4.5 },
        "principal": "150000",
        "interest_rate": "16.2",
        "term_months": 48,
        "originated_on": "2024-02-01",
        "kind": "CAR",
        "brand": "BMW",
        "model": "X5",
        "model_year": 2021,
        "car_value": "180000",
        "is_new": false
    });

    let response = router
        .clone()
        .oneshot(post_json("/api/v1/offers", &offer))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(decimal(&payload["payments"]["monthly"]), dec!(4260));
    assert_eq!(decimal(&payload["metric"]["value"]), dec!(83.33));

    let mut blank = offer.clone();
    blank["id"] = json!("");
    let response = router
        .oneshot(post_json("/api/v1/offers", &blank))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn offer_route_reports_missing_ids() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/offers/NOPE"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(response).await["offer_id"], "NOPE");
}

#[tokio::test]
async fn remove_handler_deletes_then_reports_not_found() {
    let (service, _) = build_service();
    let service = Arc::new(service);

    let response =
        remove_handler::<MemoryStore>(State(service.clone()), Path("A".to_string())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = remove_handler::<MemoryStore>(State(service), Path("A".to_string())).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_route_after_unavailable_store_uses_seed() {
    let service = OfferDeskService::load_or_seed(Arc::new(UnavailableStore), scenario_snapshot);
    let router = crate::offers::offer_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/offers"))
        .await
        .expect("route executes");
    assert_eq!(payload_ids(&read_json_body(response).await).len(), 3);
}

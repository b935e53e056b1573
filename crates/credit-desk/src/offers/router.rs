use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

use super::domain::{LoanOffer, OfferQuery, SelectionPreferences};
use super::search::BEST_OFFER_LIMIT;
use super::service::{OfferDeskService, OfferServiceError};
use super::store::OfferStore;
use super::views::OfferView;

type Desk<S> = State<Arc<OfferDeskService<S>>>;

/// Router builder exposing the catalog, lender, search, and selection endpoints.
pub fn offer_router<S>(service: Arc<OfferDeskService<S>>) -> Router
where
    S: OfferStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/offers",
            get(list_handler::<S>).post(add_handler::<S>),
        )
        .route(
            "/api/v1/offers/:offer_id",
            get(offer_handler::<S>).delete(remove_handler::<S>),
        )
        .route(
            "/api/v1/offers/search/matching",
            post(matching_handler::<S>),
        )
        .route("/api/v1/offers/search/best", post(best_handler::<S>))
        .route("/api/v1/offers/search/range", get(range_handler::<S>))
        .route(
            "/api/v1/offers/search/top-rated",
            get(top_rated_handler::<S>),
        )
        .route(
            "/api/v1/offers/search/flexible",
            get(flexible_handler::<S>),
        )
        .route(
            "/api/v1/offers/search/early-repayment",
            get(early_repayment_handler::<S>),
        )
        .route(
            "/api/v1/offers/search/credit-line-increase",
            get(credit_line_handler::<S>),
        )
        .route(
            "/api/v1/offers/select/optimal",
            post(optimal_handler::<S>),
        )
        .route(
            "/api/v1/offers/select/lowest-total",
            post(lowest_total_handler::<S>),
        )
        .route(
            "/api/v1/offers/select/lowest-monthly",
            post(lowest_monthly_handler::<S>),
        )
        .route("/api/v1/offers/select/top", post(top_handler::<S>))
        .route(
            "/api/v1/offers/select/lender/:name",
            get(by_lender_handler::<S>),
        )
        .route(
            "/api/v1/offers/select/kind/:kind",
            get(by_kind_handler::<S>),
        )
        .route("/api/v1/lenders", get(lenders_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AmountRange {
    min: Option<Decimal>,
    max: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MinimumAmount {
    min: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TopParams {
    n: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MinimumRating {
    min_rating: Option<f64>,
}

/// Body of the optimal-selection endpoint.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct OptimalRequest {
    #[serde(default)]
    query: OfferQuery,
    #[serde(default)]
    preferences: SelectionPreferences,
}

pub(crate) async fn list_handler<S>(State(service): Desk<S>) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.offers())
}

pub(crate) async fn add_handler<S>(
    State(service): Desk<S>,
    Json(offer): Json<LoanOffer>,
) -> Response
where
    S: OfferStore + 'static,
{
    match service.add_offer(offer) {
        Ok(offer) => (StatusCode::CREATED, Json(OfferView::from(&offer))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn offer_handler<S>(
    State(service): Desk<S>,
    Path(offer_id): Path<String>,
) -> Response
where
    S: OfferStore + 'static,
{
    match service.offer(&offer_id) {
        Ok(Some(offer)) => (StatusCode::OK, Json(OfferView::from(&offer))).into_response(),
        Ok(None) => not_found(json!({
            "offer_id": offer_id,
            "error": "offer not found",
        })),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn remove_handler<S>(
    State(service): Desk<S>,
    Path(offer_id): Path<String>,
) -> Response
where
    S: OfferStore + 'static,
{
    match service.remove_offer(&offer_id) {
        Ok(0) => not_found(json!({
            "offer_id": offer_id,
            "error": "offer not found",
        })),
        Ok(removed) => {
            let payload = json!({
                "offer_id": offer_id,
                "removed": removed,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn matching_handler<S>(
    State(service): Desk<S>,
    Json(query): Json<OfferQuery>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.matching_offers(&query)))
}

pub(crate) async fn best_handler<S>(
    State(service): Desk<S>,
    Json(query): Json<OfferQuery>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.best_offers(&query)))
}

pub(crate) async fn range_handler<S>(
    State(service): Desk<S>,
    Query(range): Query<AmountRange>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.lowest_rate_in_range(range.min, range.max)))
}

pub(crate) async fn top_rated_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<MinimumAmount>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.best_lender_rating(params.min)))
}

pub(crate) async fn flexible_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<MinimumAmount>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.flexible_offers(params.min)))
}

pub(crate) async fn early_repayment_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<MinimumAmount>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.with_early_repayment(params.min)))
}

pub(crate) async fn credit_line_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<MinimumAmount>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.search(|engine| engine.with_credit_line_increase(params.min)))
}

pub(crate) async fn optimal_handler<S>(
    State(service): Desk<S>,
    Json(request): Json<OptimalRequest>,
) -> Response
where
    S: OfferStore + 'static,
{
    single_offer(service.select(|engine| {
        engine.select_optimal(&request.query, request.preferences)
    }))
}

pub(crate) async fn lowest_total_handler<S>(
    State(service): Desk<S>,
    Json(query): Json<OfferQuery>,
) -> Response
where
    S: OfferStore + 'static,
{
    single_offer(service.select(|engine| engine.select_by_lowest_total_payment(&query)))
}

pub(crate) async fn lowest_monthly_handler<S>(
    State(service): Desk<S>,
    Json(query): Json<OfferQuery>,
) -> Response
where
    S: OfferStore + 'static,
{
    single_offer(service.select(|engine| engine.select_by_lowest_monthly_payment(&query)))
}

pub(crate) async fn top_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<TopParams>,
    Json(query): Json<OfferQuery>,
) -> Response
where
    S: OfferStore + 'static,
{
    let n = params.n.unwrap_or(BEST_OFFER_LIMIT);
    offer_list(service.select(|engine| engine.top_n(&query, n)))
}

pub(crate) async fn by_lender_handler<S>(
    State(service): Desk<S>,
    Path(name): Path<String>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.select(|engine| engine.select_by_lender(&name)))
}

pub(crate) async fn by_kind_handler<S>(
    State(service): Desk<S>,
    Path(kind): Path<String>,
) -> Response
where
    S: OfferStore + 'static,
{
    offer_list(service.select(|engine| engine.select_by_kind(&kind)))
}

pub(crate) async fn lenders_handler<S>(
    State(service): Desk<S>,
    Query(params): Query<MinimumRating>,
) -> Response
where
    S: OfferStore + 'static,
{
    let lenders = match params.min_rating {
        Some(min_rating) => service.lenders_rated_at_least(min_rating),
        None => service.lenders(),
    };
    match lenders {
        Ok(lenders) => (StatusCode::OK, Json(lenders)).into_response(),
        Err(error) => error_response(error),
    }
}

fn offer_list(result: Result<Vec<LoanOffer>, OfferServiceError>) -> Response {
    match result {
        Ok(offers) => (StatusCode::OK, Json(OfferView::collect(&offers))).into_response(),
        Err(error) => error_response(error),
    }
}

fn single_offer(result: Result<Option<LoanOffer>, OfferServiceError>) -> Response {
    match result {
        Ok(Some(offer)) => (StatusCode::OK, Json(OfferView::from(&offer))).into_response(),
        Ok(None) => not_found(json!({
            "error": "no eligible offer",
        })),
        Err(error) => error_response(error),
    }
}

fn not_found(payload: serde_json::Value) -> Response {
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn error_response(error: OfferServiceError) -> Response {
    AppError::from(error).into_response()
}

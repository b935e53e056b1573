use std::sync::{Arc, Mutex};

use axum::response::Response;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::offers::domain::{
    BorrowerProfile, CarTerms, ConsumerTerms, LenderRating, LoanOffer, MortgageTerms,
    OfferDetails, OfferQuery,
};
use crate::offers::lenders::SharedLender;
use crate::offers::store::{OfferStore, StoreError};
use crate::offers::{offer_router, CatalogSnapshot, OfferCatalog, OfferDeskService};

pub(super) fn lender(name: &str, rating: f64) -> SharedLender {
    Arc::new(LenderRating::new(name, format!("{name}-001"), rating).expect("valid lender"))
}

pub(super) fn consumer_offer(
    id: &str,
    lender: &SharedLender,
    principal: Decimal,
    rate: Decimal,
    term_months: i32,
) -> LoanOffer {
    LoanOffer::new(
        id,
        Some(lender.clone()),
        principal,
        rate,
        term_months,
        OfferDetails::Consumer(ConsumerTerms {
            purpose: "GENERAL".to_string(),
            requires_collateral: false,
            max_amount: Some(principal * dec!(2)),
        }),
    )
}

pub(super) fn mortgage_offer(
    id: &str,
    lender: &SharedLender,
    principal: Decimal,
    rate: Decimal,
    term_months: i32,
) -> LoanOffer {
    LoanOffer::new(
        id,
        Some(lender.clone()),
        principal,
        rate,
        term_months,
        OfferDetails::Mortgage(MortgageTerms {
            property_value: Some(principal + dec!(100000)),
            down_payment: Some(dec!(100000)),
            property_type: "APARTMENT".to_string(),
        }),
    )
}

pub(super) fn car_offer(
    id: &str,
    lender: &SharedLender,
    principal: Decimal,
    rate: Decimal,
    term_months: i32,
) -> LoanOffer {
    LoanOffer::new(
        id,
        Some(lender.clone()),
        principal,
        rate,
        term_months,
        OfferDetails::Car(CarTerms {
            brand: "Skoda".to_string(),
            model: "Octavia".to_string(),
            model_year: 2022,
            car_value: Some(principal + dec!(50000)),
            is_new: false,
        }),
    )
}

/// A(15.0, 4.5, 100000, 60m), B(14.0, 4.8, 200000, 60m), C(12.0, 4.5, 500000, 240m).
pub(super) fn scenario_catalog() -> OfferCatalog {
    let alpha = lender("Alpha Bank", 4.5);
    let beta = lender("Beta Bank", 4.8);
    let gamma = lender("Gamma Bank", 4.5);
    [
        consumer_offer("A", &alpha, dec!(100000), dec!(15.0), 60),
        consumer_offer("B", &beta, dec!(200000), dec!(14.0), 60),
        mortgage_offer("C", &gamma, dec!(500000), dec!(12.0), 240),
    ]
    .into_iter()
    .collect()
}

pub(super) fn borrower() -> BorrowerProfile {
    BorrowerProfile::new("B-100", dec!(50000), 750).named("Olena", "Koval")
}

pub(super) fn scenario_query() -> OfferQuery {
    OfferQuery::new(borrower(), dec!(150000), 60)
}

pub(super) fn ids(offers: &[LoanOffer]) -> Vec<&str> {
    offers.iter().map(|offer| offer.id.as_str()).collect()
}

pub(super) fn scenario_snapshot() -> CatalogSnapshot {
    let offers = scenario_catalog().find_all();
    let lenders = offers
        .iter()
        .filter_map(|offer| offer.lender.as_deref().cloned())
        .collect();
    CatalogSnapshot { lenders, offers }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    pub(super) lenders: Arc<Mutex<Vec<LenderRating>>>,
    pub(super) offers: Arc<Mutex<Vec<LoanOffer>>>,
}

impl OfferStore for MemoryStore {
    fn load_lenders(&self) -> Result<Vec<LenderRating>, StoreError> {
        Ok(self.lenders.lock().expect("store mutex poisoned").clone())
    }

    fn load_offers(&self) -> Result<Vec<LoanOffer>, StoreError> {
        Ok(self.offers.lock().expect("store mutex poisoned").clone())
    }

    fn save_lenders(&self, lenders: &[LenderRating]) -> Result<(), StoreError> {
        *self.lenders.lock().expect("store mutex poisoned") = lenders.to_vec();
        Ok(())
    }

    fn save_offers(&self, offers: &[LoanOffer]) -> Result<(), StoreError> {
        *self.offers.lock().expect("store mutex poisoned") = offers.to_vec();
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl OfferStore for UnavailableStore {
    fn load_lenders(&self) -> Result<Vec<LenderRating>, StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn load_offers(&self) -> Result<Vec<LoanOffer>, StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn save_lenders(&self, _lenders: &[LenderRating]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn save_offers(&self, _offers: &[LoanOffer]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn build_service() -> (OfferDeskService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = OfferDeskService::new(store.clone(), scenario_snapshot());
    (service, store)
}

pub(super) fn router_with_service(service: OfferDeskService<MemoryStore>) -> axum::Router {
    offer_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

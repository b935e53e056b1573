use credit_desk::config::AppConfig;
use credit_desk::error::AppError;
use credit_desk::offers::{
    CarTerms, CatalogSnapshot, ConsumerTerms, JsonFileStore, LenderRating, LoanOffer,
    MortgageTerms, OfferDeskService, OfferDetails,
};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|err| format!("failed to parse '{raw}' as a decimal amount ({err})"))
}

/// CLI override first, configured directory otherwise.
pub(crate) fn resolve_data_dir(data_dir: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match data_dir {
        Some(dir) => Ok(dir),
        None => Ok(AppConfig::load()?.storage.data_dir),
    }
}

/// Offer desk backed by the JSON files in `data_dir`, seeded when they hold nothing usable.
pub(crate) fn open_offer_desk(data_dir: PathBuf) -> OfferDeskService<JsonFileStore> {
    let store = Arc::new(JsonFileStore::new(data_dir));
    OfferDeskService::load_or_seed(store, seed_snapshot)
}

fn seed_lender(name: &str, license_number: &str, rating: f64) -> Option<LenderRating> {
    LenderRating::new(name, license_number, rating).ok()
}

/// Four lenders and six offers covering every offer kind.
pub(crate) fn seed_snapshot() -> CatalogSnapshot {
    let lenders: Vec<LenderRating> = [
        ("PrivatBank", "PB001", 4.8),
        ("Oschadbank", "OSB002", 4.6),
        ("Raiffeisen Bank", "RB003", 4.9),
        ("Monobank", "MB004", 4.7),
    ]
    .into_iter()
    .filter_map(|(name, license, rating)| seed_lender(name, license, rating))
    .collect();

    let by_name = |name: &str| {
        lenders
            .iter()
            .find(|lender| lender.name() == name)
            .cloned()
            .map(Arc::new)
    };

    let offers = vec![
        LoanOffer::new(
            "M001",
            by_name("PrivatBank"),
            Decimal::from(500_000),
            Decimal::new(125, 1),
            240,
            OfferDetails::Mortgage(MortgageTerms {
                property_value: Some(Decimal::from(600_000)),
                down_payment: Some(Decimal::from(100_000)),
                property_type: "APARTMENT".to_string(),
            }),
        )
        .with_early_repayment(true),
        LoanOffer::new(
            "M002",
            by_name("Oschadbank"),
            Decimal::from(800_000),
            Decimal::new(118, 1),
            300,
            OfferDetails::Mortgage(MortgageTerms {
                property_value: Some(Decimal::from(1_000_000)),
                down_payment: Some(Decimal::from(200_000)),
                property_type: "HOUSE".to_string(),
            }),
        )
        .with_early_repayment(true)
        .with_credit_line_increase(true),
        LoanOffer::new(
            "C001",
            by_name("Raiffeisen Bank"),
            Decimal::from(50_000),
            Decimal::new(185, 1),
            60,
            OfferDetails::Consumer(ConsumerTerms {
                purpose: "HOME_RENOVATION".to_string(),
                requires_collateral: false,
                max_amount: Some(Decimal::from(200_000)),
            }),
        )
        .with_early_repayment(true)
        .with_credit_line_increase(true),
        LoanOffer::new(
            "C002",
            by_name("Monobank"),
            Decimal::from(30_000),
            Decimal::new(192, 1),
            36,
            OfferDetails::Consumer(ConsumerTerms {
                purpose: "EDUCATION".to_string(),
                requires_collateral: false,
                max_amount: Some(Decimal::from(100_000)),
            }),
        )
        .with_early_repayment(true),
        LoanOffer::new(
            "CAR001",
            by_name("PrivatBank"),
            Decimal::from(200_000),
            Decimal::new(155, 1),
            60,
            OfferDetails::Car(CarTerms {
                brand: "Toyota".to_string(),
                model: "Camry".to_string(),
                model_year: 2023,
                car_value: Some(Decimal::from(250_000)),
                is_new: true,
            }),
        )
        .with_early_repayment(true)
        .with_credit_line_increase(true),
        LoanOffer::new(
            "CAR002",
            by_name("Raiffeisen Bank"),
            Decimal::from(150_000),
            Decimal::new(162, 1),
            48,
            OfferDetails::Car(CarTerms {
                brand: "BMW".to_string(),
                model: "X5".to_string(),
                model_year: 2021,
                car_value: Some(Decimal::from(180_000)),
                is_new: false,
            }),
        )
        .with_early_repayment(true),
    ];

    CatalogSnapshot { lenders, offers }
}

//! Loan offer catalog with payment calculation, borrower screening, and offer ranking.
//!
//! The catalog and both engines are plain synchronous values; [`OfferDeskService`] wraps them
//! behind locks for the HTTP router and keeps the [`OfferStore`] they persist to.

pub mod catalog;
pub mod domain;
pub mod eligibility;
pub mod lenders;
pub mod payment;
pub mod router;
pub mod search;
pub mod selection;
pub mod service;
pub mod store;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::OfferCatalog;
pub use domain::{
    BorrowerProfile, CarTerms, ConsumerTerms, LenderError, LenderRating, LoanOffer,
    MortgageTerms, OfferDetails, OfferId, OfferKind, OfferQuery, SelectionPreferences,
    UnknownOfferKind,
};
pub use eligibility::{EligibilityDecision, IneligibilityReason};
pub use lenders::{LenderRegistry, SharedLender};
pub use payment::{OfferMetric, PaymentSummary};
pub use router::offer_router;
pub use search::{SearchEngine, BEST_OFFER_LIMIT};
pub use selection::SelectionEngine;
pub use service::{CatalogSnapshot, OfferDeskService, OfferServiceError};
pub use store::{JsonFileStore, OfferStore, StoreError};
pub use views::OfferView;

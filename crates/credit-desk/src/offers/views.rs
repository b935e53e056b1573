use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{LoanOffer, OfferDetails, OfferId, OfferKind};
use super::payment::{OfferMetric, PaymentSummary};

/// Lightweight representation of an offer for API responses and CLI tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferView {
    pub id: OfferId,
    pub kind: OfferKind,
    pub lender: Option<String>,
    pub lender_rating: Option<f64>,
    pub principal: Option<Decimal>,
    pub interest_rate: Option<Decimal>,
    pub term_months: i32,
    pub early_repayment_allowed: bool,
    pub credit_line_increase_allowed: bool,
    pub originated_on: NaiveDate,
    pub payments: PaymentSummary,
    pub metric: OfferMetric,
    pub description: String,
}

impl From<&LoanOffer> for OfferView {
    fn from(offer: &LoanOffer) -> Self {
        Self {
            id: offer.id.clone(),
            kind: offer.kind(),
            lender: offer.lender_name().map(str::to_string),
            lender_rating: offer.lender_rating(),
            principal: offer.principal,
            interest_rate: offer.interest_rate,
            term_months: offer.term_months,
            early_repayment_allowed: offer.early_repayment_allowed,
            credit_line_increase_allowed: offer.credit_line_increase_allowed,
            originated_on: offer.originated_on,
            payments: PaymentSummary::for_offer(offer),
            metric: OfferMetric::for_offer(offer),
            description: describe(&offer.details),
        }
    }
}

impl OfferView {
    pub fn collect<'a>(offers: impl IntoIterator<Item = &'a LoanOffer>) -> Vec<OfferView> {
        offers.into_iter().map(OfferView::from).collect()
    }
}

fn describe(details: &OfferDetails) -> String {
    match details {
        OfferDetails::Consumer(terms) if terms.requires_collateral => {
            format!("{} (collateral required)", terms.purpose)
        }
        OfferDetails::Consumer(terms) => terms.purpose.clone(),
        OfferDetails::Mortgage(terms) => terms.property_type.clone(),
        OfferDetails::Car(terms) => {
            let condition = if terms.is_new { "new" } else { "used" };
            format!(
                "{} {} {} ({condition})",
                terms.brand, terms.model, terms.model_year
            )
        }
    }
}

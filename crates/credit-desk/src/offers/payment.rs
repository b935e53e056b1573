//! Annuity payments and kind-specific ratios for loan offers.
//!
//! Every division rounds half-up: intermediate rate and factor steps keep four fractional
//! digits and the monthly payment keeps two, so repeated runs produce identical figures.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::domain::{LoanOffer, OfferDetails};

const RATE_SCALE: u32 = 4;
const PAYMENT_SCALE: u32 = 2;
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
// 10^20: past this the annuity factor equals the monthly rate at four digits.
const GROWTH_CEILING: Decimal = Decimal::from_parts(0x6310_0000, 0x6BC7_5E2D, 0x5, false, 0);

fn round_half_up(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
}

/// Total amount repaid over the life of the offer.
///
/// Returns zero when the principal or rate is missing or the term is not positive.
pub fn total_payment(offer: &LoanOffer) -> Decimal {
    let (Some(principal), Some(rate)) = (offer.principal, offer.interest_rate) else {
        return Decimal::ZERO;
    };
    if offer.term_months <= 0 {
        return Decimal::ZERO;
    }
    if rate.is_zero() {
        return principal;
    }

    let term = Decimal::from(offer.term_months);
    let monthly_rate = round_half_up(
        round_half_up(rate / Decimal::ONE_HUNDRED, RATE_SCALE) / MONTHS_PER_YEAR,
        RATE_SCALE,
    );

    let factor = match (Decimal::ONE + monthly_rate).checked_powu(offer.term_months as u64) {
        Some(growth) if growth <= GROWTH_CEILING => {
            let denominator = growth - Decimal::ONE;
            if denominator.is_zero() {
                return principal;
            }
            match monthly_rate.checked_mul(growth) {
                Some(numerator) => round_half_up(numerator / denominator, RATE_SCALE),
                None => round_half_up(monthly_rate, RATE_SCALE),
            }
        }
        // r * g / (g - 1) converges to r once g is this large.
        _ => round_half_up(monthly_rate, RATE_SCALE),
    };

    principal
        .checked_mul(factor)
        .and_then(|installment| installment.checked_mul(term))
        .unwrap_or(Decimal::ZERO)
}

/// Level monthly installment, rounded to cents.
pub fn monthly_payment(offer: &LoanOffer) -> Decimal {
    if offer.term_months <= 0 {
        return Decimal::ZERO;
    }
    round_half_up(
        total_payment(offer) / Decimal::from(offer.term_months),
        PAYMENT_SCALE,
    )
}

/// Principal as a percentage of the property value. `None` for non-mortgage offers.
pub fn loan_to_value(offer: &LoanOffer) -> Option<Decimal> {
    match &offer.details {
        OfferDetails::Mortgage(terms) => Some(percentage_of(offer.principal, terms.property_value)),
        _ => None,
    }
}

/// Principal as a percentage of the car value. `None` for non-car offers.
pub fn depreciation_rate(offer: &LoanOffer) -> Option<Decimal> {
    match &offer.details {
        OfferDetails::Car(terms) => Some(percentage_of(offer.principal, terms.car_value)),
        _ => None,
    }
}

/// Whether the principal fits the product ceiling. `None` for non-consumer offers.
pub fn within_limit(offer: &LoanOffer) -> Option<bool> {
    match &offer.details {
        OfferDetails::Consumer(terms) => Some(match (offer.principal, terms.max_amount) {
            (Some(principal), Some(max_amount)) => principal <= max_amount,
            _ => false,
        }),
        _ => None,
    }
}

fn percentage_of(principal: Option<Decimal>, base: Option<Decimal>) -> Decimal {
    match (principal, base) {
        (Some(principal), Some(base)) if !base.is_zero() => {
            round_half_up(principal / base, RATE_SCALE) * Decimal::ONE_HUNDRED
        }
        _ => Decimal::ZERO,
    }
}

/// The one ratio that matters for each offer kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metric", content = "value", rename_all = "snake_case")]
pub enum OfferMetric {
    WithinLimit(bool),
    LoanToValue(Decimal),
    DepreciationRate(Decimal),
}

impl OfferMetric {
    pub fn for_offer(offer: &LoanOffer) -> Self {
        match &offer.details {
            OfferDetails::Consumer(_) => Self::WithinLimit(within_limit(offer).unwrap_or(false)),
            OfferDetails::Mortgage(_) => {
                Self::LoanToValue(loan_to_value(offer).unwrap_or(Decimal::ZERO))
            }
            OfferDetails::Car(_) => {
                Self::DepreciationRate(depreciation_rate(offer).unwrap_or(Decimal::ZERO))
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            OfferMetric::WithinLimit(true) => "amount within product limit".to_string(),
            OfferMetric::WithinLimit(false) => "amount exceeds product limit".to_string(),
            OfferMetric::LoanToValue(ratio) => format!("loan-to-value {ratio}%"),
            OfferMetric::DepreciationRate(ratio) => format!("depreciation rate {ratio}%"),
        }
    }
}

/// Payment figures rendered alongside an offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub monthly: Decimal,
    pub total: Decimal,
    pub overpayment: Decimal,
}

impl PaymentSummary {
    pub fn for_offer(offer: &LoanOffer) -> Self {
        let total = total_payment(offer);
        let overpayment = match offer.principal {
            Some(principal) if !total.is_zero() => total - principal,
            _ => Decimal::ZERO,
        };

        Self {
            monthly: monthly_payment(offer),
            total,
            overpayment,
        }
    }
}

impl LoanOffer {
    pub fn monthly_payment(&self) -> Decimal {
        monthly_payment(self)
    }

    pub fn total_payment(&self) -> Decimal {
        total_payment(self)
    }
}

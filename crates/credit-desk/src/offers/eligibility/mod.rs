mod policy;

pub use policy::{
    EligibilityDecision, IneligibilityReason, MAX_PAYMENT_TO_INCOME, MIN_CREDIT_SCORE,
};

use rust_decimal::Decimal;

use super::domain::BorrowerProfile;

/// Screen a borrower against an installment, explaining any rejection.
///
/// The requested amount is part of the contract but the fixed policy only weighs the
/// installment against income and the credit score.
pub fn assess(
    borrower: &BorrowerProfile,
    _requested_amount: Decimal,
    monthly_payment: Decimal,
) -> EligibilityDecision {
    policy::decide(borrower, monthly_payment)
}

pub fn is_eligible(
    borrower: &BorrowerProfile,
    requested_amount: Decimal,
    monthly_payment: Decimal,
) -> bool {
    assess(borrower, requested_amount, monthly_payment).is_eligible()
}

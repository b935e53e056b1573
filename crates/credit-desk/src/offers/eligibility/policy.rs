use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::super::domain::BorrowerProfile;

/// Largest share of monthly income a single installment may consume.
pub const MAX_PAYMENT_TO_INCOME: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

/// Lowest credit score accepted by any lender in the catalog.
pub const MIN_CREDIT_SCORE: i32 = 600;

/// Outcome of screening a borrower against one offer's installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EligibilityDecision {
    Eligible,
    Ineligible(IneligibilityReason),
}

impl EligibilityDecision {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityDecision::Eligible)
    }

    pub fn summary(&self) -> String {
        match self {
            EligibilityDecision::Eligible => "borrower is eligible".to_string(),
            EligibilityDecision::Ineligible(reason) => reason.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IneligibilityReason {
    MissingIncome,
    PaymentExceedsIncomeShare {
        max_payment: Decimal,
        monthly_payment: Decimal,
    },
    CreditScoreBelowMinimum {
        minimum: i32,
        actual: i32,
    },
}

impl IneligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            IneligibilityReason::MissingIncome => {
                "ineligible: no positive monthly income declared".to_string()
            }
            IneligibilityReason::PaymentExceedsIncomeShare {
                max_payment,
                monthly_payment,
            } => format!(
                "ineligible: installment {monthly_payment} exceeds {max_payment} (40% of income)"
            ),
            IneligibilityReason::CreditScoreBelowMinimum { minimum, actual } => {
                format!("ineligible: credit score {actual} below minimum {minimum}")
            }
        }
    }
}

pub(crate) fn decide(
    borrower: &BorrowerProfile,
    monthly_payment: Decimal,
) -> EligibilityDecision {
    let income = match borrower.monthly_income {
        Some(income) if income > Decimal::ZERO => income,
        _ => return EligibilityDecision::Ineligible(IneligibilityReason::MissingIncome),
    };

    let max_payment = income * MAX_PAYMENT_TO_INCOME;
    if monthly_payment > max_payment {
        return EligibilityDecision::Ineligible(IneligibilityReason::PaymentExceedsIncomeShare {
            max_payment,
            monthly_payment,
        });
    }

    if borrower.credit_score < MIN_CREDIT_SCORE {
        return EligibilityDecision::Ineligible(IneligibilityReason::CreditScoreBelowMinimum {
            minimum: MIN_CREDIT_SCORE,
            actual: borrower.credit_score,
        });
    }

    EligibilityDecision::Eligible
}

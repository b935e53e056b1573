use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Highest rating a lender can carry.
pub const MAX_LENDER_RATING: f64 = 5.0;

/// Identifier wrapper for catalog offers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Only the empty string counts as missing; whitespace is a valid identifier.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A lender and its public rating. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LenderRecord")]
pub struct LenderRating {
    name: String,
    license_number: String,
    rating: f64,
}

impl LenderRating {
    pub fn new(
        name: impl Into<String>,
        license_number: impl Into<String>,
        rating: f64,
    ) -> Result<Self, LenderError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LenderError::EmptyName);
        }
        if !(0.0..=MAX_LENDER_RATING).contains(&rating) {
            return Err(LenderError::RatingOutOfRange(rating));
        }

        Ok(Self {
            name,
            license_number: license_number.into(),
            rating,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }
}

#[derive(Deserialize)]
struct LenderRecord {
    name: String,
    #[serde(default)]
    license_number: String,
    rating: f64,
}

impl TryFrom<LenderRecord> for LenderRating {
    type Error = LenderError;

    fn try_from(record: LenderRecord) -> Result<Self, Self::Error> {
        LenderRating::new(record.name, record.license_number, record.rating)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LenderError {
    #[error("lender name must not be blank")]
    EmptyName,
    #[error("lender rating {0} is outside 0.0..=5.0")]
    RatingOutOfRange(f64),
}

/// Product family of an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferKind {
    Consumer,
    Mortgage,
    Car,
}

impl OfferKind {
    pub const ALL: [OfferKind; 3] = [OfferKind::Consumer, OfferKind::Mortgage, OfferKind::Car];

    pub const fn label(self) -> &'static str {
        match self {
            OfferKind::Consumer => "CONSUMER",
            OfferKind::Mortgage => "MORTGAGE",
            OfferKind::Car => "CAR",
        }
    }
}

impl fmt::Display for OfferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OfferKind {
    type Err = UnknownOfferKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OfferKind::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(value))
            .ok_or_else(|| UnknownOfferKind(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown offer kind '{0}' (expected CONSUMER, MORTGAGE or CAR)")]
pub struct UnknownOfferKind(pub String);

/// Terms specific to unsecured consumer loans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerTerms {
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub requires_collateral: bool,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
}

/// Terms specific to property-backed loans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortgageTerms {
    #[serde(default)]
    pub property_value: Option<Decimal>,
    #[serde(default)]
    pub down_payment: Option<Decimal>,
    #[serde(default)]
    pub property_type: String,
}

/// Terms specific to vehicle financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarTerms {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub model_year: i32,
    #[serde(default)]
    pub car_value: Option<Decimal>,
    #[serde(default)]
    pub is_new: bool,
}

/// Kind-specific payload, tagged by `kind` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferDetails {
    Consumer(ConsumerTerms),
    Mortgage(MortgageTerms),
    Car(CarTerms),
}

impl OfferDetails {
    pub const fn kind(&self) -> OfferKind {
        match self {
            OfferDetails::Consumer(_) => OfferKind::Consumer,
            OfferDetails::Mortgage(_) => OfferKind::Mortgage,
            OfferDetails::Car(_) => OfferKind::Car,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A loan product published by a lender.
///
/// Amount, rate and lender are optional so partially populated records loaded from disk are
/// filtered out by the search pipeline instead of failing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanOffer {
    pub id: OfferId,
    #[serde(default)]
    pub lender: Option<Arc<LenderRating>>,
    #[serde(default)]
    pub principal: Option<Decimal>,
    /// Nominal annual rate in percent.
    #[serde(default)]
    pub interest_rate: Option<Decimal>,
    #[serde(default)]
    pub term_months: i32,
    #[serde(default)]
    pub early_repayment_allowed: bool,
    #[serde(default)]
    pub credit_line_increase_allowed: bool,
    #[serde(default = "today")]
    pub originated_on: NaiveDate,
    #[serde(flatten)]
    pub details: OfferDetails,
}

impl LoanOffer {
    pub fn new(
        id: impl Into<String>,
        lender: Option<Arc<LenderRating>>,
        principal: Decimal,
        interest_rate: Decimal,
        term_months: i32,
        details: OfferDetails,
    ) -> Self {
        Self {
            id: OfferId(id.into()),
            lender,
            principal: Some(principal),
            interest_rate: Some(interest_rate),
            term_months,
            early_repayment_allowed: false,
            credit_line_increase_allowed: false,
            originated_on: today(),
            details,
        }
    }

    pub fn with_early_repayment(mut self, allowed: bool) -> Self {
        self.early_repayment_allowed = allowed;
        self
    }

    pub fn with_credit_line_increase(mut self, allowed: bool) -> Self {
        self.credit_line_increase_allowed = allowed;
        self
    }

    pub fn with_origination_date(mut self, date: NaiveDate) -> Self {
        self.originated_on = date;
        self
    }

    pub const fn kind(&self) -> OfferKind {
        self.details.kind()
    }

    pub fn lender_name(&self) -> Option<&str> {
        self.lender.as_deref().map(LenderRating::name)
    }

    pub fn lender_rating(&self) -> Option<f64> {
        self.lender.as_deref().map(LenderRating::rating)
    }

    pub fn is_flexible(&self) -> bool {
        self.early_repayment_allowed || self.credit_line_increase_allowed
    }

    pub(crate) fn principal_at_least(&self, minimum: Decimal) -> bool {
        self.principal.is_some_and(|principal| principal >= minimum)
    }
}

/// Borrower snapshot supplied per search; never stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<Decimal>,
    /// Conventionally 300..=850; not enforced.
    pub credit_score: i32,
    #[serde(default)]
    pub has_existing_credits: bool,
}

impl BorrowerProfile {
    pub fn new(id: impl Into<String>, monthly_income: Decimal, credit_score: i32) -> Self {
        Self {
            id: id.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            monthly_income: Some(monthly_income),
            credit_score,
            has_existing_credits: false,
        }
    }

    pub fn named(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// What a borrower asks for. Any missing piece makes every search return nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferQuery {
    #[serde(default)]
    pub borrower: Option<BorrowerProfile>,
    #[serde(default)]
    pub requested_amount: Option<Decimal>,
    #[serde(default)]
    pub term_months: i32,
}

impl OfferQuery {
    pub fn new(borrower: BorrowerProfile, requested_amount: Decimal, term_months: i32) -> Self {
        Self {
            borrower: Some(borrower),
            requested_amount: Some(requested_amount),
            term_months,
        }
    }

    pub(crate) fn resolve(&self) -> Option<(&BorrowerProfile, Decimal, i32)> {
        let borrower = self.borrower.as_ref()?;
        let requested_amount = self.requested_amount?;
        (self.term_months > 0).then_some((borrower, requested_amount, self.term_months))
    }
}

/// Optional features a borrower would like the chosen offer to carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPreferences {
    #[serde(default)]
    pub prefer_early_repayment: bool,
    #[serde(default)]
    pub prefer_credit_line_increase: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lender_rejects_blank_name_and_out_of_range_rating() {
        assert_eq!(
            LenderRating::new("  ", "X1", 4.0),
            Err(LenderError::EmptyName)
        );
        assert_eq!(
            LenderRating::new("Acme", "X1", 5.1),
            Err(LenderError::RatingOutOfRange(5.1))
        );
        assert!(LenderRating::new("Acme", "X1", f64::NAN).is_err());
        assert!(LenderRating::new("Acme", "X1", 0.0).is_ok());
        assert!(LenderRating::new("Acme", "X1", 5.0).is_ok());
    }

    #[test]
    fn lender_deserialization_runs_validation() {
        let parsed: Result<LenderRating, _> =
            serde_json::from_str(r#"{"name":"Acme","license_number":"A1","rating":7.5}"#);
        assert!(parsed.is_err());

        let parsed: LenderRating =
            serde_json::from_str(r#"{"name":"Acme","license_number":"A1","rating":4.5}"#)
                .expect("valid lender");
        assert_eq!(parsed.name(), "Acme");
        assert_eq!(parsed.rating(), 4.5);
    }

    #[test]
    fn offer_kind_parses_labels_case_insensitively() {
        assert_eq!("mortgage".parse::<OfferKind>(), Ok(OfferKind::Mortgage));
        assert_eq!("Car".parse::<OfferKind>(), Ok(OfferKind::Car));
        assert!(" Car ".parse::<OfferKind>().is_err());
        assert!("LEASE".parse::<OfferKind>().is_err());
    }

    #[test]
    fn offer_serializes_with_kind_tag_and_iso_date() {
        let lender = Arc::new(LenderRating::new("Monobank", "MB004", 4.7).expect("lender"));
        let offer = LoanOffer::new(
            "CAR001",
            Some(lender),
            dec!(200000),
            dec!(15.5),
            60,
            OfferDetails::Car(CarTerms {
                brand: "Toyota".to_string(),
                model: "Camry".to_string(),
                model_year: 2023,
                car_value: Some(dec!(250000)),
                is_new: true,
            }),
        )
        .with_origination_date(NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid"));

        let value = serde_json::to_value(&offer).expect("serializes");
        assert_eq!(value["kind"], "CAR");
        assert_eq!(value["originated_on"], "2024-03-01");
        assert_eq!(value["brand"], "Toyota");
        assert_eq!(value["lender"]["name"], "Monobank");

        let restored: LoanOffer = serde_json::from_value(value).expect("deserializes");
        assert_eq!(restored, offer);
    }

    #[test]
    fn offer_without_date_defaults_to_today() {
        let raw = r#"{
            "id": "C9",
            "principal": "1000",
            "interest_rate": "10",
            "term_months": 12,
            "kind": "CONSUMER",
            "purpose": "TRAVEL"
        }"#;
        let before = Local::now().date_naive();
        let offer: LoanOffer = serde_json::from_str(raw).expect("deserializes");
        let after = Local::now().date_naive();
        assert_eq!(offer.kind(), OfferKind::Consumer);
        assert!(offer.originated_on >= before && offer.originated_on <= after);
        assert!(offer.lender.is_none());
    }

    #[test]
    fn query_requires_borrower_amount_and_positive_term() {
        let borrower = BorrowerProfile::new("B1", dec!(50000), 700);
        assert!(OfferQuery::new(borrower.clone(), dec!(1000), 12)
            .resolve()
            .is_some());
        assert!(OfferQuery::new(borrower.clone(), dec!(1000), 0)
            .resolve()
            .is_none());
        let missing_amount = OfferQuery {
            borrower: Some(borrower),
            requested_amount: None,
            term_months: 12,
        };
        assert!(missing_amount.resolve().is_none());
        assert!(OfferQuery::default().resolve().is_none());
    }
}

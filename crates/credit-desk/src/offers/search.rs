use std::cmp::Ordering;

use rust_decimal::Decimal;
use tracing::debug;

use super::catalog::OfferCatalog;
use super::domain::{LoanOffer, OfferQuery};
use super::eligibility;

/// Most offers `best_offers` will ever return.
pub const BEST_OFFER_LIMIT: usize = 5;

/// Read-only view over the catalog producing candidate and ranked offer lists.
///
/// Missing parameters never raise errors; they produce empty results.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'a> {
    catalog: &'a OfferCatalog,
}

impl<'a> SearchEngine<'a> {
    pub fn new(catalog: &'a OfferCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a OfferCatalog {
        self.catalog
    }

    /// Offers large and long enough for the request whose installment the borrower can carry.
    pub fn matching_offers(&self, query: &OfferQuery) -> Vec<LoanOffer> {
        let Some((borrower, requested_amount, term_months)) = query.resolve() else {
            return Vec::new();
        };

        let matches: Vec<LoanOffer> = self
            .catalog
            .iter()
            .filter(|offer| offer.principal_at_least(requested_amount))
            .filter(|offer| offer.term_months >= term_months)
            .filter(|offer| {
                eligibility::is_eligible(borrower, requested_amount, offer.monthly_payment())
            })
            .cloned()
            .collect();

        debug!(
            borrower = %borrower.id,
            %requested_amount,
            term_months,
            matches = matches.len(),
            "matched offers"
        );
        matches
    }

    /// Up to [`BEST_OFFER_LIMIT`] matching offers, cheapest rate first, better lender on ties.
    pub fn best_offers(&self, query: &OfferQuery) -> Vec<LoanOffer> {
        let mut offers: Vec<LoanOffer> = self
            .matching_offers(query)
            .into_iter()
            .filter(|offer| offer.lender.is_some() && offer.interest_rate.is_some())
            .collect();
        offers.sort_by(|a, b| by_rate(a, b).then_with(|| by_lender_rating_desc(a, b)));
        offers.truncate(BEST_OFFER_LIMIT);
        offers
    }

    /// Offers with a principal inside `[min, max]`, cheapest rate first.
    pub fn lowest_rate_in_range(
        &self,
        min_amount: Option<Decimal>,
        max_amount: Option<Decimal>,
    ) -> Vec<LoanOffer> {
        let (Some(min_amount), Some(max_amount)) = (min_amount, max_amount) else {
            return Vec::new();
        };

        let mut offers: Vec<LoanOffer> = self
            .catalog
            .find_by_amount_range(min_amount, max_amount)
            .into_iter()
            .filter(|offer| offer.interest_rate.is_some())
            .collect();
        offers.sort_by(by_rate);
        offers
    }

    /// Offers of at least `min_amount` from the best rated lenders, cheaper rate on ties.
    pub fn best_lender_rating(&self, min_amount: Option<Decimal>) -> Vec<LoanOffer> {
        let mut offers = self.priced_from(min_amount, |offer| offer.lender.is_some());
        offers.sort_by(|a, b| by_lender_rating_desc(a, b).then_with(|| by_rate(a, b)));
        offers
    }

    /// Offers allowing early repayment or a credit line increase.
    pub fn flexible_offers(&self, min_amount: Option<Decimal>) -> Vec<LoanOffer> {
        self.sorted_by_rate(min_amount, LoanOffer::is_flexible)
    }

    pub fn with_early_repayment(&self, min_amount: Option<Decimal>) -> Vec<LoanOffer> {
        self.sorted_by_rate(min_amount, |offer| offer.early_repayment_allowed)
    }

    pub fn with_credit_line_increase(&self, min_amount: Option<Decimal>) -> Vec<LoanOffer> {
        self.sorted_by_rate(min_amount, |offer| offer.credit_line_increase_allowed)
    }

    fn sorted_by_rate(
        &self,
        min_amount: Option<Decimal>,
        predicate: impl Fn(&LoanOffer) -> bool,
    ) -> Vec<LoanOffer> {
        let mut offers = self.priced_from(min_amount, predicate);
        offers.sort_by(by_rate);
        offers
    }

    fn priced_from(
        &self,
        min_amount: Option<Decimal>,
        predicate: impl Fn(&LoanOffer) -> bool,
    ) -> Vec<LoanOffer> {
        let Some(min_amount) = min_amount else {
            return Vec::new();
        };

        self.catalog
            .iter()
            .filter(|offer| offer.principal_at_least(min_amount))
            .filter(|offer| offer.interest_rate.is_some())
            .filter(|offer| predicate(offer))
            .cloned()
            .collect()
    }
}

/// Ascending interest rate; offers without a rate sort last.
pub(crate) fn by_rate(a: &LoanOffer, b: &LoanOffer) -> Ordering {
    match (a.interest_rate, b.interest_rate) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Descending lender rating; offers without a lender sort last.
pub(crate) fn by_lender_rating_desc(a: &LoanOffer, b: &LoanOffer) -> Ordering {
    match (a.lender_rating(), b.lender_rating()) {
        (Some(left), Some(right)) => right.total_cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

use std::cmp::Ordering;

use tracing::debug;

use super::catalog::OfferCatalog;
use super::domain::{LoanOffer, OfferQuery, SelectionPreferences};
use super::search::{by_lender_rating_desc, by_rate, SearchEngine};

/// Picks single offers, or short ranked lists, out of the search engine's candidates.
#[derive(Debug, Clone, Copy)]
pub struct SelectionEngine<'a> {
    search: SearchEngine<'a>,
}

impl<'a> SelectionEngine<'a> {
    pub fn new(catalog: &'a OfferCatalog) -> Self {
        Self {
            search: SearchEngine::new(catalog),
        }
    }

    pub fn search(&self) -> &SearchEngine<'a> {
        &self.search
    }

    /// Cheapest eligible offer, preferring the requested features and then the better lender.
    pub fn select_optimal(
        &self,
        query: &OfferQuery,
        preferences: SelectionPreferences,
    ) -> Option<LoanOffer> {
        let candidates = self.search.matching_offers(query);
        let chosen = candidates
            .into_iter()
            .min_by(|a, b| preference_order(a, b, preferences));

        if let Some(offer) = &chosen {
            debug!(offer_id = %offer.id, ?preferences, "optimal offer selected");
        }
        chosen
    }

    pub fn select_by_lowest_total_payment(&self, query: &OfferQuery) -> Option<LoanOffer> {
        self.search
            .matching_offers(query)
            .into_iter()
            .min_by(|a, b| {
                a.total_payment()
                    .cmp(&b.total_payment())
                    .then_with(|| by_rate(a, b))
            })
    }

    pub fn select_by_lowest_monthly_payment(&self, query: &OfferQuery) -> Option<LoanOffer> {
        self.search
            .matching_offers(query)
            .into_iter()
            .min_by(|a, b| {
                a.monthly_payment()
                    .cmp(&b.monthly_payment())
                    .then_with(|| by_rate(a, b))
            })
    }

    /// Every offer from the named lender, cheapest first. No eligibility screening.
    pub fn select_by_lender(&self, name: &str) -> Vec<LoanOffer> {
        let mut offers = self.search.catalog().find_by_lender_name(name);
        offers.sort_by(by_rate);
        offers
    }

    /// Every offer of the given kind label, cheapest first. No eligibility screening.
    pub fn select_by_kind(&self, kind: &str) -> Vec<LoanOffer> {
        let mut offers = self.search.catalog().find_by_kind(kind);
        offers.sort_by(by_rate);
        offers
    }

    /// The first `n` of [`SearchEngine::best_offers`].
    ///
    /// `best_offers` already stops at five entries, so asking for more than five returns at
    /// most five.
    pub fn top_n(&self, query: &OfferQuery, n: usize) -> Vec<LoanOffer> {
        let mut offers = self.search.best_offers(query);
        offers.truncate(n);
        offers
    }
}

fn preference_order(a: &LoanOffer, b: &LoanOffer, preferences: SelectionPreferences) -> Ordering {
    let mut order = by_rate(a, b);
    if preferences.prefer_early_repayment {
        order = order.then_with(|| {
            missing_feature_last(a.early_repayment_allowed, b.early_repayment_allowed)
        });
    }
    if preferences.prefer_credit_line_increase {
        order = order.then_with(|| {
            missing_feature_last(a.credit_line_increase_allowed, b.credit_line_increase_allowed)
        });
    }
    order.then_with(|| by_lender_rating_desc(a, b))
}

fn missing_feature_last(a_has: bool, b_has: bool) -> Ordering {
    b_has.cmp(&a_has)
}

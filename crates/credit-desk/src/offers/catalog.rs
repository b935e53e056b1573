use rust_decimal::Decimal;
use tracing::debug;

use super::domain::{LoanOffer, OfferKind};
use super::lenders::{same_lender_name, LenderRegistry};

/// Insertion-ordered collection of loan offers.
///
/// Queries hand out owned copies so callers can never reach back into the catalog. Identifiers
/// are only required to be present; duplicates are accepted.
#[derive(Debug, Clone, Default)]
pub struct OfferCatalog {
    offers: Vec<LoanOffer>,
}

impl OfferCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offer, ignoring it when the identifier is empty.
    pub fn add(&mut self, offer: LoanOffer) -> bool {
        if offer.id.is_empty() {
            debug!("ignoring offer without identifier");
            return false;
        }
        debug!(offer_id = %offer.id, kind = %offer.kind(), "offer added to catalog");
        self.offers.push(offer);
        true
    }

    pub fn find_all(&self) -> Vec<LoanOffer> {
        self.offers.clone()
    }

    pub fn find_by_id(&self, id: &str) -> Option<LoanOffer> {
        self.offers
            .iter()
            .find(|offer| offer.id.as_str() == id)
            .cloned()
    }

    pub fn find_by_lender_name(&self, name: &str) -> Vec<LoanOffer> {
        self.collect(|offer| {
            offer
                .lender_name()
                .is_some_and(|lender| same_lender_name(lender, name))
        })
    }

    /// Offers whose kind label matches `kind`, ignoring case. Unknown labels match nothing.
    pub fn find_by_kind(&self, kind: &str) -> Vec<LoanOffer> {
        match kind.parse::<OfferKind>() {
            Ok(kind) => self.collect(|offer| offer.kind() == kind),
            Err(_) => Vec::new(),
        }
    }

    /// Offers with a principal inside `[min, max]`.
    pub fn find_by_amount_range(&self, min: Decimal, max: Decimal) -> Vec<LoanOffer> {
        self.collect(|offer| {
            offer
                .principal
                .is_some_and(|principal| principal >= min && principal <= max)
        })
    }

    pub fn find_with_early_repayment(&self) -> Vec<LoanOffer> {
        self.collect(|offer| offer.early_repayment_allowed)
    }

    pub fn find_with_credit_line_increase(&self) -> Vec<LoanOffer> {
        self.collect(|offer| offer.credit_line_increase_allowed)
    }

    /// Remove every offer carrying `id`, returning how many were dropped.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.offers.len();
        self.offers.retain(|offer| offer.id.as_str() != id);
        let removed = before - self.offers.len();
        debug!(offer_id = id, removed, "offers removed from catalog");
        removed
    }

    pub fn clear(&mut self) {
        self.offers.clear();
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Point every offer at the registry's shared lender of the same name.
    ///
    /// Lenders unknown to the registry are registered so later offers share them too.
    pub fn relink_lenders(&mut self, registry: &mut LenderRegistry) {
        for offer in &mut self.offers {
            if let Some(lender) = offer.lender.take() {
                offer.lender = Some(registry.shared(lender));
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &LoanOffer> {
        self.offers.iter()
    }

    fn collect(&self, predicate: impl Fn(&LoanOffer) -> bool) -> Vec<LoanOffer> {
        self.offers
            .iter()
            .filter(|offer| predicate(offer))
            .cloned()
            .collect()
    }
}

impl FromIterator<LoanOffer> for OfferCatalog {
    fn from_iter<I: IntoIterator<Item = LoanOffer>>(iter: I) -> Self {
        let mut catalog = OfferCatalog::new();
        for offer in iter {
            catalog.add(offer);
        }
        catalog
    }
}

impl Extend<LoanOffer> for OfferCatalog {
    fn extend<I: IntoIterator<Item = LoanOffer>>(&mut self, iter: I) {
        for offer in iter {
            self.add(offer);
        }
    }
}

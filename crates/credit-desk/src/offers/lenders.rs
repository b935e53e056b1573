use std::sync::Arc;

use tracing::debug;

use super::domain::LenderRating;

/// Lender of an offer, shared with every other offer from the same lender.
pub type SharedLender = Arc<LenderRating>;

/// Case-insensitive name comparison, Unicode-aware so Cyrillic names fold too.
pub(crate) fn same_lender_name(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// Table of known lenders, one shared instance per name.
#[derive(Debug, Clone, Default)]
pub struct LenderRegistry {
    lenders: Vec<SharedLender>,
}

impl LenderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lender and return the shared handle offers should hold.
    ///
    /// A lender whose name is already registered (ignoring case) resolves to the existing entry.
    pub fn add(&mut self, lender: LenderRating) -> SharedLender {
        self.shared(Arc::new(lender))
    }

    pub(crate) fn shared(&mut self, lender: SharedLender) -> SharedLender {
        if let Some(existing) = self.find_by_name(lender.name()) {
            return existing;
        }
        debug!(lender = lender.name(), rating = lender.rating(), "lender registered");
        self.lenders.push(lender.clone());
        lender
    }

    pub fn find_by_name(&self, name: &str) -> Option<SharedLender> {
        self.lenders
            .iter()
            .find(|lender| same_lender_name(lender.name(), name))
            .cloned()
    }

    pub fn find_by_license(&self, license_number: &str) -> Option<SharedLender> {
        self.lenders
            .iter()
            .find(|lender| lender.license_number() == license_number)
            .cloned()
    }

    pub fn find_all(&self) -> Vec<SharedLender> {
        self.lenders.clone()
    }

    pub fn find_by_min_rating(&self, min_rating: f64) -> Vec<SharedLender> {
        self.lenders
            .iter()
            .filter(|lender| lender.rating() >= min_rating)
            .cloned()
            .collect()
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.lenders.len();
        self.lenders
            .retain(|lender| !same_lender_name(lender.name(), name));
        before != self.lenders.len()
    }

    pub fn clear(&mut self) {
        self.lenders.clear();
    }

    pub fn len(&self) -> usize {
        self.lenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lenders.is_empty()
    }
}

impl FromIterator<LenderRating> for LenderRegistry {
    fn from_iter<I: IntoIterator<Item = LenderRating>>(iter: I) -> Self {
        let mut registry = LenderRegistry::new();
        for lender in iter {
            registry.add(lender);
        }
        registry
    }
}

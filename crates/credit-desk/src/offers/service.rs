use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use super::catalog::OfferCatalog;
use super::domain::{LenderRating, LoanOffer};
use super::lenders::{LenderRegistry, SharedLender};
use super::search::SearchEngine;
use super::selection::SelectionEngine;
use super::store::{OfferStore, StoreError};

/// Lenders and offers as they travel to and from storage.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub lenders: Vec<LenderRating>,
    pub offers: Vec<LoanOffer>,
}

/// Service owning the live catalog, the lender registry, and the store they persist to.
///
/// Searches run against a read lock so concurrent requests never block each other; mutations
/// take the write lock for the shortest possible span.
pub struct OfferDeskService<S> {
    catalog: RwLock<OfferCatalog>,
    lenders: RwLock<LenderRegistry>,
    store: Arc<S>,
}

impl<S> OfferDeskService<S>
where
    S: OfferStore + 'static,
{
    pub fn new(store: Arc<S>, snapshot: CatalogSnapshot) -> Self {
        let mut lenders: LenderRegistry = snapshot.lenders.into_iter().collect();
        let mut catalog: OfferCatalog = snapshot.offers.into_iter().collect();
        catalog.relink_lenders(&mut lenders);

        Self {
            catalog: RwLock::new(catalog),
            lenders: RwLock::new(lenders),
            store,
        }
    }

    /// Build the service from whatever the store currently holds.
    pub fn load(store: Arc<S>) -> Result<Self, OfferServiceError> {
        let snapshot = CatalogSnapshot {
            lenders: store.load_lenders()?,
            offers: store.load_offers()?,
        };
        info!(
            lenders = snapshot.lenders.len(),
            offers = snapshot.offers.len(),
            "catalog loaded from store"
        );
        Ok(Self::new(store, snapshot))
    }

    /// Like [`OfferDeskService::load`], but falls back to `seed` when the store fails or holds
    /// no offers.
    pub fn load_or_seed(store: Arc<S>, seed: impl FnOnce() -> CatalogSnapshot) -> Self {
        let loaded = store
            .load_lenders()
            .and_then(|lenders| Ok((lenders, store.load_offers()?)));

        let snapshot = match loaded {
            Ok((lenders, offers)) if !offers.is_empty() => {
                info!(
                    lenders = lenders.len(),
                    offers = offers.len(),
                    "catalog loaded from store"
                );
                CatalogSnapshot { lenders, offers }
            }
            Ok(_) => {
                warn!("store holds no offers, using seed catalog");
                seed()
            }
            Err(error) => {
                warn!(error = %error, "unable to load catalog, using seed catalog");
                seed()
            }
        };

        Self::new(store, snapshot)
    }

    /// Run a read-only query against a search engine over the current catalog.
    pub fn search<T>(
        &self,
        query: impl FnOnce(&SearchEngine<'_>) -> T,
    ) -> Result<T, OfferServiceError> {
        let catalog = self.read_catalog()?;
        Ok(query(&SearchEngine::new(&catalog)))
    }

    /// Run a read-only query against a selection engine over the current catalog.
    pub fn select<T>(
        &self,
        query: impl FnOnce(&SelectionEngine<'_>) -> T,
    ) -> Result<T, OfferServiceError> {
        let catalog = self.read_catalog()?;
        Ok(query(&SelectionEngine::new(&catalog)))
    }

    pub fn offers(&self) -> Result<Vec<LoanOffer>, OfferServiceError> {
        Ok(self.read_catalog()?.find_all())
    }

    pub fn offer(&self, id: &str) -> Result<Option<LoanOffer>, OfferServiceError> {
        Ok(self.read_catalog()?.find_by_id(id))
    }

    pub fn lenders(&self) -> Result<Vec<SharedLender>, OfferServiceError> {
        let lenders = self
            .lenders
            .read()
            .map_err(|_| OfferServiceError::LockPoisoned)?;
        Ok(lenders.find_all())
    }

    /// Registered lenders whose rating is at least `min_rating`, in registration order.
    pub fn lenders_rated_at_least(
        &self,
        min_rating: f64,
    ) -> Result<Vec<SharedLender>, OfferServiceError> {
        let lenders = self
            .lenders
            .read()
            .map_err(|_| OfferServiceError::LockPoisoned)?;
        Ok(lenders.find_by_min_rating(min_rating))
    }

    /// Add an offer, pointing it at the registered lender of the same name.
    pub fn add_offer(&self, mut offer: LoanOffer) -> Result<LoanOffer, OfferServiceError> {
        if offer.id.is_empty() {
            return Err(OfferServiceError::MissingIdentifier);
        }

        if let Some(lender) = offer.lender.take() {
            let mut lenders = self
                .lenders
                .write()
                .map_err(|_| OfferServiceError::LockPoisoned)?;
            offer.lender = Some(lenders.shared(lender));
        }

        self.write_catalog()?.add(offer.clone());
        info!(offer_id = %offer.id, kind = %offer.kind(), "offer published");
        Ok(offer)
    }

    /// Remove every offer with `id`, returning how many were dropped.
    pub fn remove_offer(&self, id: &str) -> Result<usize, OfferServiceError> {
        let removed = self.write_catalog()?.remove(id);
        if removed > 0 {
            info!(offer_id = id, removed, "offer withdrawn");
        }
        Ok(removed)
    }

    /// Current lenders and offers, detached from the locks.
    pub fn snapshot(&self) -> Result<CatalogSnapshot, OfferServiceError> {
        let lenders = self
            .lenders()?
            .iter()
            .map(|lender| lender.as_ref().clone())
            .collect();
        Ok(CatalogSnapshot {
            lenders,
            offers: self.offers()?,
        })
    }

    /// Write the current catalog back to the store.
    pub fn persist(&self) -> Result<CatalogSnapshot, OfferServiceError> {
        let snapshot = self.snapshot()?;
        self.store.save_lenders(&snapshot.lenders)?;
        self.store.save_offers(&snapshot.offers)?;
        info!(
            lenders = snapshot.lenders.len(),
            offers = snapshot.offers.len(),
            "catalog persisted"
        );
        Ok(snapshot)
    }

    fn read_catalog(&self) -> Result<RwLockReadGuard<'_, OfferCatalog>, OfferServiceError> {
        self.catalog
            .read()
            .map_err(|_| OfferServiceError::LockPoisoned)
    }

    fn write_catalog(&self) -> Result<RwLockWriteGuard<'_, OfferCatalog>, OfferServiceError> {
        self.catalog
            .write()
            .map_err(|_| OfferServiceError::LockPoisoned)
    }
}

/// Error raised by the offer desk service.
#[derive(Debug, thiserror::Error)]
pub enum OfferServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("offer identifier must not be empty")]
    MissingIdentifier,
    #[error("offer catalog lock poisoned")]
    LockPoisoned,
}

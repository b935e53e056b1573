use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::domain::{LenderRating, LoanOffer};

const LENDERS_FILE: &str = "lenders.json";
const OFFERS_FILE: &str = "offers.json";

/// Storage boundary that hands the catalog its records and takes them back.
pub trait OfferStore: Send + Sync {
    fn load_lenders(&self) -> Result<Vec<LenderRating>, StoreError>;
    fn load_offers(&self) -> Result<Vec<LoanOffer>, StoreError>;
    fn save_lenders(&self, lenders: &[LenderRating]) -> Result<(), StoreError>;
    fn save_offers(&self, offers: &[LoanOffer]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed records in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Pretty-printed JSON arrays kept side by side in one directory.
///
/// Missing files read as empty lists; saving creates the directory on demand.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, StoreError> {
        let path = self.root.join(file);
        let handle = match fs::File::open(&path) {
            Ok(handle) => handle,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let records: Vec<T> = serde_json::from_reader(BufReader::new(handle))
            .map_err(|source| StoreError::Format {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), records = records.len(), "loaded records");
        Ok(records)
    }

    fn write<T: Serialize>(&self, file: &str, records: &[T]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })?;

        let path = self.root.join(file);
        let handle = fs::File::create(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let mut writer = BufWriter::new(handle);
        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
            StoreError::Format {
                path: path.clone(),
                source,
            }
        })?;
        writer
            .flush()
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), records = records.len(), "saved records");
        Ok(())
    }
}

impl OfferStore for JsonFileStore {
    fn load_lenders(&self) -> Result<Vec<LenderRating>, StoreError> {
        self.read(LENDERS_FILE)
    }

    fn load_offers(&self) -> Result<Vec<LoanOffer>, StoreError> {
        self.read(OFFERS_FILE)
    }

    fn save_lenders(&self, lenders: &[LenderRating]) -> Result<(), StoreError> {
        self.write(LENDERS_FILE, lenders)
    }

    fn save_offers(&self, offers: &[LoanOffer]) -> Result<(), StoreError> {
        self.write(OFFERS_FILE, offers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offers::domain::{MortgageTerms, OfferDetails, OfferKind};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("absent"));
        assert!(store.load_lenders().expect("loads").is_empty());
        assert!(store.load_offers().expect("loads").is_empty());
    }

    #[test]
    fn saved_records_load_back_with_kind_and_date() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("data"));

        let lender = LenderRating::new("Oschadbank", "OSB002", 4.6).expect("lender");
        let offer = LoanOffer::new(
            "M002",
            Some(Arc::new(lender.clone())),
            dec!(800000),
            dec!(11.8),
            300,
            OfferDetails::Mortgage(MortgageTerms {
                property_value: Some(dec!(1000000)),
                down_payment: Some(dec!(200000)),
                property_type: "HOUSE".to_string(),
            }),
        )
        .with_early_repayment(true)
        .with_credit_line_increase(true)
        .with_origination_date(NaiveDate::from_ymd_opt(2024, 5, 17).expect("valid"));

        store.save_lenders(&[lender.clone()]).expect("saves lenders");
        store.save_offers(&[offer.clone()]).expect("saves offers");

        let raw = fs::read_to_string(store.root().join(OFFERS_FILE)).expect("file exists");
        assert!(raw.contains("\"kind\": \"MORTGAGE\""));
        assert!(raw.contains("\"originated_on\": \"2024-05-17\""));

        assert_eq!(store.load_lenders().expect("loads"), vec![lender]);
        let offers = store.load_offers().expect("loads");
        assert_eq!(offers, vec![offer]);
        assert_eq!(offers[0].kind(), OfferKind::Mortgage);
    }

    #[test]
    fn corrupt_file_reports_format_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join(OFFERS_FILE), "[{\"id\": ").expect("write");
        let store = JsonFileStore::new(dir.path());

        match store.load_offers() {
            Err(StoreError::Format { path, .. }) => {
                assert!(path.ends_with(OFFERS_FILE));
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_lender_rating_is_rejected_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(LENDERS_FILE),
            r#"[{"name": "Ghost", "license_number": "G0", "rating": 9.0}]"#,
        )
        .expect("write");
        let store = JsonFileStore::new(dir.path());

        assert!(matches!(
            store.load_lenders(),
            Err(StoreError::Format { .. })
        ));
    }
}

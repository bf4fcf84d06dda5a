//! Fetch a collection, decode it, and degrade quietly on failure.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tracing::{debug, warn};

use crate::application::store::{DocumentStore, StoreError};
use crate::domain::collections::{CollectionEntity, CollectionName};
use crate::domain::record::Record;
use crate::domain::wire::decode;

pub(crate) const METRIC_FETCH_TOTAL: &str = "showcase_store_fetch_total";
pub(crate) const METRIC_FETCH_FAILED_TOTAL: &str = "showcase_store_fetch_failed_total";
pub(crate) const METRIC_FETCH_MS: &str = "showcase_store_fetch_ms";

/// One round trip per call; nothing is cached between calls.
#[derive(Clone)]
pub struct CollectionFetcher {
    store: Arc<dyn DocumentStore>,
}

impl CollectionFetcher {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Decoded records, or the failure that prevented fetching them.
    pub async fn try_fetch(&self, collection: &CollectionName) -> Result<Vec<Record>, StoreError> {
        let started_at = Instant::now();
        counter!(METRIC_FETCH_TOTAL, "collection" => collection.to_string()).increment(1);

        let result = self.store.list_documents(collection).await;

        histogram!(METRIC_FETCH_MS, "collection" => collection.to_string())
            .record(started_at.elapsed().as_secs_f64() * 1000.0);

        let documents = result.inspect_err(|err| {
            counter!(
                METRIC_FETCH_FAILED_TOTAL,
                "collection" => collection.to_string(),
                "kind" => err.kind()
            )
            .increment(1);
        })?;

        debug!(
            target = "showcase::fetcher",
            collection = %collection,
            documents = documents.len(),
            "collection fetched"
        );

        Ok(documents.iter().map(decode).collect())
    }

    /// Decoded records; an empty list when the fetch fails.
    pub async fn fetch_collection(&self, collection: &CollectionName) -> Vec<Record> {
        match self.try_fetch(collection).await {
            Ok(records) => records,
            Err(err) => {
                log_failure(collection, &err);
                Vec::new()
            }
        }
    }

    /// Entities of `T`'s collection in display order, or `T`'s fallback list
    /// when the fetch fails.
    pub async fn fetch_entities<T: CollectionEntity>(&self) -> Vec<T> {
        let collection = T::collection();
        match self.try_fetch(&collection).await {
            Ok(records) => {
                let mut items: Vec<T> = records.iter().map(T::from_record).collect();
                T::sort(&mut items);
                items
            }
            Err(err) => {
                log_failure(&collection, &err);
                T::fallback()
            }
        }
    }
}

fn log_failure(collection: &CollectionName, err: &StoreError) {
    warn!(
        target = "showcase::fetcher",
        collection = %collection,
        kind = err.kind(),
        error = %err,
        "collection fetch failed; serving degraded content"
    );
}

//! Best-effort persistence fan-out.
//!
//! A processed document is written independently to up to three stores:
//! MongoDB (document store), PostgreSQL (relational store), and
//! Elasticsearch (search index). There is no transaction across them and
//! no reconciliation — each attempt is isolated, a failure is logged and
//! recorded in the report, and the upload succeeds regardless.
//!
//! Clients are constructed once at startup and injected; a store whose
//! connection failed is simply absent from the fan-out. The per-store
//! report replaces the older "whichever store wrote last supplies the id"
//! behaviour: callers get every outcome, and the convenience `document_id`
//! is the first successful write in attempt order.

pub mod mongo;
pub mod postgres;
pub mod search;

use crate::document::DocumentRecord;
use serde::Serialize;
use tracing::{error, info};

pub use mongo::MongoStore;
pub use postgres::PostgresStore;
pub use search::SearchStore;

/// The optional store clients participating in the fan-out.
#[derive(Default)]
pub struct DocumentStores {
    pub mongo: Option<MongoStore>,
    pub postgres: Option<PostgresStore>,
    pub search: Option<SearchStore>,
}

impl DocumentStores {
    /// A fan-out with no participating stores (tests, degraded deployments).
    pub fn none() -> Self {
        Self::default()
    }
}

/// Outcome of one store's write attempt.
#[derive(Debug, Clone, Serialize)]
pub struct StoreWrite {
    /// Store name: "mongodb", "postgresql", or "elasticsearch".
    pub store: &'static str,
    /// Identifier assigned by the store, on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Failure detail, on error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated fan-out outcome for one document.
#[derive(Debug, Clone, Serialize, Default)]
pub struct StorageReport {
    /// Identifier from the first successful write in attempt order, if any.
    pub document_id: Option<String>,
    /// One entry per participating store, in attempt order.
    pub writes: Vec<StoreWrite>,
}

impl StorageReport {
    fn record(&mut self, store: &'static str, result: Result<String, String>) {
        match result {
            Ok(id) => {
                info!("stored in {store}: {id}");
                if self.document_id.is_none() {
                    self.document_id = Some(id.clone());
                }
                self.writes.push(StoreWrite {
                    store,
                    id: Some(id),
                    error: None,
                });
            }
            Err(e) => {
                error!("{store} storage error: {e}");
                self.writes.push(StoreWrite {
                    store,
                    id: None,
                    error: Some(e),
                });
            }
        }
    }
}

/// Write `record` to every available store.
///
/// Attempts run in a fixed order (mongodb, postgresql, elasticsearch); each
/// is isolated, so one store's failure never blocks the others. With zero
/// available stores the report is empty and the call still succeeds.
pub async fn store_document(stores: &DocumentStores, record: &DocumentRecord) -> StorageReport {
    let mut report = StorageReport::default();

    if let Some(mongo) = &stores.mongo {
        report.record("mongodb", mongo.insert(record).await.map_err(|e| e.to_string()));
    }
    if let Some(pg) = &stores.postgres {
        report.record("postgresql", pg.insert(record).await.map_err(|e| e.to_string()));
    }
    if let Some(search) = &stores.search {
        report.record(
            "elasticsearch",
            search.insert(record).await.map_err(|e| e.to_string()),
        );
    }

    report
}

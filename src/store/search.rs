//! Search index client (Elasticsearch over its REST API).
//!
//! Plain HTTP through `reqwest` — the index operations used here (create
//! index, index document) are two endpoints, which does not justify a
//! dedicated client crate.

use crate::document::DocumentRecord;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const INDEX: &str = "documents";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("index response carried no _id")]
    MissingId,
}

/// Handle to an Elasticsearch node.
#[derive(Clone)]
pub struct SearchStore {
    client: reqwest::Client,
    base: String,
}

impl SearchStore {
    /// Connect and verify the node answers its info endpoint.
    pub async fn connect(base_url: &str) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let base = base_url.trim_end_matches('/').to_string();

        let resp = client.get(&base).send().await?;
        if !resp.status().is_success() {
            return Err(SearchError::Status {
                status: resp.status().as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(Self { client, base })
    }

    /// Create the documents index with its mappings.
    ///
    /// A 400 response means the index already exists and is treated as
    /// success, so startup stays idempotent.
    pub async fn init(&self) -> Result<(), SearchError> {
        let body = json!({
            "mappings": {
                "properties": {
                    "filename":       { "type": "text" },
                    "extracted_text": { "type": "text" },
                    "entities":       { "type": "keyword" },
                    "keywords":       { "type": "keyword" },
                    "upload_date":    { "type": "date" }
                }
            }
        });

        let resp = self
            .client
            .put(format!("{}/{INDEX}", self.base))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() || status.as_u16() == 400 {
            info!("Elasticsearch index ready");
            Ok(())
        } else {
            Err(SearchError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            })
        }
    }

    /// Index the searchable subset of a record, returning the assigned `_id`.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<String, SearchError> {
        let body = json!({
            "filename": record.filename,
            "extracted_text": record.extracted_text,
            "entities": record.entities,
            "keywords": record.keywords,
            "upload_date": record.upload_date,
        });

        let resp = self
            .client
            .post(format!("{}/{INDEX}/_doc", self.base))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }

        let payload: serde_json::Value = resp.json().await?;
        payload["_id"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(SearchError::MissingId)
    }
}

//! Relational store client (PostgreSQL via sqlx).

use crate::document::DocumentRecord;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id SERIAL PRIMARY KEY,
    filename VARCHAR(255) NOT NULL,
    original_filename VARCHAR(255),
    file_path VARCHAR(500),
    upload_date TIMESTAMP,
    file_size BIGINT,
    pages INTEGER,
    status VARCHAR(50),
    extracted_text TEXT,
    entities TEXT,
    keywords TEXT
)
"#;

const INSERT_DOCUMENT: &str = r#"
INSERT INTO documents
    (filename, original_filename, file_path, upload_date, file_size, pages, status, extracted_text, entities, keywords)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
RETURNING id
"#;

/// Handle to the `documents` table.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect with a short acquire timeout so a dead server fails fast
    /// at startup instead of hanging the boot sequence.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Create the documents table. Idempotent.
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        info!("PostgreSQL tables created");
        Ok(())
    }

    /// Insert a record, returning the serial id.
    ///
    /// The entity and keyword lists are flattened to JSON text — the table
    /// predates any array column usage and the search index covers querying.
    pub async fn insert(&self, record: &DocumentRecord) -> Result<String, sqlx::Error> {
        let entities = serde_json::to_string(&record.entities).unwrap_or_else(|_| "[]".into());
        let keywords = serde_json::to_string(&record.keywords).unwrap_or_else(|_| "[]".into());

        let id: i32 = sqlx::query_scalar(INSERT_DOCUMENT)
            .bind(&record.filename)
            .bind(&record.original_filename)
            .bind(&record.file_path)
            .bind(record.upload_date.naive_utc())
            .bind(record.file_size as i64)
            .bind(record.pages as i32)
            .bind(&record.status)
            .bind(&record.extracted_text)
            .bind(entities)
            .bind(keywords)
            .fetch_one(&self.pool)
            .await?;

        Ok(id.to_string())
    }
}

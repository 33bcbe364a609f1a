//! # paperbase
//!
//! Document digitization backend: uploaded PDFs and scans go through an
//! OCR pipeline and come out as searchable records, fanned out best-effort
//! to whichever datastores are reachable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Upload (multipart)
//!  │
//!  ├─ 1. Validate  filename sanitised, extension allow-listed
//!  ├─ 2. Persist   raw bytes under the upload directory
//!  ├─ 3. Render    PDF pages rasterised via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 4. Clean     grayscale → denoise → threshold → morphological close
//!  ├─ 5. OCR       tesseract subprocess, bounded by a timeout
//!  ├─ 6. Keywords  tokenise, drop stopwords, dedup, cap at 20
//!  └─ 7. Fan-out   independent writes to MongoDB / PostgreSQL / Elasticsearch
//! ```
//!
//! Every store is optional. A store that is down at startup simply does not
//! participate; uploads still succeed and carry a per-store report of what
//! was written where. The auth module is independent of the pipeline: a
//! flat-file user list plus stateless signed tokens.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use paperbase::{AppConfig, AppState, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_env()?;
//!     let state = Arc::new(AppState::connect(config).await);
//!     let app = build_router(state);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod auth;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod keywords;
pub mod pipeline;
pub mod server;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AppConfig, AppConfigBuilder};
pub use document::DocumentRecord;
pub use error::{ApiError, PipelineError};
pub use server::{build_router, AppState};
pub use store::{DocumentStores, StorageReport};

//! Error types for the paperbase backend.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PipelineError`] — internal processing failures (rasterisation,
//!   preprocessing, OCR invocation). Almost all of these are *contained*
//!   inside the pipeline: a failed preprocessing pass falls back to the
//!   original image, a failed OCR call yields an empty string, a failed
//!   rasterisation yields an error-text payload. They exist as a typed enum
//!   so the containment sites can log something more useful than a string.
//!
//! * [`ApiError`] — what an HTTP client sees. Converts into a JSON
//!   `{"error": ...}` body with the matching status code. Handlers return
//!   `Result<_, ApiError>` and use `?` freely.
//!
//! The split mirrors the service's degradation policy: nothing in the
//! pipeline is fatal to a request, and nothing in a request is fatal to the
//! process.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// Internal errors raised (and usually contained) by the extraction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// pdfium could not open the document at all.
    #[error("cannot open PDF '{path}': {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium failed while rendering a specific page.
    #[error("rasterisation failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// Image decode/encode or filter failure during preprocessing.
    #[error("image preprocessing failed for '{path}': {detail}")]
    Preprocess { path: PathBuf, detail: String },

    /// The OCR subprocess could not be spawned or exited non-zero.
    #[error("OCR invocation failed: {0}")]
    Ocr(String),

    /// The OCR subprocess exceeded its configured time budget.
    #[error("OCR timed out after {secs}s")]
    OcrTimeout { secs: u64 },

    /// A spawn_blocking task panicked.
    #[error("internal error: {0}")]
    Internal(String),
}

/// User-facing HTTP errors. Every variant serialises to `{"error": msg}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failed_display() {
        let e = PipelineError::RenderFailed {
            page: 3,
            detail: "bitmap allocation".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
    }

    #[test]
    fn ocr_timeout_display() {
        let e = PipelineError::OcrTimeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

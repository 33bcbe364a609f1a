//! HTTP surface: application state, router, and the upload/health handlers.
//!
//! The router is built against an [`Arc<AppState>`] so tests can assemble a
//! state with disabled stores and drive it through `tower::ServiceExt`
//! without binding a socket.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{routes as auth_routes, UserStore};
use crate::config::{AppConfig, ALLOWED_EXTENSIONS, MAX_UPLOAD_BYTES};
use crate::document::DocumentRecord;
use crate::error::ApiError;
use crate::extract::{extract_text_from_image, extract_text_from_pdf};
use crate::keywords::extract_entities_and_keywords;
use crate::pipeline::ocr::OcrEngine;
use crate::store::{self, DocumentStores, MongoStore, PostgresStore, SearchStore};

/// Shared application state, one per process.
pub struct AppState {
    pub config: AppConfig,
    pub ocr: OcrEngine,
    pub stores: DocumentStores,
    pub users: UserStore,
}

impl AppState {
    /// Probe the OCR binary and connect every configured store.
    ///
    /// Each store connects independently; a store that is unreachable is
    /// logged and left out of the fan-out rather than failing startup.
    pub async fn connect(config: AppConfig) -> AppState {
        if let Err(e) = tokio::fs::create_dir_all(&config.upload_dir).await {
            warn!("could not create upload dir {:?}: {e}", config.upload_dir);
        }

        let ocr = OcrEngine::probe(config.ocr_cmd.clone(), config.ocr_timeout_secs).await;
        if !ocr.available() {
            warn!("OCR binary '{}' unavailable, text extraction disabled", config.ocr_cmd);
        }

        let mongo = match &config.mongo_url {
            Some(url) => match MongoStore::connect(url, &config.mongo_db).await {
                Ok(s) => {
                    if let Err(e) = s.init().await {
                        warn!("mongodb index setup failed: {e}");
                    }
                    info!("connected to mongodb");
                    Some(s)
                }
                Err(e) => {
                    warn!("mongodb unavailable: {e}");
                    None
                }
            },
            None => None,
        };

        let postgres = match &config.postgres_url {
            Some(url) => match PostgresStore::connect(url).await {
                Ok(s) => {
                    if let Err(e) = s.init().await {
                        warn!("postgresql schema setup failed: {e}");
                    }
                    info!("connected to postgresql");
                    Some(s)
                }
                Err(e) => {
                    warn!("postgresql unavailable: {e}");
                    None
                }
            },
            None => None,
        };

        let search = match &config.elasticsearch_url {
            Some(url) => match SearchStore::connect(url).await {
                Ok(s) => {
                    if let Err(e) = s.init().await {
                        warn!("elasticsearch index setup failed: {e}");
                    }
                    info!("connected to elasticsearch");
                    Some(s)
                }
                Err(e) => {
                    warn!("elasticsearch unavailable: {e}");
                    None
                }
            },
            None => None,
        };

        let users = UserStore::new(config.users_file.clone());

        AppState {
            config,
            ocr,
            stores: DocumentStores {
                mongo,
                postgres,
                search,
            },
            users,
        }
    }
}

/// Assemble the API router over a shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/auth/register", post(auth_routes::register))
        .route("/api/auth/login", post(auth_routes::login))
        .route("/api/auth/verify", post(auth_routes::verify))
        .route("/api/auth/logout", post(auth_routes::logout))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /api/health` — liveness plus per-backend availability flags.
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "databases": {
            "mongodb": state.stores.mongo.is_some(),
            "postgresql": state.stores.postgres.is_some(),
            "elasticsearch": state.stores.search.is_some(),
            "tesseract": state.ocr.available(),
        },
    }))
}

/// `POST /api/upload` — multipart ingestion endpoint.
///
/// Saves the upload, runs extraction and keyword analysis, then fans the
/// record out to every connected store. Store failures degrade to entries
/// in the `storage` report; they never fail the request.
async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {e}")))?;
            file = Some((name, data.to_vec()));
            break;
        }
    }

    let Some((original_name, data)) = file else {
        return Err(ApiError::BadRequest("No file provided".into()));
    };
    if original_name.is_empty() {
        return Err(ApiError::BadRequest("No file selected".into()));
    }

    let ext = extension_of(&original_name);
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::BadRequest(format!(
            "File type .{ext} not allowed"
        )));
    }

    let safe_name = sanitize_filename(&original_name);
    let stored_name = format!("{}_{safe_name}", Utc::now().format("%Y%m%d_%H%M%S"));
    let dest = state.config.upload_dir.join(&stored_name);

    let file_size = data.len() as u64;
    tokio::fs::write(&dest, &data).await.map_err(|e| {
        ApiError::Internal(format!("Could not save upload: {e}"))
    })?;

    info!(filename = %stored_name, size = file_size, "processing upload");

    let (text, pages) = if ext == "pdf" {
        extract_text_from_pdf(&state.ocr, &dest, state.config.dpi).await
    } else {
        extract_text_from_image(&state.ocr, &dest).await
    };

    let (entities, keywords) = extract_entities_and_keywords(&text);

    let record = DocumentRecord::new(
        stored_name.clone(),
        original_name,
        dest.to_string_lossy().into_owned(),
        file_size,
        pages,
        text,
        entities.clone(),
        keywords.clone(),
    );

    let report = store::store_document(&state.stores, &record).await;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "document_id": report.document_id,
            "filename": stored_name,
            "pages": pages,
            "keywords": keywords,
            "entities": entities,
            "file_size": file_size,
            "storage": report.writes,
        })),
    ))
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Reduce a client-supplied filename to a safe flat name.
///
/// Path components are discarded, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9_.-]` is dropped. Leading dots are stripped so the
/// result can never be a hidden file or a bare `..`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let trimmed = cleaned.trim_start_matches('.').to_string();
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Scan.PDF"), "pdf");
        assert_eq!(extension_of("photo.JpG"), "jpg");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("/etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_filename("dir/sub/report.pdf"), "report.pdf");
    }

    #[test]
    fn sanitize_replaces_whitespace_and_drops_specials() {
        assert_eq!(sanitize_filename("my scan (1).pdf"), "my_scan_1.pdf");
        assert_eq!(sanitize_filename("résumé.pdf"), "rsum.pdf");
    }

    #[test]
    fn sanitize_never_returns_hidden_or_empty() {
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
        assert_eq!(sanitize_filename("..."), "upload");
        assert_eq!(sanitize_filename("////"), "upload");
    }
}

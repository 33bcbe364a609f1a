//! Auth HTTP handlers: register, login, verify, logout.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::auth::store::verify_password;
use crate::auth::token::{issue_token, verify_token};
use crate::error::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields".into()));
    }

    let user = state
        .users
        .register(&req.email, &req.username, &req.password)
        .await
        .map_err(|e| match e {
            crate::auth::store::AuthStoreError::DuplicateEmail => {
                ApiError::BadRequest("Email already registered".into())
            }
            other => {
                error!("registration failed: {other}");
                ApiError::Internal("Registration failed".into())
            }
        })?;

    let token = issue_token(&state.config.token_secret, user.id).map_err(|e| {
        error!("token generation failed: {e}");
        ApiError::Internal("Registration failed".into())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "token": token,
            "user": {
                "id": user.id,
                "email": user.email,
                "username": user.username,
                "provider": "local",
            },
        })),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Missing email or password".into()));
    }

    let user = state.users.user_by_email(&req.email).await;
    let Some(user) = user.filter(|u| verify_password(u.password.as_deref(), &req.password)) else {
        return Err(ApiError::Unauthorized("Invalid email or password".into()));
    };

    let token = issue_token(&state.config.token_secret, user.id).map_err(|e| {
        error!("token generation failed: {e}");
        ApiError::Internal("Login failed".into())
    })?;

    Ok(Json(json!({
        "success": true,
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "username": user.username,
            "provider": user.provider.as_deref().unwrap_or("local"),
        },
    })))
}

/// `POST /api/auth/verify` — resolve a bearer token to its user.
pub async fn verify(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("No token provided".into()))?;

    let user_id = verify_token(&state.config.token_secret, token)
        .ok_or_else(|| ApiError::Unauthorized("Invalid or expired token".into()))?;

    let user = state
        .users
        .user_by_id(user_id)
        .await
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(json!({
        "success": true,
        "user": {
            "id": user.id,
            "email": user.email,
            "username": user.username,
            "avatar": user.avatar,
            "provider": user.provider.as_deref().unwrap_or("local"),
        },
    })))
}

/// `POST /api/auth/logout` — stateless: the client discards its token.
pub async fn logout() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Logged out successfully",
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_empty_bearer_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}

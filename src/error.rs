/*
 * Responsibility
 * - リクエスト境界の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - VerifyError / RepoError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::identity::VerifyError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub details: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("invalid token: {0}")]
    InvalidToken(#[from] VerifyError),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] RepoError),
}

impl AppError {
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::BadRequest(details.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidToken(_) => "invalid_token",
            AppError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Debug carries the underlying sqlx/jsonwebtoken error; the body does not.
        tracing::warn!(kind = self.kind(), error = %self, cause = ?self, "request failed");

        // Verification and storage failures are deliberately indistinguishable
        // to the client; only the log carries the kind.
        let (status, error) = match self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Bad Request"),
            AppError::InvalidToken(_) | AppError::StoreUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        let body = ErrorResponse {
            error,
            details: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/*
 * Responsibility
 * - URL 構造を定義
 * - POST /handleAccessToken はフロントエンドが直接叩くのでパスは固定
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{access_token::handle_access_token, health::health};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/handleAccessToken", post(handle_access_token))
}

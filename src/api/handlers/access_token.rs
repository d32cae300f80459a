/*
 * Responsibility
 * - POST /handleAccessToken
 * - credential 取り出し → verifier で検証 → subject をキーに upsert → プロフィールを返す
 * - どこで失敗してもその時点で終了 (リトライしない)
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::access_token::{AccessTokenRequest, UserDataResponse};
use crate::error::AppError;
use crate::repos::user_repo::UpsertOutcome;
use crate::state::AppState;

pub async fn handle_access_token(
    State(state): State<AppState>,
    payload: Result<Json<AccessTokenRequest>, JsonRejection>,
) -> Result<Json<UserDataResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::bad_request(e.body_text()))?;
    let token = req.credential().map_err(AppError::bad_request)?;

    let identity = state.verifier.verify(token, &state.audience).await?;

    let outcome = state
        .users
        .upsert(&identity.subject, &identity.profile())
        .await?;
    match outcome {
        UpsertOutcome::Inserted => tracing::info!(subject = %identity.subject, "inserted user"),
        UpsertOutcome::Updated => tracing::info!(subject = %identity.subject, "updated user"),
    }

    // Echo the verified claims; the store is not read back.
    Ok(Json(UserDataResponse::from(identity)))
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier / users はプロセス起動時に一度だけ生成して注入する
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::repos::user_repo::UserStore;
use crate::services::identity::IdentityVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub users: Arc<dyn UserStore>,
    // Expected audience for every token (the configured client id).
    pub audience: Arc<str>,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        users: Arc<dyn UserStore>,
        audience: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            verifier,
            users,
            audience: audience.into(),
        }
    }
}

/*
 * Responsibility
 * - /handleAccessToken の request/response DTO
 * - JSON のキー名はフロントエンドとの契約なので変更しない
 */
use serde::{Deserialize, Serialize};

use crate::services::identity::VerifiedIdentity;

pub const USER_DATA_MESSAGE: &str = "User Data Response from the server";

#[derive(Debug, Deserialize)]
pub struct AccessTokenRequest {
    /// The ID token (credential) handed to the browser by Google Sign-In.
    #[serde(default)]
    pub credentials: Option<String>,
}

impl AccessTokenRequest {
    pub fn credential(&self) -> Result<&str, &'static str> {
        match self.credentials.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err("missing credentials"),
        }
    }
}

/// Profile echoed back from the verified claims. Absent claims are left out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

impl From<VerifiedIdentity> for UserDataResponse {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            message: USER_DATA_MESSAGE,
            user_name: identity.name,
            user_picture: identity.picture,
            user_email: identity.email,
        }
    }
}

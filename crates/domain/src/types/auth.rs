//! Authentication types
//!
//! Login payloads, the persisted token pair and token validation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "ts-gen")]
use ts_rs::TS;

use super::user::User;
use crate::constants::DEFAULT_TOKEN_TYPE;

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

/// Access/refresh token pair held by the session
///
/// Serialized form is what gets persisted under the `authTokens` storage key.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl AuthTokens {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token: None, token_type: default_token_type() }
    }

    /// Value for the `Authorization` header: `<tokenType> <accessToken>`.
    pub fn authorization_header(&self) -> String {
        let token_type =
            if self.token_type.trim().is_empty() { DEFAULT_TOKEN_TYPE } else { &self.token_type };
        format!("{} {}", token_type, self.access_token)
    }
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Payload for `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

/// Payload for `POST /auth/quick-login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLoginRequest {
    pub username: String,
}

/// Response of login and quick-login; persisted under `loginResponse`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts-gen", derive(TS))]
#[cfg_attr(feature = "ts-gen", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

impl LoginResponse {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            token_type: self.token_type.clone().unwrap_or_else(default_token_type),
        }
    }
}

/// Response of `GET /auth/validate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Payload for `POST /auth/refresh`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// Payload for `POST /auth/change-password`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_defaults_to_bearer() {
        let tokens: AuthTokens = serde_json::from_str(r#"{"accessToken":"abc"}"#).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.authorization_header(), "Bearer abc");
    }

    #[test]
    fn custom_token_type_is_kept() {
        let tokens = AuthTokens {
            access_token: "xyz".into(),
            refresh_token: None,
            token_type: "Token".into(),
        };
        assert_eq!(tokens.authorization_header(), "Token xyz");
    }

    #[test]
    fn login_response_converts_to_tokens() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"accessToken":"a","refreshToken":"r","expiresIn":3600}"#,
        )
        .unwrap();
        let tokens = resp.tokens();
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token.as_deref(), Some("r"));
        assert_eq!(tokens.token_type, "Bearer");
    }

    #[test]
    fn debug_output_redacts_tokens() {
        let rendered = format!("{:?}", AuthTokens::bearer("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}

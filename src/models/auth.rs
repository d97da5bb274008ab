// Auth endpoint request/response types

use serde::{Deserialize, Serialize};

/// Token reissue request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueRequest {
    pub refresh_token: String,
}

/// Token reissue response data
///
/// Both fields are optional on the wire; a reissue without a usable
/// access token is treated as a failed refresh by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReissueData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// A validated credential pair produced by a successful reissue.
///
/// `refresh_token` is `None` when the server chose not to rotate it;
/// the previous refresh token stays valid in that case.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Email/password login request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Social (Kakao) login request carrying the provider's OAuth token
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KakaoLoginRequest {
    pub access_token: String,
}

/// Login response data
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user_id: Option<i64>,
}

/// Sign-up request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Sign-up response data
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpData {
    pub user_id: Option<i64>,
}

/// Email verification-code request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailCodeRequest {
    pub email: String,
}

/// Email verification request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub email: String,
    pub certificate_code: String,
}

/// Email verification response data
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailData {
    pub is_verified: Option<bool>,
}

/// Logout request; the server revokes the refresh token
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// Password change request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

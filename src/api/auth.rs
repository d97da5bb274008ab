// Auth feature endpoints

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::TokenStore;
use crate::error::Result;
use crate::models::auth::{
    KakaoLoginRequest, LoginData, LoginRequest, LogoutRequest, PasswordChangeRequest,
    SendEmailCodeRequest, SignUpData, SignUpRequest, VerifyEmailData, VerifyEmailRequest,
};

/// Typed access to the `/auth` endpoints.
///
/// Successful logins persist the returned credential pair; `logout` is
/// the only place stored credentials are cleared. The interceptor never
/// clears them on its own.
pub struct AuthApi {
    client: Arc<ApiClient>,
    store: Arc<dyn TokenStore>,
}

impl AuthApi {
    pub fn new(client: Arc<ApiClient>, store: Arc<dyn TokenStore>) -> Self {
        Self { client, store }
    }

    /// Request an email verification code
    pub async fn send_email_code(&self, email: &str) -> Result<()> {
        self.client
            .post_unit(
                "/auth/email/send",
                &SendEmailCodeRequest {
                    email: email.to_string(),
                },
            )
            .await
    }

    /// Check an email verification code
    pub async fn verify_email(&self, email: &str, certificate_code: &str) -> Result<bool> {
        let data: VerifyEmailData = self
            .client
            .post_data(
                "/auth/email/verify",
                &VerifyEmailRequest {
                    email: email.to_string(),
                    certificate_code: certificate_code.to_string(),
                },
            )
            .await?;
        Ok(data.is_verified.unwrap_or(false))
    }

    /// Register a new account
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
        profile_url: Option<&str>,
    ) -> Result<SignUpData> {
        self.client
            .post_data(
                "/auth/sign-up",
                &SignUpRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                    name: name.to_string(),
                    profile_url: profile_url.map(|s| s.to_string()),
                },
            )
            .await
    }

    /// Log in with email and password, persisting returned tokens
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        let data: LoginData = self
            .client
            .post_data(
                "/auth/login",
                &LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;
        self.persist_login(&data).await;
        Ok(data)
    }

    /// Log in with a Kakao OAuth token, persisting returned tokens
    pub async fn kakao_login(&self, kakao_access_token: &str) -> Result<LoginData> {
        let data: LoginData = self
            .client
            .post_data(
                "/auth/kakao",
                &KakaoLoginRequest {
                    access_token: kakao_access_token.to_string(),
                },
            )
            .await?;
        self.persist_login(&data).await;
        Ok(data)
    }

    /// Revoke the refresh token server-side, then clear the store.
    ///
    /// When the server call fails the store is left intact so the caller
    /// can retry; with no stored refresh token the store is simply
    /// cleared.
    pub async fn logout(&self) -> Result<()> {
        if let Some(refresh_token) = self.store.refresh_token().await {
            self.client
                .post_unit("/auth/logout", &LogoutRequest { refresh_token })
                .await?;
        }
        self.store.clear_tokens().await;
        Ok(())
    }

    /// The user id claimed by the stored access token, if any
    pub async fn user_id(&self) -> Option<i64> {
        let token = self.store.access_token().await?;
        crate::jwt::user_id(&token)
    }

    /// Change the account password
    pub async fn change_password(&self, current_password: &str, new_password: &str) -> Result<()> {
        self.client
            .post_unit(
                "/auth/password/change",
                &PasswordChangeRequest {
                    current_password: current_password.to_string(),
                    new_password: new_password.to_string(),
                },
            )
            .await
    }

    async fn persist_login(&self, data: &LoginData) {
        match (&data.access_token, &data.refresh_token) {
            (Some(access), Some(refresh)) if !access.is_empty() => {
                self.store.update_tokens(access, refresh).await;
            }
            _ => {
                tracing::warn!("Login response carries no usable token pair, nothing persisted");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use crate::config::ClientConfig;
    use crate::error::ClientError;

    fn auth_api_for(
        server: &mockito::ServerGuard,
        store: Arc<MemoryTokenStore>,
    ) -> AuthApi {
        let config = ClientConfig::new(&server.url()).unwrap();
        let client = Arc::new(ApiClient::new(config, store.clone()).unwrap());
        AuthApi::new(client, store)
    }

    #[tokio::test]
    async fn test_login_persists_tokens() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":200,"data":{"accessToken":"A1","refreshToken":"R1","userId":7}}"#,
            )
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let api = auth_api_for(&server, store.clone());

        let data = api.login("a@b.c", "pw").await.unwrap();
        assert_eq!(data.user_id, Some(7));
        assert_eq!(store.access_token().await.as_deref(), Some("A1"));
        assert_eq!(store.refresh_token().await.as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn test_failed_login_maps_envelope_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/login")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":400,"message":"wrong password"}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let api = auth_api_for(&server, store.clone());

        let err = api.login("a@b.c", "bad").await.unwrap_err();
        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "wrong password");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
        assert!(store.access_token().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_revokes_and_clears() {
        let mut server = mockito::Server::new_async().await;
        let revoke = server
            .mock("POST", "/auth/logout")
            .match_header("authorization", "Bearer A1")
            .match_body(mockito::Matcher::JsonString(
                r#"{"refreshToken":"R1"}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":200}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::with_tokens("A1", "R1"));
        let api = auth_api_for(&server, store.clone());

        api.logout().await.unwrap();
        revoke.assert_async().await;
        assert!(store.access_token().await.is_none());
        assert!(store.refresh_token().await.is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session_just_clears() {
        let mut server = mockito::Server::new_async().await;
        let revoke = server
            .mock("POST", "/auth/logout")
            .expect(0)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let api = auth_api_for(&server, store);

        api.logout().await.unwrap();
        revoke.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_id_from_stored_token() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine as _;

        let server = mockito::Server::new_async().await;
        let token = format!(
            "h.{}.s",
            URL_SAFE_NO_PAD.encode(r#"{"userId":42,"exp":1893456000}"#)
        );
        let store = Arc::new(MemoryTokenStore::with_tokens(&token, "R1"));
        let api = auth_api_for(&server, store);

        assert_eq!(api.user_id().await, Some(42));
    }

    #[tokio::test]
    async fn test_verify_email() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/email/verify")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":200,"data":{"isVerified":true}}"#)
            .create_async()
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let api = auth_api_for(&server, store);

        assert!(api.verify_email("a@b.c", "123456").await.unwrap());
    }
}

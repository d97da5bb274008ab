// Token reissue transport

use std::time::Duration;

use reqwest::{Client, Url};
use thiserror::Error;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::auth::{ReissueData, ReissueRequest, TokenPair};
use crate::models::ApiEnvelope;

/// Path of the token reissue endpoint, relative to the base URL
pub const REISSUE_PATH: &str = "/auth/reissue";

/// Why a reissue attempt produced no new credentials.
///
/// Every variant is terminal for a single refresh attempt; the
/// interceptor surfaces the original 401 and leaves stored credentials
/// untouched so a later request can start the cycle over.
#[derive(Error, Debug)]
pub enum ReissueError {
    /// The endpoint answered with a non-success status
    #[error("Reissue rejected: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The endpoint answered 2xx but the body is unusable
    #[error("Malformed reissue response: {0}")]
    MalformedBody(String),

    /// The reissue call itself failed (timeout, connection error)
    #[error("Reissue transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Minimal, interceptor-free sender for the token reissue endpoint.
///
/// Owns a dedicated HTTP client so that refreshing a token can never
/// re-enter the authenticated pipeline.
pub struct RefreshTransport {
    client: Client,
    reissue_url: Url,
}

impl RefreshTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            reissue_url: config.endpoint(REISSUE_PATH)?,
        })
    }

    /// Exchange a refresh token for a fresh credential pair
    pub async fn reissue(&self, refresh_token: &str) -> Result<TokenPair, ReissueError> {
        tracing::debug!("Requesting token reissue");

        let response = self
            .client
            .post(self.reissue_url.clone())
            .json(&ReissueRequest {
                refresh_token: refresh_token.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ReissueError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiEnvelope<ReissueData> = response
            .json()
            .await
            .map_err(|e| ReissueError::MalformedBody(e.to_string()))?;

        let data = envelope
            .data
            .ok_or_else(|| ReissueError::MalformedBody("response carries no data".to_string()))?;

        // A reissue without a usable access token is a failure, not a
        // pair of empty strings in the store.
        let access_token = data
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ReissueError::MalformedBody("response carries no access token".to_string())
            })?;

        tracing::debug!("Token reissue succeeded");

        Ok(TokenPair {
            access_token,
            refresh_token: data.refresh_token.filter(|t| !t.is_empty()),
        })
    }
}

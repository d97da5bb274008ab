// Bearer-token attachment and single-flight refresh on 401
//
// One interceptor instance must be shared by all outbound traffic: the
// refresh mutex only serializes refresh attempts that go through the
// same instance.

use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client, Request, Response, StatusCode};
use tokio::sync::Mutex;

use crate::auth::refresh::RefreshTransport;
use crate::auth::store::TokenStore;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Outbound pipeline for every authenticated Keepsake API call.
///
/// Attaches `Authorization: Bearer <access token>`, inspects responses
/// for 401, coordinates a single shared reissue call across concurrent
/// failures, and retries the original request exactly once with the
/// refreshed token.
pub struct AuthInterceptor {
    /// Underlying transport for API traffic
    router: Client,

    /// Credential pair storage
    store: Arc<dyn TokenStore>,

    /// Dedicated sender for the reissue endpoint
    refresh: RefreshTransport,

    /// Serializes refresh attempts; at most one reissue call is in
    /// flight no matter how many requests hit 401 at once
    refresh_lock: Mutex<()>,

    config: ClientConfig,
}

impl AuthInterceptor {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let router = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout))
            .timeout(std::time::Duration::from_secs(config.request_timeout))
            .build()
            .map_err(ClientError::Http)?;

        let refresh = RefreshTransport::new(&config)?;

        Ok(Self {
            router,
            store,
            refresh,
            refresh_lock: Mutex::new(()),
            config,
        })
    }

    /// The transport used for API traffic, for building requests that
    /// will be passed back through [`handle`](Self::handle)
    pub fn router(&self) -> &Client {
        &self.router
    }

    /// Send a request through the authenticated pipeline.
    ///
    /// Transport errors from sending the original (or retried) request
    /// propagate to the caller; failures inside the refresh step never
    /// do. A 401 that cannot be recovered is returned as the response.
    pub async fn handle(&self, request: Request) -> Result<Response> {
        let path = request.url().path().to_string();

        if self.config.is_no_auth_path(&path) {
            tracing::debug!(path = %path, "Skipping auth: public endpoint");
            return Ok(self.router.execute(request).await?);
        }

        if request.headers().contains_key(AUTHORIZATION) {
            tracing::debug!(path = %path, "Skipping auth: header already set");
            return Ok(self.router.execute(request).await?);
        }

        let access_token = self.store.access_token().await.filter(|t| !t.is_empty());
        let Some(access_token) = access_token else {
            // Logged-out state; the server rejects the request, which is
            // not an error of this pipeline.
            tracing::debug!(path = %path, "No access token available, sending unauthenticated");
            return Ok(self.router.execute(request).await?);
        };

        // Keep an unauthenticated copy for the single retry. Streaming
        // bodies cannot be replayed; their 401 is surfaced as-is.
        let retry_copy = request.try_clone();

        let mut authenticated = request;
        authenticated
            .headers_mut()
            .insert(AUTHORIZATION, bearer_value(&access_token)?);

        let response = self.router.execute(authenticated).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::warn!(path = %path, "Received 401, entering token refresh");

        let Some(original) = retry_copy else {
            tracing::warn!(path = %path, "Request body is not replayable, surfacing 401");
            return Ok(response);
        };

        self.recover_unauthorized(original, response, &access_token)
            .await
    }

    /// Refresh-coordination path for a request that failed with 401.
    ///
    /// `failed_token` is the access token value the failed attempt
    /// carried; the double-check below compares against it to decide
    /// whether a concurrent caller already refreshed.
    async fn recover_unauthorized(
        &self,
        original: Request,
        response: Response,
        failed_token: &str,
    ) -> Result<Response> {
        let guard = self.refresh_lock.lock().await;

        // Double-check under the lock: a waiter whose token was already
        // replaced skips the reissue call entirely.
        let current = self.store.access_token().await.filter(|t| !t.is_empty());
        if let Some(current) = current {
            if current != failed_token {
                drop(guard);
                tracing::debug!("Token already refreshed by a concurrent request, retrying");
                return self.retry_once(original, &current).await;
            }
        }

        let refresh_token = self.store.refresh_token().await.filter(|t| !t.is_empty());
        let Some(refresh_token) = refresh_token else {
            // Session is over; the caller decides what logout looks
            // like. Stored credentials are left as they are.
            tracing::warn!("401 with no refresh token stored, surfacing response");
            return Ok(response);
        };

        match self.refresh.reissue(&refresh_token).await {
            Ok(pair) => {
                // Servers rotate the refresh token optionally; keep the
                // prior one when no replacement came back.
                let next_refresh = pair.refresh_token.as_deref().unwrap_or(&refresh_token);
                self.store
                    .update_tokens(&pair.access_token, next_refresh)
                    .await;
                drop(guard);
                tracing::debug!("Token refreshed, retrying original request");
                self.retry_once(original, &pair.access_token).await
            }
            Err(err) => {
                // Credentials stay untouched: a transient reissue
                // failure must not destroy a still-valid refresh token.
                tracing::warn!(error = %err, "Token reissue failed, surfacing original 401");
                Ok(response)
            }
        }
    }

    /// Send the rebuilt request exactly once; whatever comes back goes
    /// to the caller, including a second 401.
    async fn retry_once(&self, mut original: Request, access_token: &str) -> Result<Response> {
        original
            .headers_mut()
            .insert(AUTHORIZATION, bearer_value(access_token)?);
        Ok(self.router.execute(original).await?)
    }
}

fn bearer_value(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|e| ClientError::Internal(anyhow::anyhow!("access token is not header-safe: {}", e)))
}

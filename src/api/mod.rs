// Typed API surface over the authenticated pipeline

pub mod auth;

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{AuthInterceptor, TokenStore};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::ApiEnvelope;

pub use auth::AuthApi;

/// Facade the feature layers call to reach the Keepsake API.
///
/// Owns the shared [`AuthInterceptor`]; every request built here flows
/// through the authenticated pipeline.
pub struct ApiClient {
    config: ClientConfig,
    interceptor: Arc<AuthInterceptor>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let interceptor = Arc::new(AuthInterceptor::new(config.clone(), store)?);
        Ok(Self {
            config,
            interceptor,
        })
    }

    /// The shared interceptor instance behind this client
    pub fn interceptor(&self) -> Arc<AuthInterceptor> {
        self.interceptor.clone()
    }

    /// GET an endpoint and decode the envelope's `data`
    pub async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.config.endpoint(path)?;
        self.request_data(self.interceptor.router().get(url)).await
    }

    /// POST a JSON body and decode the envelope's `data`
    pub async fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path)?;
        self.request_data(self.interceptor.router().post(url).json(body))
            .await
    }

    /// POST a JSON body for an endpoint whose envelope carries no data
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path)?;
        self.execute(self.interceptor.router().post(url).json(body))
            .await?;
        Ok(())
    }

    async fn request_data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.execute(builder).await?;
        let status = response.status().as_u16();
        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.data.ok_or_else(|| ClientError::Api {
            status,
            message: envelope
                .message
                .unwrap_or_else(|| "response carries no data".to_string()),
        })
    }

    /// Push a request through the pipeline; map non-2xx replies to
    /// [`ClientError::Api`] with the envelope message when present
    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.interceptor.handle(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(&body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or(body);

        tracing::warn!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            "API request failed"
        );

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

// Wire types for the Keepsake REST API

pub mod auth;

use serde::Deserialize;

/// Response envelope shared by every Keepsake endpoint.
///
/// All fields are tolerated as absent; the service is not strict about
/// which metadata it echoes back.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub status: Option<i64>,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

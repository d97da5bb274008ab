use reqwest::Url;

use crate::error::ClientError;

/// Paths that must never carry an Authorization header.
///
/// Matched by suffix against the request path so the API can live under
/// an arbitrary base path. Covers credential issuance, sign-up, login,
/// social login and the reissue endpoint itself.
pub const DEFAULT_NO_AUTH_SUFFIXES: &[&str] = &[
    "/auth/email/send",
    "/auth/email/verify",
    "/auth/sign-up",
    "/auth/login",
    "/auth/kakao",
    "/auth/reissue",
];

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Client configuration for the Keepsake API
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the Keepsake service, e.g. `https://api.keepsake.app/`
    pub base_url: Url,

    /// Connect timeout in seconds (applies to API and reissue calls)
    pub connect_timeout: u64,

    /// Per-request timeout in seconds (applies to API and reissue calls)
    pub request_timeout: u64,

    /// Path suffixes that bypass token attachment entirely
    pub no_auth_suffixes: Vec<String>,
}

impl ClientConfig {
    /// Create a configuration with default timeouts and skip-list
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL '{}' cannot be used as a base",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            no_auth_suffixes: DEFAULT_NO_AUTH_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        })
    }

    /// Override both timeouts (seconds)
    pub fn with_timeouts(mut self, connect_timeout: u64, request_timeout: u64) -> Self {
        self.connect_timeout = connect_timeout;
        self.request_timeout = request_timeout;
        self
    }

    /// Replace the unauthenticated path skip-list
    pub fn with_no_auth_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.no_auth_suffixes = suffixes.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a request path targets an unauthenticated endpoint
    pub fn is_no_auth_path(&self, path: &str) -> bool {
        self.no_auth_suffixes
            .iter()
            .any(|suffix| path.ends_with(suffix.as_str()))
    }

    /// Resolve a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid endpoint path '{}': {}", path, e)))
    }
}

// JWT payload peeking
//
// Reads claims out of a stored access token WITHOUT verifying the
// signature. Verification belongs to the server; the client only peeks
// at its own token for display and routing decisions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

fn claims(token: &str) -> Option<serde_json::Value> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Extract the `userId` claim from an access token.
///
/// Returns `None` for malformed tokens or tokens without the claim.
pub fn user_id(token: &str) -> Option<i64> {
    claims(token)?.get("userId")?.as_i64()
}

/// Extract the `exp` claim as a UTC timestamp
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let exp = claims(token)?.get("exp")?.as_i64()?;
    DateTime::from_timestamp(exp, 0)
}

//! Session token payload decoding.

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{PorticoError, Result};

/// Claims carried in the payload segment of a session token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub username: Option<String>,
    #[serde(rename = "userIsAdmin", default)]
    pub user_is_admin: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Expiry as seconds since the epoch.
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Whether the claims carry an expiry in the past.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp.is_some_and(|exp| exp <= now.timestamp())
    }
}

/// Decode the payload claims from a `header.payload.signature` token.
///
/// Signature verification is the backend's job; the host only reads the
/// payload for display and capability hints.
pub fn decode_claims(token: &str) -> Result<TokenClaims> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| PorticoError::Authentication("malformed token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| PorticoError::Authentication("malformed token payload".to_string()))?;
    Ok(serde_json::from_slice(&bytes)?)
}

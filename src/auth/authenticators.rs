//! Authenticator discovery for providers that support several backends.

use serde::Deserialize;

use crate::error::Result;

/// Credential field expected by an authenticator (e.g. "username").
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatorKey {
    pub name: String,
}

/// One authentication backend advertised by the auth service.
///
/// An empty `keys` list marks an anonymous authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Authenticator {
    pub mnemonic: String,
    #[serde(default)]
    pub keys: Vec<AuthenticatorKey>,
    pub friendly: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl Authenticator {
    /// Label shown to the user.
    pub fn display_name(&self) -> &str {
        self.friendly.as_deref().unwrap_or(&self.mnemonic)
    }

    /// Whether this authenticator needs no credentials at all.
    pub fn is_anonymous(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Fetch the authenticator list from `{auth_url}/authenticators`.
pub async fn fetch_authenticators(
    client: &reqwest::Client,
    auth_url: &str,
) -> Result<Vec<Authenticator>> {
    let resp = client
        .get(format!("{auth_url}/authenticators"))
        .send()
        .await?
        .error_for_status()?;
    Ok(resp.json().await?)
}

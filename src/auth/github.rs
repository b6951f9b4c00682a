//! Redirect-based provider using GitHub OAuth.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::Deserialize;

use super::{AuthProvider, UserProfile};
use crate::error::{PorticoError, Result};
use crate::prefs::{PreferenceStore, TOKEN_KEY};

const DEFAULT_REDIRECT_URL: &str = "https://github.com/login/oauth/authorize";
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Provider that sends the user to GitHub to authenticate.
///
/// There is no credential exchange here: the token arrives out of band
/// from the OAuth redirect and is handed over via [`Self::accept_token`].
/// Verification doubles as profile discovery.
pub struct GithubAuthProvider {
    client: reqwest::Client,
    redirect_url: String,
    api_url: String,
    prefs: Arc<dyn PreferenceStore>,
    token: RwLock<Option<String>>,
    profile: RwLock<Option<UserProfile>>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: String,
    avatar_url: Option<String>,
}

impl GithubAuthProvider {
    pub fn new(prefs: Arc<dyn PreferenceStore>) -> Self {
        let token = prefs.get(TOKEN_KEY);
        Self {
            client: reqwest::Client::new(),
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            prefs,
            token: RwLock::new(token),
            profile: RwLock::new(None),
        }
    }

    pub fn with_redirect_url(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Store the token delivered by the OAuth redirect.
    pub fn accept_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.prefs.set(TOKEN_KEY, &token);
        if let Ok(mut held) = self.token.write() {
            *held = Some(token);
        }
    }
}

#[async_trait]
impl AuthProvider for GithubAuthProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn redirect_url(&self) -> Option<String> {
        Some(self.redirect_url.clone())
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    fn user(&self) -> Option<UserProfile> {
        self.profile.read().ok()?.clone()
    }

    async fn log_in(&self, _username: &str, _password: &str) -> Result<()> {
        Err(PorticoError::UnsupportedOperation(
            "github authentication happens via redirect".to_string(),
        ))
    }

    async fn verify_log_in(&self) -> Result<()> {
        let token = self
            .token()
            .ok_or_else(|| PorticoError::Authentication("no token held".to_string()))?;
        let resp = self
            .client
            .get(format!("{}/user", self.api_url))
            .header("Authorization", format!("token {token}"))
            .header("User-Agent", "portico")
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PorticoError::Authentication(format!(
                "token rejected with status {}",
                resp.status()
            )));
        }
        let user: GithubUser = resp.json().await?;
        if let Ok(mut profile) = self.profile.write() {
            *profile = Some(UserProfile {
                username: user.login,
                avatar_url: user.avatar_url,
            });
        }
        Ok(())
    }

    fn log_out(&self) {
        self.prefs.remove(TOKEN_KEY);
        if let Ok(mut held) = self.token.write() {
            *held = None;
        }
        if let Ok(mut profile) = self.profile.write() {
            *profile = None;
        }
    }
}

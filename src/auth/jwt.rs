//! Credential-based provider backed by a JWT-issuing auth service.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::token::{decode_claims, TokenClaims};
use super::{AuthProvider, MaintenanceState, UserProfile};
use crate::error::{PorticoError, Result};
use crate::prefs::{PreferenceStore, AUTO_LOGIN_KEY, TOKEN_KEY};

/// Provider that exchanges username/password credentials for a JWT.
///
/// Supports verification, refresh, and silent auto-login (an anonymous
/// session requested with empty credentials). The token is persisted in
/// the preference store so a reload resumes the session.
pub struct JwtAuthProvider {
    client: reqwest::Client,
    auth_url: String,
    mnemonic: Option<String>,
    prefs: Arc<dyn PreferenceStore>,
    token: RwLock<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

impl JwtAuthProvider {
    pub fn new(
        auth_url: impl Into<String>,
        mnemonic: Option<String>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        let token = prefs.get(TOKEN_KEY);
        Self {
            client: reqwest::Client::new(),
            auth_url: auth_url.into(),
            mnemonic,
            prefs,
            token: RwLock::new(token),
        }
    }

    /// Override the auth service base URL.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    fn claims(&self) -> Option<TokenClaims> {
        let token = self.token()?;
        decode_claims(&token).ok()
    }

    fn store_token(&self, token: String, auto_login: bool) {
        self.prefs.set(TOKEN_KEY, &token);
        self.prefs.set_bool(AUTO_LOGIN_KEY, auto_login);
        if let Ok(mut held) = self.token.write() {
            *held = Some(token);
        }
    }

    async fn request_token(&self, username: &str, password: &str) -> Result<String> {
        let mut body = json!({
            "username": username,
            "password": password,
        });
        if let Some(mnemonic) = &self.mnemonic {
            body["mnemonic"] = json!(mnemonic);
        }
        let resp = self
            .client
            .post(format!("{}/login", self.auth_url))
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PorticoError::Authentication(format!(
                "login rejected with status {}",
                resp.status()
            )));
        }
        let payload: TokenResponse = resp.json().await?;
        Ok(payload.token)
    }

    async fn fetch_maintenance(&self, path: &str) -> Result<MaintenanceState> {
        let resp = self
            .client
            .get(format!("{}/{path}", self.auth_url))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PorticoError::Authentication(format!(
                "maintenance query rejected with status {}",
                resp.status()
            )));
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl AuthProvider for JwtAuthProvider {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn mnemonic(&self) -> Option<String> {
        self.mnemonic.clone()
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    fn is_admin(&self) -> bool {
        self.claims().is_some_and(|claims| claims.user_is_admin)
    }

    fn user(&self) -> Option<UserProfile> {
        let claims = self.claims()?;
        Some(UserProfile {
            username: claims.username?,
            avatar_url: claims.avatar,
        })
    }

    async fn log_in(&self, username: &str, password: &str) -> Result<()> {
        let token = self.request_token(username, password).await?;
        self.store_token(token, false);
        Ok(())
    }

    async fn verify_log_in(&self) -> Result<()> {
        let token = self
            .token()
            .ok_or_else(|| PorticoError::Authentication("no token held".to_string()))?;
        let claims = decode_claims(&token)?;
        if claims.is_expired(Utc::now()) {
            return Err(PorticoError::Authentication("token expired".to_string()));
        }
        let resp = self
            .client
            .post(format!("{}/verify", self.auth_url))
            .json(&json!({ "token": token }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PorticoError::Authentication(format!(
                "token rejected with status {}",
                resp.status()
            )));
        }
        Ok(())
    }

    fn log_out(&self) {
        self.prefs.remove(TOKEN_KEY);
        self.prefs.remove(AUTO_LOGIN_KEY);
        if let Ok(mut held) = self.token.write() {
            *held = None;
        }
    }

    fn supports_refresh(&self) -> bool {
        true
    }

    async fn refresh(&self) -> Result<()> {
        let token = self
            .token()
            .ok_or_else(|| PorticoError::Authentication("no token to refresh".to_string()))?;
        let resp = self
            .client
            .post(format!("{}/refresh", self.auth_url))
            .json(&json!({ "token": token }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(PorticoError::Authentication(format!(
                "refresh rejected with status {}",
                resp.status()
            )));
        }
        let payload: TokenResponse = resp.json().await?;
        let auto_login = self.prefs.get_bool(AUTO_LOGIN_KEY);
        self.store_token(payload.token, auto_login);
        Ok(())
    }

    fn supports_auto_login(&self) -> bool {
        true
    }

    async fn auto_login(&self) -> Result<()> {
        let token = self.request_token("", "").await?;
        self.store_token(token, true);
        Ok(())
    }

    async fn fetch_maintenance_state(&self) -> Result<MaintenanceState> {
        self.fetch_maintenance("maintenance").await
    }

    async fn fetch_scheduled_maintenance_state(&self) -> Result<MaintenanceState> {
        self.fetch_maintenance("scheduled_maintenance").await
    }
}

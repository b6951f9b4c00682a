//! Authentication provider abstraction and concrete providers.

pub mod anon;
pub mod authenticators;
pub mod github;
pub mod jwt;
pub mod loading;
pub mod token;

pub use anon::AnonAuthProvider;
pub use authenticators::{fetch_authenticators, Authenticator, AuthenticatorKey};
pub use github::GithubAuthProvider;
pub use jwt::JwtAuthProvider;
pub use loading::LoadingAuthProvider;
pub use token::TokenClaims;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{PorticoError, Result};
use crate::prefs::PreferenceStore;

/// Profile details for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar_url: None,
        }
    }
}

/// Site maintenance flag and message.
///
/// Two independent instances exist in state: current and scheduled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceState {
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub message: String,
}

/// Core trait implemented by all authentication providers.
///
/// One instance is active at a time; it is replaced wholesale when the
/// configured provider type changes. Callers must not branch on the
/// concrete variant except through the capability predicates.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Provider type tag (e.g. "jwt", "github", "anon").
    fn name(&self) -> &'static str;

    /// Selected authenticator mnemonic, for providers that support several.
    fn mnemonic(&self) -> Option<String> {
        None
    }

    /// External URL the user must visit to authenticate, for redirect-based
    /// providers.
    fn redirect_url(&self) -> Option<String> {
        None
    }

    /// The current session token, when one is held.
    fn token(&self) -> Option<String>;

    /// Whether a session token is currently held.
    fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Whether the signed-in user has administrator capability.
    fn is_admin(&self) -> bool {
        false
    }

    /// True only for the placeholder provider held before configuration
    /// resolves.
    fn is_loading(&self) -> bool {
        false
    }

    /// Profile of the signed-in user, when known.
    fn user(&self) -> Option<UserProfile> {
        None
    }

    /// Exchange credentials for a session token.
    async fn log_in(&self, username: &str, password: &str) -> Result<()>;

    /// Check that the held token is still accepted by the backend.
    ///
    /// Errors when the token is absent, malformed, or rejected.
    async fn verify_log_in(&self) -> Result<()>;

    /// Drop the held token and any persisted copy.
    fn log_out(&self);

    /// Whether [`AuthProvider::refresh`] is implemented.
    fn supports_refresh(&self) -> bool {
        false
    }

    /// Exchange the held token for a fresh one.
    async fn refresh(&self) -> Result<()> {
        Err(PorticoError::UnsupportedOperation(format!(
            "{} does not support token refresh",
            self.name()
        )))
    }

    /// Whether [`AuthProvider::auto_login`] is implemented.
    fn supports_auto_login(&self) -> bool {
        false
    }

    /// Establish an anonymous session without user interaction.
    async fn auto_login(&self) -> Result<()> {
        Err(PorticoError::UnsupportedOperation(format!(
            "{} does not support auto-login",
            self.name()
        )))
    }

    /// Current maintenance state; defaults to "not in maintenance" for
    /// providers without a maintenance backend.
    async fn fetch_maintenance_state(&self) -> Result<MaintenanceState> {
        Ok(MaintenanceState::default())
    }

    /// Scheduled (future) maintenance state; same default as above.
    async fn fetch_scheduled_maintenance_state(&self) -> Result<MaintenanceState> {
        Ok(MaintenanceState::default())
    }
}

impl std::fmt::Debug for dyn AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthProvider")
            .field("name", &self.name())
            .finish()
    }
}

/// Configuration handed to the provider registry.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Base URL of the authentication backend.
    pub auth_url: String,
    /// Store for persisted tokens and markers.
    pub prefs: Arc<dyn PreferenceStore>,
}

impl ProviderConfig {
    pub fn new(auth_url: impl Into<String>, prefs: Arc<dyn PreferenceStore>) -> Self {
        Self {
            auth_url: auth_url.into(),
            prefs,
        }
    }
}

/// Create a provider from its settings selector.
///
/// The selector is `"<name>"` or `"<name>.<mnemonic>"`. An unrecognized
/// name is a configuration error surfaced to the caller, not a panic.
pub fn create_provider(selector: &str, config: &ProviderConfig) -> Result<Arc<dyn AuthProvider>> {
    let (name, mnemonic) = match selector.split_once('.') {
        Some((name, mnemonic)) => (name, Some(mnemonic.to_string())),
        None => (selector, None),
    };
    match name {
        "jwt" => Ok(Arc::new(JwtAuthProvider::new(
            &config.auth_url,
            mnemonic,
            config.prefs.clone(),
        ))),
        "github" => Ok(Arc::new(GithubAuthProvider::new(config.prefs.clone()))),
        "anon" => Ok(Arc::new(AnonAuthProvider::new())),
        other => Err(PorticoError::Configuration(format!(
            "unrecognized auth provider: {other} (supported: jwt, github, anon)"
        ))),
    }
}

//! Settings bootstrap: the one-shot startup sequence.
//!
//! Fetches the remote settings document, installs the configured auth
//! provider, performs the initial verification or auto-login, merges
//! feature switches, loads string resources, and fetches maintenance
//! state. Every stage degrades independently; the terminal site-loading
//! signal fires exactly once on every path.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;

use crate::auth::{
    create_provider, fetch_authenticators, Authenticator, AuthProvider, ProviderConfig,
};
use crate::bus::{PluginMessage, NOTIFICATION_TYPE};
use crate::error::{PorticoError, Result};
use crate::prefs::PreferenceStore;
use crate::state::{Action, FeatureSwitches, Notification, Severity, Store};
use crate::strings::StringResources;
use crate::theme::ThemeOptions;

/// Default path of the settings document under the site base URL.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Remote settings document. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettings {
    #[serde(rename = "auth-provider")]
    pub auth_provider: Option<String>,
    #[serde(rename = "authUrl")]
    pub auth_url: Option<String>,
    pub features: Option<FeatureSwitches>,
    #[serde(rename = "ui-strings")]
    pub ui_strings: Option<String>,
    #[serde(rename = "ga-tracking-id")]
    pub ga_tracking_id: Option<String>,
    #[serde(rename = "startUrl")]
    pub start_url: Option<String>,
    #[serde(rename = "homepageUrl")]
    pub homepage_url: Option<String>,
}

/// One-shot startup orchestrator.
pub struct Bootstrap {
    store: Arc<Store>,
    prefs: Arc<dyn PreferenceStore>,
    client: reqwest::Client,
    base_url: String,
    settings_path: String,
}

impl Bootstrap {
    pub fn new(
        store: Arc<Store>,
        prefs: Arc<dyn PreferenceStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            prefs,
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            settings_path: DEFAULT_SETTINGS_PATH.to_string(),
        }
    }

    /// Override the settings document path.
    pub fn with_settings_path(mut self, path: impl Into<String>) -> Self {
        self.settings_path = path.into();
        self
    }

    /// Run the whole sequence. Never fails: configuration errors leave
    /// the shell in a degraded-but-responsive state, and site loading is
    /// always signalled complete at the end.
    pub async fn configure_site(&self) {
        if let Err(err) = self.run_stages().await {
            tracing::error!(error = %err, "error loading settings.json");
        }
        self.store.dispatch(Action::SiteLoadingUpdate(false));
    }

    async fn run_stages(&self) -> Result<()> {
        let settings = self.fetch_settings().await?;
        self.install_provider(&settings);
        self.load_theme_preferences();
        self.initialise_authentication().await;
        self.apply_settings(&settings);
        if let Some(path) = &settings.ui_strings {
            self.load_strings(path).await;
        }
        self.load_maintenance_states().await;
        Ok(())
    }

    /// Stage 1: fetch and validate the settings document.
    async fn fetch_settings(&self) -> Result<SiteSettings> {
        let url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.settings_path
        );
        let resp = self.client.get(&url).send().await?.error_for_status()?;
        let value: serde_json::Value = resp.json().await?;
        if !value.is_object() {
            return Err(PorticoError::Configuration("invalid format".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Stage 2: select and install the auth provider.
    fn install_provider(&self, settings: &SiteSettings) {
        let Some(selector) = &settings.auth_provider else {
            tracing::error!("settings document has no auth-provider, authentication disabled");
            return;
        };
        let config = ProviderConfig::new(
            settings.auth_url.clone().unwrap_or_default(),
            self.prefs.clone(),
        );
        match create_provider(selector, &config) {
            Ok(provider) => self.store.dispatch(Action::ProviderLoaded(provider)),
            Err(err) => {
                tracing::error!(selector = %selector, error = %err, "failed to configure auth provider");
            }
        }
    }

    fn load_theme_preferences(&self) {
        let theme = ThemeOptions::from_prefs(self.prefs.as_ref());
        self.store
            .dispatch(Action::LoadDarkModePreference(theme.dark_mode));
        self.store
            .dispatch(Action::LoadHighContrastModePreference(theme.high_contrast_mode));
    }

    /// Stages 3–4: verify an existing session or attempt auto-login.
    async fn initialise_authentication(&self) {
        let provider = self.store.provider();
        if provider.is_logged_in() {
            match provider.verify_log_in().await {
                Ok(()) => {
                    self.store.dispatch(Action::Authorised);
                }
                Err(err) => {
                    tracing::debug!(error = %err, "stored token failed verification");
                    if provider.supports_auto_login() {
                        self.attempt_auto_login(&provider, Action::InvalidateToken)
                            .await;
                    } else {
                        self.store.dispatch(Action::InvalidateToken);
                    }
                }
            }
        } else if provider.supports_auto_login() {
            self.attempt_auto_login(&provider, Action::LoadedAuthentication)
                .await;
        }
    }

    async fn attempt_auto_login(&self, provider: &Arc<dyn AuthProvider>, on_failure: Action) {
        self.store.dispatch(Action::LoadingAuthentication);
        match provider.auto_login().await {
            Ok(()) => self.store.dispatch(Action::Authorised),
            Err(err) => {
                tracing::warn!(error = %err, "auto-login failed");
                self.store.dispatch(on_failure);
            }
        }
    }

    /// Stages 5–6: merge switches, start/homepage URLs, analytics id.
    fn apply_settings(&self, settings: &SiteSettings) {
        if let Some(features) = &settings.features {
            self.store
                .dispatch(Action::ConfigureFeatureSwitches(features.clone()));
        }
        if let Some(start_url) = &settings.start_url {
            self.store
                .dispatch(Action::RegisterStartUrl(start_url.clone()));
        }
        if let Some(homepage_url) = &settings.homepage_url {
            self.store
                .dispatch(Action::RegisterHomepageUrl(homepage_url.clone()));
        }
        if let Some(id) = &settings.ga_tracking_id {
            self.store.dispatch(Action::ConfigureAnalytics(id.clone()));
        }
    }

    /// Stage 7: load UI string resources.
    async fn load_strings(&self, path: &str) {
        let url = format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            normalize_strings_path(path)
        );
        let fetch = async {
            let resp = self.client.get(&url).send().await?.error_for_status()?;
            Ok::<StringResources, PorticoError>(resp.json().await?)
        };
        match fetch.await {
            Ok(resources) => self.store.dispatch(Action::ConfigureStrings(resources)),
            Err(err) => {
                tracing::error!(path = %path, error = %err, "failed to read strings");
            }
        }
    }

    /// Stage 8: fetch maintenance states, best-effort.
    async fn load_maintenance_states(&self) {
        let provider = self.store.provider();
        match provider.fetch_maintenance_state().await {
            Ok(maintenance) => {
                self.store
                    .dispatch(Action::LoadMaintenanceState(maintenance));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch maintenance state");
            }
        }
        match provider.fetch_scheduled_maintenance_state().await {
            Ok(scheduled) => {
                if scheduled.show {
                    // One-time warning; the host's own relay picks it up
                    // alongside the plugins.
                    self.store.channel().broadcast(&PluginMessage::new(
                        NOTIFICATION_TYPE,
                        json!({ "message": scheduled.message, "severity": "warning" }),
                    ));
                }
                self.store
                    .dispatch(Action::LoadScheduledMaintenanceState(scheduled));
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch scheduled maintenance state");
            }
        }
    }

    /// Discover available authenticators for a multi-backend provider.
    ///
    /// Failure yields an empty list plus a user-facing error
    /// notification; this is the only network degradation the user is
    /// told about directly.
    pub async fn discover_authenticators(&self, auth_url: &str) -> Vec<Authenticator> {
        match fetch_authenticators(&self.client, auth_url).await {
            Ok(authenticators) => authenticators,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch authenticators");
                self.store.dispatch(Action::AddNotification(Notification {
                    message: "Failed to fetch authenticator information from the authentication server"
                        .to_string(),
                    severity: Severity::Error,
                }));
                Vec::new()
            }
        }
    }
}

fn normalize_strings_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

//! Shell state: the single snapshot consumed by views and plugins.

pub mod actions;
pub mod reducer;
pub mod store;

pub use actions::Action;
pub use store::{AuthSequencer, Store};

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::auth::{AuthProvider, LoadingAuthProvider, MaintenanceState};
use crate::strings::StringResources;

/// Named boolean feature switches from the settings document.
pub type FeatureSwitches = HashMap<String, bool>;

/// A notification surfaced in the shell's notification tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

/// Notification severity levels.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A route contributed by a plugin bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRegistration {
    /// Navigation section the link is grouped under.
    pub section: String,
    /// Route path; unique across the whole registry.
    pub link: String,
    /// Identifier of the plugin bundle that serves the route.
    pub plugin: String,
    pub display_name: String,
    pub order: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Whether the route is admin-gated.
    #[serde(default)]
    pub admin: bool,
}

/// One step of the guided help tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpStep {
    /// Selector the step points at; unique across the tour.
    pub target: String,
    pub content: String,
}

/// Analytics configuration: id stored at bootstrap, initialized later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analytics {
    pub id: String,
    pub initialised: bool,
}

/// Authentication slice of the shell state.
#[derive(Clone)]
pub struct AuthSession {
    pub provider: Arc<dyn AuthProvider>,
    pub loading: bool,
    pub failed_to_login: bool,
    pub signed_out_due_to_token_invalidation: bool,
}

impl AuthSession {
    fn new() -> Self {
        Self {
            provider: Arc::new(LoadingAuthProvider::new()),
            loading: false,
            failed_to_login: false,
            signed_out_due_to_token_invalidation: false,
        }
    }

    /// Replace the provider wholesale, resetting session flags.
    fn with_provider(provider: Arc<dyn AuthProvider>) -> Self {
        Self {
            provider,
            loading: false,
            failed_to_login: false,
            signed_out_due_to_token_invalidation: false,
        }
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("provider", &self.provider.name())
            .field("loading", &self.loading)
            .field("failed_to_login", &self.failed_to_login)
            .field(
                "signed_out_due_to_token_invalidation",
                &self.signed_out_due_to_token_invalidation,
            )
            .finish()
    }
}

/// Complete shell state snapshot.
///
/// Cloning is cheap enough for per-dispatch snapshots: the provider is
/// shared behind an `Arc` and the collections are small.
#[derive(Debug, Clone)]
pub struct ShellState {
    pub auth: AuthSession,
    pub notifications: Vec<Notification>,
    pub plugins: Vec<PluginRegistration>,
    pub help_steps: Vec<HelpStep>,
    pub features: FeatureSwitches,
    pub strings: Option<StringResources>,
    pub site_loading: bool,
    pub drawer_open: bool,
    pub dark_mode: bool,
    pub high_contrast_mode: bool,
    pub analytics: Option<Analytics>,
    pub start_url: Option<String>,
    pub homepage_url: Option<String>,
    pub maintenance: MaintenanceState,
    pub scheduled_maintenance: MaintenanceState,
}

impl ShellState {
    pub fn new() -> Self {
        Self {
            auth: AuthSession::new(),
            notifications: Vec::new(),
            plugins: Vec::new(),
            help_steps: Vec::new(),
            features: FeatureSwitches::new(),
            strings: None,
            site_loading: true,
            drawer_open: false,
            dark_mode: false,
            high_contrast_mode: false,
            analytics: None,
            start_url: None,
            homepage_url: None,
            maintenance: MaintenanceState::default(),
            scheduled_maintenance: MaintenanceState::default(),
        }
    }

    /// Whether the shell is still resolving its initial state.
    pub fn loading(&self) -> bool {
        self.site_loading || self.auth.loading || self.auth.provider.is_loading()
    }

    /// Registration serving the given route path, if any.
    pub fn registration_for(&self, path: &str) -> Option<&PluginRegistration> {
        self.plugins.iter().find(|plugin| plugin.link == path)
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_loading_and_unauthenticated() {
        let state = ShellState::new();
        assert!(state.site_loading);
        assert!(state.loading());
        assert!(!state.auth.provider.is_logged_in());
        assert!(state.notifications.is_empty());
        assert!(state.plugins.is_empty());
    }

    #[test]
    fn severity_round_trips_through_strings() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!("error".parse::<Severity>().unwrap(), Severity::Error);
        assert!("catastrophic".parse::<Severity>().is_err());
    }

    #[test]
    fn registration_lookup_matches_link() {
        let mut state = ShellState::new();
        state.plugins.push(PluginRegistration {
            section: "Data".to_string(),
            link: "/data/browse".to_string(),
            plugin: "browser".to_string(),
            display_name: "Browse".to_string(),
            order: 0,
            help_text: None,
            admin: false,
        });

        assert!(state.registration_for("/data/browse").is_some());
        assert!(state.registration_for("/other").is_none());
    }
}

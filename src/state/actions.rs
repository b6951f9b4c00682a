//! Actions dispatched through the store.
//!
//! All state mutation flows through these; the dispatch path is serialized
//! so one action is fully reduced before the next begins.

use std::sync::Arc;

use serde_json::json;

use super::{FeatureSwitches, HelpStep, Notification, PluginRegistration};
use crate::auth::{AuthProvider, MaintenanceState};
use crate::bus::{PluginMessage, PLUGIN_RERENDER_TYPE, THEME_OPTIONS_TYPE};
use crate::strings::StringResources;
use crate::theme::ThemeOptions;

/// Everything that can change shell state.
#[derive(Clone)]
pub enum Action {
    /// Install a freshly configured provider, replacing the current one.
    ProviderLoaded(Arc<dyn AuthProvider>),
    LoadingAuthentication,
    /// Authentication settled without a session (e.g. failed auto-login).
    LoadedAuthentication,
    Authorised,
    AuthFailure,
    InvalidateToken,
    SignOut,
    SiteLoadingUpdate(bool),
    ConfigureStrings(StringResources),
    ConfigureFeatureSwitches(FeatureSwitches),
    ConfigureAnalytics(String),
    InitialiseAnalytics,
    RegisterRoute(PluginRegistration),
    AddHelpTourSteps(Vec<HelpStep>),
    AddNotification(Notification),
    DismissNotification(usize),
    RegisterStartUrl(String),
    RegisterHomepageUrl(String),
    LoadMaintenanceState(MaintenanceState),
    LoadScheduledMaintenanceState(MaintenanceState),
    LoadDarkModePreference(bool),
    LoadHighContrastModePreference(bool),
    ToggleDrawer,
    RequestPluginRerender,
    SendThemeOptions(ThemeOptions),
}

impl Action {
    /// Short tag for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ProviderLoaded(_) => "provider_loaded",
            Action::LoadingAuthentication => "loading_authentication",
            Action::LoadedAuthentication => "loaded_authentication",
            Action::Authorised => "authorised",
            Action::AuthFailure => "auth_failure",
            Action::InvalidateToken => "invalidate_token",
            Action::SignOut => "sign_out",
            Action::SiteLoadingUpdate(_) => "site_loading_update",
            Action::ConfigureStrings(_) => "configure_strings",
            Action::ConfigureFeatureSwitches(_) => "configure_feature_switches",
            Action::ConfigureAnalytics(_) => "configure_analytics",
            Action::InitialiseAnalytics => "initialise_analytics",
            Action::RegisterRoute(_) => "register_route",
            Action::AddHelpTourSteps(_) => "add_help_tour_steps",
            Action::AddNotification(_) => "add_notification",
            Action::DismissNotification(_) => "dismiss_notification",
            Action::RegisterStartUrl(_) => "register_start_url",
            Action::RegisterHomepageUrl(_) => "register_homepage_url",
            Action::LoadMaintenanceState(_) => "load_maintenance_state",
            Action::LoadScheduledMaintenanceState(_) => "load_scheduled_maintenance_state",
            Action::LoadDarkModePreference(_) => "load_dark_mode_preference",
            Action::LoadHighContrastModePreference(_) => "load_high_contrast_mode_preference",
            Action::ToggleDrawer => "toggle_drawer",
            Action::RequestPluginRerender => "request_plugin_rerender",
            Action::SendThemeOptions(_) => "send_theme_options",
        }
    }

    /// Outbound message for actions whose payload carries the broadcast
    /// flag; everything else stays host-internal.
    pub fn broadcast_message(&self) -> Option<PluginMessage> {
        match self {
            Action::RequestPluginRerender => Some(PluginMessage::new(
                PLUGIN_RERENDER_TYPE,
                json!({ "broadcast": true }),
            )),
            Action::SendThemeOptions(theme) => Some(PluginMessage::new(
                THEME_OPTIONS_TYPE,
                json!({ "theme": theme, "broadcast": true }),
            )),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

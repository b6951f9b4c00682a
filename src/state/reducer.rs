//! Pure state transitions.

use super::{Action, Analytics, AuthSession, ShellState};

/// Apply one action to the state.
///
/// Invariant violations (duplicate route links, duplicate help targets)
/// are logged and skipped; the reducer never fails.
pub fn reduce(state: &mut ShellState, action: &Action) {
    match action {
        Action::ProviderLoaded(provider) => {
            state.auth = AuthSession::with_provider(provider.clone());
        }
        Action::LoadingAuthentication => {
            state.auth.loading = true;
        }
        Action::LoadedAuthentication => {
            state.auth.loading = false;
        }
        Action::Authorised => {
            state.auth.loading = false;
            state.auth.failed_to_login = false;
            state.auth.signed_out_due_to_token_invalidation = false;
        }
        Action::AuthFailure => {
            state.auth.provider.log_out();
            state.auth.loading = false;
            state.auth.failed_to_login = true;
        }
        Action::InvalidateToken => {
            state.auth.provider.log_out();
            state.auth.loading = false;
            state.auth.signed_out_due_to_token_invalidation = true;
        }
        Action::SignOut => {
            state.auth.provider.log_out();
            state.auth.loading = false;
            state.auth.failed_to_login = false;
            state.auth.signed_out_due_to_token_invalidation = false;
        }
        Action::SiteLoadingUpdate(loading) => {
            state.site_loading = *loading;
        }
        Action::ConfigureStrings(resources) => {
            state.strings = Some(resources.clone());
        }
        Action::ConfigureFeatureSwitches(switches) => {
            state.features = switches.clone();
        }
        Action::ConfigureAnalytics(id) => {
            state.analytics = Some(Analytics {
                id: id.clone(),
                initialised: false,
            });
        }
        Action::InitialiseAnalytics => match &mut state.analytics {
            Some(analytics) => analytics.initialised = true,
            None => {
                tracing::error!(
                    "attempted to initialise analytics without analytics configuration"
                );
            }
        },
        Action::RegisterRoute(registration) => {
            if state
                .plugins
                .iter()
                .any(|existing| existing.link == registration.link)
            {
                tracing::error!(
                    plugin = %registration.plugin,
                    link = %registration.link,
                    display_name = %registration.display_name,
                    "duplicate route registration rejected"
                );
            } else {
                state.plugins.push(registration.clone());
            }
        }
        Action::AddHelpTourSteps(steps) => {
            for step in steps {
                if state
                    .help_steps
                    .iter()
                    .any(|existing| existing.target == step.target)
                {
                    tracing::error!(target = %step.target, "duplicate help step target identified");
                } else {
                    state.help_steps.push(step.clone());
                }
            }
        }
        Action::AddNotification(notification) => {
            state.notifications.push(notification.clone());
        }
        Action::DismissNotification(index) => {
            if *index < state.notifications.len() {
                state.notifications.remove(*index);
            } else {
                tracing::warn!(index, "dismissed notification index out of range");
            }
        }
        Action::RegisterStartUrl(url) => {
            state.start_url = Some(url.clone());
        }
        Action::RegisterHomepageUrl(url) => {
            state.homepage_url = Some(url.clone());
        }
        Action::LoadMaintenanceState(maintenance) => {
            state.maintenance = maintenance.clone();
        }
        Action::LoadScheduledMaintenanceState(maintenance) => {
            state.scheduled_maintenance = maintenance.clone();
        }
        Action::LoadDarkModePreference(dark_mode) => {
            state.dark_mode = *dark_mode;
        }
        Action::LoadHighContrastModePreference(high_contrast) => {
            state.high_contrast_mode = *high_contrast;
        }
        Action::ToggleDrawer => {
            state.drawer_open = !state.drawer_open;
        }
        // Pure broadcasts; no state to change.
        Action::RequestPluginRerender | Action::SendThemeOptions(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AnonAuthProvider;
    use crate::state::{HelpStep, Notification, PluginRegistration, Severity};
    use std::sync::Arc;

    fn registration(link: &str, display_name: &str) -> PluginRegistration {
        PluginRegistration {
            section: "dummy-section".to_string(),
            link: link.to_string(),
            plugin: "demo_plugin".to_string(),
            display_name: display_name.to_string(),
            order: 10,
            help_text: Some("help".to_string()),
            admin: false,
        }
    }

    fn authenticated_state() -> ShellState {
        let mut state = ShellState::new();
        state.auth = AuthSession::with_provider(Arc::new(AnonAuthProvider::new()));
        state
    }

    #[test]
    fn loading_authentication_sets_loading() {
        let mut state = ShellState::new();
        reduce(&mut state, &Action::LoadingAuthentication);
        assert!(state.auth.loading);
    }

    #[test]
    fn authorised_clears_failure_flags_and_loading() {
        let mut state = ShellState::new();
        state.auth.loading = true;
        state.auth.failed_to_login = true;
        state.auth.signed_out_due_to_token_invalidation = true;

        reduce(&mut state, &Action::Authorised);

        assert!(!state.auth.loading);
        assert!(!state.auth.failed_to_login);
        assert!(!state.auth.signed_out_due_to_token_invalidation);
    }

    #[test]
    fn auth_failure_logs_provider_out() {
        let mut state = authenticated_state();
        reduce(&mut state, &Action::AuthFailure);

        assert!(state.auth.failed_to_login);
        assert!(!state.auth.provider.is_logged_in());
    }

    #[test]
    fn invalidation_resets_session_and_flags_cause() {
        let mut state = authenticated_state();
        reduce(&mut state, &Action::InvalidateToken);

        assert!(state.auth.signed_out_due_to_token_invalidation);
        assert!(!state.auth.provider.is_logged_in());
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut state = authenticated_state();
        state.auth.loading = true;
        state.auth.failed_to_login = true;
        state.auth.signed_out_due_to_token_invalidation = true;

        reduce(&mut state, &Action::SignOut);

        assert!(!state.auth.provider.is_logged_in());
        assert!(!state.auth.loading);
        assert!(!state.auth.failed_to_login);
        assert!(!state.auth.signed_out_due_to_token_invalidation);
    }

    #[test]
    fn registers_route() {
        let mut state = ShellState::new();
        reduce(
            &mut state,
            &Action::RegisterRoute(registration("initial/route", "Route Label")),
        );
        assert_eq!(state.plugins.len(), 1);
        assert_eq!(state.plugins[0].link, "initial/route");
    }

    #[test]
    fn duplicate_link_is_rejected_registry_unchanged() {
        let mut state = ShellState::new();
        reduce(
            &mut state,
            &Action::RegisterRoute(registration("initial/route", "Route Label")),
        );
        reduce(
            &mut state,
            &Action::RegisterRoute(registration("initial/route", "Duplicate Route")),
        );

        assert_eq!(state.plugins.len(), 1);
        assert_eq!(state.plugins[0].display_name, "Route Label");
    }

    #[test]
    fn duplicate_display_name_with_distinct_links_is_allowed() {
        let mut state = ShellState::new();
        reduce(
            &mut state,
            &Action::RegisterRoute(registration("initial/route", "Route Label")),
        );
        reduce(
            &mut state,
            &Action::RegisterRoute(registration("second/route", "Route Label")),
        );

        assert_eq!(state.plugins.len(), 2);
    }

    #[test]
    fn help_steps_accumulate_but_targets_stay_unique() {
        let mut state = ShellState::new();
        let step = |target: &str| HelpStep {
            target: target.to_string(),
            content: "content".to_string(),
        };

        reduce(
            &mut state,
            &Action::AddHelpTourSteps(vec![step(".test-1"), step(".test-2")]),
        );
        assert_eq!(state.help_steps.len(), 2);

        reduce(&mut state, &Action::AddHelpTourSteps(vec![step(".test-1")]));
        assert_eq!(state.help_steps.len(), 2);
    }

    #[test]
    fn dismiss_removes_exactly_one_notification_preserving_order() {
        let mut state = ShellState::new();
        for message in ["message 1", "message 2", "message 3", "message 4"] {
            reduce(
                &mut state,
                &Action::AddNotification(Notification {
                    message: message.to_string(),
                    severity: Severity::Success,
                }),
            );
        }

        reduce(&mut state, &Action::DismissNotification(2));

        let messages: Vec<&str> = state
            .notifications
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(messages, vec!["message 1", "message 2", "message 4"]);
    }

    #[test]
    fn dismiss_out_of_range_is_a_noop() {
        let mut state = ShellState::new();
        reduce(&mut state, &Action::DismissNotification(3));
        assert!(state.notifications.is_empty());
    }

    #[test]
    fn initialise_analytics_requires_configuration() {
        let mut state = ShellState::new();
        reduce(&mut state, &Action::InitialiseAnalytics);
        assert!(state.analytics.is_none());

        reduce(&mut state, &Action::ConfigureAnalytics("test id".to_string()));
        let analytics = state.analytics.as_ref().unwrap();
        assert_eq!(analytics.id, "test id");
        assert!(!analytics.initialised);

        reduce(&mut state, &Action::InitialiseAnalytics);
        assert!(state.analytics.as_ref().unwrap().initialised);
    }

    #[test]
    fn toggle_drawer_flips_state() {
        let mut state = ShellState::new();
        reduce(&mut state, &Action::ToggleDrawer);
        assert!(state.drawer_open);
        reduce(&mut state, &Action::ToggleDrawer);
        assert!(!state.drawer_open);
    }

    #[test]
    fn provider_loaded_replaces_session_wholesale() {
        let mut state = ShellState::new();
        state.auth.failed_to_login = true;

        reduce(
            &mut state,
            &Action::ProviderLoaded(Arc::new(AnonAuthProvider::new())),
        );

        assert_eq!(state.auth.provider.name(), "anon");
        assert!(!state.auth.failed_to_login);
    }
}

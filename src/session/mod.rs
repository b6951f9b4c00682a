//! Session lifecycle flows: login, sign-out, and token invalidation.

use std::sync::Arc;

use crate::prefs::{PreferenceStore, AUTO_LOGIN_KEY, REFERRER_KEY};
use crate::routing::navigator::Navigator;
use crate::routing::{HOME_ROUTE, LOGIN_ROUTE, LOGOUT_ROUTE};
use crate::state::{Action, AuthSequencer, Store};

/// Drives session transitions that need side effects beyond the reducer:
/// navigation, preference persistence, and provider network calls.
///
/// Login and verify responses are generation-guarded so a stale response
/// from a superseded attempt never overwrites fresher state.
pub struct SessionFlows {
    store: Arc<Store>,
    navigator: Arc<dyn Navigator>,
    prefs: Arc<dyn PreferenceStore>,
    sequencer: AuthSequencer,
}

impl SessionFlows {
    pub fn new(
        store: Arc<Store>,
        navigator: Arc<dyn Navigator>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            store,
            navigator,
            prefs,
            sequencer: AuthSequencer::new(),
        }
    }

    /// Attempt a credential login against the active provider.
    ///
    /// On success the session becomes authenticated and navigation moves
    /// to the stored referrer (home when none was stored). On rejection
    /// the session records a generic login failure; the error detail is
    /// not surfaced to callers.
    pub async fn log_in(&self, username: &str, password: &str) {
        let generation = self.sequencer.begin();
        self.store.dispatch(Action::LoadingAuthentication);

        let provider = self.store.provider();
        let result = provider.log_in(username, password).await;

        if !self.sequencer.is_current(generation) {
            tracing::debug!(generation, "stale login response discarded");
            return;
        }

        match result {
            Ok(()) => {
                self.store.dispatch(Action::Authorised);
                let target = self
                    .prefs
                    .get(REFERRER_KEY)
                    .unwrap_or_else(|| HOME_ROUTE.to_string());
                self.prefs.remove(REFERRER_KEY);
                self.navigator.push(&target, None);
            }
            Err(err) => {
                tracing::debug!(error = %err, "login rejected");
                self.store.dispatch(Action::AuthFailure);
            }
        }
    }

    /// Explicit sign-out: clears the session and returns home.
    pub fn sign_out(&self) {
        self.sequencer.begin();
        self.store.dispatch(Action::SignOut);
        self.prefs.remove(AUTO_LOGIN_KEY);
        self.prefs.remove(REFERRER_KEY);
        self.navigator.push(HOME_ROUTE, None);
    }

    /// React to an invalidation report (typically from a plugin).
    ///
    /// Refresh is a recovery attempt: the session is only torn down when
    /// refresh is unsupported or itself fails.
    pub async fn invalidate_token(&self) {
        let provider = self.store.provider();
        if provider.supports_refresh() {
            match provider.refresh().await {
                Ok(()) => {
                    tracing::debug!("token refreshed after invalidation report");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "token refresh failed, signing out");
                    self.store.dispatch(Action::InvalidateToken);
                }
            }
        } else {
            self.store.dispatch(Action::InvalidateToken);
        }
    }

    /// Whether the session counts as logged in for the given route.
    ///
    /// Sessions established by silent auto-login are treated as logged
    /// out on the login and logout routes specifically, so those pages
    /// still offer a real sign-in.
    pub fn effectively_logged_in(&self, path: &str) -> bool {
        let provider = self.store.provider();
        if !provider.is_logged_in() {
            return false;
        }
        let auth_route = path == LOGIN_ROUTE || path == LOGOUT_ROUTE;
        !(auth_route && self.prefs.get_bool(AUTO_LOGIN_KEY))
    }
}

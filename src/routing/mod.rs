//! Route authorization gate.
//!
//! The decision itself is a pure function over a state snapshot and the
//! current location; [`RouteGate`] wraps it with the side effects
//! (referrer persistence, redirects, mount-time verification).

pub mod navigator;

pub use navigator::{Location, MemoryNavigator, Navigator, RouteReplay};

use std::sync::Arc;

use crate::prefs::{PreferenceStore, REFERRER_KEY};
use crate::state::{Action, ShellState, Store};

/// Default landing route.
pub const HOME_ROUTE: &str = "/";
/// Route presenting the login affordance.
pub const LOGIN_ROUTE: &str = "/login";
/// Route handling explicit sign-out.
pub const LOGOUT_ROUTE: &str = "/logout";

/// A protected view asking whether it may render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub path: String,
    pub admin_required: bool,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            admin_required: false,
        }
    }

    pub fn admin(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            admin_required: true,
        }
    }
}

/// What the view layer should do for a protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDecision {
    /// Still resolving; render a neutral placeholder, decide nothing.
    Placeholder,
    /// Send the user to the login route, remembering where they were
    /// headed (unless that was the configured homepage).
    RedirectToLogin { referrer: Option<String> },
    /// Admin-gated content for a non-admin user. Rendered as "not found"
    /// so protected routes do not reveal their existence.
    NotFound,
    /// A configured start URL is being replayed for this path.
    RedirectToStart { start_url: String },
    /// Render the protected content.
    Render,
}

/// Decide how a protected route should render.
pub fn decide(state: &ShellState, location: &Location, request: &RouteRequest) -> RenderDecision {
    if state.loading() {
        return RenderDecision::Placeholder;
    }
    if !state.auth.provider.is_logged_in() {
        let referrer = (state.homepage_url.as_deref() != Some(request.path.as_str()))
            .then(|| request.path.clone());
        return RenderDecision::RedirectToLogin { referrer };
    }
    if request.admin_required && !state.auth.provider.is_admin() {
        return RenderDecision::NotFound;
    }
    if let Some(start_url) = location
        .replay
        .as_ref()
        .and_then(|replay| replay.start_url.clone())
    {
        return RenderDecision::RedirectToStart { start_url };
    }
    RenderDecision::Render
}

/// Loading/login flags captured from one state snapshot, for transition
/// comparisons between renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateView {
    pub loading: bool,
    pub logged_in: bool,
}

impl GateView {
    pub fn of(state: &ShellState) -> Self {
        Self {
            loading: state.loading(),
            logged_in: state.auth.provider.is_logged_in(),
        }
    }
}

/// Whether a rerender broadcast is due after a state transition: the
/// shell just finished loading into an authenticated state, or the user
/// just became authenticated. Plugins re-evaluate visibility then.
pub fn rerender_due(prev: GateView, next: GateView) -> bool {
    (next.logged_in && prev.loading && !next.loading)
        || (!next.loading && !prev.logged_in && next.logged_in)
}

/// Whether a route transition moves one plugin bundle between an
/// admin-gated and a non-admin-gated mount point. The hosting runtime
/// does not see that as an instance change, so the shell must force an
/// unmount/remount.
pub fn needs_remount(state: &ShellState, prev_path: &str, next_path: &str) -> bool {
    match (
        state.registration_for(prev_path),
        state.registration_for(next_path),
    ) {
        (Some(prev), Some(next)) => prev.plugin == next.plugin && prev.admin != next.admin,
        _ => false,
    }
}

/// Effectful wrapper over [`decide`] for a protected view.
pub struct RouteGate {
    store: Arc<Store>,
    navigator: Arc<dyn Navigator>,
    prefs: Arc<dyn PreferenceStore>,
}

impl RouteGate {
    pub fn new(
        store: Arc<Store>,
        navigator: Arc<dyn Navigator>,
        prefs: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            store,
            navigator,
            prefs,
        }
    }

    /// Evaluate the gate and perform the redirect side effects.
    pub fn evaluate(&self, request: &RouteRequest) -> RenderDecision {
        let state = self.store.snapshot();
        let location = self.navigator.current();
        let decision = decide(&state, &location, request);
        match &decision {
            RenderDecision::RedirectToLogin { referrer } => {
                if let Some(referrer) = referrer {
                    self.prefs.set(REFERRER_KEY, referrer);
                }
                self.navigator.push(LOGIN_ROUTE, None);
            }
            RenderDecision::RedirectToStart { start_url } => {
                // Replay without state so the next evaluation renders.
                self.navigator.push(start_url, None);
            }
            _ => {}
        }
        decision
    }

    /// Verify the held token when a protected view mounts.
    ///
    /// Rejection dispatches the invalidation action only; the resulting
    /// state transition drives the redirect on the next evaluation.
    pub async fn verify_on_mount(&self) {
        let provider = self.store.provider();
        if !provider.is_logged_in() {
            return;
        }
        if let Err(err) = provider.verify_log_in().await {
            tracing::debug!(error = %err, "token verification failed on mount");
            self.store.dispatch(Action::InvalidateToken);
        }
    }
}

//! Serialized action dispatch and outbound broadcast middleware.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::{reducer, Action, ShellState};
use crate::auth::AuthProvider;
use crate::bus::PluginChannel;
use crate::theme::ThemeOptions;

/// Holds the shell state behind a single serialized dispatch path.
///
/// Every mutation goes through [`Store::dispatch`]; readers take cheap
/// snapshots. After reduction the middleware pass forwards broadcast
/// actions to the plugin channel, and a drawer toggle or theme change
/// additionally triggers a theme broadcast plus a rerender request.
pub struct Store {
    state: Mutex<ShellState>,
    channel: Arc<dyn PluginChannel>,
}

impl Store {
    pub fn new(channel: Arc<dyn PluginChannel>) -> Self {
        Self::with_state(channel, ShellState::new())
    }

    pub fn with_state(channel: Arc<dyn PluginChannel>, state: ShellState) -> Self {
        Self {
            state: Mutex::new(state),
            channel,
        }
    }

    /// Immutable snapshot of the current state.
    pub fn snapshot(&self) -> ShellState {
        self.state.lock().expect("state mutex poisoned").clone()
    }

    /// The active authentication provider.
    pub fn provider(&self) -> Arc<dyn AuthProvider> {
        self.state
            .lock()
            .expect("state mutex poisoned")
            .auth
            .provider
            .clone()
    }

    /// The plugin channel this store broadcasts on.
    pub fn channel(&self) -> Arc<dyn PluginChannel> {
        self.channel.clone()
    }

    /// Reduce the action into state, then run the middleware pass.
    pub fn dispatch(&self, action: Action) {
        tracing::debug!(action = action.kind(), "dispatching");
        {
            let mut state = self.state.lock().expect("state mutex poisoned");
            reducer::reduce(&mut state, &action);
        }

        if let Some(message) = action.broadcast_message() {
            self.channel.broadcast(&message);
        }

        match &action {
            Action::ToggleDrawer => {
                self.dispatch(Action::RequestPluginRerender);
            }
            Action::LoadDarkModePreference(_) | Action::LoadHighContrastModePreference(_) => {
                let theme = {
                    let state = self.state.lock().expect("state mutex poisoned");
                    ThemeOptions {
                        dark_mode: state.dark_mode,
                        high_contrast_mode: state.high_contrast_mode,
                    }
                };
                self.dispatch(Action::SendThemeOptions(theme));
                self.dispatch(Action::RequestPluginRerender);
            }
            _ => {}
        }
    }
}

/// Monotonic request-generation counter for authentication flows.
///
/// A login or verify flow records the generation it started under and
/// applies its result only while still current, so a slow response can
/// never overwrite state written by a newer attempt.
#[derive(Debug, Default)]
pub struct AuthSequencer {
    current: AtomicU64,
}

impl AuthSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new flow, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether the given flow is still the latest.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.load(Ordering::SeqCst) == generation
    }
}

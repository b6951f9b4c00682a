//! Commonly used types, for glob import.

pub use crate::auth::{AuthProvider, MaintenanceState, UserProfile};
pub use crate::bootstrap::{Bootstrap, SiteSettings};
pub use crate::bus::{InProcessChannel, PluginChannel, PluginMessage, PluginRelay, Toaster};
pub use crate::error::{PorticoError, Result};
pub use crate::prefs::{MemoryPreferenceStore, PreferenceStore};
pub use crate::routing::{
    decide, Navigator, RenderDecision, RouteGate, RouteRequest,
};
pub use crate::session::SessionFlows;
pub use crate::state::{Action, Notification, PluginRegistration, Severity, ShellState, Store};
pub use crate::theme::ThemeOptions;

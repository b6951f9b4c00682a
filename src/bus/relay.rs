//! Host-side handling of inbound plugin messages.

use std::sync::{Arc, Mutex};

use serde::Deserialize;

use super::{
    PluginMessage, Subscription, INVALIDATE_TOKEN_TYPE, NOTIFICATION_TYPE, REGISTER_ROUTE_TYPE,
};
use crate::routing::navigator::{Navigator, RouteReplay};
use crate::routing::HOME_ROUTE;
use crate::session::SessionFlows;
use crate::state::{Action, HelpStep, Notification, PluginRegistration, Severity, Store};
use crate::theme::ThemeOptions;

/// Port for transient user-facing toasts.
pub trait Toaster: Send + Sync {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Toaster that drops everything; for embedders without a toast surface.
#[derive(Debug, Default)]
pub struct NullToaster;

impl Toaster for NullToaster {
    fn error(&self, _message: &str) {}
    fn warning(&self, _message: &str) {}
}

/// Toaster that records messages, for tests and headless embedders.
#[derive(Debug, Default)]
pub struct RecordingToaster {
    errors: Mutex<Vec<String>>,
    warnings: Mutex<Vec<String>>,
}

impl RecordingToaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("toaster mutex poisoned").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("toaster mutex poisoned").clone()
    }
}

impl Toaster for RecordingToaster {
    fn error(&self, message: &str) {
        self.errors
            .lock()
            .expect("toaster mutex poisoned")
            .push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings
            .lock()
            .expect("toaster mutex poisoned")
            .push(message.to_string());
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRoutePayload {
    #[serde(flatten)]
    registration: PluginRegistration,
    #[serde(default)]
    help_steps: Vec<HelpStep>,
}

/// Relays inbound plugin messages into dispatched actions.
///
/// A misbehaving plugin can never crash the host through here: invalid
/// envelopes and malformed payloads are logged and dropped.
pub struct PluginRelay {
    store: Arc<Store>,
    session: Arc<SessionFlows>,
    navigator: Arc<dyn Navigator>,
    toaster: Arc<dyn Toaster>,
}

impl PluginRelay {
    pub fn new(
        store: Arc<Store>,
        session: Arc<SessionFlows>,
        navigator: Arc<dyn Navigator>,
        toaster: Arc<dyn Toaster>,
    ) -> Self {
        Self {
            store,
            session,
            navigator,
            toaster,
        }
    }

    /// Drain a channel subscription until it is detached.
    ///
    /// Messages are processed one at a time, so a dispatch is fully
    /// applied before the next message is looked at.
    pub async fn run(&self, mut subscription: Subscription) {
        while let Some(message) = subscription.recv().await {
            self.handle(message).await;
        }
    }

    /// Handle one inbound envelope.
    pub async fn handle(&self, message: PluginMessage) {
        if !message.is_api_message() {
            tracing::error!(
                message_type = %message.message_type,
                payload = %message.payload,
                "invalid message received from a plugin"
            );
            return;
        }
        if message.is_host_originated() {
            // Our own broadcasts echo back on the shared channel.
            return;
        }
        match message.message_type.as_str() {
            REGISTER_ROUTE_TYPE => self.handle_register_route(message.payload),
            NOTIFICATION_TYPE => self.handle_notification(message.payload),
            INVALIDATE_TOKEN_TYPE => self.session.invalidate_token().await,
            _ => {
                tracing::warn!(
                    message_type = %message.message_type,
                    payload = %message.payload,
                    "unexpected message received from plugin, not dispatched"
                );
            }
        }
    }

    fn handle_register_route(&self, payload: serde_json::Value) {
        let payload: RegisterRoutePayload = match serde_json::from_value(payload) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "malformed register_route payload dropped");
                return;
            }
        };
        let registration = payload.registration;
        self.store
            .dispatch(Action::RegisterRoute(registration.clone()));

        if !payload.help_steps.is_empty() {
            self.store
                .dispatch(Action::AddHelpTourSteps(payload.help_steps));
        } else if let Some(help_text) = &registration.help_text {
            let target = format!("#plugin-link-{}", registration.link.replace('/', "-"));
            self.store.dispatch(Action::AddHelpTourSteps(vec![HelpStep {
                target,
                content: help_text.clone(),
            }]));
        }

        let state = self.store.snapshot();
        if self.navigator.current().path == HOME_ROUTE {
            if state.start_url.as_deref() == Some(registration.link.as_str()) {
                self.navigator.push(
                    &registration.link,
                    Some(RouteReplay::start_url(&registration.link)),
                );
            } else if state.homepage_url.as_deref() == Some(registration.link.as_str()) {
                self.navigator.push(
                    &registration.link,
                    Some(RouteReplay::homepage_url(&registration.link)),
                );
            }
        }

        // Newly registered plugins need the current theme.
        self.store.dispatch(Action::SendThemeOptions(ThemeOptions {
            dark_mode: state.dark_mode,
            high_contrast_mode: state.high_contrast_mode,
        }));
    }

    fn handle_notification(&self, payload: serde_json::Value) {
        let notification: Notification = match serde_json::from_value(payload) {
            Ok(notification) => notification,
            Err(err) => {
                tracing::error!(error = %err, "malformed notification payload dropped");
                return;
            }
        };
        self.store
            .dispatch(Action::AddNotification(notification.clone()));
        match notification.severity {
            Severity::Error => self.toaster.error(&notification.message),
            Severity::Warning => self.toaster.warning(&notification.message),
            Severity::Success | Severity::Info => {}
        }
    }
}

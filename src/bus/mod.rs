//! Plugin message bus: envelope types and the pub/sub channel port.
//!
//! Host and plugins exchange envelopes over one shared channel. Inbound
//! handling (the host side) lives in [`relay`]; outbound broadcast is the
//! store's middleware pass.

pub mod relay;

pub use relay::{NullToaster, PluginRelay, RecordingToaster, Toaster};

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Event name shared by host and plugins for same-document messaging.
pub const MESSAGE_CHANNEL: &str = "scigateway";

/// Namespace prefix every valid envelope type must carry.
pub const API_PREFIX: &str = "scigateway:api:";

/// Inbound: a plugin contributes a route.
pub const REGISTER_ROUTE_TYPE: &str = "scigateway:api:register_route";
/// Inbound: a plugin posts a notification.
pub const NOTIFICATION_TYPE: &str = "scigateway:api:notification";
/// Inbound: a plugin reports that the session token was rejected.
pub const INVALIDATE_TOKEN_TYPE: &str = "scigateway:api:invalidate_token";
/// Outbound: plugins must re-evaluate visibility and re-render.
pub const PLUGIN_RERENDER_TYPE: &str = "scigateway:api:plugin_rerender";
/// Outbound: current theme options.
pub const THEME_OPTIONS_TYPE: &str = "scigateway:api:theme_options";

/// Envelope exchanged over the bus.
///
/// The payload stays untyped until a handler claims the message; plugins
/// must ignore types they do not recognize, and so does the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl PluginMessage {
    pub fn new(message_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            message_type: message_type.into(),
            payload,
        }
    }

    /// Whether the type sits under the plugin API namespace.
    pub fn is_api_message(&self) -> bool {
        self.message_type.starts_with(API_PREFIX)
    }

    /// Whether this is a host-originated type plugins receive.
    pub fn is_host_originated(&self) -> bool {
        self.message_type == PLUGIN_RERENDER_TYPE || self.message_type == THEME_OPTIONS_TYPE
    }
}

/// Handle identifying an attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

/// Pub/sub port connecting host and plugins.
///
/// Listeners are independent; delivery order across listeners follows
/// attachment order. Implementations must never let one listener's
/// failure affect another.
pub trait PluginChannel: Send + Sync {
    fn broadcast(&self, message: &PluginMessage);
    fn attach(&self) -> Subscription;
    fn detach(&self, id: HandlerId);
}

/// A listener's end of the channel. Dropping it detaches implicitly.
pub struct Subscription {
    pub id: HandlerId,
    receiver: mpsc::UnboundedReceiver<PluginMessage>,
}

impl Subscription {
    /// Receive the next message, `None` once detached.
    pub async fn recv(&mut self) -> Option<PluginMessage> {
        self.receiver.recv().await
    }

    /// Non-blocking receive for draining in tests.
    pub fn try_recv(&mut self) -> Option<PluginMessage> {
        self.receiver.try_recv().ok()
    }
}

/// In-process channel over per-listener unbounded queues.
#[derive(Default)]
pub struct InProcessChannel {
    listeners: Mutex<Vec<(HandlerId, mpsc::UnboundedSender<PluginMessage>)>>,
}

impl InProcessChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PluginChannel for InProcessChannel {
    fn broadcast(&self, message: &PluginMessage) {
        let Ok(mut listeners) = self.listeners.lock() else {
            return;
        };
        // Prune listeners whose receiving end has gone away.
        listeners.retain(|(_, sender)| sender.send(message.clone()).is_ok());
    }

    fn attach(&self) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = HandlerId(Uuid::new_v4());
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, sender));
        }
        Subscription { id, receiver }
    }

    fn detach(&self, id: HandlerId) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|(listener, _)| *listener != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_namespace_check() {
        let valid = PluginMessage::new(REGISTER_ROUTE_TYPE, json!({}));
        assert!(valid.is_api_message());

        let invalid = PluginMessage::new("unrelated:type", json!({}));
        assert!(!invalid.is_api_message());
    }

    #[test]
    fn host_originated_types_are_recognized() {
        assert!(PluginMessage::new(PLUGIN_RERENDER_TYPE, json!({})).is_host_originated());
        assert!(PluginMessage::new(THEME_OPTIONS_TYPE, json!({})).is_host_originated());
        assert!(!PluginMessage::new(REGISTER_ROUTE_TYPE, json!({})).is_host_originated());
    }

    #[test]
    fn envelope_round_trips_with_type_key() {
        let message = PluginMessage::new(NOTIFICATION_TYPE, json!({ "message": "hi" }));
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], json!(NOTIFICATION_TYPE));

        let parsed: PluginMessage = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, message);
    }

    #[tokio::test]
    async fn broadcast_reaches_all_listeners() {
        let channel = InProcessChannel::new();
        let mut first = channel.attach();
        let mut second = channel.attach();

        channel.broadcast(&PluginMessage::new(PLUGIN_RERENDER_TYPE, json!({})));

        assert!(first.try_recv().is_some());
        assert!(second.try_recv().is_some());
    }

    #[tokio::test]
    async fn detach_stops_delivery() {
        let channel = InProcessChannel::new();
        let mut subscription = channel.attach();
        channel.detach(subscription.id);

        channel.broadcast(&PluginMessage::new(PLUGIN_RERENDER_TYPE, json!({})));
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn dropped_listener_is_pruned_without_affecting_others() {
        let channel = InProcessChannel::new();
        let dropped = channel.attach();
        let mut kept = channel.attach();
        drop(dropped);

        channel.broadcast(&PluginMessage::new(THEME_OPTIONS_TYPE, json!({})));
        assert!(kept.try_recv().is_some());
    }

    #[tokio::test]
    async fn delivery_preserves_message_order() {
        let channel = InProcessChannel::new();
        let mut subscription = channel.attach();

        for i in 0..3 {
            channel.broadcast(&PluginMessage::new(NOTIFICATION_TYPE, json!({ "i": i })));
        }
        for i in 0..3 {
            let message = subscription.recv().await.unwrap();
            assert_eq!(message.payload["i"], json!(i));
        }
    }
}

//! Portico — plugin host shell core.
//!
//! Hosts independently deployed micro-frontend plugins behind shared
//! authentication, navigation, theming, and notification services. The
//! crate covers the plugin integration layer: the message bus between
//! host and plugins, the authentication provider abstraction and session
//! state machine, the settings bootstrap sequence, and the route
//! authorization gate. View layers consume state snapshots and ports;
//! nothing here renders.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use portico::bootstrap::Bootstrap;
//! use portico::bus::InProcessChannel;
//! use portico::prefs::MemoryPreferenceStore;
//! use portico::state::Store;
//!
//! # async fn example() {
//! let channel = Arc::new(InProcessChannel::new());
//! let store = Arc::new(Store::new(channel));
//! let prefs = Arc::new(MemoryPreferenceStore::new());
//!
//! Bootstrap::new(store.clone(), prefs, "https://example.com")
//!     .configure_site()
//!     .await;
//! assert!(!store.snapshot().site_loading);
//! # }
//! ```

pub mod auth;
pub mod bootstrap;
pub mod bus;
pub mod error;
pub mod prefs;
pub mod prelude;
pub mod routing;
pub mod session;
pub mod state;
pub mod strings;
pub mod theme;

//! Navigation port decoupling route decisions from any view router.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// State attached to an internal redirect so the destination knows it is
/// replaying a configured start or homepage URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReplay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<String>,
}

impl RouteReplay {
    pub fn start_url(url: impl Into<String>) -> Self {
        Self {
            start_url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn homepage_url(url: impl Into<String>) -> Self {
        Self {
            homepage_url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Where the user currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub replay: Option<RouteReplay>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            replay: None,
        }
    }
}

/// Port through which the shell changes location.
pub trait Navigator: Send + Sync {
    /// Navigate to a path, optionally attaching replay state.
    fn push(&self, path: &str, replay: Option<RouteReplay>);
    /// The current location.
    fn current(&self) -> Location;
}

/// Navigator that records history in memory; the default landing route
/// is `/`.
#[derive(Debug)]
pub struct MemoryNavigator {
    history: Mutex<Vec<Location>>,
}

impl MemoryNavigator {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(vec![Location::new("/")]),
        }
    }

    /// Start somewhere other than the landing route.
    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![Location::new(path)]),
        }
    }

    /// Full navigation history, oldest first.
    pub fn history(&self) -> Vec<Location> {
        self.history.lock().expect("history mutex poisoned").clone()
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for MemoryNavigator {
    fn push(&self, path: &str, replay: Option<RouteReplay>) {
        let mut history = self.history.lock().expect("history mutex poisoned");
        history.push(Location {
            path: path.to_string(),
            replay,
        });
    }

    fn current(&self) -> Location {
        self.history
            .lock()
            .expect("history mutex poisoned")
            .last()
            .cloned()
            .unwrap_or_else(|| Location::new("/"))
    }
}

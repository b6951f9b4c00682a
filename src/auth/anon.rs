//! Anonymous provider for sites that require no authentication.

use std::sync::RwLock;

use async_trait::async_trait;

use super::{AuthProvider, UserProfile};
use crate::error::{PorticoError, Result};

const ANON_TOKEN: &str = "anonymous";

/// Provider that starts signed in as an anonymous user.
///
/// Sign-out still clears the token, so an explicit sign-out leaves the
/// session unauthenticated like any other provider.
pub struct AnonAuthProvider {
    token: RwLock<Option<String>>,
}

impl AnonAuthProvider {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(Some(ANON_TOKEN.to_string())),
        }
    }
}

impl Default for AnonAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for AnonAuthProvider {
    fn name(&self) -> &'static str {
        "anon"
    }

    fn token(&self) -> Option<String> {
        self.token.read().ok()?.clone()
    }

    fn user(&self) -> Option<UserProfile> {
        self.is_logged_in().then(|| UserProfile::new("anonymous"))
    }

    async fn log_in(&self, _username: &str, _password: &str) -> Result<()> {
        if let Ok(mut held) = self.token.write() {
            *held = Some(ANON_TOKEN.to_string());
        }
        Ok(())
    }

    async fn verify_log_in(&self) -> Result<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(PorticoError::Authentication("signed out".to_string()))
        }
    }

    fn log_out(&self) {
        if let Ok(mut held) = self.token.write() {
            *held = None;
        }
    }
}

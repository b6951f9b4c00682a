//! Placeholder provider held before site settings resolve.

use async_trait::async_trait;

use super::AuthProvider;
use crate::error::{PorticoError, Result};

/// Inert provider installed at startup.
///
/// The route gate treats its presence as "still loading" and renders a
/// neutral placeholder instead of making a redirect decision.
#[derive(Debug, Default)]
pub struct LoadingAuthProvider;

impl LoadingAuthProvider {
    pub fn new() -> Self {
        Self
    }
}

fn not_configured() -> PorticoError {
    PorticoError::Configuration("authentication provider not yet configured".to_string())
}

#[async_trait]
impl AuthProvider for LoadingAuthProvider {
    fn name(&self) -> &'static str {
        "loading"
    }

    fn token(&self) -> Option<String> {
        None
    }

    fn is_loading(&self) -> bool {
        true
    }

    async fn log_in(&self, _username: &str, _password: &str) -> Result<()> {
        Err(not_configured())
    }

    async fn verify_log_in(&self) -> Result<()> {
        Err(not_configured())
    }

    fn log_out(&self) {}
}

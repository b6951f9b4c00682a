//! Shared test helpers: a scriptable auth provider and shell fixtures.

// Each test binary uses a different slice of these helpers.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use portico::auth::{AuthProvider, MaintenanceState};
use portico::bus::{InProcessChannel, PluginRelay, RecordingToaster};
use portico::error::{PorticoError, Result};
use portico::prefs::MemoryPreferenceStore;
use portico::routing::navigator::MemoryNavigator;
use portico::session::SessionFlows;
use portico::state::{Action, Store};

/// Outcome of one scripted login attempt.
#[derive(Debug, Clone, Copy)]
pub struct LoginStep {
    pub delay: Duration,
    pub succeeds: bool,
}

impl LoginStep {
    pub fn ok() -> Self {
        Self {
            delay: Duration::ZERO,
            succeeds: true,
        }
    }

    pub fn fail() -> Self {
        Self {
            delay: Duration::ZERO,
            succeeds: false,
        }
    }

    pub fn delayed(delay: Duration, succeeds: bool) -> Self {
        Self { delay, succeeds }
    }
}

/// Scriptable provider for driving session and bootstrap flows.
pub struct TestAuthProvider {
    token: Mutex<Option<String>>,
    admin: bool,
    verify_succeeds: bool,
    /// `None` = capability absent, `Some(outcome)` = scripted result.
    auto_login: Option<bool>,
    refresh: Option<bool>,
    scheduled_maintenance: MaintenanceState,
    login_script: Mutex<VecDeque<LoginStep>>,
}

impl TestAuthProvider {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            token: Mutex::new(token.map(String::from)),
            admin: false,
            verify_succeeds: true,
            auto_login: None,
            refresh: None,
            scheduled_maintenance: MaintenanceState::default(),
            login_script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn admin(mut self) -> Self {
        self.admin = true;
        self
    }

    pub fn verify_fails(mut self) -> Self {
        self.verify_succeeds = false;
        self
    }

    pub fn with_auto_login(mut self, succeeds: bool) -> Self {
        self.auto_login = Some(succeeds);
        self
    }

    pub fn with_refresh(mut self, succeeds: bool) -> Self {
        self.refresh = Some(succeeds);
        self
    }

    pub fn with_scheduled_maintenance(mut self, maintenance: MaintenanceState) -> Self {
        self.scheduled_maintenance = maintenance;
        self
    }

    pub fn with_login_script(self, steps: impl IntoIterator<Item = LoginStep>) -> Self {
        self.login_script
            .lock()
            .expect("script mutex poisoned")
            .extend(steps);
        self
    }
}

#[async_trait]
impl AuthProvider for TestAuthProvider {
    fn name(&self) -> &'static str {
        "test"
    }

    fn token(&self) -> Option<String> {
        self.token.lock().expect("token mutex poisoned").clone()
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    async fn log_in(&self, _username: &str, _password: &str) -> Result<()> {
        let step = self
            .login_script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(LoginStep::ok);
        if !step.delay.is_zero() {
            tokio::time::sleep(step.delay).await;
        }
        if step.succeeds {
            *self.token.lock().expect("token mutex poisoned") = Some("validLoginToken".to_string());
            Ok(())
        } else {
            Err(PorticoError::Authentication("invalid credentials".to_string()))
        }
    }

    async fn verify_log_in(&self) -> Result<()> {
        if self.token().is_none() {
            return Err(PorticoError::Authentication("no token held".to_string()));
        }
        if self.verify_succeeds {
            Ok(())
        } else {
            Err(PorticoError::Authentication("token rejected".to_string()))
        }
    }

    fn log_out(&self) {
        *self.token.lock().expect("token mutex poisoned") = None;
    }

    fn supports_refresh(&self) -> bool {
        self.refresh.is_some()
    }

    async fn refresh(&self) -> Result<()> {
        match self.refresh {
            Some(true) => Ok(()),
            Some(false) => Err(PorticoError::Authentication("refresh rejected".to_string())),
            None => Err(PorticoError::UnsupportedOperation(
                "test provider has no refresh".to_string(),
            )),
        }
    }

    fn supports_auto_login(&self) -> bool {
        self.auto_login.is_some()
    }

    async fn auto_login(&self) -> Result<()> {
        match self.auto_login {
            Some(true) => {
                *self.token.lock().expect("token mutex poisoned") =
                    Some("autoLoginToken".to_string());
                Ok(())
            }
            Some(false) => Err(PorticoError::Authentication("auto-login failed".to_string())),
            None => Err(PorticoError::UnsupportedOperation(
                "test provider has no auto-login".to_string(),
            )),
        }
    }

    async fn fetch_scheduled_maintenance_state(&self) -> Result<MaintenanceState> {
        Ok(self.scheduled_maintenance.clone())
    }
}

/// A fully wired shell for integration tests.
pub struct Shell {
    pub channel: Arc<InProcessChannel>,
    pub store: Arc<Store>,
    pub navigator: Arc<MemoryNavigator>,
    pub prefs: Arc<MemoryPreferenceStore>,
    pub toaster: Arc<RecordingToaster>,
    pub session: Arc<SessionFlows>,
    pub relay: PluginRelay,
}

impl Shell {
    pub fn new() -> Self {
        let channel = Arc::new(InProcessChannel::new());
        let store = Arc::new(Store::new(channel.clone()));
        let navigator = Arc::new(MemoryNavigator::new());
        let prefs = Arc::new(MemoryPreferenceStore::new());
        let toaster = Arc::new(RecordingToaster::new());
        let session = Arc::new(SessionFlows::new(
            store.clone(),
            navigator.clone(),
            prefs.clone(),
        ));
        let relay = PluginRelay::new(
            store.clone(),
            session.clone(),
            navigator.clone(),
            toaster.clone(),
        );
        Self {
            channel,
            store,
            navigator,
            prefs,
            toaster,
            session,
            relay,
        }
    }

    pub fn with_provider(self, provider: TestAuthProvider) -> Self {
        self.store
            .dispatch(Action::ProviderLoaded(Arc::new(provider)));
        self
    }

    /// Mark the initial site load finished, as bootstrap would.
    pub fn loaded(self) -> Self {
        self.store.dispatch(Action::SiteLoadingUpdate(false));
        self
    }
}

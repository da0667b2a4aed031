//! AuthContext - Sign-in state

use gate::PreconditionSource;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::hub::ChangeHub;

/// Authentication state as the pages see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    /// Session restore still running
    pub is_loading: bool,
    pub token: Option<String>,
    pub user_login: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            is_loading: true,
            token: None,
            user_login: None,
        }
    }
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle to the authentication state
#[derive(Debug, Clone)]
pub struct AuthContext {
    state: Arc<RwLock<AuthState>>,
    hub: ChangeHub,
}

impl AuthContext {
    /// Starts out loading
    pub fn new(hub: ChangeHub) -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthState::default())),
            hub,
        }
    }

    /// Current state, `None` if the lock is poisoned
    pub fn state(&self) -> Option<AuthState> {
        self.state.read().ok().map(|s| s.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_some_and(|s| s.is_authenticated())
    }

    /// Session restore started again
    pub fn begin_loading(&self) {
        self.update(|s| s.is_loading = true);
    }

    pub fn sign_in(&self, token: impl Into<String>, login: impl Into<String>) {
        let token = token.into();
        let login = login.into();
        self.update(|s| {
            s.is_loading = false;
            s.token = Some(token);
            s.user_login = Some(login);
        });
    }

    /// Finish loading without a session
    pub fn sign_out(&self) {
        self.update(|s| {
            s.is_loading = false;
            s.token = None;
            s.user_login = None;
        });
    }

    /// Back to the initial loading state
    pub fn reset(&self) {
        self.update(|s| *s = AuthState::default());
    }

    fn update(&self, f: impl FnOnce(&mut AuthState)) {
        let changed = match self.state.write() {
            Ok(mut state) => {
                let before = state.clone();
                f(&mut state);
                *state != before
            }
            Err(_) => {
                warn!("Auth state lock poisoned, update dropped");
                false
            }
        };

        if changed {
            debug!("Auth state changed");
            self.hub.notify();
        }
    }
}

impl PreconditionSource for AuthContext {
    fn is_loaded(&self) -> bool {
        self.state().is_some_and(|s| !s.is_loading)
    }

    fn is_satisfied(&self) -> bool {
        self.is_authenticated()
    }
}

//! RepositoryContext - The repository the user is working on

use gate::PreconditionSource;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

use crate::hub::ChangeHub;

/// A selected repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub owner: String,
    pub name: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            default_branch: default_branch(),
        }
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = branch.into();
        self
    }

    /// owner/name
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Repository selection state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryState {
    /// Stored selection has been restored
    pub is_repository_loaded: bool,
    pub repository: Option<Repository>,
}

/// Shared handle to the repository selection
#[derive(Debug, Clone)]
pub struct RepositoryContext {
    state: Arc<RwLock<RepositoryState>>,
    hub: ChangeHub,
}

impl RepositoryContext {
    /// Starts out not loaded
    pub fn new(hub: ChangeHub) -> Self {
        Self {
            state: Arc::new(RwLock::new(RepositoryState::default())),
            hub,
        }
    }

    /// Current state, `None` if the lock is poisoned
    pub fn state(&self) -> Option<RepositoryState> {
        self.state.read().ok().map(|s| s.clone())
    }

    pub fn repository(&self) -> Option<Repository> {
        self.state().and_then(|s| s.repository)
    }

    /// Restore finished, with or without a stored selection
    pub fn finish_loading(&self, repository: Option<Repository>) {
        self.update(|s| {
            s.is_repository_loaded = true;
            s.repository = repository;
        });
    }

    pub fn select(&self, repository: Repository) {
        self.update(|s| {
            s.is_repository_loaded = true;
            s.repository = Some(repository);
        });
    }

    pub fn clear(&self) {
        self.update(|s| s.repository = None);
    }

    /// Back to the initial not-loaded state
    pub fn reset(&self) {
        self.update(|s| *s = RepositoryState::default());
    }

    fn update(&self, f: impl FnOnce(&mut RepositoryState)) {
        let changed = match self.state.write() {
            Ok(mut state) => {
                let before = state.clone();
                f(&mut state);
                *state != before
            }
            Err(_) => {
                warn!("Repository state lock poisoned, update dropped");
                false
            }
        };

        if changed {
            debug!("Repository state changed");
            self.hub.notify();
        }
    }
}

impl PreconditionSource for RepositoryContext {
    fn is_loaded(&self) -> bool {
        self.state().is_some_and(|s| s.is_repository_loaded)
    }

    fn is_satisfied(&self) -> bool {
        self.repository().is_some()
    }
}

//! Change notification shared by all contexts

use std::sync::Arc;
use tokio::sync::watch;

/// Revision counter broadcast to every subscriber
#[derive(Debug, Clone)]
pub struct ChangeHub {
    revision: Arc<watch::Sender<u64>>,
}

impl ChangeHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            revision: Arc::new(tx),
        }
    }

    /// Receiver that wakes on every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Signal that some context state changed
    pub fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

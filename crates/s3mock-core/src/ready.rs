//! One-shot readiness barrier between backend initialization and request handling.
//!
//! The server starts accepting connections immediately; every operation awaits
//! [`ReadyGate::wait`] before its first backend call. The backend's owner holds
//! the [`ReadyNotifier`] and fires it once initialization completes.

use tokio::sync::watch;
use tracing::info;

use crate::error::StorageError;

/// Create a connected notifier/gate pair. The gate starts closed.
#[must_use]
pub fn ready_pair() -> (ReadyNotifier, ReadyGate) {
    let (tx, rx) = watch::channel(false);
    (ReadyNotifier { tx }, ReadyGate { rx })
}

/// The sending half of the barrier. Consumed when fired.
#[derive(Debug)]
pub struct ReadyNotifier {
    tx: watch::Sender<bool>,
}

impl ReadyNotifier {
    /// Open the gate for every current and future waiter.
    pub fn notify_ready(self) {
        self.tx.send_replace(true);
        info!("storage backend ready");
    }
}

/// The waiting half of the barrier. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReadyGate {
    rx: watch::Receiver<bool>,
}

impl ReadyGate {
    /// A gate that is already open.
    #[must_use]
    pub fn ready() -> Self {
        let (notifier, gate) = ready_pair();
        notifier.notify_ready();
        gate
    }

    /// Whether the gate has opened.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the gate opens.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotReady`] if the notifier was dropped without
    /// firing.
    pub async fn wait(&self) -> Result<(), StorageError> {
        if self.is_ready() {
            return Ok(());
        }
        let mut rx = self.rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| StorageError::NotReady)
    }
}

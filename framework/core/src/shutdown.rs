use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::{Receiver, Sender};

/// The stop signal for a run. Cloned into everything that needs to trigger a shutdown and used to
/// hand out listeners to everything that needs to react to one.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Broadcast the shutdown signal. Only the first call has any effect.
    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            log::debug!("Shutdown signal already sent, ignoring");
            return;
        }

        if let Err(e) = self.sender.send(()) {
            // Nobody is subscribed. Listeners created from now on see the flag instead.
            log::debug!("No listeners for shutdown signal: {e:?}");
        }
    }

    #[cfg(test)]
    pub fn is_shutdown(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe(), self.triggered.clone())
    }
}

#[derive(Debug)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<()>,
    triggered: Arc<AtomicBool>,
    observed: bool,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>, triggered: Arc<AtomicBool>) -> Self {
        Self {
            receiver,
            triggered,
            observed: false,
        }
    }

    /// Point in time check if the shutdown signal has been received. If this returns true then
    /// work should be stopped so that the run can wind down. Once true, always true.
    pub fn should_shutdown(&mut self) -> bool {
        if self.observed {
            return true;
        }

        self.observed = self.triggered.load(Ordering::SeqCst)
            || match self.receiver.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) | Err(TryRecvError::Closed) => true,
                Err(TryRecvError::Empty) => false,
            };

        self.observed
    }

    /// Wait for the shutdown signal to be received. Returns immediately if it was already sent.
    /// It is safe to race this with another future so that the shutdown signal can be used to
    /// cancel other work in progress.
    pub async fn wait_for_shutdown(&mut self) {
        if self.should_shutdown() {
            return;
        }

        match self.receiver.recv().await {
            Ok(_) | Err(RecvError::Lagged(_)) | Err(RecvError::Closed) => {
                self.observed = true;
            }
        }
    }
}

use std::sync::Arc;

use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;

/// Handle used to request that a measurement run stops early.
///
/// Cloneable so that a signal handler can own one copy while the run controller hands
/// listeners to its loop.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    sender: Sender<()>,
}

impl Default for InterruptHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn interrupt(&self) {
        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for the interrupt, in which case the log
            // message can be ignored.
            log::warn!("Failed to send interrupt signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> InterruptListener {
        InterruptListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct InterruptListener {
    receiver: Arc<Mutex<Receiver<()>>>,
}

impl InterruptListener {
    fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Point in time check for the interrupt signal.
    ///
    /// The run controller calls this at the top of each loop iteration, so a probe that
    /// is already in flight always completes or errors before the interrupt takes effect.
    pub fn is_interrupted(&mut self) -> bool {
        match self.receiver.try_lock() {
            Ok(mut guard) => {
                match guard.try_recv() {
                    Ok(_) => true,
                    Err(tokio::sync::broadcast::error::TryRecvError::Closed) => true,
                    // Empty or lagged, the run should keep going.
                    Err(_) => false,
                }
            }
            Err(_) => false,
        }
    }
}

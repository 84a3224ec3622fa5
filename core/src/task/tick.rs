use std::time::Duration;
use tokio::select;
use triggered::{trigger, Listener, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickReason {
    Wakeup,
    Shutdown,
}

/// Paces periodic tasks and wakes them up early on shutdown
pub struct TickService {
    shutdown_trigger: Trigger,
    shutdown_listener: Listener,
}

impl TickService {
    pub fn new() -> Self {
        let (shutdown_trigger, shutdown_listener) = trigger();
        Self { shutdown_trigger, shutdown_listener }
    }

    /// Waits until `duration` has elapsed, or returns [`TickReason::Shutdown`] as soon as
    /// the service is shut down.
    pub async fn tick(&self, duration: Duration) -> TickReason {
        let shutdown_listener = self.shutdown_listener.clone();
        select! {
            biased;
            _ = shutdown_listener => TickReason::Shutdown,
            _ = tokio::time::sleep(duration) => TickReason::Wakeup,
        }
    }

    pub fn shutdown(&self) {
        self.shutdown_trigger.trigger();
    }

    pub fn shutdown_trigger(&self) -> Trigger {
        self.shutdown_trigger.clone()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown_listener.is_triggered()
    }
}

impl Default for TickService {
    fn default() -> Self {
        Self::new()
    }
}

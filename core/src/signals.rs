use mempool_core::{info, trace};
use triggered::Trigger;

/// Fires `shutdown` on the first termination signal (Ctrl-C, SIGTERM)
pub fn shutdown_on_signal(shutdown: Trigger) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        info!("Termination signal received, shutting down...");
        shutdown.trigger();
        trace!("shutdown triggered");
    })
}

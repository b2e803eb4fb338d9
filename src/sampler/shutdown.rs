use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::info;

/// Cancellation flag shared between the Ctrl-C handler and the sampling loop.
///
/// The loop only looks at it between iterations.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    flag: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag on Ctrl-C instead of killing the process.
    pub fn install_ctrl_c_handler(&self) -> Result<(), ctrlc::Error> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            info!("Interrupt received, stopping after the current iteration");
            signal.trigger();
        })
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

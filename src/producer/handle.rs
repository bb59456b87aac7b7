use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cancellable handle with no payload.
///
/// Returned by handlers that start their own producer job writing directly
/// through the exchange; the surrounding lifecycle keeps the handle so it can
/// cancel the job when the connection goes away. Clones share one flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

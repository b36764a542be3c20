//! cooperative cancellation
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone)]
/// a cancellation flag shared between a capture run and whatever wants to stop it
///
/// a run only looks at the flag between host calls, so the original theme is always restored
/// before a cancellation is reported
pub struct InterruptHandler {
    /// whether a stop was requested
    flag: Arc<AtomicBool>,
}

impl InterruptHandler {
    /// make a new interruption handler
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// request a stop
    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// whether a stop was requested, without clearing it
    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// clear the flag, returning whether it was set
    pub fn check_and_reset(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}

impl Default for InterruptHandler {
    fn default() -> Self {
        Self::new()
    }
}

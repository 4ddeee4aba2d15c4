use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared, advisory cancellation flag.
///
/// The copy loop reads it once before each file, so a request never
/// interrupts a copy that is already under way.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

//! Per-component request generations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Tags async requests of one component instance so late responses can be
/// recognised and dropped.
///
/// Each `begin` supersedes every earlier request; `dispose` supersedes all of
/// them for good.
#[derive(Debug, Default)]
pub(crate) struct Generation {
    current: AtomicU64,
    disposed: AtomicBool,
}

impl Generation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a request and return its generation.
    pub(crate) fn begin(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a response for `generation` may still update state.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        !self.is_disposed() && self.current.load(Ordering::SeqCst) == generation
    }

    pub(crate) fn dispose(&self) {
        self.disposed.store(true, Ordering::SeqCst);
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

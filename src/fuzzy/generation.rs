//! Query generations
//!
//! Every outgoing fuzzy query is tagged with a generation so responses that
//! arrive after a newer query has been issued can be recognised and dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter. Starts at 1 so `Generation::INITIAL` is never issued.
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Monotonic tag correlating a query with its response
///
/// Values come from a single process-wide counter, so a generation consumed by
/// one panel session can never be handed out again by a later session while
/// its response is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    /// Generation held by a store that has not tracked any query yet
    pub const INITIAL: Generation = Generation(0);

    /// Allocate the next generation
    pub fn next() -> Self {
        Generation(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::error::CopyError;

/// Job-scoped cooperative cancellation.
///
/// The first failure flips the flag and is kept as the job's cause; later
/// failures are dropped. Tasks poll [`is_cancelled`](Self::is_cancelled) before
/// each row and each cell, so writes already in progress still complete.
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    cause: Mutex<Option<CopyError>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Record `cause` and cancel. Returns `true` only for the first caller.
    pub fn cancel(&self, cause: CopyError) -> bool {
        let mut slot = self.cause.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(cause);
        self.cancelled.store(true, Ordering::Release);
        true
    }

    /// Take the recorded cause, leaving the token cancelled.
    pub fn take_cause(&self) -> Option<CopyError> {
        self.cause.lock().take()
    }
}

//! Cooperative cancellation.
//!
//! A host hands a [`CancellationToken`] to every query. Long-running loops
//! (per-name lookups, per-candidate filtering, scope walks) call
//! [`CancellationToken::check`] and bail out with [`Cancelled`], which
//! callers propagate with `?` instead of wrapping it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The operation was cancelled by its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("operation was cancelled")]
pub struct Cancelled;

/// A cheaply cloneable cancellation flag.
///
/// Clones share the same flag, so cancelling any clone cancels all of them.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that is never cancelled by anyone but its own holders.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

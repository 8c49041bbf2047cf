//! Cooperative cancellation for long-running solves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::SolveError;

/// A shared cancellation flag with an optional deadline.
///
/// Clones share the same flag, so a caller can keep one clone and hand the
/// other to a solve running on another thread. Search loops call
/// [`Cancellation::check`] once per outer iteration.
///
/// # Examples
/// ```
/// use tsp_solver_core::{Cancellation, SolveError};
///
/// let token = Cancellation::new();
/// let worker = token.clone();
/// assert!(worker.check().is_ok());
/// token.cancel();
/// assert_eq!(worker.check(), Err(SolveError::Cancelled));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    /// A token that never fires unless [`Cancellation::cancel`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Attach a deadline `timeout` from now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now.checked_add(timeout).unwrap_or(now);
        self.with_deadline(deadline)
    }

    /// Request cancellation of every solve sharing this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether the flag is set or the deadline has passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Fail with [`SolveError::Cancelled`] once cancellation is requested.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Cancelled`] when [`Self::is_cancelled`] holds.
    pub fn check(&self) -> Result<(), SolveError> {
        if self.is_cancelled() {
            return Err(SolveError::Cancelled);
        }
        Ok(())
    }
}

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Thread-safe stop flag that running duels observe.
///
/// Cheap to clone; every clone shares the same flag. Pacing pauses wait on
/// the signal, so raising it ends them immediately instead of after the pause
/// elapses.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

#[derive(Debug, Default)]
struct StopInner {
    stopped: Mutex<bool>,
    raised: Condvar,
}

impl StopSignal {
    /// Create a signal in the running (not stopped) state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every duel observing this signal to stop.
    pub fn stop(&self) {
        *self.lock() = true;
        self.inner.raised.notify_all();
    }

    /// Check if a stop was requested.
    pub fn is_stopped(&self) -> bool {
        *self.lock()
    }

    /// Clear a previous stop request so the next duel can run.
    pub fn reset(&self) {
        *self.lock() = false;
    }

    /// Sleep for `duration` unless stopped first.
    ///
    /// Returns `true` if the full pause elapsed, `false` if it was cut short
    /// (or the signal was already raised).
    pub fn sleep(&self, duration: Duration) -> bool {
        let guard = self.lock();
        if duration.is_zero() {
            return !*guard;
        }
        let (guard, _timeout) = self
            .inner
            .raised
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !*guard
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .stopped
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

//! Completion signal
//!
//! One-shot latch: the delivery context signals, the primary flow waits.

use parking_lot::Mutex;
use tokio::sync::Notify;

/// One-shot latch carrying an optional value
///
/// The first `signal` wins; later calls are ignored. `wait` returns the
/// stored value once signalled, however many times it is called.
#[derive(Debug)]
pub struct CompletionSignal<T: Clone = ()> {
    value: Mutex<Option<T>>,
    notify: Notify,
}

impl<T: Clone> CompletionSignal<T> {
    /// Create a pending signal
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Satisfy the signal with `value`.
    ///
    /// Returns `false` if it was already satisfied.
    pub fn signal(&self, value: T) -> bool {
        {
            let mut slot = self.value.lock();
            if slot.is_some() {
                return false;
            }
            *slot = Some(value);
        }
        self.notify.notify_waiters();
        true
    }

    /// Wait until signalled and return the value
    pub async fn wait(&self) -> T {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent signal is not missed
            notified.as_mut().enable();

            if let Some(value) = self.value.lock().clone() {
                return value;
            }

            notified.await;
        }
    }
}

impl CompletionSignal<()> {
    /// Satisfy a value-less signal
    pub fn complete(&self) -> bool {
        self.signal(())
    }
}

impl<T: Clone> Default for CompletionSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

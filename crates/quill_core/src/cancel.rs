//! Cancellation signal for in-flight result streaming.
//!
//! A `CancelSignal` is shared between the thread rendering a result, the
//! producer thread fetching it, and whatever watches for a user interrupt.
//! Besides the flag it exposes a channel that disconnects on cancellation, so
//! a thread parked in a `crossbeam_channel::select!` wakes immediately instead
//! of waiting out a poll interval.
//!
//! # Usage
//! ```ignore
//! let signal = CancelSignal::new();
//! let watcher = signal.clone();
//!
//! // interrupt handler:
//! watcher.cancel();
//!
//! // consumer:
//! crossbeam_channel::select! {
//!     recv(rows) -> row => { /* ... */ }
//!     recv(signal.wakeup()) -> _ => { /* cancelled */ }
//! }
//! ```

use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
pub struct CancelSignal {
    inner: Arc<CancelInner>,
}

struct CancelInner {
    flag: AtomicBool,
    // Dropped on cancel; disconnecting `wakeup` wakes every selector.
    trigger: Mutex<Option<Sender<()>>>,
    wakeup: Receiver<()>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (trigger, wakeup) = crossbeam_channel::bounded(0);
        Self {
            inner: Arc::new(CancelInner {
                flag: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                wakeup,
            }),
        }
    }

    /// Request cancellation. Idempotent; wakes all waiters.
    pub fn cancel(&self) {
        self.inner.flag.store(true, Ordering::SeqCst);
        let mut trigger = self.inner.trigger.lock().unwrap_or_else(|e| e.into_inner());
        trigger.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.flag.load(Ordering::SeqCst)
    }

    /// Receiver that never yields a value and becomes disconnected once the
    /// signal is cancelled. Meant for `select!`.
    pub fn wakeup(&self) -> &Receiver<()> {
        &self.inner.wakeup
    }

    /// Block for at most `timeout`, returning early on cancellation.
    /// Returns `true` if cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let _ = self.inner.wakeup.recv_timeout(timeout);
        self.is_cancelled()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

//! flag.rs — Per-thread interrupt flag with an optional wake binding
//!
//! Invariants:
//! - Once set, the flag stays set for the lifetime of the thread.
//! - The binding is `Some` only while the owning thread is inside an
//!   interruptible wait; `WaitBinding` clears it on every exit path.
//!
//! Concurrency & Memory:
//! - The flag itself is an `AtomicBool` accessed with `Relaxed`; only eventual
//!   visibility is needed, the bounded wait covers the rest.
//! - `set()` stores outside the lock and notifies inside it, so a concurrent
//!   bind/unbind either sees the wake or sees the flag already set.
//!
//! Usage:
//! - Owners call `set()` from any thread.
//! - The owning thread binds its current wait object via `bind_scoped()`.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Something a blocked thread is parked on and that can be woken.
pub trait Wake: Send + Sync {
    /// Wake every waiter.
    fn wake_all(&self);
}

impl Wake for parking_lot::Condvar {
    fn wake_all(&self) {
        self.notify_all();
    }
}

impl Wake for std::sync::Condvar {
    fn wake_all(&self) {
        self.notify_all();
    }
}

/// Interrupt flag owned by a single thread and settable from any thread.
#[derive(Default)]
pub struct InterruptFlag {
    set: AtomicBool,
    binding: Mutex<Option<Arc<dyn Wake>>>,
}

impl fmt::Debug for InterruptFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptFlag")
            .field("set", &self.is_set())
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl InterruptFlag {
    /// Construct a new, unset flag with nothing bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request interruption and wake the bound wait object, if any.
    ///
    /// Idempotent.
    pub fn set(&self) {
        self.set.store(true, Ordering::Relaxed);
        let binding = self.binding.lock();
        if let Some(target) = binding.as_ref() {
            tracing::trace!("waking bound wait object");
            target.wake_all();
        }
    }

    #[inline]
    /// Return whether interruption has been requested.
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Relaxed)
    }

    /// Bind the wait object the owning thread is about to block on.
    pub fn bind(&self, target: Arc<dyn Wake>) {
        tracing::trace!("binding wait object");
        *self.binding.lock() = Some(target);
    }

    /// Clear the binding.
    pub fn unbind(&self) {
        tracing::trace!("unbinding wait object");
        *self.binding.lock() = None;
    }

    /// Whether a wait object is currently bound.
    pub fn is_bound(&self) -> bool {
        self.binding.lock().is_some()
    }

    /// Bind `target` and return a guard that unbinds when dropped.
    #[must_use = "the binding is released as soon as the guard is dropped"]
    pub fn bind_scoped(&self, target: Arc<dyn Wake>) -> WaitBinding<'_> {
        self.bind(target);
        WaitBinding { flag: self }
    }
}

/// Scoped wait binding; unbinds on drop, including during unwinding.
#[derive(Debug)]
pub struct WaitBinding<'a> {
    flag: &'a InterruptFlag,
}

impl Drop for WaitBinding<'_> {
    fn drop(&mut self) {
        self.flag.unbind();
    }
}

//! thread.rs — Owned worker thread with cooperative interruption
//!
//! Construction hands the worker's `InterruptFlag` back to the owner through a
//! rendezvous channel before the work starts, so `interrupt()` always has a
//! flag to set once `new()` returns. The owner never joins implicitly.

use parking_lot::{Condvar, MutexGuard};
use std::any::Any;
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use crate::config::ThreadConfig;
use crate::error::{Error, Result};
use crate::flag::InterruptFlag;
use crate::this_thread;

/// A worker thread that can be asked to stop at its next interruption point.
///
/// Join or detach before dropping; a still-joinable wrapper is detached on
/// drop.
#[derive(Debug)]
pub struct InterruptibleThread {
    handle: Option<JoinHandle<Result<()>>>,
    flag: Option<Arc<InterruptFlag>>,
}

impl InterruptibleThread {
    /// Spawn `work` on a new unnamed thread.
    pub fn new<F>(work: F) -> Result<Self>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        Self::with_config(&ThreadConfig::default(), work)
    }

    /// Spawn `work` on a new thread built from `config`.
    ///
    /// Returns once the worker has published its flag; `work` starts after
    /// that handoff.
    pub fn with_config<F>(config: &ThreadConfig, work: F) -> Result<Self>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(0);
        let handle = config.builder().spawn(move || {
            if tx.send(this_thread::flag()).is_err() {
                return Err(Error::FlagNotPublished);
            }
            work()
        })?;

        match rx.recv() {
            Ok(flag) => {
                tracing::debug!(name = ?handle.thread().name(), "worker published interrupt flag");
                Ok(Self {
                    handle: Some(handle),
                    flag: Some(flag),
                })
            }
            Err(_) => {
                // Sender dropped unsent: the worker is already gone.
                let _ = handle.join();
                Err(Error::FlagNotPublished)
            }
        }
    }

    /// Ask the worker to stop at its next interruption point.
    ///
    /// Wakes the worker if it is parked in an interruptible wait. No-op when
    /// no flag was published; harmless after the worker has finished.
    pub fn interrupt(&self) {
        if let Some(flag) = &self.flag {
            tracing::debug!("interrupt requested");
            flag.set();
        }
    }

    /// Whether `interrupt()` has reached the worker's flag.
    pub fn is_interrupted(&self) -> bool {
        self.flag.as_ref().is_some_and(|flag| flag.is_set())
    }

    /// Interruption point for the calling (worker) thread.
    pub fn interruption_point() -> Result<()> {
        this_thread::interruption_point()
    }

    /// Interruptible bounded wait for the calling (worker) thread.
    pub fn interruptible_wait<T: ?Sized>(
        cv: &Arc<Condvar>,
        guard: &mut MutexGuard<'_, T>,
    ) -> Result<()> {
        this_thread::interruptible_wait(cv, guard)
    }

    /// Wait for the worker and return what its work returned.
    ///
    /// `Ok(())` if the thread was already joined or detached.
    pub fn join(&mut self) -> Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        tracing::debug!(name = ?handle.thread().name(), "joining worker");
        match handle.join() {
            Ok(res) => res,
            Err(payload) => Err(Error::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Let the worker run on unowned. No-op if not joinable.
    pub fn detach(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(name = ?handle.thread().name(), "detaching worker");
        }
    }

    /// Whether `join()` or `detach()` still has a thread to act on.
    pub fn joinable(&self) -> bool {
        self.handle.is_some()
    }

    /// Name of the worker thread, if it was given one and is still owned.
    pub fn thread_name(&self) -> Option<&str> {
        self.handle.as_ref().and_then(|h| h.thread().name())
    }
}

impl Drop for InterruptibleThread {
    fn drop(&mut self) {
        if self.joinable() {
            tracing::warn!(name = ?self.thread_name(), "dropping joinable worker; detaching it");
            self.detach();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

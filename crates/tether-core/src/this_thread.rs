//! this_thread.rs — Interruption checks on the calling thread's own flag
//!
//! Every OS thread gets its own `InterruptFlag`, created lazily the first
//! time any function here (or `InterruptibleThread`'s worker prologue) touches
//! it. The functions are only meaningful on the thread that owns the flag;
//! other threads interrupt through the `Arc` published by
//! `InterruptibleThread`.
//!
//! Waits are never unbounded: each one sleeps for at most `WAIT_TIMEOUT` so
//! that a wake lost between the flag check and the bind is recovered by the
//! next interruption point.

use parking_lot::{Condvar, MutexGuard};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::flag::InterruptFlag;

/// Upper bound on a single interruptible wait.
pub const WAIT_TIMEOUT: Duration = Duration::from_millis(1);

thread_local! {
    static FLAG: Arc<InterruptFlag> = Arc::new(InterruptFlag::new());
}

/// The calling thread's interrupt flag.
pub fn flag() -> Arc<InterruptFlag> {
    FLAG.with(Arc::clone)
}

/// Whether interruption of the calling thread has been requested.
pub fn interruption_requested() -> bool {
    FLAG.with(|flag| flag.is_set())
}

/// Fail with [`Error::Interrupted`] if the calling thread's flag is set.
pub fn interruption_point() -> Result<()> {
    if interruption_requested() {
        tracing::debug!("interruption point reached with flag set");
        return Err(Error::Interrupted);
    }
    Ok(())
}

/// Block on `cv` for at most [`WAIT_TIMEOUT`], waking early if the calling
/// thread is interrupted.
///
/// `guard` must be locked on the mutex paired with `cv`. Returns `Ok(())`
/// after a notification or a timeout; callers re-check their own condition
/// and loop. The wake binding is cleared before this returns on every path.
pub fn interruptible_wait<T: ?Sized>(
    cv: &Arc<Condvar>,
    guard: &mut MutexGuard<'_, T>,
) -> Result<()> {
    interruption_point()?;
    let flag = flag();
    let binding = flag.bind_scoped(cv.clone());
    // A `set()` between the first check and the bind did not wake `cv`.
    interruption_point()?;
    if cv.wait_for(guard, WAIT_TIMEOUT).timed_out() {
        tracing::trace!("interruptible wait timed out");
    }
    drop(binding);
    interruption_point()
}

/// Block on `cv` until `ready` holds or the calling thread is interrupted.
///
/// `ready` is evaluated with the lock held, before the first wait and after
/// every wake. Interruption wins over readiness: if both hold when the loop
/// exits, this returns [`Error::Interrupted`].
pub fn interruptible_wait_until<T, F>(
    cv: &Arc<Condvar>,
    guard: &mut MutexGuard<'_, T>,
    mut ready: F,
) -> Result<()>
where
    T: ?Sized,
    F: FnMut(&mut T) -> bool,
{
    interruption_point()?;
    let flag = flag();
    let binding = flag.bind_scoped(cv.clone());
    while !flag.is_set() && !ready(&mut **guard) {
        cv.wait_for(guard, WAIT_TIMEOUT);
    }
    drop(binding);
    interruption_point()
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::thread;
    use std::time::Instant;

    /// Run `f` on a fresh thread so it starts with its own unset flag.
    fn on_fresh_thread<R: Send + 'static>(f: impl FnOnce() -> R + Send + 'static) -> R {
        thread::spawn(f).join().unwrap()
    }

    #[test]
    fn test_interruption_point_passes_when_clear() {
        on_fresh_thread(|| {
            assert!(!interruption_requested());
            assert!(interruption_point().is_ok());
        });
    }

    #[test]
    fn test_interruption_point_fails_every_time_once_set() {
        on_fresh_thread(|| {
            flag().set();
            for _ in 0..3 {
                assert!(matches!(interruption_point(), Err(Error::Interrupted)));
            }
        });
    }

    #[test]
    fn test_flags_are_per_thread() {
        on_fresh_thread(|| {
            flag().set();
            let other = thread::spawn(interruption_requested).join().unwrap();
            assert!(!other);
            assert!(interruption_requested());
        });
    }

    #[test]
    fn test_wait_times_out_without_notification() {
        on_fresh_thread(|| {
            let cv = Arc::new(Condvar::new());
            let m = Mutex::new(());
            let mut guard = m.lock();
            let start = Instant::now();
            for _ in 0..5 {
                assert!(interruptible_wait(&cv, &mut guard).is_ok());
                assert!(!flag().is_bound());
            }
            // Five bounded waits, nowhere near an unbounded block.
            assert!(start.elapsed() < Duration::from_secs(5));
        });
    }

    #[test]
    fn test_wait_fails_fast_when_already_set() {
        on_fresh_thread(|| {
            flag().set();
            let cv = Arc::new(Condvar::new());
            let m = Mutex::new(());
            let mut guard = m.lock();
            assert!(interruptible_wait(&cv, &mut guard)
                .unwrap_err()
                .is_interrupted());
            assert!(!flag().is_bound());
        });
    }

    #[test]
    fn test_wait_until_returns_when_ready() {
        let state = Arc::new((Mutex::new(false), Arc::new(Condvar::new())));
        let waiter = {
            let state = state.clone();
            thread::spawn(move || {
                let (m, cv) = &*state;
                let mut ready = m.lock();
                let res = interruptible_wait_until(cv, &mut ready, |r| *r);
                (res.is_ok(), flag().is_bound())
            })
        };

        {
            let (m, cv) = &*state;
            *m.lock() = true;
            cv.notify_all();
        }

        let (ok, bound) = waiter.join().unwrap();
        assert!(ok);
        assert!(!bound);
    }

    #[test]
    fn test_wait_until_interrupted_from_other_thread() {
        let (tx, rx) = std::sync::mpsc::channel();
        let waiter = thread::spawn(move || {
            tx.send(flag()).unwrap();
            let cv = Arc::new(Condvar::new());
            let m = Mutex::new(());
            let mut guard = m.lock();
            let res = interruptible_wait_until(&cv, &mut guard, |_| false);
            (res, flag().is_bound())
        });

        rx.recv().unwrap().set();

        let (res, bound) = waiter.join().unwrap();
        assert!(matches!(res, Err(Error::Interrupted)));
        assert!(!bound);
    }
}

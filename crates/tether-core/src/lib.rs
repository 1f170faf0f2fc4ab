//! Threads that can be asked to stop.
//!
//! Interruption is cooperative: `InterruptibleThread::interrupt` sets the
//! worker's flag, and the worker observes it at interruption points
//! (`this_thread::interruption_point`) or while parked in an interruptible
//! wait, which it leaves with `Error::Interrupted`.

pub mod config;
pub mod error;
pub mod flag;
pub mod this_thread;
pub mod thread;

pub use config::ThreadConfig;
pub use error::{Error, Result};
pub use flag::{InterruptFlag, WaitBinding, Wake};
pub use this_thread::{
    interruptible_wait, interruptible_wait_until, interruption_point, interruption_requested,
    WAIT_TIMEOUT,
};
pub use thread::InterruptibleThread;

pub mod prelude {
    //! Common imports for consumers of this crate.
    pub use super::{
        interruptible_wait, interruptible_wait_until, interruption_point, Error,
        InterruptibleThread, Result, ThreadConfig,
    };
}

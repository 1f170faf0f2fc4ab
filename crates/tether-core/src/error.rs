//! error.rs — Error types for `tether-core`
//!
//! Purpose:
//! - `Interrupted` is the only domain error: it is returned from interruption
//!   points and travels up the worker's stack with `?`.
//! - The remaining variants cover thread lifecycle failures.

use thiserror::Error;

/// Errors that can occur while running or managing an interruptible thread.
#[derive(Error, Debug)]
pub enum Error {
    /// The calling thread's interrupt flag was set when it reached an
    /// interruption point.
    #[error("thread interrupted")]
    Interrupted,

    /// The OS refused to create the worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker exited before handing its interrupt flag to the owner.
    #[error("worker exited before publishing its interrupt flag")]
    FlagNotPublished,

    /// The worker panicked; carries the panic payload when it was a string.
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl Error {
    /// True for the cooperative-cancellation signal.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}

/// Convenience result alias for interruptible operations.
pub type Result<T> = std::result::Result<T, Error>;

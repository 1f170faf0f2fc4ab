//! Spawn-time settings for worker threads.

use serde::{Deserialize, Serialize};

/// Settings applied to the OS thread behind an `InterruptibleThread`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThreadConfig {
    /// Thread name, visible in panic messages and debuggers.
    pub name: Option<String>,
    /// Stack size in bytes; `None` keeps the platform default.
    pub stack_size: Option<usize>,
}

impl ThreadConfig {
    /// Default settings: unnamed thread, platform stack size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the thread name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the stack size in bytes.
    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub(crate) fn builder(&self) -> std::thread::Builder {
        let mut builder = std::thread::Builder::new();
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
    }
}

//! Host-supplied reporter with two independently optional slots.

use std::fmt;
use std::sync::LazyLock;

use crate::options::{DebugOptions, WarnOptions};

/// Error returned by a host callback. A failing callback fails the compilation.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

pub type WarnCallback =
    Box<dyn Fn(&str, &WarnOptions) -> Result<(), CallbackError> + Send + Sync>;

pub type DebugCallback =
    Box<dyn Fn(&str, &DebugOptions) -> Result<(), CallbackError> + Send + Sync>;

/// Where warnings and debug messages go.
///
/// A missing slot means "use the default channel for this kind", not
/// "suppress". `Logger::new()` therefore behaves exactly like passing no logger
/// at all. To suppress everything, use [`Logger::silent`] or [`SILENT`], whose
/// slots are defined but do nothing.
#[derive(Default)]
pub struct Logger {
    warn: Option<WarnCallback>,
    debug: Option<DebugCallback>,
}

/// The built-in silent logger.
pub static SILENT: LazyLock<Logger> = LazyLock::new(Logger::silent);

impl Logger {
    /// A logger with no slots defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// A logger whose slots are both no-ops.
    pub fn silent() -> Self {
        Self::new().on_warn(|_, _| Ok(())).on_debug(|_, _| Ok(()))
    }

    pub fn on_warn<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &WarnOptions) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.warn = Some(Box::new(callback));
        self
    }

    pub fn on_debug<F>(mut self, callback: F) -> Self
    where
        F: Fn(&str, &DebugOptions) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.debug = Some(Box::new(callback));
        self
    }

    pub fn warn_callback(&self) -> Option<&WarnCallback> {
        self.warn.as_ref()
    }

    pub fn debug_callback(&self) -> Option<&DebugCallback> {
        self.debug.as_ref()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("warn", &self.warn.is_some())
            .field("debug", &self.debug.is_some())
            .finish()
    }
}

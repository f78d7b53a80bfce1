//! Warning and debug reporting for the Cascade compiler.
//!
//! Every diagnostic the compiler emits goes through a [`Dispatcher`], which
//! hands it to exactly one sink: the host's [`Logger`] callback for that kind
//! if one is defined, or the [`FallbackLogger`] otherwise.

pub mod dispatcher;
pub mod error;
pub mod fallback;
pub mod logger;
pub mod message;
pub mod options;
pub mod stack;

pub use dispatcher::Dispatcher;
pub use error::{Channel, ReportError};
pub use fallback::{FallbackLogger, StreamLogger};
pub use logger::{CallbackError, Logger, SILENT};
pub use message::{Loggable, derive_message};
pub use options::{DebugOptions, WarnOptions};
pub use stack::{CallStack, Frame, StackTrace, Trace};

//! A small stylesheet compiler that routes every warning and debug message
//! through a host-supplied [`Logger`].

pub mod ast;
pub mod compile;
pub mod database;
pub mod error;
pub mod eval;
pub mod parser;
pub mod value;

pub use cascade_logger::{
    DebugOptions, FallbackLogger, Logger, ReportError, SILENT, StreamLogger, WarnOptions,
};
pub use cascade_span::{SourceLocation, SourceUrl, Span};

pub use crate::compile::{CancelFlag, CompileOptions, compile_path, compile_source, compile_string};
pub use crate::database::{CascadeDatabaseImpl, SourceFile};
pub use crate::error::{CompileError, CompileResult};

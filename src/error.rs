//! Error types for compilation.

use cascade_logger::ReportError;
use cascade_span::{Span, SpanError};
use derive_more::{Display, From};

pub type CompileResult<T> = Result<T, CompileError>;

/// Why a compilation stopped.
#[derive(Debug, Display, From)]
pub enum CompileError {
    #[display("{message}\n    at {span}")]
    Syntax { message: String, span: Span },

    #[display("Undefined variable `${name}`\n    at {span}")]
    UndefinedVariable { name: String, span: Span },

    #[display("Undefined mixin `{name}`\n    at {span}")]
    UndefinedMixin { name: String, span: Span },

    #[display("{message}\n    at {span}")]
    Operation { message: String, span: Span },

    /// A reporter callback or the default channel failed.
    #[display("Diagnostic reporting failed: {_0}")]
    #[from]
    Report(ReportError),

    /// The front end asked for a span the file cannot supply.
    #[display("Internal location error: {_0}")]
    #[from]
    Location(SpanError),

    #[display("I/O error: {_0}")]
    #[from]
    Io(std::io::Error),

    #[display("Compilation cancelled")]
    Cancelled,
}

impl CompileError {
    /// The span of the offending stylesheet code, when there is one.
    pub fn span(&self) -> Option<&Span> {
        match self {
            CompileError::Syntax { span, .. }
            | CompileError::UndefinedVariable { span, .. }
            | CompileError::UndefinedMixin { span, .. }
            | CompileError::Operation { span, .. } => Some(span),
            _ => None,
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Report(e) => Some(e),
            CompileError::Location(e) => Some(e),
            CompileError::Io(e) => Some(e),
            _ => None,
        }
    }
}

//! Errors raised when a caller asks for a location or span the file cannot supply.

use derive_more::{Display, Error};

pub type SpanResult<T> = Result<T, SpanError>;

/// A request for a location or span that does not fit the file.
///
/// Every variant is a programming error in the caller (parser or evaluator),
/// never something a stylesheet author can trigger.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum SpanError {
    #[display("offset {offset} is out of range for a file of length {len}")]
    OutOfRange { offset: usize, len: usize },

    #[display("invalid range {start}..{end} for a file of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[display("offset {offset} falls inside a single code point")]
    SplitsCodePoint { offset: usize },

    #[display("invalid source URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[display("inconsistent span: {reason}")]
    Inconsistent { reason: &'static str },
}

//! Metadata handed to reporter callbacks alongside the message.

use cascade_span::Span;
use serde::Serialize;

/// Metadata for a warning.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WarnOptions {
    /// Whether the warning announces behavior that will change or go away.
    pub deprecation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Metadata for a debug message. Debug output is always anchored to the
/// statement that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DebugOptions {
    pub span: Span,
}

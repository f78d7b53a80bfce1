//! Source locations and spans for Cascade diagnostics.
//!
//! All offsets are counted in UTF-16 code units and only U+000A ends a line,
//! so that line and column numbers agree with every other implementation that
//! reports locations in the same stylesheet.

pub mod error;
pub mod line_index;
pub mod location;
pub mod span;
pub mod url;

pub use error::{SpanError, SpanResult};
pub use line_index::LineIndex;
pub use location::SourceLocation;
pub use span::Span;
pub use url::SourceUrl;

/// Locate `offset` in `text`.
///
/// For repeated lookups in the same file, build a [`LineIndex`] once instead.
pub fn locate(text: &str, offset: usize) -> SpanResult<SourceLocation> {
    LineIndex::new(text).locate(offset)
}

/// Build the span `[start, end)` over `text`.
pub fn span(
    text: &str,
    url: Option<SourceUrl>,
    start: usize,
    end: usize,
    include_context: bool,
) -> SpanResult<Span> {
    LineIndex::new(text).span(url, start, end, include_context)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate() {
        let location = locate("a {\n  b: c;\n}", 8).unwrap();
        assert_eq!(location.line(), 1);
        assert_eq!(location.column(), 4);
    }

    #[test]
    fn test_span_without_context() {
        let span = span("a {\n  b: c;\n}", None, 6, 10, false).unwrap();
        assert_eq!(span.text(), "b: c");
        assert_eq!(span.context(), None);
        assert_eq!(span.end().column(), 6);
    }
}

//! Spans over a single source file.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SpanError, SpanResult};
use crate::location::SourceLocation;
use crate::url::SourceUrl;

/// A half-open range `[start, end)` over one file's text.
///
/// A span always carries the exact text it covers. The optional `context`
/// contains `text`, with `text` starting at `start.column` on one of the
/// context's lines. Both properties are checked whenever a span is built or
/// deserialized, so a `Span` value can be trusted without re-checking.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SpanWire")]
pub struct Span {
    start: SourceLocation,
    end: SourceLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<SourceUrl>,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<String>,
}

impl Span {
    pub(crate) fn new(
        start: SourceLocation,
        end: SourceLocation,
        url: Option<SourceUrl>,
        text: String,
        context: Option<String>,
    ) -> SpanResult<Self> {
        if end.offset() < start.offset() {
            return Err(SpanError::Inconsistent {
                reason: "end precedes start",
            });
        }
        // Every earlier line ends in a line feed, so a location's offset is at
        // least its line plus its column.
        if start.line() + start.column() > start.offset() {
            return Err(SpanError::Inconsistent {
                reason: "start line and column exceed its offset",
            });
        }
        let len = text.encode_utf16().count();
        if len != end.offset() - start.offset() {
            return Err(SpanError::Inconsistent {
                reason: "text length differs from the covered range",
            });
        }
        if (end.line(), end.column()) != advance(start, &text) {
            return Err(SpanError::Inconsistent {
                reason: "end location does not follow from start and text",
            });
        }
        if let Some(context) = &context {
            if !aligned_in_context(context, &text, start.column()) {
                return Err(SpanError::Inconsistent {
                    reason: "context does not contain the text at its start column",
                });
            }
        }
        Ok(Self {
            start,
            end,
            url,
            text,
            context,
        })
    }

    #[inline]
    pub fn start(&self) -> SourceLocation {
        self.start
    }

    #[inline]
    pub fn end(&self) -> SourceLocation {
        self.end
    }

    pub fn url(&self) -> Option<&SourceUrl> {
        self.url.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Length in UTF-16 code units.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.offset() - self.start.offset()
    }

    /// An empty span is a point between two characters, not a character.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start.offset() == self.end.offset()
    }

    pub fn without_context(self) -> Self {
        Self {
            context: None,
            ..self
        }
    }
}

/// `<url> <line>:<column>`, with `-` standing in for a missing URL.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "{url} {}", self.start),
            None => write!(f, "- {}", self.start),
        }
    }
}

/// Line and column reached by walking `text` from `start`.
fn advance(start: SourceLocation, text: &str) -> (usize, usize) {
    match text.rfind('\n') {
        Some(lf) => {
            let lines = text.matches('\n').count();
            let column = text[lf + 1..].encode_utf16().count();
            (start.line() + lines, column)
        }
        None => (
            start.line(),
            start.column() + text.encode_utf16().count(),
        ),
    }
}

fn aligned_in_context(context: &str, text: &str, column: usize) -> bool {
    let mut line_start = 0;
    loop {
        let line = &context[line_start..];
        if let Some(at) = column_byte(line, column) {
            if line[at..].starts_with(text) {
                return true;
            }
        }
        match line.find('\n') {
            Some(lf) => line_start += lf + 1,
            None => return false,
        }
    }
}

/// Byte offset of UTF-16 `column` within the first line of `line`.
fn column_byte(line: &str, column: usize) -> Option<usize> {
    let mut units = 0;
    for (i, c) in line.char_indices() {
        if units == column {
            return Some(i);
        }
        if units > column || c == '\n' {
            return None;
        }
        units += c.len_utf16();
    }
    (units == column).then_some(line.len())
}

#[derive(Deserialize)]
struct SpanWire {
    start: LocationWire,
    end: LocationWire,
    #[serde(default)]
    url: Option<SourceUrl>,
    text: String,
    #[serde(default)]
    context: Option<String>,
}

#[derive(Deserialize)]
struct LocationWire {
    offset: usize,
    line: usize,
    column: usize,
}

impl From<LocationWire> for SourceLocation {
    fn from(wire: LocationWire) -> Self {
        SourceLocation::new(wire.offset, wire.line, wire.column)
    }
}

impl TryFrom<SpanWire> for Span {
    type Error = SpanError;

    fn try_from(wire: SpanWire) -> SpanResult<Self> {
        Span::new(
            wire.start.into(),
            wire.end.into(),
            wire.url,
            wire.text,
            wire.context,
        )
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::LineIndex;

    fn url() -> SourceUrl {
        SourceUrl::parse("file:///styles/main.scss").unwrap()
    }

    #[test]
    fn test_display() {
        let index = LineIndex::new("a {\n  b: c;\n}\n");
        let span = index.span(Some(url()), 6, 10, false).unwrap();
        assert_eq!(span.to_string(), "file:///styles/main.scss 2:3");
        let anonymous = index.span(None, 0, 1, false).unwrap();
        assert_eq!(anonymous.to_string(), "- 1:1");
    }

    #[test]
    fn test_wire_shape() {
        let index = LineIndex::new("a {\n  @warn \"oops\";\n}\n");
        let span = index.span(Some(url()), 6, 18, true).unwrap();
        let json = serde_json::to_string_pretty(&span).unwrap();
        assert_snapshot!(json, @r#"
        {
          "start": {
            "offset": 6,
            "line": 1,
            "column": 2
          },
          "end": {
            "offset": 18,
            "line": 1,
            "column": 14
          },
          "url": "file:///styles/main.scss",
          "text": "@warn \"oops\"",
          "context": "  @warn \"oops\";"
        }
        "#);
    }

    #[test]
    fn test_wire_omits_absent_fields() {
        let index = LineIndex::new("abc");
        let span = index.span(None, 1, 2, false).unwrap();
        let json = serde_json::to_value(&span).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("context").is_none());
    }

    #[test]
    fn test_empty_span_survives_the_wire() {
        let index = LineIndex::new("one\ntwo");
        let span = index.span(Some(url()), 5, 5, true).unwrap();
        let json = serde_json::to_string(&span).unwrap();
        let back: Span = serde_json::from_str(&json).unwrap();
        assert_eq!(back, span);
        assert!(back.is_empty());
        assert!(back.end().offset() >= back.start().offset());
    }

    #[test]
    fn test_wire_rejects_reversed_range() {
        let json = r#"{
            "start": {"offset": 3, "line": 0, "column": 3},
            "end": {"offset": 1, "line": 0, "column": 1},
            "text": ""
        }"#;
        let err = serde_json::from_str::<Span>(json).unwrap_err();
        assert!(err.to_string().contains("end precedes start"));
    }

    #[test]
    fn test_wire_rejects_impossible_start() {
        let column_past_offset = r#"{
            "start": {"offset": 1, "line": 0, "column": 4},
            "end": {"offset": 2, "line": 0, "column": 5},
            "text": "b"
        }"#;
        let err = serde_json::from_str::<Span>(column_past_offset).unwrap_err();
        assert!(err.to_string().contains("start line and column exceed its offset"));

        let line_past_offset = r#"{
            "start": {"offset": 2, "line": 2, "column": 1},
            "end": {"offset": 3, "line": 2, "column": 2},
            "text": "b"
        }"#;
        assert!(serde_json::from_str::<Span>(line_past_offset).is_err());
    }

    #[test]
    fn test_wire_rejects_wrong_text_length() {
        let json = r#"{
            "start": {"offset": 0, "line": 0, "column": 0},
            "end": {"offset": 2, "line": 0, "column": 2},
            "text": "abc"
        }"#;
        assert!(serde_json::from_str::<Span>(json).is_err());
    }

    #[test]
    fn test_wire_rejects_inconsistent_line() {
        let json = r#"{
            "start": {"offset": 0, "line": 0, "column": 0},
            "end": {"offset": 3, "line": 0, "column": 3},
            "text": "a\nb"
        }"#;
        assert!(serde_json::from_str::<Span>(json).is_err());
    }

    #[test]
    fn test_wire_rejects_misaligned_context() {
        let json = r#"{
            "start": {"offset": 2, "line": 0, "column": 2},
            "end": {"offset": 3, "line": 0, "column": 3},
            "text": "c",
            "context": "cab"
        }"#;
        assert!(serde_json::from_str::<Span>(json).is_err());
    }

    #[test]
    fn test_context_alignment_on_later_line() {
        assert!(aligned_in_context("xx\n  ab", "ab", 2));
        assert!(!aligned_in_context("xx\n ab", "ab", 2));
    }

    #[test]
    fn test_context_alignment_with_wide_characters() {
        // The column counts UTF-16 units, so '😀' advances it by two.
        assert!(aligned_in_context("😀ab", "ab", 2));
        assert!(!aligned_in_context("😀ab", "ab", 1));
    }

    #[test]
    fn test_without_context() {
        let index = LineIndex::new("abc");
        let span = index.span(None, 1, 2, true).unwrap();
        assert_eq!(span.context(), Some("abc"));
        assert_eq!(span.without_context().context(), None);
    }
}

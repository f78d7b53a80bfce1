//! Line index for converting offsets into locations and spans.
//!
//! Offsets are UTF-16 code units. Only U+000A terminates a line; a carriage
//! return is an ordinary character that occupies a column.

use crate::error::{SpanError, SpanResult};
use crate::location::SourceLocation;
use crate::span::Span;
use crate::url::SourceUrl;

/// Line index for a source file.
///
/// Caches line start positions so that locating an offset is a binary search.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LineIndex {
    /// Start of each line, after the preceding line feed.
    line_starts: Vec<LineStart>,
    /// Length of the source in UTF-16 code units.
    len_utf16: usize,
    source: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct LineStart {
    utf16: usize,
    byte: usize,
}

impl LineIndex {
    /// Create a line index from source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![LineStart { utf16: 0, byte: 0 }];
        let mut utf16 = 0;
        for (byte, c) in source.char_indices() {
            utf16 += c.len_utf16();
            if c == '\n' {
                line_starts.push(LineStart {
                    utf16,
                    byte: byte + 1,
                });
            }
        }
        Self {
            line_starts,
            len_utf16: utf16,
            source: source.to_owned(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Length of the source in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.len_utf16
    }

    pub fn is_empty(&self) -> bool {
        self.len_utf16 == 0
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Locate a UTF-16 offset. `offset == len()` is the end-of-file location.
    pub fn locate(&self, offset: usize) -> SpanResult<SourceLocation> {
        if offset > self.len_utf16 {
            return Err(SpanError::OutOfRange {
                offset,
                len: self.len_utf16,
            });
        }
        let line = self.line_of(offset);
        let column = offset - self.line_starts[line].utf16;
        Ok(SourceLocation::new(offset, line, column))
    }

    /// Build the span `[start, end)` over this file.
    ///
    /// With `include_context`, the span also carries every full line it
    /// touches, without the final line feed.
    pub fn span(
        &self,
        url: Option<SourceUrl>,
        start: usize,
        end: usize,
        include_context: bool,
    ) -> SpanResult<Span> {
        if start > end || end > self.len_utf16 {
            return Err(SpanError::InvalidRange {
                start,
                end,
                len: self.len_utf16,
            });
        }
        let start_location = self.locate(start)?;
        let end_location = self.locate(end)?;
        let start_byte = self.byte_offset(start)?;
        let end_byte = self.byte_offset(end)?;
        let text = self.source[start_byte..end_byte].to_owned();

        let context = include_context.then(|| {
            let from = self.line_starts[start_location.line()].byte;
            let to = self.line_end_byte(end_location.line());
            self.source[from..to].to_owned()
        });

        Span::new(start_location, end_location, url, text, context)
    }

    /// Convert a UTF-16 offset to a byte offset into [`Self::source`].
    pub fn byte_offset(&self, offset: usize) -> SpanResult<usize> {
        let location = self.locate(offset)?;
        let start = self.line_starts[location.line()];
        let mut units = start.utf16;
        for (i, c) in self.source[start.byte..].char_indices() {
            if units == offset {
                return Ok(start.byte + i);
            }
            if units > offset {
                return Err(SpanError::SplitsCodePoint { offset });
            }
            units += c.len_utf16();
        }
        if units == offset {
            Ok(self.source.len())
        } else {
            Err(SpanError::SplitsCodePoint { offset })
        }
    }

    /// Convert a byte offset (as produced by a lexer over `&str`) to UTF-16.
    pub fn utf16_offset(&self, byte: usize) -> SpanResult<usize> {
        if byte > self.source.len() {
            return Err(SpanError::OutOfRange {
                offset: byte,
                len: self.source.len(),
            });
        }
        if !self.source.is_char_boundary(byte) {
            return Err(SpanError::SplitsCodePoint { offset: byte });
        }
        let line = self
            .line_starts
            .partition_point(|start| start.byte <= byte)
            .saturating_sub(1);
        let start = self.line_starts[line];
        let units: usize = self.source[start.byte..byte].encode_utf16().count();
        Ok(start.utf16 + units)
    }

    fn line_of(&self, offset: usize) -> usize {
        self.line_starts
            .partition_point(|start| start.utf16 <= offset)
            .saturating_sub(1)
    }

    /// Byte offset of the line feed ending `line`, or end of file.
    fn line_end_byte(&self, line: usize) -> usize {
        self.line_starts
            .get(line + 1)
            .map(|next| next.byte - 1)
            .unwrap_or(self.source.len())
    }
}

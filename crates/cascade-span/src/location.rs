use std::fmt;

use serde::Serialize;

/// A position in a source file.
///
/// `offset` counts UTF-16 code units from the start of the file. `line` and
/// `column` are 0-based and always derived from `offset`, which is why there is
/// no public constructor: use [`crate::LineIndex::locate`] or [`crate::locate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourceLocation {
    offset: usize,
    line: usize,
    column: usize,
}

impl SourceLocation {
    pub(crate) const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub const fn line(&self) -> usize {
        self.line
    }

    #[inline]
    pub const fn column(&self) -> usize {
        self.column
    }
}

/// Renders the 1-based `line:column` pair users expect to see.
impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

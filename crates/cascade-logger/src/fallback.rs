//! The default channel used when a reporter slot is not defined.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::options::{DebugOptions, WarnOptions};

/// Receives diagnostics whose reporter slot is undefined.
pub trait FallbackLogger {
    fn warn(&self, message: &str, options: &WarnOptions) -> io::Result<()>;

    fn debug(&self, message: &str, options: &DebugOptions) -> io::Result<()>;
}

/// Writes plain-text diagnostics to a stream, standard error by default.
///
/// ```text
/// DEPRECATION WARNING: Using / for division is deprecated.
///     at file:///main.scss 3:9
///     file:///main.scss 3:9  root stylesheet
///
/// file:///main.scss 5:1 DEBUG: 3
/// ```
pub struct StreamLogger<W> {
    out: Mutex<W>,
}

impl StreamLogger<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> StreamLogger<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write> FallbackLogger for StreamLogger<W> {
    fn warn(&self, message: &str, options: &WarnOptions) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let label = if options.deprecation {
            "DEPRECATION WARNING"
        } else {
            "WARNING"
        };
        writeln!(out, "{label}: {message}")?;
        if let Some(span) = &options.span {
            writeln!(out, "    at {span}")?;
        }
        if let Some(stack) = &options.stack {
            for line in stack.lines() {
                writeln!(out, "    {line}")?;
            }
        }
        writeln!(out)?;
        out.flush()
    }

    fn debug(&self, message: &str, options: &DebugOptions) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{} DEBUG: {message}", options.span)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use cascade_span::{LineIndex, SourceUrl};
    use insta::assert_snapshot;

    use super::*;

    fn render(f: impl FnOnce(&StreamLogger<Vec<u8>>)) -> String {
        let logger = StreamLogger::new(Vec::new());
        f(&logger);
        String::from_utf8(logger.into_inner()).unwrap()
    }

    #[test]
    fn test_warning_with_span_and_stack() {
        let index = LineIndex::new("a {\n  b: c;\n}\n\n  @warn \"oops\";\n");
        let url = SourceUrl::parse("file:///main.scss").ok();
        let span = index.span(url, 17, 29, false).unwrap();
        let options = WarnOptions {
            deprecation: false,
            stack: Some(format!("{span}  root stylesheet")),
            span: Some(span),
        };
        let output = render(|logger| logger.warn("oops", &options).unwrap());
        assert_snapshot!(output.trim_end(), @r"
        WARNING: oops
            at file:///main.scss 5:3
            file:///main.scss 5:3  root stylesheet
        ");
    }

    #[test]
    fn test_deprecation_is_labelled() {
        let options = WarnOptions {
            deprecation: true,
            ..WarnOptions::default()
        };
        let output = render(|logger| logger.warn("going away", &options).unwrap());
        assert_eq!(output, "DEPRECATION WARNING: going away\n\n");
    }

    #[test]
    fn test_debug_includes_location() {
        let index = LineIndex::new("\n@debug 1 + 2;");
        let span = index.span(None, 1, 13, false).unwrap();
        let output = render(|logger| logger.debug("3", &DebugOptions { span }).unwrap());
        assert_eq!(output, "- 2:1 DEBUG: 3\n");
    }

    #[test]
    fn test_debug_includes_column() {
        let index = LineIndex::new("a { b: c; }   @debug 7;");
        let url = SourceUrl::parse("file:///main.scss").ok();
        let span = index.span(url, 14, 22, false).unwrap();
        let output = render(|logger| logger.debug("7", &DebugOptions { span }).unwrap());
        assert_eq!(output, "file:///main.scss 1:15 DEBUG: 7\n");
    }
}

//! Public compilation entry points and their options.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cascade_logger::{Dispatcher, FallbackLogger, Logger, StreamLogger};
use cascade_span::{LineIndex, SourceUrl};

use crate::database::{CascadeDatabaseImpl, SourceFile, line_index, parsed_stylesheet};
use crate::error::{CompileError, CompileResult};
use crate::eval::Evaluator;
use crate::parser::ParseError;

/// Options accepted by every compilation entry point.
///
/// `logger: None` behaves exactly like `Some(&Logger::new())`: every
/// diagnostic goes to the fallback. Pass [`cascade_logger::SILENT`] to
/// suppress them.
#[derive(Default)]
pub struct CompileOptions<'a> {
    pub logger: Option<&'a Logger>,
    /// Where diagnostics go when the logger leaves a slot undefined.
    /// Standard error when absent.
    pub fallback: Option<&'a dyn FallbackLogger>,
    /// Attach the surrounding lines to every span.
    pub include_context: bool,
    pub cancel: Option<CancelFlag>,
}

/// Shared flag that stops a running compilation before its next diagnostic.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Compile stylesheet text that has no URL of its own.
pub fn compile_string(source: &str, options: &CompileOptions<'_>) -> CompileResult<String> {
    let db = CascadeDatabaseImpl::default();
    let file = SourceFile::new(&db, None, source.to_owned());
    compile_source(&db, file, options)
}

/// Load `path` through the database and compile it. Spans carry the file's
/// `file:` URL.
pub fn compile_path(
    db: &CascadeDatabaseImpl,
    path: impl AsRef<Path>,
    options: &CompileOptions<'_>,
) -> CompileResult<String> {
    let file = db.input(path)?;
    compile_source(db, file, options)
}

pub fn compile_source(
    db: &dyn salsa::Database,
    file: SourceFile,
    options: &CompileOptions<'_>,
) -> CompileResult<String> {
    let url = file.url(db).as_ref();
    tracing::debug!(url = url.map_or("-", SourceUrl::as_str), "compiling stylesheet");

    let index = line_index(db, file);
    let stylesheet = match parsed_stylesheet(db, file) {
        Ok(stylesheet) => stylesheet,
        Err(error) => return Err(syntax_error(index, url, error, options.include_context)),
    };

    let default_logger = Logger::new();
    let logger = options.logger.unwrap_or(&default_logger);
    let stderr = StreamLogger::stderr();
    let fallback: &dyn FallbackLogger = match options.fallback {
        Some(fallback) => fallback,
        None => &stderr,
    };
    let dispatcher = Dispatcher::new(logger, fallback);

    let css = Evaluator::new(
        index,
        url,
        dispatcher,
        options.include_context,
        options.cancel.as_ref(),
    )
    .run(&stylesheet.statements)?;
    tracing::debug!(bytes = css.len(), "compiled stylesheet");
    Ok(css)
}

fn syntax_error(
    index: &LineIndex,
    url: Option<&SourceUrl>,
    error: &ParseError,
    include_context: bool,
) -> CompileError {
    let span = index.utf16_offset(error.range.start).and_then(|start| {
        let end = index.utf16_offset(error.range.end)?;
        index.span(url.cloned(), start, end, include_context)
    });
    match span {
        Ok(span) => CompileError::Syntax {
            message: error.message.clone(),
            span,
        },
        Err(error) => error.into(),
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn capture(source: &str) -> (CompileResult<String>, String) {
        let fallback = StreamLogger::new(Vec::new());
        let options = CompileOptions {
            fallback: Some(&fallback),
            ..Default::default()
        };
        let result = compile_string(source, &options);
        drop(options);
        (result, String::from_utf8(fallback.into_inner()).unwrap())
    }

    #[test]
    fn test_syntax_error_has_span() {
        let (result, _) = capture("a {\n  color: red\n  @media x;\n}");
        let err = result.unwrap_err();
        assert!(matches!(&err, CompileError::Syntax { message, .. } if message == "expected `;`"));
        let span = err.span().unwrap();
        assert_eq!(span.text(), "@");
        assert_eq!(span.start().line(), 2);
        assert_eq!(span.start().column(), 2);
    }

    #[test]
    fn test_fallback_receives_everything() {
        let (result, output) = capture(
            "$size: 4px;\n@mixin pad {\n  @warn \"too small\";\n}\n@debug $size * 2;\na {\n  @include pad;\n  padding: $size;\n}\n",
        );
        assert_eq!(result.unwrap(), "a {\n  padding: 4px;\n}\n");
        assert_snapshot!(output, @r"
        - 5:1 DEBUG: 8px
        WARNING: too small
            at - 3:3
            - 3:3  pad()
            - 7:3  root stylesheet
        ");
    }

    #[test]
    fn test_cancel_flag_is_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}

//! Compiling stylesheets from disk.

mod common;

use std::io::Write;

use cascade::{CascadeDatabaseImpl, CompileError, CompileOptions, SourceUrl, compile_path};
use common::{Event, events, recording_logger};
use tempfile::NamedTempFile;

#[test]
fn test_spans_carry_the_file_url() {
    let mut file = NamedTempFile::with_suffix(".scss").unwrap();
    write!(file, "@debug \"loaded\";\na {{ color: red; }}\n").unwrap();

    let (logger, recorded) = recording_logger();
    let options = CompileOptions {
        logger: Some(&logger),
        ..Default::default()
    };
    let db = CascadeDatabaseImpl::default();
    let css = compile_path(&db, file.path(), &options).unwrap();
    assert_eq!(css, "a {\n  color: red;\n}\n");

    let expected = SourceUrl::from_path(&file.path().canonicalize().unwrap()).unwrap();
    let recorded = events(&recorded);
    let [Event::Debug(message, options)] = recorded.as_slice() else {
        panic!("expected one debug message, got {recorded:?}");
    };
    assert_eq!(message, "loaded");
    assert_eq!(options.span.url(), Some(&expected));
    assert!(expected.is_file());
}

#[test]
fn test_missing_file_is_an_io_error() {
    let db = CascadeDatabaseImpl::default();
    let err = compile_path(&db, "/no/such/dir/style.scss", &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io(_)));
}

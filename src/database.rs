use std::path::Path;
use std::sync::Arc;

use cascade_span::{LineIndex, SourceUrl};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::ast::Stylesheet;
use crate::error::CompileError;
use crate::parser::{ParseError, parse};

/// A stylesheet's text and the URL it was loaded from, if any.
#[salsa::input(debug)]
pub struct SourceFile {
    #[returns(ref)]
    pub url: Option<SourceUrl>,
    #[returns(ref)]
    pub text: String,
}

/// Line starts of a file, computed once per revision of its text.
#[salsa::tracked(returns(ref))]
pub fn line_index(db: &dyn salsa::Database, file: SourceFile) -> LineIndex {
    LineIndex::new(file.text(db))
}

#[salsa::tracked(returns(ref))]
pub fn parsed_stylesheet(
    db: &dyn salsa::Database,
    file: SourceFile,
) -> Result<Stylesheet, ParseError> {
    parse(file.text(db))
}

#[derive(Default, Clone)]
#[salsa::db]
pub struct CascadeDatabaseImpl {
    storage: salsa::Storage<Self>,
    files: Arc<DashMap<String, SourceFile>>,
}

#[salsa::db]
impl salsa::Database for CascadeDatabaseImpl {}

impl CascadeDatabaseImpl {
    /// Load a stylesheet from disk. Each canonical path is read once; later
    /// calls return the same input.
    pub fn input(&self, path: impl AsRef<Path>) -> Result<SourceFile, CompileError> {
        let path = path.as_ref().canonicalize()?;
        let url = SourceUrl::from_path(&path)?;
        match self.files.entry(url.as_str().to_owned()) {
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let text = std::fs::read_to_string(&path)?;
                tracing::debug!(%url, bytes = text.len(), "loaded stylesheet");
                let file = SourceFile::new(self, Some(url), text);
                entry.insert(file);
                Ok(file)
            }
        }
    }

    /// Register in-memory text under `url`, replacing any earlier text.
    pub fn open_document(&self, url: SourceUrl, text: String) -> SourceFile {
        let file = SourceFile::new(self, Some(url.clone()), text);
        self.files.insert(url.as_str().to_owned(), file);
        file
    }

    pub fn close_document(&self, url: &SourceUrl) {
        self.files.remove(url.as_str());
    }

    pub fn source_file(&self, url: &SourceUrl) -> Option<SourceFile> {
        self.files.get(url.as_str()).map(|entry| *entry)
    }
}

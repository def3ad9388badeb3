//! Source file representation shared across the tokenizer, parser and
//! semantic analyzer.
//!
//! Grounded on `libtimu::file::SourceFile`: a cheaply-clonable handle
//! (`Rc`-backed) to a file's path and contents, used so every diagnostic can
//! carry enough context to render a `miette`/`codespan-reporting` snippet
//! without re-reading the file from disk.

use std::{path::PathBuf, rc::Rc};

/// A source file's path and UTF-8 contents.
///
/// Cloning is cheap: the path and code are each behind an `Rc`, matching the
/// teacher's use of `Arc` for the same purpose (we use `Rc` because the
/// compiler is single-threaded end to end, per the concurrency model).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceFile {
    pub path: Rc<PathBuf>,
    pub source: Rc<str>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, source: impl Into<Rc<str>>) -> Self {
        Self { path: Rc::new(path.into()), source: source.into() }
    }

    /// An in-memory source file with no backing path, used by tests and by
    /// callers analyzing a single snippet with no module system involved.
    pub fn in_memory(source: impl Into<Rc<str>>) -> Self {
        Self::new("<memory>", source)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl miette::SourceCode for SourceFile {
    fn read_span<'a>(
        &'a self,
        span: &miette::SourceSpan,
        context_lines_before: usize,
        context_lines_after: usize,
    ) -> Result<Box<dyn miette::SpanContents<'a> + 'a>, miette::MietteError> {
        self.source
            .as_ref()
            .read_span(span, context_lines_before, context_lines_after)
    }
}

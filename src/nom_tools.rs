//! Nom scanning helpers shared by the tokenizer.
//!
//! Grounded on `libtimu::nom_tools`: a `LocatedSpan` type alias carrying a
//! lightweight parser state, plus a `ToRange` trait for projecting a span to
//! a byte range. The teacher threads an `Arc<AtomicUsize>` indexer through
//! its `State` for generating unique TIR node ids during parsing; the
//! tokenizer here has no equivalent need (tokens don't reference each
//! other), so `State` is reduced to just the source file.

use std::ops::Range;

use nom_locate::LocatedSpan;

use crate::file::SourceFile;
use crate::position::Position;

/// Parser state threaded through every nom combinator: just the file being
/// scanned, for error messages that want to name it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub file: SourceFile,
}

impl State {
    pub fn new(file: SourceFile) -> Self {
        Self { file }
    }
}

/// `nom_locate`'s located span, carrying [`State`] as its `extra` payload so
/// line/column bookkeeping is free during scanning.
pub type NomSpan<'a> = LocatedSpan<&'a str, State>;

/// Projects a span to a byte range in the source file.
pub trait ToRange {
    fn to_range(&self) -> Range<usize>;
}

impl ToRange for NomSpan<'_> {
    fn to_range(&self) -> Range<usize> {
        let start = self.location_offset();
        start..start + self.fragment().len()
    }
}

/// Projects a span's start to a [`Position`]. `nom_locate` already tracks
/// line/column for us; this just repackages it into the crate's own
/// lifetime-free coordinate type.
pub fn span_start(span: &NomSpan<'_>) -> Position {
    Position::new(span.location_line(), span.get_utf8_column() as u32, span.location_offset())
}

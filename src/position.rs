//! Source position tracking shared by every compiler phase.
//!
//! A [`Position`] is the public, lifetime-free coordinate the rest of the
//! crate reports to callers (tokens, AST nodes, diagnostics). Internally the
//! tokenizer computes positions from `nom_locate`'s `LocatedSpan`, which
//! tracks line/column for us the same way the teacher's `nom_tools::Span`
//! tracks byte offsets; `Position` is the narrow, owned projection of that
//! span that outlives the borrow of the source text.

use std::fmt;

/// A single point in source text: 1-based line and column, 0-based byte offset.
///
/// Monotonically non-decreasing across a single scan: for any two positions
/// produced in scan order, `a.offset <= b.offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in UTF-8 bytes, not grapheme clusters).
    pub column: u32,
    /// 0-based byte offset from the start of the source.
    pub offset: usize,
}

impl Position {
    /// The position a fresh scan starts at.
    pub const START: Position = Position { line: 1, column: 1, offset: 0 };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        debug_assert!(line >= 1 && column >= 1);
        Self { line, column, offset }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A contiguous byte range in one source file, for diagnostic labeling.
///
/// Distinct from [`Position`]: a `Span` covers the text a token or AST node
/// occupies, while a `Position` is the single point at which it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// The byte range, suitable for `codespan_reporting`/`miette` labels.
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

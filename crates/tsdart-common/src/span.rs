//! Source location tracking.
//!
//! Spans are byte-offset half-open ranges into the original source text.
//! `LineMap` converts byte offsets to 1-based line/column positions for
//! diagnostics and source maps.

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` into a file's source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    #[must_use]
    pub const fn empty() -> Span {
        Span { start: 0, end: 0 }
    }

    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// A 1-based line/column position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Byte-offset to line/column conversion for one file.
///
/// Built once per file from the source text; line starts are byte offsets.
#[derive(Clone, Debug)]
pub struct LineMap {
    line_starts: Vec<u32>,
}

impl LineMap {
    #[must_use]
    pub fn new(text: &str) -> LineMap {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        LineMap { line_starts }
    }

    /// Convert a byte offset to a 1-based position. Offsets past the end of
    /// the text clamp to the final line.
    #[must_use]
    pub fn position(&self, offset: u32) -> Position {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Position {
            line: line_idx as u32 + 1,
            column: offset - self.line_starts[line_idx] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_of_offsets() {
        let map = LineMap::new("ab\ncd\n\nx");
        assert_eq!(map.position(0), Position { line: 1, column: 1 });
        assert_eq!(map.position(1), Position { line: 1, column: 2 });
        assert_eq!(map.position(3), Position { line: 2, column: 1 });
        assert_eq!(map.position(6), Position { line: 3, column: 1 });
        assert_eq!(map.position(7), Position { line: 4, column: 1 });
    }

    #[test]
    fn position_clamps_past_end() {
        let map = LineMap::new("a");
        assert_eq!(map.position(40), Position { line: 1, column: 41 });
    }

    #[test]
    fn span_merge() {
        let a = Span::new(4, 8);
        let b = Span::new(6, 12);
        assert_eq!(a.merge(b), Span::new(4, 12));
    }
}

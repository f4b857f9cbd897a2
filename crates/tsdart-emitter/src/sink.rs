//! Output sink.
//!
//! Accumulates emitted tokens for one file. Tokens are separated by single
//! spaces unless emitted verbatim; the destination-side formatter owns final
//! whitespace. The sink tracks generated line/column so each visited node
//! can be correlated for source maps.

use tsdart_common::source_map::SourceMapBuilder;
use tsdart_common::{Position, SourceMap};

#[derive(Debug, Default)]
pub struct OutputSink {
    buf: String,
    line: u32,
    column: u32,
    /// Original position to record with the next token, set per node visit.
    pending_original: Option<Position>,
    map: Option<SourceMapBuilder>,
}

impl OutputSink {
    #[must_use]
    pub fn new(with_source_map: bool) -> OutputSink {
        OutputSink {
            buf: String::new(),
            line: 1,
            column: 1,
            pending_original: None,
            map: with_source_map.then(SourceMapBuilder::new),
        }
    }

    /// Emit a token with a separating space.
    pub fn emit(&mut self, token: &str) {
        if !self.buf.is_empty() && !self.buf.ends_with([' ', '\n']) {
            self.push(" ");
        }
        self.record_mapping();
        self.push(token);
    }

    /// Emit verbatim, with no separating space.
    pub fn emit_no_space(&mut self, token: &str) {
        self.record_mapping();
        self.push(token);
    }

    /// Terminate the current line, collapsing repeats.
    pub fn newline(&mut self) {
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.push("\n");
        }
    }

    /// Correlate the next emitted token with an original source position.
    pub fn mark(&mut self, original: Position) {
        if self.map.is_some() {
            self.pending_original = Some(original);
        }
    }

    // Called after any separating space, so the position is the token start.
    fn record_mapping(&mut self) {
        if let Some(original) = self.pending_original.take()
            && let Some(map) = self.map.as_mut()
        {
            map.add(
                Position {
                    line: self.line,
                    column: self.column,
                },
                original,
            );
        }
    }

    fn push(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.buf.push_str(text);
    }

    #[must_use]
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finish, returning the code and the source map if one was recorded.
    #[must_use]
    pub fn finish(self, out_file: &str, source: &str, source_text: &str) -> (String, Option<SourceMap>) {
        let map = self
            .map
            .map(|b| b.finish(out_file, source, source_text));
        (self.buf, map)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.buf
    }
}

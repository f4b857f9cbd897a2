//! Source-map mapping structure.
//!
//! The engine records one mapping per visited node, correlating generated
//! (line, column) with original (line, column). The structure is serialized
//! as JSON with the mappings left as raw tuples; compacting them into the
//! VLQ `mappings` string is the writer's concern, not ours.

use serde::Serialize;

use crate::span::Position;

/// One generated-to-original position correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RawMapping {
    pub generated_line: u32,
    pub generated_column: u32,
    pub original_line: u32,
    pub original_column: u32,
}

/// A per-file source map with the original text attached as source content.
#[derive(Clone, Debug, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub file: String,
    pub sources: Vec<String>,
    pub sources_content: Vec<String>,
    pub mappings: Vec<RawMapping>,
}

/// Accumulates mappings during emission.
#[derive(Debug, Default)]
pub struct SourceMapBuilder {
    mappings: Vec<RawMapping>,
}

impl SourceMapBuilder {
    #[must_use]
    pub fn new() -> SourceMapBuilder {
        SourceMapBuilder::default()
    }

    /// Record that output at `generated` corresponds to source at `original`.
    /// Mappings arrive in emission order, which is traversal pre-order.
    pub fn add(&mut self, generated: Position, original: Position) {
        // Consecutive tokens of one node map to the same original position;
        // keep only the first.
        if let Some(last) = self.mappings.last()
            && last.generated_line == generated.line
            && last.generated_column == generated.column
        {
            return;
        }
        self.mappings.push(RawMapping {
            generated_line: generated.line,
            generated_column: generated.column,
            original_line: original.line,
            original_column: original.column,
        });
    }

    #[must_use]
    pub fn finish(self, file: &str, source: &str, source_text: &str) -> SourceMap {
        SourceMap {
            version: 3,
            file: file.to_string(),
            sources: vec![source.to_string()],
            sources_content: vec![source_text.to_string()],
            mappings: self.mappings,
        }
    }
}

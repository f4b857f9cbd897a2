//! Common types for the tsdart transpiler.
//!
//! This crate provides the foundational types used across all tsdart crates:
//! - Source spans and line/column mapping (`Span`, `LineMap`, `Position`)
//! - Diagnostics and the fail-fast/aggregate error reporter
//! - The source-map mapping structure handed to the writer

pub mod span;
pub use span::{LineMap, Position, Span};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, ErrorReporter, FatalError, ReportMode};

pub mod source_map;
pub use source_map::{RawMapping, SourceMap, SourceMapBuilder};

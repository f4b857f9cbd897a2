//! Diagnostic types and the translation error reporter.
//!
//! Every diagnostic carries file, 1-based line/column, and a message. The
//! reporter runs in one of two modes: fail-fast raises the first diagnostic
//! immediately and aborts the traversal; aggregate collects every diagnostic
//! across the run and surfaces them as a single combined failure, ordered by
//! file then position.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Position;

/// A single translation error at a source position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(file: impl Into<String>, pos: Position, message: impl Into<String>) -> Diagnostic {
        Diagnostic {
            file: file.into(),
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }

    /// Sort key: file, then position.
    #[must_use]
    pub fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.file, self.line, self.column, self.message
        )
    }
}

/// How the reporter reacts to a diagnostic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Raise on the first diagnostic, aborting the remaining traversal.
    FailFast,
    /// Collect everything; the caller raises one combined failure at the end.
    #[default]
    Aggregate,
}

/// Raised when translation cannot continue.
#[derive(Clone, Debug)]
pub enum FatalError {
    /// A single diagnostic in fail-fast mode.
    Single(Diagnostic),
    /// The combined failure of an aggregate run.
    Aggregate(Vec<Diagnostic>),
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::Single(d) => write!(f, "{d}"),
            FatalError::Aggregate(ds) => {
                writeln!(f, "translation failed with {} error(s):", ds.len())?;
                for d in ds {
                    writeln!(f, "  {d}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for FatalError {}

/// Per-session diagnostic accumulator.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    mode: ReportMode,
    diagnostics: Vec<Diagnostic>,
}

impl ErrorReporter {
    #[must_use]
    pub fn new(mode: ReportMode) -> ErrorReporter {
        ErrorReporter {
            mode,
            diagnostics: Vec::new(),
        }
    }

    /// Record a diagnostic. Returns `Err` in fail-fast mode so the traversal
    /// unwinds; in aggregate mode the caller emits placeholder output and
    /// keeps going.
    pub fn report(&mut self, diagnostic: Diagnostic) -> Result<(), FatalError> {
        match self.mode {
            ReportMode::FailFast => Err(FatalError::Single(diagnostic)),
            ReportMode::Aggregate => {
                self.diagnostics.push(diagnostic);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Drain the collected diagnostics, sorted by file then position.
    #[must_use]
    pub fn into_diagnostics(mut self) -> Vec<Diagnostic> {
        self.diagnostics
            .sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        self.diagnostics
    }

    /// Combined failure for an aggregate run, or `None` if it succeeded.
    #[must_use]
    pub fn into_failure(self) -> Option<FatalError> {
        if self.has_errors() {
            Some(FatalError::Aggregate(self.into_diagnostics()))
        } else {
            None
        }
    }
}

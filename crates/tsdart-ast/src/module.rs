//! Front-end interchange: per-file dumps and the per-run program.
//!
//! The external front end parses and type-checks the source program, then
//! writes one dump per file: the tree, the symbols it references, and any
//! front-end diagnostics. A `Program` groups the dumps of one run together
//! with the module-resolution map the facade catalogues are resolved
//! against (once per run).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use tsdart_common::Diagnostic;

use crate::arena::{Ast, NodeId};
use crate::symbols::{SymbolId, SymbolTable};

/// One translated input file, as dumped by the front end.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SourceModule {
    /// Path of the original source file, relative to the project root.
    pub path: String,
    /// Full original source text (attached to source maps).
    pub source: String,
    pub root: NodeId,
    pub ast: Ast,
    pub symbols: SymbolTable,
    /// Syntactic/semantic findings of the front end itself. Merged into the
    /// failure report only when the engine also failed.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl SourceModule {
    /// Finish loading: fill parent links. Must run before translation.
    pub fn connect(&mut self) {
        let root = self.root;
        self.ast.set_parents(root);
    }

    /// Resolved symbol of a node, if the front end annotated one.
    #[must_use]
    pub fn symbol_of(&self, node: NodeId) -> Option<SymbolId> {
        self.ast.symbol_of(node)
    }

    /// File identity: the path without its extension.
    #[must_use]
    pub fn identity(&self) -> &str {
        strip_extension(&self.path)
    }
}

/// Strip the final extension from a path (`src/foo.ts` → `src/foo`).
#[must_use]
pub(crate) fn strip_extension(path: &str) -> &str {
    match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => path,
    }
}

/// The modules of one translation run plus the module-name resolver data.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Program {
    pub modules: Vec<SourceModule>,
    /// Logical module name → canonical file identity. Includes the reserved
    /// `"lib"` entry for the source language's built-in surface.
    #[serde(default)]
    pub module_map: FxHashMap<String, String>,
}

impl Program {
    /// Resolve a logical module name to a file identity. Used exactly once
    /// per run, to materialize the facade catalogues.
    #[must_use]
    pub fn resolve_module(&self, logical: &str) -> Option<&str> {
        self.module_map.get(logical).map(String::as_str)
    }
}

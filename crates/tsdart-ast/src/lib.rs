//! Symbol-annotated syntax tree for the tsdart transpiler.
//!
//! The tree is produced by the external front end (parser + type checker)
//! and interchanged as a serde-encoded dump per file. This crate owns the
//! node model (a closed set of syntactic categories over an arena), the
//! symbol table with alias chains, and the per-run `Program` grouping that
//! carries the module-resolution map.
//!
//! The transpiler never mutates a loaded tree.

pub mod kind;
pub use kind::{BinaryOp, HeritageKind, PostfixOp, SyntaxKind, TypeKeyword, UnaryOp, VarKeyword};

pub mod node;
pub use node::{
    ClassData, Comment, FunctionData, Modifiers, NodeData, ParamData, PropertyKey, Visibility,
};

pub mod arena;
pub use arena::{Ast, Node, NodeId};

pub mod symbols;
pub use symbols::{Symbol, SymbolFlags, SymbolId, SymbolTable};

pub mod module;
pub use module::{Program, SourceModule};

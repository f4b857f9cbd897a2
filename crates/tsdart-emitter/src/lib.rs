//! The tsdart translation engine.
//!
//! Translates a symbol-annotated source tree into Dart text. The engine is
//! a strict pre-order traversal: `Transpiler::visit` asks an ordered chain
//! of transform modules to claim each node, the first taker emits target
//! tokens to the output sink and recurses. The Facade Conversion Engine is
//! a passive oracle the transforms consult for type-directed library
//! rewrites; it never walks the tree itself.

pub mod sink;
pub use sink::OutputSink;

pub mod session;
pub use session::{translate_module, TranspileOptions, TranspileOutput, Transpiler};

pub mod dispatch;

pub mod const_eval;

pub mod facade;
pub use facade::{Catalog, FacadeEngine};

pub mod transforms;

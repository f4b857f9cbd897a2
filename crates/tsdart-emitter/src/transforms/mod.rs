//! Transform modules.
//!
//! Each module owns a set of node kinds and emits their Dart form,
//! re-entering the dispatch chain for children. Modules are `impl
//! Transpiler` blocks, one file per module, claimed through a `try_emit`
//! entry the dispatch chain calls in priority order.

pub mod calls;
pub mod declarations;
pub mod expressions;
pub mod literals;
pub mod modules;
pub mod statements;
pub mod types;

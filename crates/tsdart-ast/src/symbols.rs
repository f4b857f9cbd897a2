//! Symbols: the canonical identity of named entities.
//!
//! The front end resolves every identifier, property name, and type
//! reference it can to a symbol. A symbol's identity is the pair
//! (originating file, qualified name); the originating file is the
//! pre-extension, alias-resolved path the module resolver produced.
//! Import aliases are separate symbols flagged `ALIAS` that chain to the
//! underlying declaration; catalogue lookups always run on the fully
//! resolved symbol, so two aliases of one entity rewrite identically.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SymbolFlags: u8 {
        /// An import alias; `alias_of` points at the next link.
        const ALIAS = 1 << 0;
        /// Declared as a type parameter of a function, method, or class.
        const TYPE_PARAMETER = 1 << 1;
    }
}

/// Index of a symbol in its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

impl SymbolId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Symbol {
    /// Canonical originating file identity, pre-extension (`src/foo`).
    pub file: String,
    /// Dotted qualified name within the file (`Array.push`, `MyClass`).
    pub qualified_name: String,
    #[serde(default)]
    pub flags: SymbolFlags,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<SymbolId>,
}

/// All symbols referenced from one file's tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    /// Follow the alias chain to the underlying symbol. Cycles cannot occur
    /// in front-end output, but the walk is bounded anyway.
    #[must_use]
    pub fn resolve_alias(&self, mut id: SymbolId) -> SymbolId {
        let mut hops = 0usize;
        while hops <= self.symbols.len() {
            let sym = self.get(id);
            if !sym.flags.contains(SymbolFlags::ALIAS) {
                return id;
            }
            match sym.alias_of {
                Some(next) => id = next,
                None => return id,
            }
            hops += 1;
        }
        id
    }

    /// The resolved (file, qualified name) identity of a symbol.
    #[must_use]
    pub fn identity(&self, id: SymbolId) -> (&str, &str) {
        let sym = self.get(self.resolve_alias(id));
        (&sym.file, &sym.qualified_name)
    }
}

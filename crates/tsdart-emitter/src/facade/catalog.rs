//! Substitution catalogues.
//!
//! A catalogue maps a logical module name to rules keyed by the bare
//! qualified name of a declaration in that module. The reserved module
//! `"lib"` denotes the source language's own built-in surface; the support
//! library `"tsdart/helpers"` carries the marker functions the translation
//! recognizes specially. Rules are plain data; the engine resolves module
//! names to file identities once per run.

use once_cell::sync::Lazy;

/// The reserved logical name of the source built-in library surface.
pub const LIB_MODULE: &str = "lib";

/// The support library of translation marker functions.
pub const HELPERS_MODULE: &str = "tsdart/helpers";

/// A target-library import required by a rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExtraImport {
    pub module: &'static str,
    pub alias: Option<&'static str>,
}

impl ExtraImport {
    const fn plain(module: &'static str) -> Option<ExtraImport> {
        Some(ExtraImport {
            module,
            alias: None,
        })
    }

    const fn aliased(module: &'static str, alias: &'static str) -> Option<ExtraImport> {
        Some(ExtraImport {
            module,
            alias: Some(alias),
        })
    }
}

/// Rewrite rule for a call or constructor invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallRule {
    /// `recv.m(args)` → `recv.to(args)`.
    RenameMethod { to: &'static str },
    /// `recv.m(args)` → `recv.to(prefix..., args)`.
    MethodPrefixArgs {
        to: &'static str,
        prefix: &'static [&'static str],
    },
    /// Whole call → `to(args)`, dropping any receiver.
    FreeFunction {
        to: &'static str,
        import: Option<ExtraImport>,
    },
    /// `f(x, rest...)` → `x.to(rest...)`.
    ArgMethod { to: &'static str },
    /// `recv.concat(x)` → `(new List.from(recv)..addAll(x))`.
    ListConcat,
    /// Unwrap-to-constant: emit the sole argument in a const context.
    UnwrapConst,
    /// Forward reference: inline the body of a zero-argument closure.
    InlineThunk,
    /// Provider literal: `provide(token, {use...})` → `const Provider(...)`.
    Provider,
}

/// Rewrite rule for a property read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyRule {
    /// Whole access → fixed text.
    Replace {
        to: &'static str,
        import: Option<ExtraImport>,
    },
    /// `recv.p` → `recv.to`.
    Rename { to: &'static str },
}

/// String substitution for a type identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeRule {
    pub to: &'static str,
    pub import: Option<ExtraImport>,
}

/// All rules of one logical module.
#[derive(Clone, Copy, Debug)]
pub struct ModuleRules {
    pub module: &'static str,
    pub calls: &'static [(&'static str, CallRule)],
    pub properties: &'static [(&'static str, PropertyRule)],
    pub type_names: &'static [(&'static str, TypeRule)],
    /// Constructors whose `new` keyword is elided in the target.
    pub elide_new: &'static [&'static str],
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub modules: Vec<ModuleRules>,
}

const LIB_CALLS: &[(&str, CallRule)] = &[
    // List-like
    ("Array.push", CallRule::RenameMethod { to: "add" }),
    ("Array.pop", CallRule::RenameMethod { to: "removeLast" }),
    (
        "Array.unshift",
        CallRule::MethodPrefixArgs {
            to: "insert",
            prefix: &["0"],
        },
    ),
    (
        "Array.shift",
        CallRule::MethodPrefixArgs {
            to: "removeAt",
            prefix: &["0"],
        },
    ),
    ("Array.concat", CallRule::ListConcat),
    ("Array.indexOf", CallRule::RenameMethod { to: "indexOf" }),
    ("Array.forEach", CallRule::RenameMethod { to: "forEach" }),
    ("Array.map", CallRule::RenameMethod { to: "map" }),
    ("Array.filter", CallRule::RenameMethod { to: "where" }),
    ("Array.some", CallRule::RenameMethod { to: "any" }),
    ("Array.every", CallRule::RenameMethod { to: "every" }),
    ("Array.join", CallRule::RenameMethod { to: "join" }),
    ("Array.slice", CallRule::RenameMethod { to: "sublist" }),
    // String
    (
        "String.charCodeAt",
        CallRule::RenameMethod { to: "codeUnitAt" },
    ),
    (
        "String.substring",
        CallRule::RenameMethod { to: "substring" },
    ),
    (
        "String.toUpperCase",
        CallRule::RenameMethod { to: "toUpperCase" },
    ),
    (
        "String.toLowerCase",
        CallRule::RenameMethod { to: "toLowerCase" },
    ),
    // Map-like
    (
        "Object.hasOwnProperty",
        CallRule::RenameMethod { to: "containsKey" },
    ),
    // Console
    (
        "Console.log",
        CallRule::FreeFunction {
            to: "print",
            import: None,
        },
    ),
    (
        "Console.error",
        CallRule::FreeFunction {
            to: "print",
            import: None,
        },
    ),
    // JSON
    (
        "JSON.stringify",
        CallRule::FreeFunction {
            to: "jsonEncode",
            import: ExtraImport::plain("dart:convert"),
        },
    ),
    (
        "JSON.parse",
        CallRule::FreeFunction {
            to: "jsonDecode",
            import: ExtraImport::plain("dart:convert"),
        },
    ),
    // Math
    ("Math.floor", CallRule::ArgMethod { to: "floor" }),
    ("Math.ceil", CallRule::ArgMethod { to: "ceil" }),
    ("Math.abs", CallRule::ArgMethod { to: "abs" }),
    (
        "Math.max",
        CallRule::FreeFunction {
            to: "math.max",
            import: ExtraImport::aliased("dart:math", "math"),
        },
    ),
    (
        "Math.min",
        CallRule::FreeFunction {
            to: "math.min",
            import: ExtraImport::aliased("dart:math", "math"),
        },
    ),
];

const LIB_PROPERTIES: &[(&str, PropertyRule)] = &[
    (
        "Math.PI",
        PropertyRule::Replace {
            to: "math.pi",
            import: ExtraImport::aliased("dart:math", "math"),
        },
    ),
    (
        "Math.E",
        PropertyRule::Replace {
            to: "math.e",
            import: ExtraImport::aliased("dart:math", "math"),
        },
    ),
    (
        "Number.MAX_VALUE",
        PropertyRule::Replace {
            to: "double.maxFinite",
            import: None,
        },
    ),
    (
        "Number.MIN_VALUE",
        PropertyRule::Replace {
            to: "double.minPositive",
            import: None,
        },
    ),
    (
        "Number.NaN",
        PropertyRule::Replace {
            to: "double.nan",
            import: None,
        },
    ),
];

const LIB_TYPES: &[(&str, TypeRule)] = &[
    (
        "Array",
        TypeRule {
            to: "List",
            import: None,
        },
    ),
    (
        "Promise",
        TypeRule {
            to: "Future",
            import: ExtraImport::plain("dart:async"),
        },
    ),
    (
        "Date",
        TypeRule {
            to: "DateTime",
            import: None,
        },
    ),
    (
        "Number",
        TypeRule {
            to: "num",
            import: None,
        },
    ),
    (
        "Boolean",
        TypeRule {
            to: "bool",
            import: None,
        },
    ),
    (
        "String",
        TypeRule {
            to: "String",
            import: None,
        },
    ),
    (
        "RegExp",
        TypeRule {
            to: "RegExp",
            import: None,
        },
    ),
    (
        "Map",
        TypeRule {
            to: "Map",
            import: None,
        },
    ),
];

const LIB_ELIDE_NEW: &[&str] = &["Array", "Map"];

const HELPERS_CALLS: &[(&str, CallRule)] = &[
    ("CONST_EXPR", CallRule::UnwrapConst),
    ("forwardRef", CallRule::InlineThunk),
    ("provide", CallRule::Provider),
];

const HELPERS_TYPES: &[(&str, TypeRule)] = &[(
    "StringMap",
    TypeRule {
        to: "Map",
        import: None,
    },
)];

/// The built-in catalogue covering the source standard library and the
/// translation support module.
#[must_use]
pub fn default_catalog() -> &'static Catalog {
    static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog {
        modules: vec![
            ModuleRules {
                module: LIB_MODULE,
                calls: LIB_CALLS,
                properties: LIB_PROPERTIES,
                type_names: LIB_TYPES,
                elide_new: LIB_ELIDE_NEW,
            },
            ModuleRules {
                module: HELPERS_MODULE,
                calls: HELPERS_CALLS,
                properties: &[],
                type_names: HELPERS_TYPES,
                elide_new: &[],
            },
        ],
    });
    &CATALOG
}

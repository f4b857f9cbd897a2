//! Shared support for the emitter integration tests: a small tree builder,
//! a catalogue-resolved engine, and a whitespace-insensitive comparator
//! (the destination formatter owns final whitespace, so tests compare token
//! streams, not exact spacing).

#![allow(dead_code)]

use rustc_hash::FxHashMap;
use tsdart_ast::{
    Ast, FunctionData, Modifiers, NodeData, NodeId, ParamData, Program, SourceModule, Symbol,
    SymbolFlags, SymbolId, SymbolTable, VarKeyword,
};
use tsdart_common::{Diagnostic, FatalError};
use tsdart_emitter::facade::default_catalog;
use tsdart_emitter::{translate_module, FacadeEngine, TranspileOptions};

/// File identity the reserved `lib` module resolves to in tests.
pub const LIB_FILE: &str = "lib.d";
/// File identity of the translation support module in tests.
pub const HELPERS_FILE: &str = "helpers";

pub struct Builder {
    pub ast: Ast,
    pub symbols: SymbolTable,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            ast: Ast::new(),
            symbols: SymbolTable::new(),
        }
    }

    // ==================== symbols ====================

    pub fn lib_symbol(&mut self, qualified: &str) -> SymbolId {
        self.symbols.add(Symbol {
            file: LIB_FILE.to_string(),
            qualified_name: qualified.to_string(),
            flags: SymbolFlags::empty(),
            alias_of: None,
        })
    }

    pub fn helpers_symbol(&mut self, qualified: &str) -> SymbolId {
        self.symbols.add(Symbol {
            file: HELPERS_FILE.to_string(),
            qualified_name: qualified.to_string(),
            flags: SymbolFlags::empty(),
            alias_of: None,
        })
    }

    pub fn user_symbol(&mut self, file: &str, qualified: &str) -> SymbolId {
        self.symbols.add(Symbol {
            file: file.to_string(),
            qualified_name: qualified.to_string(),
            flags: SymbolFlags::empty(),
            alias_of: None,
        })
    }

    pub fn alias_of(&mut self, target: SymbolId, local: &str) -> SymbolId {
        self.symbols.add(Symbol {
            file: "test".to_string(),
            qualified_name: local.to_string(),
            flags: SymbolFlags::ALIAS,
            alias_of: Some(target),
        })
    }

    // ==================== leaves ====================

    pub fn ident(&mut self, text: &str) -> NodeId {
        self.ast.add(NodeData::Identifier {
            text: text.to_string(),
        })
    }

    pub fn ident_sym(&mut self, text: &str, symbol: SymbolId) -> NodeId {
        let id = self.ident(text);
        self.ast.set_symbol(id, symbol);
        id
    }

    pub fn num(&mut self, text: &str) -> NodeId {
        self.ast.add(NodeData::NumericLiteral {
            text: text.to_string(),
        })
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.ast.add(NodeData::StringLiteral {
            value: value.to_string(),
        })
    }

    // ==================== expressions ====================

    pub fn prop(&mut self, object: NodeId, name: &str) -> NodeId {
        self.ast.add(NodeData::PropertyAccess {
            object,
            name: name.to_string(),
        })
    }

    pub fn prop_sym(&mut self, object: NodeId, name: &str, symbol: SymbolId) -> NodeId {
        let id = self.prop(object, name);
        self.ast.set_symbol(id, symbol);
        id
    }

    pub fn call(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.ast.add(NodeData::Call {
            callee,
            type_args: vec![],
            args,
        })
    }

    pub fn new_expr(&mut self, callee: NodeId, args: Vec<NodeId>) -> NodeId {
        self.ast.add(NodeData::New {
            callee,
            type_args: vec![],
            args,
        })
    }

    // ==================== statements ====================

    pub fn expr_stmt(&mut self, expr: NodeId) -> NodeId {
        self.ast.add(NodeData::ExpressionStmt { expr })
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.ast.add(NodeData::Block { statements })
    }

    pub fn ret(&mut self, expr: Option<NodeId>) -> NodeId {
        self.ast.add(NodeData::ReturnStmt { expr })
    }

    /// `var <name> [: ty] [= init];` as a statement.
    pub fn var_stmt(
        &mut self,
        keyword: VarKeyword,
        name: &str,
        ty: Option<NodeId>,
        init: Option<NodeId>,
    ) -> NodeId {
        let decl = self.ast.add(NodeData::VarDecl {
            name: name.to_string(),
            ty,
            initializer: init,
        });
        let list = self.ast.add(NodeData::VarList {
            keyword,
            declarations: vec![decl],
        });
        self.ast.add(NodeData::VariableStatement {
            list,
            modifiers: Modifiers::empty(),
        })
    }

    // ==================== declarations ====================

    pub fn param(&mut self, name: &str, ty: Option<NodeId>, init: Option<NodeId>) -> NodeId {
        let name = self.ident(name);
        self.ast.add(NodeData::Param(ParamData {
            name,
            ty,
            initializer: init,
            optional: false,
            rest: false,
            visibility: None,
        }))
    }

    pub fn function(&mut self, name: &str, params: Vec<NodeId>, body: NodeId) -> NodeId {
        self.ast.add(NodeData::FunctionDecl(FunctionData {
            name: Some(name.to_string()),
            type_params: vec![],
            params,
            return_type: None,
            body: Some(body),
            modifiers: Modifiers::empty(),
            decorators: vec![],
        }))
    }

    // ==================== finish ====================

    pub fn module(self, statements: Vec<NodeId>) -> SourceModule {
        self.module_with_source(statements, "")
    }

    pub fn module_with_source(mut self, statements: Vec<NodeId>, source: &str) -> SourceModule {
        let root = self.ast.add(NodeData::SourceFile { statements });
        let mut module = SourceModule {
            path: "test.ts".to_string(),
            source: source.to_string(),
            root,
            ast: self.ast,
            symbols: self.symbols,
            diagnostics: Vec::new(),
        };
        module.connect();
        module
    }
}

/// A program whose module resolver knows the test identities of the
/// reserved builtin module and the support module.
pub fn test_program() -> Program {
    let mut module_map = FxHashMap::default();
    module_map.insert("lib".to_string(), LIB_FILE.to_string());
    module_map.insert("tsdart/helpers".to_string(), HELPERS_FILE.to_string());
    Program {
        modules: vec![],
        module_map,
    }
}

pub fn engine() -> FacadeEngine {
    FacadeEngine::resolve(default_catalog(), &test_program())
}

pub fn translate_with(
    module: &SourceModule,
    options: TranspileOptions,
) -> Result<String, FatalError> {
    let facade = engine();
    translate_module(module, &facade, &options).map(|out| out.code)
}

/// Translate with default options, panicking on diagnostics.
pub fn translate(module: &SourceModule) -> String {
    match translate_with(module, TranspileOptions::default()) {
        Ok(code) => code,
        Err(err) => panic!("translation failed: {err}"),
    }
}

/// Translate expecting failure; returns the sorted diagnostics.
pub fn translate_err(module: &SourceModule) -> Vec<Diagnostic> {
    match translate_with(module, TranspileOptions::default()) {
        Ok(code) => panic!("expected diagnostics, got output: {code}"),
        Err(FatalError::Aggregate(diags)) => diags,
        Err(FatalError::Single(diag)) => vec![diag],
    }
}

/// Whitespace-insensitive comparison form: collapses whitespace and keeps a
/// space only between identifier-like characters, so `f ( a : 12 )` and
/// `f(a: 12)` compare equal while `const Foo` and `constFoo` stay distinct.
pub fn norm(text: &str) -> String {
    fn ident_ish(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '\'' | '"')
    }
    let mut out = String::new();
    let mut pending_space = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            if out.chars().last().is_some_and(ident_ish) && ident_ish(ch) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(ch);
    }
    out
}

/// Assert the translated output matches the expected Dart, token-wise.
pub fn assert_dart(module: &SourceModule, expected: &str) {
    let code = translate(module);
    assert_eq!(norm(&code), norm(expected), "full output:\n{code}");
}

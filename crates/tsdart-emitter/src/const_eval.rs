//! Const-propagation oracle.
//!
//! Decides whether an expression or constructor must be treated as a
//! compile-time constant in the target language. The answer is computed by
//! climbing the ancestor chain from the node: a const marker comment, an
//! enclosing `CONST_EXPR(...)` unwrap call, or a parameter default makes the
//! context const; the first declaration boundary ends the climb with "not
//! const". Const classification never crosses a declaration boundary
//! implicitly.

use tsdart_ast::{Ast, NodeData, NodeId, SourceModule, SyntaxKind};

use crate::dispatch::is_const_marker;

/// Name of the designated unwrap-to-constant function.
pub const CONST_EXPR_FN: &str = "CONST_EXPR";

/// Does this node carry the structured const marker comment?
#[must_use]
pub(crate) fn has_const_marker(ast: &Ast, id: NodeId) -> bool {
    ast.get(id)
        .leading_comments
        .iter()
        .any(|c| is_const_marker(&c.text))
}

/// Is this node a call to the unwrap-to-constant function? Matched through
/// the callee's resolved symbol when one exists (so import aliases behave
/// identically), by spelled name otherwise.
#[must_use]
pub(crate) fn is_unwrap_const_call(module: &SourceModule, id: NodeId) -> bool {
    let ast = &module.ast;
    let NodeData::Call { callee, .. } = ast.data(id) else {
        return false;
    };
    if let Some(sym) = module.symbol_of(*callee) {
        let (_, qualified) = module.symbols.identity(sym);
        return qualified == CONST_EXPR_FN;
    }
    matches!(ast.data(*callee), NodeData::Identifier { text } if text == CONST_EXPR_FN)
}

fn is_declaration_boundary(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Class
            | SyntaxKind::Interface
            | SyntaxKind::FunctionDecl
            | SyntaxKind::FunctionExpr
            | SyntaxKind::ArrowFunction
            | SyntaxKind::Method
            | SyntaxKind::Constructor
            | SyntaxKind::GetAccessor
            | SyntaxKind::SetAccessor
            | SyntaxKind::VarDecl
    )
}

/// Must the expression at `start` be emitted as a compile-time constant?
#[must_use]
pub fn is_const_context(module: &SourceModule, start: NodeId) -> bool {
    let ast = &module.ast;
    let mut prev: Option<NodeId> = None;
    let mut cursor = Some(start);
    while let Some(id) = cursor {
        if has_const_marker(ast, id) || is_unwrap_const_call(module, id) {
            return true;
        }
        // Parameter defaults are always const in the target language.
        if let NodeData::Param(param) = ast.data(id)
            && param.initializer.is_some()
            && param.initializer == prev
        {
            return true;
        }
        if is_declaration_boundary(ast.kind(id)) {
            // The marker may sit on the declaration statement above a
            // declarator rather than on the declarator itself.
            if ast.kind(id) == SyntaxKind::VarDecl {
                return declaration_statement_marked(ast, id);
            }
            return false;
        }
        prev = Some(id);
        cursor = ast.parent(id);
    }
    false
}

fn declaration_statement_marked(ast: &Ast, var_decl: NodeId) -> bool {
    let mut cursor = ast.parent(var_decl);
    while let Some(id) = cursor {
        if has_const_marker(ast, id) {
            return true;
        }
        if !matches!(
            ast.kind(id),
            SyntaxKind::VarList | SyntaxKind::VariableStatement
        ) {
            return false;
        }
        cursor = ast.parent(id);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdart_ast::{SymbolTable, VarKeyword};

    fn module_with(build: impl FnOnce(&mut Ast) -> NodeId) -> (SourceModule, NodeId) {
        let mut ast = Ast::new();
        let probe = build(&mut ast);
        let root = {
            // Wrap whatever the builder produced so parent links exist.
            let top = ast.parent(probe).unwrap_or(probe);
            let mut t = top;
            while let Some(p) = ast.parent(t) {
                t = p;
            }
            t
        };
        let mut module = SourceModule {
            path: "test.ts".to_string(),
            source: String::new(),
            root,
            ast,
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
        };
        module.connect();
        (module, probe)
    }

    #[test]
    fn marker_on_statement_reaches_initializer() {
        let (module, probe) = module_with(|ast| {
            let lit = ast.add(NodeData::NumericLiteral {
                text: "1".to_string(),
            });
            let decl = ast.add(NodeData::VarDecl {
                name: "x".to_string(),
                ty: None,
                initializer: Some(lit),
            });
            let list = ast.add(NodeData::VarList {
                keyword: VarKeyword::Var,
                declarations: vec![decl],
            });
            let stmt = ast.add(NodeData::VariableStatement {
                list,
                modifiers: Default::default(),
            });
            ast.add_leading_comment(stmt, 0, "/* @const */");
            let root = ast.add(NodeData::SourceFile {
                statements: vec![stmt],
            });
            ast.set_parents(root);
            lit
        });
        assert!(is_const_context(&module, probe));
    }

    #[test]
    fn classification_stops_at_function_boundary() {
        // A const marker outside a nested function must not leak inside it.
        let (module, probe) = module_with(|ast| {
            let lit = ast.add(NodeData::NumericLiteral {
                text: "2".to_string(),
            });
            let ret = ast.add(NodeData::ReturnStmt { expr: Some(lit) });
            let body = ast.add(NodeData::Block {
                statements: vec![ret],
            });
            let func = ast.add(NodeData::FunctionExpr(tsdart_ast::FunctionData {
                name: None,
                type_params: vec![],
                params: vec![],
                return_type: None,
                body: Some(body),
                modifiers: Default::default(),
                decorators: vec![],
            }));
            let decl = ast.add(NodeData::VarDecl {
                name: "f".to_string(),
                ty: None,
                initializer: Some(func),
            });
            let list = ast.add(NodeData::VarList {
                keyword: VarKeyword::Var,
                declarations: vec![decl],
            });
            let stmt = ast.add(NodeData::VariableStatement {
                list,
                modifiers: Default::default(),
            });
            ast.add_leading_comment(stmt, 0, "/* @const */");
            let root = ast.add(NodeData::SourceFile {
                statements: vec![stmt],
            });
            ast.set_parents(root);
            lit
        });
        assert!(!is_const_context(&module, probe));
    }

    #[test]
    fn parameter_defaults_are_const() {
        let (module, probe) = module_with(|ast| {
            let dflt = ast.add(NodeData::NumericLiteral {
                text: "42".to_string(),
            });
            let name = ast.add(NodeData::Identifier {
                text: "a".to_string(),
            });
            let param = ast.add(NodeData::Param(tsdart_ast::ParamData {
                name,
                ty: None,
                initializer: Some(dflt),
                optional: false,
                rest: false,
                visibility: None,
            }));
            let root = ast.add(NodeData::FunctionDecl(tsdart_ast::FunctionData {
                name: Some("f".to_string()),
                type_params: vec![],
                params: vec![param],
                return_type: None,
                body: None,
                modifiers: Default::default(),
                decorators: vec![],
            }));
            ast.set_parents(root);
            dflt
        });
        assert!(is_const_context(&module, probe));
    }

    #[test]
    fn unwrap_call_makes_argument_const() {
        let (module, probe) = module_with(|ast| {
            let arg = ast.add(NodeData::ArrayLiteral { elements: vec![] });
            let callee = ast.add(NodeData::Identifier {
                text: CONST_EXPR_FN.to_string(),
            });
            let call = ast.add(NodeData::Call {
                callee,
                type_args: vec![],
                args: vec![arg],
            });
            let root = ast.add(NodeData::ExpressionStmt { expr: call });
            ast.set_parents(root);
            arg
        });
        assert!(is_const_context(&module, probe));
    }
}

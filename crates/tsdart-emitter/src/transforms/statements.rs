//! Statements: control flow, loops, exceptions.

use tsdart_ast::{NodeData, NodeId, SyntaxKind};
use tsdart_common::FatalError;

use crate::session::Transpiler;

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::Block { statements } => {
            let statements = statements.clone();
            t.sink.emit("{");
            t.sink.newline();
            for stmt in statements {
                t.visit(stmt)?;
            }
            t.sink.emit("}");
            t.sink.newline();
            Ok(true)
        }
        NodeData::ExpressionStmt { expr } => {
            let expr = *expr;
            t.visit(expr)?;
            t.sink.emit_no_space(";");
            t.sink.newline();
            Ok(true)
        }
        NodeData::IfStmt { cond, then, else_ } => {
            let (cond, then, else_) = (*cond, *then, *else_);
            t.sink.emit("if");
            t.sink.emit("(");
            t.visit(cond)?;
            t.sink.emit_no_space(")");
            t.visit(then)?;
            if let Some(else_) = else_ {
                t.sink.emit("else");
                t.visit(else_)?;
            }
            Ok(true)
        }
        NodeData::ForStmt {
            init,
            cond,
            update,
            body,
        } => {
            let (init, cond, update, body) = (*init, *cond, *update, *body);
            t.sink.emit("for");
            t.sink.emit("(");
            if let Some(init) = init {
                t.visit(init)?;
            }
            t.sink.emit_no_space(";");
            if let Some(cond) = cond {
                t.visit(cond)?;
            }
            t.sink.emit_no_space(";");
            if let Some(update) = update {
                t.visit(update)?;
            }
            t.sink.emit_no_space(")");
            t.visit(body)?;
            Ok(true)
        }
        // The target's for-in iterates ordered elements; equivalent to the
        // source's for-of for list-like iterables, a known approximation
        // for anything more exotic.
        NodeData::ForOfStmt {
            initializer,
            expr,
            body,
        } => {
            let (initializer, expr, body) = (*initializer, *expr, *body);
            t.sink.emit("for");
            t.sink.emit("(");
            t.visit(initializer)?;
            t.sink.emit("in");
            t.visit(expr)?;
            t.sink.emit_no_space(")");
            t.visit(body)?;
            Ok(true)
        }
        NodeData::ForInStmt { .. } => {
            t.error(id, "for-in loops over object keys are not supported")?;
            Ok(true)
        }
        NodeData::WhileStmt { cond, body } => {
            let (cond, body) = (*cond, *body);
            t.sink.emit("while");
            t.sink.emit("(");
            t.visit(cond)?;
            t.sink.emit_no_space(")");
            t.visit(body)?;
            Ok(true)
        }
        NodeData::DoStmt { body, cond } => {
            let (body, cond) = (*body, *cond);
            t.sink.emit("do");
            t.visit(body)?;
            t.sink.emit("while");
            t.sink.emit("(");
            t.visit(cond)?;
            t.sink.emit_no_space(");");
            t.sink.newline();
            Ok(true)
        }
        NodeData::ReturnStmt { expr } => {
            let expr = *expr;
            t.sink.emit("return");
            if let Some(expr) = expr {
                t.visit(expr)?;
            }
            t.sink.emit_no_space(";");
            t.sink.newline();
            Ok(true)
        }
        NodeData::BreakStmt { label } | NodeData::ContinueStmt { label } => {
            let keyword = if module.ast.kind(id) == SyntaxKind::BreakStmt {
                "break"
            } else {
                "continue"
            };
            let label = label.clone();
            t.sink.emit(keyword);
            if let Some(label) = label {
                t.sink.emit(&label);
            }
            t.sink.emit_no_space(";");
            t.sink.newline();
            Ok(true)
        }
        NodeData::ThrowStmt { expr } => {
            let expr = *expr;
            t.sink.emit("throw");
            t.visit(expr)?;
            t.sink.emit_no_space(";");
            t.sink.newline();
            Ok(true)
        }
        NodeData::TryStmt {
            block,
            catch,
            finally,
        } => {
            let (block, catch, finally) = (*block, *catch, *finally);
            t.sink.emit("try");
            t.visit(block)?;
            if let Some(catch) = catch {
                t.visit(catch)?;
            }
            if let Some(finally) = finally {
                t.sink.emit("finally");
                t.visit(finally)?;
            }
            Ok(true)
        }
        NodeData::CatchClause { .. } => {
            t.emit_catch_clause(id)?;
            Ok(true)
        }
        NodeData::SwitchStmt { expr, cases } => {
            let (expr, cases) = (*expr, cases.clone());
            t.sink.emit("switch");
            t.sink.emit("(");
            t.visit(expr)?;
            t.sink.emit_no_space(")");
            t.sink.emit("{");
            t.sink.newline();
            for case in cases {
                t.visit(case)?;
            }
            t.sink.emit("}");
            t.sink.newline();
            Ok(true)
        }
        NodeData::CaseClause { expr, statements } => {
            let (expr, statements) = (*expr, statements.clone());
            match expr {
                Some(expr) => {
                    t.sink.emit("case");
                    t.visit(expr)?;
                }
                None => t.sink.emit("default"),
            }
            t.sink.emit_no_space(":");
            t.sink.newline();
            for stmt in statements {
                t.visit(stmt)?;
            }
            Ok(true)
        }
        NodeData::LabeledStmt { label, stmt } => {
            let (label, stmt) = (label.clone(), *stmt);
            t.sink.emit(&label);
            t.sink.emit_no_space(":");
            t.visit(stmt)?;
            Ok(true)
        }
        NodeData::EmptyStmt => {
            t.sink.emit(";");
            t.sink.newline();
            Ok(true)
        }
        _ => Ok(false),
    }
}

impl Transpiler<'_> {
    /// Catch clauses bind a companion stack variable when the block reads
    /// the caught exception's stack property; a body that only re-throws
    /// the caught binding collapses to `rethrow`.
    fn emit_catch_clause(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::CatchClause { binding, block } = module.ast.data(id) else {
            return Ok(());
        };
        let (binding, block) = (binding.clone(), *block);
        let Some(binding) = binding else {
            self.sink.emit("catch");
            self.sink.emit("(_)");
            return self.visit(block);
        };

        if self.is_bare_rethrow(&binding, block) {
            self.sink.emit("catch");
            self.sink.emit_no_space("(");
            self.sink.emit_no_space(&binding);
            self.sink.emit_no_space(")");
            self.sink.emit("{");
            self.sink.emit("rethrow;");
            self.sink.emit("}");
            self.sink.newline();
            return Ok(());
        }

        let uses_stack = self.block_reads_stack(&binding, block);
        self.sink.emit("catch");
        self.sink.emit_no_space("(");
        self.sink.emit_no_space(&binding);
        if uses_stack {
            let stack = format!("{binding}_stack");
            self.sink.emit_no_space(",");
            self.sink.emit(&stack);
            self.sink.emit_no_space(")");
            self.catch_substitutions.push((binding, stack));
            let result = self.visit(block);
            self.catch_substitutions.pop();
            return result;
        }
        self.sink.emit_no_space(")");
        self.visit(block)
    }

    /// Does the block read `<binding>.stack` anywhere?
    fn block_reads_stack(&self, binding: &str, block: NodeId) -> bool {
        let ast = &self.module.ast;
        ast.subtree_contains(block, |id| {
            matches!(ast.data(id), NodeData::PropertyAccess { object, name }
                if name == "stack"
                    && matches!(ast.data(*object), NodeData::Identifier { text } if text == binding))
        })
    }

    /// Is the block exactly `throw <binding>;`?
    fn is_bare_rethrow(&self, binding: &str, block: NodeId) -> bool {
        let ast = &self.module.ast;
        let NodeData::Block { statements } = ast.data(block) else {
            return false;
        };
        let [only] = statements.as_slice() else {
            return false;
        };
        matches!(ast.data(*only), NodeData::ThrowStmt { expr }
            if matches!(ast.data(*expr), NodeData::Identifier { text } if text == binding))
    }
}

//! Expressions: operators, accesses, conditionals, assertions.

use tsdart_ast::{BinaryOp, NodeData, NodeId, SyntaxKind, UnaryOp};
use tsdart_common::FatalError;

use crate::session::Transpiler;

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::Identifier { text } => {
            let text = text.clone();
            t.sink.emit(&text);
            Ok(true)
        }
        NodeData::PropertyAccess { .. } => {
            t.emit_property_access(id)?;
            Ok(true)
        }
        NodeData::ElementAccess { object, index } => {
            let (object, index) = (*object, *index);
            t.visit(object)?;
            t.sink.emit_no_space("[");
            t.visit(index)?;
            t.sink.emit_no_space("]");
            Ok(true)
        }
        NodeData::Binary { .. } => {
            t.emit_binary(id)?;
            Ok(true)
        }
        NodeData::PrefixUnary { op, operand } => {
            let (op, operand) = (*op, *operand);
            match op {
                UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete => {
                    t.error(id, format!("the '{}' operator is not supported", op.text()))?;
                }
                _ => {
                    t.sink.emit(op.text());
                    t.visit(operand)?;
                }
            }
            Ok(true)
        }
        NodeData::PostfixUnary { op, operand } => {
            let (op, operand) = (*op, *operand);
            t.visit(operand)?;
            t.sink.emit_no_space(op.text());
            Ok(true)
        }
        NodeData::Conditional {
            cond,
            when_true,
            when_false,
        } => {
            let (cond, when_true, when_false) = (*cond, *when_true, *when_false);
            t.visit(cond)?;
            t.sink.emit("?");
            t.visit(when_true)?;
            t.sink.emit(":");
            t.visit(when_false)?;
            Ok(true)
        }
        NodeData::Paren { expr } => {
            let expr = *expr;
            t.sink.emit("(");
            t.visit(expr)?;
            t.sink.emit_no_space(")");
            Ok(true)
        }
        NodeData::TypeAssertion { .. } => {
            t.emit_type_assertion(id)?;
            Ok(true)
        }
        NodeData::This => {
            t.sink.emit("this");
            Ok(true)
        }
        NodeData::Super => {
            t.sink.emit("super");
            Ok(true)
        }
        NodeData::SpreadElement { .. } => {
            t.error(id, "spread elements are not supported")?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

impl Transpiler<'_> {
    fn emit_property_access(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::PropertyAccess { object, name } = module.ast.data(id) else {
            return Ok(());
        };
        let (object, name) = (*object, name.clone());

        // A read of the designated stack property on a caught binding uses
        // the companion binding the catch clause introduced.
        if name == "stack"
            && let NodeData::Identifier { text } = module.ast.data(object)
            && let Some(stack) = self.stack_binding(text).map(str::to_string)
        {
            self.sink.emit(&stack);
            return Ok(());
        }

        if self.try_rewrite_property(id)? {
            return Ok(());
        }

        self.visit(object)?;
        self.sink.emit_no_space(".");
        self.sink.emit_no_space(&name);
        Ok(())
    }

    fn emit_binary(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Binary { op, left, right } = module.ast.data(id) else {
            return Ok(());
        };
        let (op, left, right) = (*op, *left, *right);
        match op {
            BinaryOp::EqEqEq | BinaryOp::NotEqEq => {
                if op == BinaryOp::NotEqEq {
                    self.sink.emit("!");
                    self.sink.emit_no_space("identical");
                } else {
                    self.sink.emit("identical");
                }
                self.sink.emit_no_space("(");
                self.visit(left)?;
                self.sink.emit_no_space(",");
                self.visit(right)?;
                self.sink.emit_no_space(")");
            }
            BinaryOp::InstanceOf => {
                self.visit(left)?;
                self.sink.emit("is");
                self.visit(right)?;
            }
            BinaryOp::In => {
                self.error(id, "the 'in' operator is not supported")?;
            }
            BinaryOp::Comma => {
                self.error(id, "comma expressions are not supported")?;
            }
            _ => {
                self.visit(left)?;
                self.sink.emit(op.text());
                self.visit(right)?;
            }
        }
        Ok(())
    }

    /// Assertions over array/object literals only reify the literal's
    /// element or key types (the literals module reads them back off the
    /// enclosing assertion); anything else becomes a Dart cast.
    fn emit_type_assertion(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::TypeAssertion { ty, expr } = module.ast.data(id) else {
            return Ok(());
        };
        let (ty, expr) = (*ty, *expr);
        match module.ast.kind(expr) {
            SyntaxKind::ArrayLiteral | SyntaxKind::ObjectLiteral => self.visit(expr),
            _ => {
                self.sink.emit("(");
                self.visit(expr)?;
                self.sink.emit("as");
                self.visit(ty)?;
                self.sink.emit_no_space(")");
                Ok(())
            }
        }
    }
}

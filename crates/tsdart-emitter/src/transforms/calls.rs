//! Calls and constructors.
//!
//! Claims call and `new` expressions plus constructor bodies. Runs first in
//! the chain so constructor-body blocks are intercepted before the
//! statements module would emit them as plain blocks.

use tsdart_ast::{NodeData, NodeId, PropertyKey, SyntaxKind};
use tsdart_common::FatalError;

use crate::const_eval::is_const_context;
use crate::session::Transpiler;

/// Comment left in a constructor body where the superclass call used to be.
pub const SUPER_MOVED_MARKER: &str = "/* super call moved to initializer */";

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let ast = &t.module.ast;
    match ast.kind(id) {
        SyntaxKind::Call => {
            t.emit_call(id)?;
            Ok(true)
        }
        SyntaxKind::New => {
            t.emit_new(id)?;
            Ok(true)
        }
        SyntaxKind::Block
            if ast
                .parent(id)
                .is_some_and(|p| ast.kind(p) == SyntaxKind::Constructor) =>
        {
            t.emit_constructor_body(id)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

impl Transpiler<'_> {
    fn emit_call(&mut self, id: NodeId) -> Result<(), FatalError> {
        if self.try_rewrite_call(id)? {
            return Ok(());
        }
        let module = self.module;
        let NodeData::Call { callee, args, .. } = module.ast.data(id) else {
            return Ok(());
        };
        let (callee, args) = (*callee, args.clone());
        self.visit(callee)?;
        self.emit_call_args(&args)
    }

    fn emit_new(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::New {
            callee,
            type_args,
            args,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (callee, type_args, args) = (*callee, type_args.clone(), args.clone());

        if is_const_context(module, id) {
            self.sink.emit("const");
        } else if self.should_emit_new(callee) {
            self.sink.emit("new");
        }

        // Catalogued constructor names translate like type names
        // (`new Promise(...)` → `new Future(...)`).
        let mut emitted = false;
        if let NodeData::Identifier { text } = module.ast.data(callee) {
            let text = text.clone();
            if let Some(rule) = self.rewrite_type_name(callee, &text)? {
                self.sink.emit(rule.to);
                emitted = true;
            }
        }
        if !emitted {
            self.visit(callee)?;
        }
        if !type_args.is_empty() {
            self.sink.emit_no_space("<");
            self.visit_list(&type_args)?;
            self.sink.emit_no_space(">");
        }
        self.emit_call_args(&args)
    }

    /// Argument list with the named-parameter rewrite: a final non-empty
    /// object literal of identifier-keyed property assignments loses its
    /// braces. Any other object-literal shape passes through unchanged.
    pub(crate) fn emit_call_args(&mut self, args: &[NodeId]) -> Result<(), FatalError> {
        self.sink.emit_no_space("(");
        if let [leading @ .., last] = args
            && let Some(properties) = self.named_arg_properties(*last)
        {
            self.visit_list(leading)?;
            if !leading.is_empty() {
                self.sink.emit_no_space(",");
            }
            self.emit_object_as_named_args(&properties)?;
        } else {
            self.visit_list(args)?;
        }
        self.sink.emit_no_space(")");
        Ok(())
    }

    /// Properties of `candidate` when it is eligible for the named-argument
    /// rewrite: a non-empty object literal whose every property is an
    /// identifier-keyed assignment.
    fn named_arg_properties(&self, candidate: NodeId) -> Option<Vec<NodeId>> {
        let ast = &self.module.ast;
        let NodeData::ObjectLiteral { properties } = ast.data(candidate) else {
            return None;
        };
        if properties.is_empty() {
            return None;
        }
        let all_identifier_keyed = properties.iter().all(|p| {
            matches!(
                ast.data(*p),
                NodeData::PropertyAssignment {
                    key: PropertyKey::Identifier(_),
                    ..
                }
            )
        });
        all_identifier_keyed.then(|| properties.clone())
    }

    pub(crate) fn emit_object_as_named_args(
        &mut self,
        properties: &[NodeId],
    ) -> Result<(), FatalError> {
        let module = self.module;
        for (i, prop) in properties.iter().enumerate() {
            if i > 0 {
                self.sink.emit_no_space(",");
            }
            if let NodeData::PropertyAssignment {
                key: PropertyKey::Identifier(name),
                value,
            } = module.ast.data(*prop)
            {
                let (name, value) = (name.clone(), *value);
                self.sink.emit(&name);
                self.sink.emit_no_space(":");
                self.visit(value)?;
            }
        }
        Ok(())
    }

    /// Constructor bodies: relocate the superclass call (and, in a const
    /// class, every field assignment) into the initializer-list position.
    fn emit_constructor_body(&mut self, block: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Block { statements } = module.ast.data(block) else {
            return Ok(());
        };
        let statements = statements.clone();
        let class_is_const = module
            .ast
            .parent(block)
            .and_then(|ctor| module.ast.parent(ctor))
            .is_some_and(|class| self.class_is_const(class));

        enum BodyItem {
            Normal(NodeId),
            SuperMarker,
        }

        let mut super_call: Option<NodeId> = None;
        let mut field_inits: Vec<(String, NodeId)> = Vec::new();
        let mut body: Vec<BodyItem> = Vec::new();

        for stmt in &statements {
            if let Some(call) = direct_super_call(module, *stmt) {
                if super_call.is_some() {
                    self.error(*stmt, "only one direct superclass call is allowed per constructor")?;
                    continue;
                }
                super_call = Some(call);
                body.push(BodyItem::SuperMarker);
                continue;
            }
            if class_is_const {
                match field_assignment(module, *stmt) {
                    Some((name, value)) => field_inits.push((name, value)),
                    None => {
                        self.error(
                            *stmt,
                            "a const constructor body may only assign fields of this",
                        )?;
                    }
                }
            } else {
                body.push(BodyItem::Normal(*stmt));
            }
        }

        // A superclass call anywhere but as a direct statement child cannot
        // be relocated into the initializer list.
        for stmt in &statements {
            if direct_super_call(module, *stmt).is_some() {
                continue;
            }
            let ast = &module.ast;
            let nested = ast.subtree_contains(*stmt, |id| {
                matches!(ast.data(id), NodeData::Call { callee, .. }
                    if ast.kind(*callee) == SyntaxKind::Super)
            });
            if nested {
                self.error(
                    *stmt,
                    "the superclass call must be a direct statement of the constructor",
                )?;
            }
        }

        if !field_inits.is_empty() || super_call.is_some() {
            self.sink.emit(":");
            let mut first = true;
            for (name, value) in &field_inits {
                if !first {
                    self.sink.emit_no_space(",");
                }
                first = false;
                self.sink.emit(name);
                self.sink.emit("=");
                self.visit(*value)?;
            }
            if let Some(call) = super_call {
                if !first {
                    self.sink.emit_no_space(",");
                }
                if let NodeData::Call { args, .. } = module.ast.data(call) {
                    let args = args.clone();
                    self.sink.emit("super");
                    self.emit_call_args(&args)?;
                }
            }
        }

        if class_is_const {
            self.sink.emit_no_space(";");
            self.sink.newline();
            return Ok(());
        }

        self.sink.emit("{");
        self.sink.newline();
        for item in body {
            match item {
                BodyItem::SuperMarker => {
                    self.sink.emit(SUPER_MOVED_MARKER);
                    self.sink.emit_no_space(";");
                    self.sink.newline();
                }
                BodyItem::Normal(stmt) => self.visit(stmt)?,
            }
        }
        self.sink.emit("}");
        self.sink.newline();
        Ok(())
    }
}

/// The call node of `super(...)` when `stmt` is exactly that statement.
fn direct_super_call(module: &tsdart_ast::SourceModule, stmt: NodeId) -> Option<NodeId> {
    let ast = &module.ast;
    if let NodeData::ExpressionStmt { expr } = ast.data(stmt)
        && let NodeData::Call { callee, .. } = ast.data(*expr)
        && ast.kind(*callee) == SyntaxKind::Super
    {
        return Some(*expr);
    }
    None
}

/// `this.field = value` as a (field, value) pair.
fn field_assignment(module: &tsdart_ast::SourceModule, stmt: NodeId) -> Option<(String, NodeId)> {
    let ast = &module.ast;
    if let NodeData::ExpressionStmt { expr } = ast.data(stmt)
        && let NodeData::Binary {
            op: tsdart_ast::BinaryOp::Assign,
            left,
            right,
        } = ast.data(*expr)
        && let NodeData::PropertyAccess { object, name } = ast.data(*left)
        && ast.kind(*object) == SyntaxKind::This
    {
        return Some((name.clone(), *right));
    }
    None
}

//! Declarations: variables, classes, interfaces, enums, functions,
//! methods, accessors, and parameters.

use tsdart_ast::{
    Ast, ClassData, FunctionData, Modifiers, NodeData, NodeId, ParamData, PropertyKey,
    SyntaxKind, VarKeyword, Visibility,
};
use tsdart_common::FatalError;

use crate::const_eval::{has_const_marker, is_const_context};
use crate::session::Transpiler;
use crate::transforms::types::type_text;

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::VariableStatement { list, .. } => {
            let list = *list;
            t.visit(list)?;
            t.sink.emit_no_space(";");
            t.sink.newline();
            Ok(true)
        }
        NodeData::VarList { .. } => {
            t.emit_var_list(id)?;
            Ok(true)
        }
        NodeData::VarDecl { .. } => {
            t.emit_var_decl(id)?;
            Ok(true)
        }
        NodeData::FunctionDecl(f) => {
            let f = f.clone();
            t.emit_function(&f, true)?;
            Ok(true)
        }
        NodeData::FunctionExpr(f) | NodeData::ArrowFunction(f) => {
            let f = f.clone();
            t.emit_function_expression(&f)?;
            Ok(true)
        }
        NodeData::Class(c) => {
            let c = c.clone();
            t.emit_class(id, &c, false)?;
            Ok(true)
        }
        NodeData::Interface(c) => {
            let c = c.clone();
            t.emit_class(id, &c, true)?;
            Ok(true)
        }
        NodeData::Enum { .. } => {
            t.emit_enum(id)?;
            Ok(true)
        }
        NodeData::EnumMember { name, .. } => {
            let name = name.clone();
            t.sink.emit(&name);
            Ok(true)
        }
        NodeData::Constructor(f) => {
            let f = f.clone();
            t.emit_constructor(id, &f)?;
            Ok(true)
        }
        NodeData::Method(f) => {
            let f = f.clone();
            t.emit_method(id, &f)?;
            Ok(true)
        }
        NodeData::GetAccessor(f) => {
            let f = f.clone();
            t.emit_accessor(id, &f, true)?;
            Ok(true)
        }
        NodeData::SetAccessor(f) => {
            let f = f.clone();
            t.emit_accessor(id, &f, false)?;
            Ok(true)
        }
        NodeData::PropertyDecl { .. } => {
            t.emit_property_decl(id)?;
            Ok(true)
        }
        NodeData::PropertySignature { .. } => {
            t.emit_property_signature(id)?;
            Ok(true)
        }
        NodeData::MethodSignature { .. } => {
            t.emit_method_signature(id)?;
            Ok(true)
        }
        NodeData::Param(_) => {
            t.emit_parameter(id)?;
            Ok(true)
        }
        NodeData::Decorator { .. } => {
            t.emit_decorator(id)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Does a decorator spell the const marker annotation?
fn decorator_is_const(ast: &Ast, id: NodeId) -> bool {
    let NodeData::Decorator { expr } = ast.data(id) else {
        return false;
    };
    match ast.data(*expr) {
        NodeData::Identifier { text } => text == "CONST",
        NodeData::Call { callee, .. } => {
            matches!(ast.data(*callee), NodeData::Identifier { text } if text == "CONST")
        }
        _ => false,
    }
}

impl Transpiler<'_> {
    /// A class is const when its declarator or an explicit constructor
    /// carries the const marker, as an annotation or structured comment.
    pub(crate) fn class_is_const(&self, class: NodeId) -> bool {
        let ast = &self.module.ast;
        let (NodeData::Class(c) | NodeData::Interface(c)) = ast.data(class) else {
            return false;
        };
        if c.decorators.iter().any(|d| decorator_is_const(ast, *d)) || has_const_marker(ast, class)
        {
            return true;
        }
        c.members.iter().any(|m| {
            ast.kind(*m) == SyntaxKind::Constructor
                && (has_const_marker(ast, *m)
                    || match ast.data(*m) {
                        NodeData::Constructor(f) => {
                            f.decorators.iter().any(|d| decorator_is_const(ast, *d))
                        }
                        _ => false,
                    })
        })
    }

    fn emit_var_list(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::VarList {
            keyword,
            declarations,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (keyword, declarations) = (*keyword, declarations.clone());

        let typed = declarations
            .iter()
            .filter(|d| matches!(module.ast.data(**d), NodeData::VarDecl { ty: Some(_), .. }))
            .count();
        if declarations.len() > 1 && typed > 0 {
            self.error(
                id,
                "variables in a declaration list of more than one variable cannot be typed",
            )?;
        }

        let const_ctx = is_const_context(module, id);
        let mut has_binding_keyword = true;
        if const_ctx {
            self.sink.emit("const");
        } else if keyword == VarKeyword::Const {
            self.sink.emit("final");
        } else {
            has_binding_keyword = false;
        }

        let declared_type = match declarations.as_slice() {
            [only] => match module.ast.data(*only) {
                NodeData::VarDecl { ty, .. } => *ty,
                _ => None,
            },
            _ => None,
        };
        match declared_type {
            Some(ty) => self.visit(ty)?,
            None => {
                if !has_binding_keyword {
                    self.sink.emit("var");
                }
            }
        }
        self.visit_list(&declarations)
    }

    fn emit_var_decl(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::VarDecl {
            name, initializer, ..
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (name, initializer) = (name.clone(), *initializer);
        self.sink.emit(&name);
        if let Some(init) = initializer {
            self.sink.emit("=");
            self.visit(init)?;
        }
        Ok(())
    }

    fn emit_function(&mut self, f: &FunctionData, named: bool) -> Result<(), FatalError> {
        // The scope must cover the return type and parameters alike.
        let generic_comment = self.push_generic_scope(&f.type_params);
        if let Some(ty) = f.return_type {
            self.visit(ty)?;
        }
        if named && let Some(name) = &f.name {
            self.sink.emit(name);
        }
        if let Some(comment) = &generic_comment {
            self.sink.emit_no_space(comment);
        }
        self.emit_parameter_list(&f.params)?;
        match f.body {
            Some(body) => self.visit(body)?,
            None => {
                self.sink.emit_no_space(";");
                self.sink.newline();
            }
        }
        if generic_comment.is_some() {
            self.generic_scopes.pop();
        }
        Ok(())
    }

    /// Anonymous function form: `(params) { ... }` or `(params) => expr`.
    fn emit_function_expression(&mut self, f: &FunctionData) -> Result<(), FatalError> {
        self.emit_parameter_list(&f.params)?;
        let Some(body) = f.body else {
            self.sink.emit_no_space(";");
            return Ok(());
        };
        if self.module.ast.kind(body) == SyntaxKind::Block {
            self.visit(body)
        } else {
            self.sink.emit("=>");
            self.visit(body)
        }
    }

    fn emit_class(&mut self, id: NodeId, c: &ClassData, interface: bool) -> Result<(), FatalError> {
        let module = self.module;
        for dec in &c.decorators {
            if !decorator_is_const(&module.ast, *dec) {
                self.visit(*dec)?;
            }
        }
        if interface || c.modifiers.contains(Modifiers::ABSTRACT) {
            self.sink.emit("abstract");
        }
        self.sink.emit("class");
        self.sink.emit(&c.name);
        self.emit_type_params(&c.type_params)?;

        for clause in &c.heritage {
            let NodeData::HeritageClause { keyword, types } = module.ast.data(*clause) else {
                continue;
            };
            let (keyword, types) = (*keyword, types.clone());
            // Interfaces become abstract classes; their extends clauses can
            // only be satisfied structurally, so they map to implements.
            let dart_keyword = if interface {
                "implements"
            } else {
                match keyword {
                    tsdart_ast::HeritageKind::Extends => "extends",
                    tsdart_ast::HeritageKind::Implements => "implements",
                }
            };
            self.sink.emit(dart_keyword);
            self.visit_list(&types)?;
        }

        self.sink.emit("{");
        self.sink.newline();

        if !interface {
            self.emit_parameter_property_fields(&c.members)?;
        }
        for member in &c.members {
            self.visit(*member)?;
        }
        if !interface && self.class_is_const(id) {
            let has_ctor = c
                .members
                .iter()
                .any(|m| module.ast.kind(*m) == SyntaxKind::Constructor);
            if !has_ctor {
                self.sink.emit("const");
                self.sink.emit(&c.name);
                self.sink.emit_no_space("();");
                self.sink.newline();
            }
        }
        self.sink.emit("}");
        self.sink.newline();
        Ok(())
    }

    /// Fields synthesized from constructor parameters that carry a
    /// visibility marker.
    fn emit_parameter_property_fields(&mut self, members: &[NodeId]) -> Result<(), FatalError> {
        let module = self.module;
        let Some(params) = members.iter().find_map(|m| match module.ast.data(*m) {
            NodeData::Constructor(f) => Some(f.params.clone()),
            _ => None,
        }) else {
            return Ok(());
        };
        for param in params {
            let NodeData::Param(p) = module.ast.data(param) else {
                continue;
            };
            let p = p.clone();
            if p.visibility.is_none() {
                continue;
            }
            match p.ty {
                Some(ty) => self.visit(ty)?,
                None => self.sink.emit("var"),
            }
            self.visit(p.name)?;
            self.sink.emit_no_space(";");
            self.sink.newline();
        }
        Ok(())
    }

    fn emit_enum(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Enum {
            name,
            members,
            is_const,
            ..
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (name, members, is_const) = (name.clone(), members.clone(), *is_const);
        if is_const {
            self.error(id, "const enums are not supported")?;
        }
        if members.is_empty() {
            self.error(id, "empty enums are not supported")?;
        }
        for member in &members {
            if let NodeData::EnumMember {
                initializer: Some(_),
                ..
            } = module.ast.data(*member)
            {
                self.error(*member, "enum member initializers are not supported")?;
            }
        }
        self.sink.emit("enum");
        self.sink.emit(&name);
        self.sink.emit("{");
        self.visit_list(&members)?;
        self.sink.emit("}");
        self.sink.newline();
        Ok(())
    }

    fn emit_constructor(&mut self, id: NodeId, f: &FunctionData) -> Result<(), FatalError> {
        let module = self.module;
        let class = module.ast.parent(id);
        let class_name = class.and_then(|c| match module.ast.data(c) {
            NodeData::Class(data) | NodeData::Interface(data) => Some(data.name.clone()),
            _ => None,
        });
        if class.is_some_and(|c| self.class_is_const(c)) {
            self.sink.emit("const");
        }
        match class_name {
            Some(name) => self.sink.emit(&name),
            None => self.error(id, "constructor outside of a class body")?,
        }
        self.emit_parameter_list(&f.params)?;
        match f.body {
            Some(body) => self.visit(body)?,
            None => {
                self.sink.emit_no_space(";");
                self.sink.newline();
            }
        }
        Ok(())
    }

    fn emit_method(&mut self, id: NodeId, f: &FunctionData) -> Result<(), FatalError> {
        for dec in &f.decorators {
            self.visit(*dec)?;
        }
        self.check_not_protected(id, f.modifiers)?;
        if f.modifiers.contains(Modifiers::STATIC) {
            self.sink.emit("static");
        }
        if let Some(name) = f.name.clone() {
            self.check_name_convention(id, &name, f.modifiers.contains(Modifiers::PRIVATE))?;
        }
        self.emit_function(f, true)
    }

    fn emit_accessor(&mut self, id: NodeId, f: &FunctionData, getter: bool) -> Result<(), FatalError> {
        self.check_not_protected(id, f.modifiers)?;
        if f.modifiers.contains(Modifiers::STATIC) {
            self.sink.emit("static");
        }
        let Some(name) = f.name.clone() else {
            return self.error(id, "accessor without a name");
        };
        self.check_name_convention(id, &name, f.modifiers.contains(Modifiers::PRIVATE))?;
        if getter {
            if let Some(ty) = f.return_type {
                self.visit(ty)?;
            }
            self.sink.emit("get");
            self.sink.emit(&name);
        } else {
            self.sink.emit("set");
            self.sink.emit(&name);
            self.emit_parameter_list(&f.params)?;
        }
        match f.body {
            Some(body) => self.visit(body)?,
            None => {
                self.sink.emit_no_space(";");
                self.sink.newline();
            }
        }
        Ok(())
    }

    fn emit_property_decl(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::PropertyDecl {
            name,
            ty,
            initializer,
            modifiers,
            decorators,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (name, ty, initializer, modifiers, decorators) = (
            name.clone(),
            *ty,
            *initializer,
            *modifiers,
            decorators.clone(),
        );
        for dec in &decorators {
            self.visit(*dec)?;
        }
        self.check_not_protected(id, modifiers)?;
        if modifiers.contains(Modifiers::STATIC) {
            self.sink.emit("static");
        }
        self.check_name_convention(id, &name, modifiers.contains(Modifiers::PRIVATE))?;
        match ty {
            Some(ty) => self.visit(ty)?,
            None => self.sink.emit("var"),
        }
        self.sink.emit(&name);
        if let Some(init) = initializer {
            self.sink.emit("=");
            self.visit(init)?;
        }
        self.sink.emit_no_space(";");
        self.sink.newline();
        Ok(())
    }

    fn emit_property_signature(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::PropertySignature { name, ty, .. } = module.ast.data(id) else {
            return Ok(());
        };
        let (name, ty) = (name.clone(), *ty);
        match ty {
            Some(ty) => self.visit(ty)?,
            None => self.sink.emit("var"),
        }
        self.sink.emit(&name);
        self.sink.emit_no_space(";");
        self.sink.newline();
        Ok(())
    }

    fn emit_method_signature(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::MethodSignature {
            name,
            params,
            return_type,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (name, params, return_type) = (name.clone(), params.clone(), *return_type);
        if let Some(ty) = return_type {
            self.visit(ty)?;
        }
        self.sink.emit(&name);
        self.emit_parameter_list(&params)?;
        self.sink.emit_no_space(";");
        self.sink.newline();
        Ok(())
    }

    fn emit_decorator(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Decorator { expr } = module.ast.data(id) else {
            return Ok(());
        };
        let expr = *expr;
        match module.ast.data(expr) {
            NodeData::Identifier { text } => {
                let text = text.clone();
                self.sink.emit(&format!("@{text}"));
            }
            NodeData::Call { callee, args, .. } => {
                let (callee, args) = (*callee, args.clone());
                match module.ast.data(callee) {
                    NodeData::Identifier { text } => {
                        let text = text.clone();
                        self.sink.emit(&format!("@{text}"));
                    }
                    _ => {
                        self.sink.emit("@");
                        self.visit(callee)?;
                    }
                }
                self.emit_call_args(&args)?;
            }
            _ => {
                self.sink.emit("@");
                self.visit(expr)?;
            }
        }
        self.sink.newline();
        Ok(())
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Emit a parameter list, partitioning it into a required prefix and a
    /// single bracket-delimited optional suffix. The first defaulted or
    /// optional non-destructured parameter opens the bracket group; every
    /// parameter after it stays inside. A destructured-object parameter
    /// becomes the named-parameter group and must come last.
    pub(crate) fn emit_parameter_list(&mut self, params: &[NodeId]) -> Result<(), FatalError> {
        let module = self.module;
        let is_destructured = |id: NodeId| match module.ast.data(id) {
            NodeData::Param(p) => module.ast.kind(p.name) == SyntaxKind::ObjectBindingPattern,
            _ => false,
        };
        let optional_start = params.iter().position(|id| {
            if is_destructured(*id) {
                return false;
            }
            matches!(module.ast.data(*id), NodeData::Param(p) if p.optional || p.initializer.is_some())
        });

        self.sink.emit_no_space("(");
        let mut emitted_any = false;
        let mut in_bracket = false;
        for (i, param) in params.iter().enumerate() {
            if let NodeData::Param(p) = module.ast.data(*param)
                && p.rest
            {
                self.error(*param, "rest parameters are not supported")?;
                continue;
            }
            if emitted_any {
                self.sink.emit_no_space(",");
            }
            if is_destructured(*param) {
                if in_bracket {
                    self.error(
                        *param,
                        "a named-parameter object pattern must be the last parameter",
                    )?;
                    continue;
                }
                if i + 1 != params.len() {
                    self.error(
                        *param,
                        "a named-parameter object pattern must be the last parameter",
                    )?;
                }
                self.emit_named_param_group(*param)?;
                emitted_any = true;
                continue;
            }
            if optional_start == Some(i) {
                self.sink.emit("[");
                in_bracket = true;
            }
            self.visit(*param)?;
            emitted_any = true;
        }
        if in_bracket {
            self.sink.emit_no_space("]");
        }
        self.sink.emit_no_space(")");
        Ok(())
    }

    fn emit_parameter(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Param(p) = module.ast.data(id) else {
            return Ok(());
        };
        let p = p.clone();
        if let Some(visibility) = p.visibility {
            return self.emit_parameter_property(id, &p, visibility);
        }
        if let Some(ty) = p.ty {
            self.visit(ty)?;
        }
        self.visit(p.name)?;
        if let Some(init) = p.initializer {
            self.sink.emit("=");
            self.visit(init)?;
        }
        Ok(())
    }

    /// A visibility-marked constructor parameter becomes the `this.name`
    /// shorthand; the companion field is synthesized on the class.
    fn emit_parameter_property(
        &mut self,
        id: NodeId,
        p: &ParamData,
        visibility: Visibility,
    ) -> Result<(), FatalError> {
        let module = self.module;
        if visibility == Visibility::Protected {
            self.error(id, "protected parameter properties are not supported")?;
        }
        let name = match module.ast.data(p.name) {
            NodeData::Identifier { text } => text.clone(),
            _ => {
                return self.error(id, "parameter property must be a plain identifier");
            }
        };
        self.check_name_convention(id, &name, visibility == Visibility::Private)?;
        self.sink.emit("this");
        self.sink.emit_no_space(".");
        self.sink.emit_no_space(&name);
        if let Some(init) = p.initializer {
            self.sink.emit("=");
            self.visit(init)?;
        }
        Ok(())
    }

    /// Destructured-object parameter → named-parameter block. Field types
    /// come from the inline type literal, defaults from the inner
    /// initializer or the outer default object — never both.
    fn emit_named_param_group(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::Param(p) = module.ast.data(id) else {
            return Ok(());
        };
        let p = p.clone();
        let NodeData::ObjectBindingPattern { elements } = module.ast.data(p.name) else {
            return Ok(());
        };
        let elements = elements.clone();

        let field_type = |field: &str| -> Option<NodeId> {
            let ty = p.ty?;
            let NodeData::TypeLiteral { members } = module.ast.data(ty) else {
                return None;
            };
            members.iter().find_map(|m| match module.ast.data(*m) {
                NodeData::PropertySignature { name, ty, .. } if name == field => *ty,
                _ => None,
            })
        };
        let outer_default = |field: &str| -> Option<NodeId> {
            let init = p.initializer?;
            let NodeData::ObjectLiteral { properties } = module.ast.data(init) else {
                return None;
            };
            properties.iter().find_map(|prop| match module.ast.data(*prop) {
                NodeData::PropertyAssignment {
                    key: PropertyKey::Identifier(k),
                    value,
                } if k == field => Some(*value),
                _ => None,
            })
        };

        self.sink.emit("{");
        for (i, element) in elements.iter().enumerate() {
            if i > 0 {
                self.sink.emit_no_space(",");
            }
            let NodeData::BindingElement { name, initializer } = module.ast.data(*element) else {
                continue;
            };
            let (name, inner) = (name.clone(), *initializer);
            if let Some(ty) = field_type(&name) {
                self.visit(ty)?;
            }
            self.sink.emit(&name);
            let outer = outer_default(&name);
            if inner.is_some() && outer.is_some() {
                self.error(
                    *element,
                    format!("named parameter '{name}' has both an inner and an outer default"),
                )?;
            }
            if let Some(default) = inner.or(outer) {
                self.sink.emit("=");
                self.visit(default)?;
            }
        }
        self.sink.emit("}");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Class-level type parameters: real Dart generics.
    fn emit_type_params(&mut self, type_params: &[NodeId]) -> Result<(), FatalError> {
        if type_params.is_empty() {
            return Ok(());
        }
        let module = self.module;
        self.sink.emit_no_space("<");
        for (i, tp) in type_params.iter().enumerate() {
            if i > 0 {
                self.sink.emit_no_space(",");
            }
            let NodeData::TypeParam { name, constraint } = module.ast.data(*tp) else {
                continue;
            };
            let (name, constraint) = (name.clone(), *constraint);
            self.sink.emit(&name);
            if let Some(constraint) = constraint {
                self.sink.emit("extends");
                self.visit(constraint)?;
            }
        }
        self.sink.emit_no_space(">");
        Ok(())
    }

    /// Generic functions and methods have no first-class target form; their
    /// type-parameter list becomes a structured comment after the name, and
    /// a scope is pushed so references to these parameters take the
    /// comment-hack form. Returns the rendered comment.
    fn push_generic_scope(&mut self, type_params: &[NodeId]) -> Option<String> {
        if type_params.is_empty() {
            return None;
        }
        let module = self.module;
        let mut names = Vec::new();
        let mut rendered = Vec::new();
        for tp in type_params {
            if let NodeData::TypeParam { name, constraint } = module.ast.data(*tp) {
                names.push(name.clone());
                match constraint {
                    Some(c) => {
                        rendered.push(format!("{} extends {}", name, type_text(module, *c)));
                    }
                    None => rendered.push(name.clone()),
                }
            }
        }
        self.generic_scopes.push(names);
        Some(format!("/*<{}>*/", rendered.join(", ")))
    }

    /// The target's access model has no protected tier.
    fn check_not_protected(&mut self, node: NodeId, modifiers: Modifiers) -> Result<(), FatalError> {
        if modifiers.contains(Modifiers::PROTECTED) {
            self.error(node, "protected members are not supported")?;
        }
        Ok(())
    }

    /// Naming-convention check: private declarations start with the marker
    /// character, public ones must not.
    pub(crate) fn check_name_convention(
        &mut self,
        node: NodeId,
        name: &str,
        is_private: bool,
    ) -> Result<(), FatalError> {
        if !self.options.enforce_underscores {
            return Ok(());
        }
        if is_private && !name.starts_with('_') {
            self.error(
                node,
                format!("private declaration '{name}' must be named with a leading underscore"),
            )?;
        } else if !is_private && name.starts_with('_') {
            self.error(
                node,
                format!("public declaration '{name}' must not be named with a leading underscore"),
            )?;
        }
        Ok(())
    }
}

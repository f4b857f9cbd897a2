//! Types: keyword mapping, list/map conversion, dynamic fallbacks.

use tsdart_ast::{NodeData, NodeId, SourceModule, TypeKeyword};
use tsdart_common::FatalError;

use crate::session::Transpiler;

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::KeywordType { keyword } => {
            let text = match keyword {
                TypeKeyword::Number => "num",
                TypeKeyword::String => "String",
                TypeKeyword::Boolean => "bool",
                TypeKeyword::Any => "dynamic",
                TypeKeyword::Void => "void",
            };
            t.sink.emit(text);
            Ok(true)
        }
        NodeData::TypeRef { .. } => {
            t.emit_type_ref(id)?;
            Ok(true)
        }
        NodeData::ArrayType { element } => {
            let element = *element;
            t.sink.emit("List");
            t.sink.emit_no_space("<");
            t.visit(element)?;
            t.sink.emit_no_space(">");
            Ok(true)
        }
        NodeData::TypeLiteral { members } => {
            // A type literal that is exactly one index signature is the
            // source spelling of a map type.
            if let [only] = members.as_slice()
                && let NodeData::IndexSignature {
                    key_type,
                    value_type,
                    ..
                } = module.ast.data(*only)
            {
                let (key, value) = (*key_type, *value_type);
                t.sink.emit("Map");
                t.sink.emit_no_space("<");
                t.visit(key)?;
                t.sink.emit_no_space(",");
                t.visit(value)?;
                t.sink.emit_no_space(">");
                return Ok(true);
            }
            t.emit_dynamic_fallback(id)?;
            Ok(true)
        }
        NodeData::UnionType { .. } | NodeData::FunctionType { .. } => {
            t.emit_dynamic_fallback(id)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

impl Transpiler<'_> {
    fn emit_type_ref(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::TypeRef { name, type_args } = module.ast.data(id) else {
            return Ok(());
        };
        let (name, type_args) = (name.clone(), type_args.clone());

        // A type parameter of an enclosing generic method has no
        // first-class target form; it is carried in a structured comment.
        if self.in_generic_method_scope(&name) {
            self.sink.emit("dynamic");
            self.sink.emit_no_space(&format!("/*={name}*/"));
            return Ok(());
        }

        match self.rewrite_type_name(id, &name)? {
            Some(rule) => self.sink.emit(rule.to),
            None => self.sink.emit(&name),
        }
        if !type_args.is_empty() {
            self.sink.emit_no_space("<");
            self.visit_list(&type_args)?;
            self.sink.emit_no_space(">");
        }
        Ok(())
    }

    /// Types the target cannot express become `dynamic`, optionally with a
    /// non-semantic comment carrying the original spelling for readers.
    fn emit_dynamic_fallback(&mut self, id: NodeId) -> Result<(), FatalError> {
        self.sink.emit("dynamic");
        if self.options.type_comments {
            let text = type_text(self.module, id);
            self.sink.emit(&format!("/* {text} */"));
        }
        Ok(())
    }
}

/// Source-side rendering of a type node, for human-facing comments only.
pub(crate) fn type_text(module: &SourceModule, id: NodeId) -> String {
    let ast = &module.ast;
    match ast.data(id) {
        NodeData::KeywordType { keyword } => match keyword {
            TypeKeyword::Number => "number".to_string(),
            TypeKeyword::String => "string".to_string(),
            TypeKeyword::Boolean => "boolean".to_string(),
            TypeKeyword::Any => "any".to_string(),
            TypeKeyword::Void => "void".to_string(),
        },
        NodeData::TypeRef { name, type_args } => {
            if type_args.is_empty() {
                name.clone()
            } else {
                let args: Vec<String> =
                    type_args.iter().map(|a| type_text(module, *a)).collect();
                format!("{}<{}>", name, args.join(", "))
            }
        }
        NodeData::ArrayType { element } => format!("{}[]", type_text(module, *element)),
        NodeData::UnionType { types } => {
            let parts: Vec<String> = types.iter().map(|t| type_text(module, *t)).collect();
            parts.join(" | ")
        }
        NodeData::FunctionType {
            params,
            return_type,
        } => {
            let parts: Vec<String> = params
                .iter()
                .map(|p| match ast.data(*p) {
                    NodeData::Param(param) => match param.ty {
                        Some(ty) => type_text(module, ty),
                        None => "any".to_string(),
                    },
                    _ => "any".to_string(),
                })
                .collect();
            let ret = match return_type {
                Some(r) => type_text(module, *r),
                None => "void".to_string(),
            };
            format!("({}) => {}", parts.join(", "), ret)
        }
        NodeData::TypeLiteral { members } => {
            if let [only] = members.as_slice()
                && let NodeData::IndexSignature {
                    key_type,
                    value_type,
                    ..
                } = ast.data(*only)
            {
                return format!(
                    "{{[key: {}]: {}}}",
                    type_text(module, *key_type),
                    type_text(module, *value_type)
                );
            }
            "{...}".to_string()
        }
        _ => "any".to_string(),
    }
}

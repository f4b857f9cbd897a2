//! Literals: strings, templates, numbers, regexes, array and map literals.

use tsdart_ast::{NodeData, NodeId, PropertyKey};
use tsdart_common::FatalError;

use crate::const_eval::is_const_context;
use crate::session::Transpiler;

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::StringLiteral { value } | NodeData::TemplateLiteral { value } => {
            let value = value.clone();
            t.sink.emit(&quote(&value));
            Ok(true)
        }
        NodeData::TemplateExpression { .. } => {
            t.emit_template_expression(id)?;
            Ok(true)
        }
        NodeData::NumericLiteral { text } => {
            let text = text.clone();
            t.sink.emit(&text);
            Ok(true)
        }
        NodeData::BooleanLiteral { value } => {
            t.sink.emit(if *value { "true" } else { "false" });
            Ok(true)
        }
        NodeData::NullLiteral => {
            t.sink.emit("null");
            Ok(true)
        }
        NodeData::RegexLiteral { .. } => {
            t.emit_regex(id)?;
            Ok(true)
        }
        NodeData::ArrayLiteral { .. } => {
            t.emit_array_literal(id)?;
            Ok(true)
        }
        NodeData::ObjectLiteral { .. } => {
            t.emit_object_literal(id)?;
            Ok(true)
        }
        NodeData::PropertyAssignment { .. } | NodeData::ShorthandProperty { .. } => {
            t.emit_object_property(id)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Dart single-quoted string with `$` escaped so source text cannot collide
/// with target-side interpolation.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    push_escaped(&mut out, value);
    out.push('\'');
    out
}

fn push_escaped(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}

/// Raw-string form of a regex pattern. A raw string cannot contain its own
/// quote, so embedded quotes are spliced in as separate plain segments.
fn raw_pattern(pattern: &str) -> String {
    let segments: Vec<String> = pattern.split('\'').map(|s| format!("r'{s}'")).collect();
    segments.join(" \"'\" ")
}

impl Transpiler<'_> {
    fn emit_template_expression(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::TemplateExpression { head, spans } = module.ast.data(id) else {
            return Ok(());
        };
        let (head, spans) = (head.clone(), spans.clone());
        let mut opening = String::from("'");
        push_escaped(&mut opening, &head);
        self.sink.emit(&opening);
        for span in spans {
            let NodeData::TemplateSpan { expr, literal } = module.ast.data(span) else {
                continue;
            };
            let (expr, literal) = (*expr, literal.clone());
            self.sink.emit_no_space("${");
            self.visit(expr)?;
            let mut tail = String::from("}");
            push_escaped(&mut tail, &literal);
            self.sink.emit_no_space(&tail);
        }
        self.sink.emit_no_space("'");
        Ok(())
    }

    fn emit_regex(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::RegexLiteral { pattern, flags } = module.ast.data(id) else {
            return Ok(());
        };
        let (pattern, flags) = (pattern.clone(), flags.clone());
        self.sink.emit("new");
        self.sink.emit("RegExp");
        self.sink.emit_no_space("(");
        self.sink.emit_no_space(&raw_pattern(&pattern));
        if flags.contains('i') {
            self.sink.emit_no_space(", caseSensitive: false");
        }
        if flags.contains('m') {
            self.sink.emit_no_space(", multiLine: true");
        }
        self.sink.emit_no_space(")");
        Ok(())
    }

    /// Element/key types are read back off an enclosing type assertion.
    fn assertion_type(&self, literal: NodeId) -> Option<NodeId> {
        let ast = &self.module.ast;
        let parent = ast.parent(literal)?;
        match ast.data(parent) {
            NodeData::TypeAssertion { ty, .. } => Some(*ty),
            _ => None,
        }
    }

    fn emit_array_literal(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::ArrayLiteral { elements } = module.ast.data(id) else {
            return Ok(());
        };
        let elements = elements.clone();
        if is_const_context(module, id) {
            self.sink.emit("const");
        }
        if let Some(ty) = self.assertion_type(id) {
            let element = match module.ast.data(ty) {
                NodeData::ArrayType { element } => Some(*element),
                NodeData::TypeRef { name, type_args } if name == "Array" => {
                    type_args.first().copied()
                }
                _ => None,
            };
            if let Some(element) = element {
                self.sink.emit("<");
                self.visit(element)?;
                self.sink.emit_no_space(">");
            }
        }
        self.sink.emit_no_space("[");
        self.visit_list(&elements)?;
        self.sink.emit_no_space("]");
        Ok(())
    }

    fn emit_object_literal(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::ObjectLiteral { properties } = module.ast.data(id) else {
            return Ok(());
        };
        let properties = properties.clone();
        if is_const_context(module, id) {
            self.sink.emit("const");
        }
        if let Some(ty) = self.assertion_type(id) {
            let key_value = match module.ast.data(ty) {
                NodeData::TypeRef { name, type_args }
                    if (name == "Map" || name == "StringMap") && type_args.len() == 2 =>
                {
                    Some((type_args[0], type_args[1]))
                }
                NodeData::TypeLiteral { members } => match members.as_slice() {
                    [only] => match module.ast.data(*only) {
                        NodeData::IndexSignature {
                            key_type,
                            value_type,
                            ..
                        } => Some((*key_type, *value_type)),
                        _ => None,
                    },
                    _ => None,
                },
                _ => None,
            };
            if let Some((key, value)) = key_value {
                self.sink.emit("<");
                self.visit(key)?;
                self.sink.emit_no_space(",");
                self.visit(value)?;
                self.sink.emit_no_space(">");
            }
        }
        self.sink.emit_no_space("{");
        self.visit_list(&properties)?;
        self.sink.emit_no_space("}");
        Ok(())
    }

    /// Map-literal entry: identifier keys become string keys in the target.
    fn emit_object_property(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        match module.ast.data(id) {
            NodeData::PropertyAssignment { key, value } => {
                let value = *value;
                match key {
                    PropertyKey::Identifier(name) | PropertyKey::StringKey(name) => {
                        let name = name.clone();
                        self.sink.emit(&quote(&name));
                    }
                    PropertyKey::NumericKey(text) => {
                        let text = text.clone();
                        self.sink.emit(&text);
                    }
                    PropertyKey::Computed(_) => {
                        self.error(id, "computed property keys are not supported")?;
                    }
                }
                self.sink.emit_no_space(":");
                self.visit(value)?;
            }
            NodeData::ShorthandProperty { name } => {
                let name = name.clone();
                self.sink.emit(&quote(&name));
                self.sink.emit_no_space(":");
                self.sink.emit(&name);
            }
            _ => {}
        }
        Ok(())
    }
}

//! Modules: source files, imports, exports, library names.

use tsdart_ast::{NodeData, NodeId};
use tsdart_common::FatalError;

use crate::session::Transpiler;

/// Marker-only annotation imports that exist purely for the translation's
/// benefit; elided from import lists.
const FILTERED_IMPORTS: &[&str] = &["CONST", "CONST_EXPR", "ABSTRACT", "IMPLEMENTS", "forwardRef"];

/// Target-language reserved words, escaped when they appear as library name
/// segments.
const DART_RESERVED: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

pub(crate) fn try_emit(t: &mut Transpiler, id: NodeId) -> Result<bool, FatalError> {
    let module = t.module;
    match module.ast.data(id) {
        NodeData::SourceFile { statements } => {
            let statements = statements.clone();
            t.emit_source_file(id, &statements)?;
            Ok(true)
        }
        NodeData::ImportDecl { .. } => {
            t.emit_import(id)?;
            Ok(true)
        }
        NodeData::ExportDecl { .. } => {
            t.emit_export(id)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Translate a module specifier to a target import path: relative
/// specifiers keep their relative form, non-relative ones become package
/// references.
fn dart_import_path(spec: &str) -> String {
    if let Some(rest) = spec.strip_prefix("./") {
        format!("{rest}.dart")
    } else if spec.starts_with("../") {
        format!("{spec}.dart")
    } else {
        format!("package:{spec}.dart")
    }
}

fn sanitize_segment(segment: &str) -> String {
    let mut out: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if DART_RESERVED.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Library name synthesized from the relativized file path.
pub(crate) fn library_name(path: &str, base_path: Option<&str>) -> String {
    let stem = match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => path,
    };
    let relative = match base_path {
        Some(base) => stem
            .strip_prefix(base)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(stem),
        None => stem,
    };
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(sanitize_segment)
        .collect::<Vec<_>>()
        .join(".")
}

impl Transpiler<'_> {
    fn emit_source_file(&mut self, id: NodeId, statements: &[NodeId]) -> Result<(), FatalError> {
        if self.options.generate_library_name {
            let name = library_name(&self.module.path, self.options.base_path.as_deref());
            self.sink.emit("library");
            self.sink.emit(&name);
            self.sink.emit_no_space(";");
            self.sink.newline();
        }
        // One whole-file scan decides which target-library modules the
        // catalogued rewrites below will need.
        self.scan_extra_imports(id);
        let extra: Vec<_> = self.extra_imports.iter().copied().collect();
        for import in extra {
            self.sink.emit("import");
            self.sink.emit(&format!("'{}'", import.module));
            if let Some(alias) = import.alias {
                self.sink.emit("as");
                self.sink.emit(alias);
            }
            self.sink.emit_no_space(";");
            self.sink.newline();
        }
        for stmt in statements {
            self.visit(*stmt)?;
        }
        Ok(())
    }

    fn emit_import(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::ImportDecl {
            module: spec,
            namespace,
            named,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (spec, namespace, named) = (spec.clone(), namespace.clone(), named.clone());
        let path = dart_import_path(&spec);

        if let Some(ns) = namespace {
            self.sink.emit("import");
            self.sink.emit(&format!("'{path}'"));
            self.sink.emit("as");
            self.sink.emit(&ns);
            self.sink.emit_no_space(";");
            self.sink.newline();
            return Ok(());
        }

        if named.is_empty() {
            return self.error(id, "empty import lists are not supported");
        }

        let mut shown: Vec<String> = Vec::new();
        for specifier in &named {
            let NodeData::ImportSpecifier { name, alias } = module.ast.data(*specifier) else {
                continue;
            };
            if FILTERED_IMPORTS.contains(&name.as_str()) {
                continue;
            }
            if alias.is_some() {
                self.error(*specifier, "renamed imports are not supported")?;
            }
            shown.push(name.clone());
        }
        // An import whose entire specifier list is marker annotations
        // vanishes.
        if shown.is_empty() {
            return Ok(());
        }

        self.sink.emit("import");
        self.sink.emit(&format!("'{path}'"));
        self.sink.emit("show");
        for (i, name) in shown.iter().enumerate() {
            if i > 0 {
                self.sink.emit_no_space(",");
            }
            self.sink.emit(name);
        }
        self.sink.emit_no_space(";");
        self.sink.newline();
        Ok(())
    }

    fn emit_export(&mut self, id: NodeId) -> Result<(), FatalError> {
        let module = self.module;
        let NodeData::ExportDecl {
            module: spec,
            wildcard,
            named,
        } = module.ast.data(id)
        else {
            return Ok(());
        };
        let (spec, wildcard, named) = (spec.clone(), *wildcard, named.clone());

        let Some(spec) = spec else {
            return self.error(id, "export lists without a source module are not supported");
        };
        let path = dart_import_path(&spec);

        if !wildcard && named.is_empty() {
            return self.error(id, "empty export lists are not supported");
        }

        self.sink.emit("export");
        self.sink.emit(&format!("'{path}'"));
        if !wildcard {
            self.sink.emit("show");
            let mut first = true;
            for specifier in &named {
                let NodeData::ExportSpecifier { name, alias } = module.ast.data(*specifier) else {
                    continue;
                };
                if alias.is_some() {
                    self.error(*specifier, "renamed exports are not supported")?;
                }
                if !first {
                    self.sink.emit_no_space(",");
                }
                first = false;
                self.sink.emit(name);
            }
        }
        self.sink.emit_no_space(";");
        self.sink.newline();
        Ok(())
    }
}

//! Catalogue resolution and the per-symbol rewrite operations.

use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use tsdart_ast::{NodeData, NodeId, Program, SourceModule};
use tsdart_common::FatalError;

use crate::facade::catalog::{CallRule, Catalog, ExtraImport, PropertyRule, TypeRule};
use crate::session::Transpiler;

type SymbolKey = (String, String);

/// The resolved, immutable-after-init substitution tables of one run.
#[derive(Debug, Default)]
pub struct FacadeEngine {
    enabled: bool,
    calls: FxHashMap<SymbolKey, CallRule>,
    properties: FxHashMap<SymbolKey, PropertyRule>,
    type_names: FxHashMap<SymbolKey, TypeRule>,
    elide_new: FxHashSet<SymbolKey>,
    /// Bare names appearing in any catalogue; the cheap pre-filter that
    /// avoids symbol resolution for the overwhelming majority of nodes.
    candidates: FxHashSet<String>,
}

impl FacadeEngine {
    /// An engine with type-directed translation switched off: every lookup
    /// misses and constructs pass through literally.
    #[must_use]
    pub fn disabled() -> FacadeEngine {
        FacadeEngine::default()
    }

    /// Materialize a catalogue against the program's module resolver. Done
    /// once per run; catalogue modules the resolver cannot place are skipped
    /// (their names never resolve in this program, so no reference can
    /// match them either).
    #[must_use]
    pub fn resolve(catalog: &Catalog, program: &Program) -> FacadeEngine {
        let mut engine = FacadeEngine {
            enabled: true,
            ..FacadeEngine::default()
        };
        for rules in &catalog.modules {
            let Some(file) = program.resolve_module(rules.module) else {
                debug!(module = rules.module, "catalogue module not in program");
                continue;
            };
            let file = file.to_string();
            for (name, rule) in rules.calls {
                engine.add_candidate(name);
                engine.calls.insert((file.clone(), (*name).to_string()), *rule);
            }
            for (name, rule) in rules.properties {
                engine.add_candidate(name);
                engine
                    .properties
                    .insert((file.clone(), (*name).to_string()), *rule);
            }
            for (name, rule) in rules.type_names {
                engine.add_candidate(name);
                engine
                    .type_names
                    .insert((file.clone(), (*name).to_string()), *rule);
            }
            for name in rules.elide_new {
                engine.add_candidate(name);
                engine.elide_new.insert((file.clone(), (*name).to_string()));
            }
        }
        engine
    }

    fn add_candidate(&mut self, qualified: &str) {
        let bare = qualified.rsplit('.').next().unwrap_or(qualified);
        self.candidates.insert(bare.to_string());
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Candidate pre-filter: does any catalogue mention this bare name?
    #[must_use]
    pub fn is_candidate(&self, name: &str) -> bool {
        self.enabled && self.candidates.contains(name)
    }

    #[must_use]
    pub fn call_rule(&self, file: &str, qualified: &str) -> Option<CallRule> {
        self.calls
            .get(&(file.to_string(), qualified.to_string()))
            .copied()
    }

    #[must_use]
    pub fn property_rule(&self, file: &str, qualified: &str) -> Option<PropertyRule> {
        self.properties
            .get(&(file.to_string(), qualified.to_string()))
            .copied()
    }

    #[must_use]
    pub fn type_rule(&self, file: &str, qualified: &str) -> Option<TypeRule> {
        self.type_names
            .get(&(file.to_string(), qualified.to_string()))
            .copied()
    }

    /// False only for constructors catalogued as "elide the new keyword".
    #[must_use]
    pub fn should_emit_new(&self, file: &str, qualified: &str) -> bool {
        !self
            .elide_new
            .contains(&(file.to_string(), qualified.to_string()))
    }
}

/// Alias-transparent (file, qualified name) identity of a node's symbol,
/// without reporting. Used by the whole-file import scan.
fn quiet_identity<'m>(module: &'m SourceModule, node: NodeId) -> Option<(&'m str, &'m str)> {
    module.symbol_of(node).map(|sym| module.symbols.identity(sym))
}

impl Transpiler<'_> {
    /// Resolve a candidate node to its catalogue identity. `None` means
    /// "not a candidate" or "engine disabled" (caller falls back to default
    /// emission); a candidate without a resolvable symbol is the "missing
    /// type information" diagnostic, reported once per node.
    pub(crate) fn facade_identity(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<(String, String)>, FatalError> {
        if !self.facade.is_candidate(name) {
            return Ok(None);
        }
        let module = self.module;
        match module.symbol_of(node) {
            Some(sym) => {
                let (file, qualified) = module.symbols.identity(sym);
                Ok(Some((file.to_string(), qualified.to_string())))
            }
            None => {
                if self.missing_reported.insert(node) {
                    self.error(
                        node,
                        format!(
                            "missing type information: cannot resolve a symbol for '{name}', \
                             which matches a catalogued library member"
                        ),
                    )?;
                }
                Ok(None)
            }
        }
    }

    /// Try to rewrite a call through the call catalogue. Returns `true`
    /// when the call was fully emitted.
    pub(crate) fn try_rewrite_call(&mut self, id: NodeId) -> Result<bool, FatalError> {
        let module = self.module;
        let NodeData::Call { callee, args, .. } = module.ast.data(id) else {
            return Ok(false);
        };
        let (callee, args) = (*callee, args.clone());
        let Some(name) = module.ast.name_text(callee).map(str::to_string) else {
            return Ok(false);
        };
        let Some((file, qualified)) = self.facade_identity(callee, &name)? else {
            return Ok(false);
        };
        let Some(rule) = self.facade.call_rule(&file, &qualified) else {
            return Ok(false);
        };
        self.apply_call_rule(rule, callee, &args)
    }

    fn apply_call_rule(
        &mut self,
        rule: CallRule,
        callee: NodeId,
        args: &[NodeId],
    ) -> Result<bool, FatalError> {
        let module = self.module;
        let receiver = match module.ast.data(callee) {
            NodeData::PropertyAccess { object, .. } => Some(*object),
            _ => None,
        };
        match rule {
            CallRule::RenameMethod { to } => {
                let Some(recv) = receiver else {
                    return Ok(false);
                };
                self.visit(recv)?;
                self.sink.emit_no_space(".");
                self.sink.emit_no_space(to);
                self.emit_call_args(args)?;
                Ok(true)
            }
            CallRule::MethodPrefixArgs { to, prefix } => {
                let Some(recv) = receiver else {
                    return Ok(false);
                };
                self.visit(recv)?;
                self.sink.emit_no_space(".");
                self.sink.emit_no_space(to);
                self.sink.emit_no_space("(");
                for (i, token) in prefix.iter().enumerate() {
                    if i > 0 {
                        self.sink.emit_no_space(",");
                    }
                    self.sink.emit_no_space(token);
                }
                for arg in args {
                    self.sink.emit_no_space(",");
                    self.visit(*arg)?;
                }
                self.sink.emit_no_space(")");
                Ok(true)
            }
            CallRule::FreeFunction { to, .. } => {
                self.sink.emit(to);
                self.emit_call_args(args)?;
                Ok(true)
            }
            CallRule::ArgMethod { to } => {
                let [first, rest @ ..] = args else {
                    self.error(callee, format!("'{to}' rewrite expects at least one argument"))?;
                    return Ok(false);
                };
                self.visit(*first)?;
                self.sink.emit_no_space(".");
                self.sink.emit_no_space(to);
                self.sink.emit_no_space("(");
                self.visit_list(rest)?;
                self.sink.emit_no_space(")");
                Ok(true)
            }
            CallRule::ListConcat => {
                let Some(recv) = receiver else {
                    return Ok(false);
                };
                self.sink.emit("(");
                self.sink.emit("new");
                self.sink.emit("List.from");
                self.sink.emit_no_space("(");
                self.visit(recv)?;
                self.sink.emit_no_space(")");
                for arg in args {
                    self.sink.emit_no_space("..addAll(");
                    self.visit(*arg)?;
                    self.sink.emit_no_space(")");
                }
                self.sink.emit_no_space(")");
                Ok(true)
            }
            CallRule::UnwrapConst => {
                let [sole] = args else {
                    self.error(callee, "the const unwrap function takes exactly one argument")?;
                    return Ok(false);
                };
                // The oracle classifies the argument as const through the
                // enclosing unwrap call; plain emission does the rest.
                self.visit(*sole)?;
                Ok(true)
            }
            CallRule::InlineThunk => self.inline_thunk(callee, args),
            CallRule::Provider => self.emit_provider(callee, args),
        }
    }

    /// `forwardRef(() => X)` erases the indirection: the thunk body is
    /// emitted in place of the whole call.
    fn inline_thunk(&mut self, callee: NodeId, args: &[NodeId]) -> Result<bool, FatalError> {
        let module = self.module;
        let [thunk] = args else {
            self.error(callee, "forward reference requires a single closure argument")?;
            return Ok(false);
        };
        let (params, body) = match module.ast.data(*thunk) {
            NodeData::ArrowFunction(f) | NodeData::FunctionExpr(f) => {
                (f.params.clone(), f.body)
            }
            _ => {
                self.error(*thunk, "forward reference argument must be a closure")?;
                return Ok(false);
            }
        };
        if !params.is_empty() {
            self.error(*thunk, "forward reference closure may not take parameters")?;
            return Ok(false);
        }
        let Some(body) = body else {
            self.error(*thunk, "forward reference closure has no body")?;
            return Ok(false);
        };
        if module.ast.kind(body) == tsdart_ast::SyntaxKind::Block {
            if let NodeData::Block { statements } = module.ast.data(body)
                && let [only] = statements.as_slice()
                && let NodeData::ReturnStmt { expr: Some(expr) } = module.ast.data(*only)
            {
                let expr = *expr;
                self.visit(expr)?;
                return Ok(true);
            }
            self.error(body, "forward reference closure must return a single expression")?;
            return Ok(false);
        }
        self.visit(body)?;
        Ok(true)
    }

    /// `provide(token, {useClass: X, ...})` → `const Provider(token, useClass: X, ...)`.
    fn emit_provider(&mut self, callee: NodeId, args: &[NodeId]) -> Result<bool, FatalError> {
        let module = self.module;
        let [token, literal] = args else {
            self.error(callee, "provider call takes a token and a provider literal")?;
            return Ok(false);
        };
        let NodeData::ObjectLiteral { properties } = module.ast.data(*literal) else {
            self.error(*literal, "provider call requires an object literal")?;
            return Ok(false);
        };
        let properties = properties.clone();
        let has_discriminator = properties.iter().any(|p| {
            matches!(
                module.ast.data(*p),
                NodeData::PropertyAssignment {
                    key: tsdart_ast::PropertyKey::Identifier(k),
                    ..
                } if matches!(k.as_str(), "useClass" | "useValue" | "useFactory" | "useExisting")
            )
        });
        if !has_discriminator {
            self.error(
                *literal,
                "provider literal requires a useClass/useValue/useFactory/useExisting key",
            )?;
        }
        self.sink.emit("const");
        self.sink.emit("Provider");
        self.sink.emit_no_space("(");
        self.visit(*token)?;
        if !properties.is_empty() {
            self.sink.emit_no_space(",");
            self.emit_object_as_named_args(&properties)?;
        }
        self.sink.emit_no_space(")");
        Ok(true)
    }

    /// Try to rewrite a property read through the property catalogue.
    pub(crate) fn try_rewrite_property(&mut self, id: NodeId) -> Result<bool, FatalError> {
        let module = self.module;
        let NodeData::PropertyAccess { object, name } = module.ast.data(id) else {
            return Ok(false);
        };
        let (object, name) = (*object, name.clone());
        let Some((file, qualified)) = self.facade_identity(id, &name)? else {
            return Ok(false);
        };
        let Some(rule) = self.facade.property_rule(&file, &qualified) else {
            return Ok(false);
        };
        match rule {
            PropertyRule::Replace { to, .. } => {
                self.sink.emit(to);
            }
            PropertyRule::Rename { to } => {
                self.visit(object)?;
                self.sink.emit_no_space(".");
                self.sink.emit_no_space(to);
            }
        }
        Ok(true)
    }

    /// Catalogued replacement for a type identifier, if any.
    pub(crate) fn rewrite_type_name(
        &mut self,
        node: NodeId,
        name: &str,
    ) -> Result<Option<TypeRule>, FatalError> {
        let Some((file, qualified)) = self.facade_identity(node, name)? else {
            return Ok(None);
        };
        Ok(self.facade.type_rule(&file, &qualified))
    }

    /// Should this `new` expression keep its constructor keyword?
    pub(crate) fn should_emit_new(&self, callee: NodeId) -> bool {
        let module = self.module;
        let Some(name) = module.ast.name_text(callee) else {
            return true;
        };
        if !self.facade.is_candidate(name) {
            return true;
        }
        match quiet_identity(module, callee) {
            Some((file, qualified)) => self.facade.should_emit_new(file, qualified),
            None => true,
        }
    }

    /// One whole-file scan collecting the target-library imports the
    /// catalogued rewrites in this file will need, deduplicated in
    /// first-need order. Runs before any statement is emitted.
    pub(crate) fn scan_extra_imports(&mut self, root: NodeId) {
        if !self.facade.enabled() {
            return;
        }
        let module = self.module;
        let facade = self.facade;
        let mut imports: IndexSet<ExtraImport> = IndexSet::new();
        module.ast.walk(root, |id| {
            let needed: Option<ExtraImport> = match module.ast.data(id) {
                NodeData::TypeRef { name, .. } => {
                    type_import(module, facade, id, name)
                }
                NodeData::New { callee, .. } => {
                    let name = module.ast.name_text(*callee);
                    name.and_then(|n| type_import(module, facade, *callee, n))
                }
                NodeData::Call { callee, .. } => {
                    let name = module.ast.name_text(*callee);
                    name.and_then(|n| {
                        let (file, qualified) = lookup(module, facade, *callee, n)?;
                        match facade.call_rule(file, qualified) {
                            Some(CallRule::FreeFunction { import, .. }) => import,
                            _ => None,
                        }
                    })
                }
                NodeData::PropertyAccess { name, .. } => {
                    let (file, qualified) = match lookup(module, facade, id, name) {
                        Some(identity) => identity,
                        None => return,
                    };
                    match facade.property_rule(file, qualified) {
                        Some(PropertyRule::Replace { import, .. }) => import,
                        _ => None,
                    }
                }
                _ => None,
            };
            if let Some(import) = needed {
                imports.insert(import);
            }
        });
        self.extra_imports = imports;
    }
}

fn lookup<'m>(
    module: &'m SourceModule,
    facade: &FacadeEngine,
    node: NodeId,
    name: &str,
) -> Option<(&'m str, &'m str)> {
    if !facade.is_candidate(name) {
        return None;
    }
    quiet_identity(module, node)
}

fn type_import(
    module: &SourceModule,
    facade: &FacadeEngine,
    node: NodeId,
    name: &str,
) -> Option<ExtraImport> {
    let (file, qualified) = lookup(module, facade, node, name)?;
    facade.type_rule(file, qualified)?.import
}

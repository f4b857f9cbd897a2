//! Per-file translation session.
//!
//! One `Transpiler` exists per input file and is destroyed after emission.
//! It threads every piece of ambient traversal state explicitly: the output
//! sink, the last-emitted-comment cursor, the generic-method type-parameter
//! scope stack, catch-clause stack substitutions, and the diagnostics
//! collector. Files share only the read-only facade engine, so callers may
//! translate files in parallel.

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::debug;

use tsdart_ast::{NodeId, SourceModule};
use tsdart_common::{
    Diagnostic, ErrorReporter, FatalError, LineMap, ReportMode, SourceMap,
};

use crate::facade::{ExtraImport, FacadeEngine};
use crate::sink::OutputSink;

/// Engine configuration, mapped 1:1 from the CLI surface.
#[derive(Clone, Debug)]
pub struct TranspileOptions {
    pub report_mode: ReportMode,
    /// Gate for the Facade Conversion Engine. Disabled, all catalogue
    /// lookups are skipped and constructs pass through literally.
    pub translate_builtins: bool,
    /// Synthesize a `library` declaration per file.
    pub generate_library_name: bool,
    pub generate_source_map: bool,
    /// Annotate `dynamic` fallbacks with the original type in a comment.
    pub type_comments: bool,
    /// Enforce the `_`-prefix naming convention for private declarations.
    pub enforce_underscores: bool,
    /// Root the relativized library name is computed against.
    pub base_path: Option<String>,
}

impl Default for TranspileOptions {
    fn default() -> TranspileOptions {
        TranspileOptions {
            report_mode: ReportMode::Aggregate,
            translate_builtins: true,
            generate_library_name: false,
            generate_source_map: false,
            type_comments: true,
            enforce_underscores: true,
            base_path: None,
        }
    }
}

/// Result of translating one file.
#[derive(Clone, Debug)]
pub struct TranspileOutput {
    pub code: String,
    pub source_map: Option<SourceMap>,
}

pub struct Transpiler<'a> {
    pub(crate) module: &'a SourceModule,
    pub(crate) facade: &'a FacadeEngine,
    pub(crate) options: TranspileOptions,
    pub(crate) sink: OutputSink,
    pub(crate) line_map: LineMap,
    reporter: ErrorReporter,
    /// Start offset of the last emitted leading comment; monotonic, never
    /// rewound, prevents duplicate emission when nodes share trivia.
    pub(crate) comment_cursor: u32,
    /// One frame per enclosing generic function/method, holding its own
    /// type-parameter names.
    pub(crate) generic_scopes: Vec<Vec<String>>,
    /// Caught-binding name → companion stack-binding name, innermost last.
    pub(crate) catch_substitutions: Vec<(String, String)>,
    /// Target-library modules required by facade rewrites in this file.
    pub(crate) extra_imports: IndexSet<ExtraImport>,
    /// Nodes already reported as missing type information, so the callee of
    /// a call is not reported twice when default emission revisits it.
    pub(crate) missing_reported: FxHashSet<NodeId>,
}

impl<'a> Transpiler<'a> {
    #[must_use]
    pub fn new(
        module: &'a SourceModule,
        facade: &'a FacadeEngine,
        options: TranspileOptions,
    ) -> Transpiler<'a> {
        Transpiler {
            sink: OutputSink::new(options.generate_source_map),
            line_map: LineMap::new(&module.source),
            reporter: ErrorReporter::new(options.report_mode),
            module,
            facade,
            options,
            comment_cursor: 0,
            generic_scopes: Vec::new(),
            catch_substitutions: Vec::new(),
            extra_imports: IndexSet::new(),
            missing_reported: FxHashSet::default(),
        }
    }

    /// Record a diagnostic at a node's position. Fail-fast mode unwinds;
    /// aggregate mode returns `Ok` and the caller emits best-effort
    /// placeholder output and keeps going.
    pub(crate) fn error(
        &mut self,
        node: NodeId,
        message: impl Into<String>,
    ) -> Result<(), FatalError> {
        let span = self.module.ast.span(node);
        let pos = self.line_map.position(span.start);
        self.reporter
            .report(Diagnostic::new(&self.module.path, pos, message))
    }

    /// Active stack substitution for a caught binding, if any.
    #[must_use]
    pub(crate) fn stack_binding(&self, caught: &str) -> Option<&str> {
        self.catch_substitutions
            .iter()
            .rev()
            .find(|(name, _)| name == caught)
            .map(|(_, stack)| stack.as_str())
    }

    /// Is `name` a type parameter of an enclosing generic function/method?
    #[must_use]
    pub(crate) fn in_generic_method_scope(&self, name: &str) -> bool {
        self.generic_scopes
            .iter()
            .any(|frame| frame.iter().any(|p| p == name))
    }

    /// Visit a `,`-separated list.
    pub(crate) fn visit_list(&mut self, ids: &[NodeId]) -> Result<(), FatalError> {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.sink.emit_no_space(",");
            }
            self.visit(*id)?;
        }
        Ok(())
    }

    fn into_result(self) -> Result<TranspileOutput, FatalError> {
        let mut diagnostics = self.reporter.into_diagnostics();
        if diagnostics.is_empty() {
            let out_file = dart_file_name(&self.module.path);
            let (code, source_map) =
                self.sink
                    .finish(&out_file, &self.module.path, &self.module.source);
            return Ok(TranspileOutput { code, source_map });
        }
        // Front-end findings only matter when type-directed translation is
        // on and the engine itself failed; otherwise they are noise.
        if self.options.translate_builtins {
            diagnostics.extend(self.module.diagnostics.iter().cloned());
            diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        }
        Err(FatalError::Aggregate(diagnostics))
    }
}

/// Output file name for an input path (`src/foo.ts` → `src/foo.dart`).
#[must_use]
pub fn dart_file_name(path: &str) -> String {
    let stem = match path.rfind('.') {
        Some(dot) if !path[dot..].contains('/') => &path[..dot],
        _ => path,
    };
    format!("{stem}.dart")
}

/// Translate one file against the shared facade engine.
///
/// The traversal is single-threaded and synchronous; callers parallelize at
/// file granularity.
pub fn translate_module(
    module: &SourceModule,
    facade: &FacadeEngine,
    options: &TranspileOptions,
) -> Result<TranspileOutput, FatalError> {
    debug!(file = %module.path, "translating");
    let mut transpiler = Transpiler::new(module, facade, options.clone());
    match transpiler.visit(module.root) {
        Ok(()) => {}
        Err(fatal) => return Err(fatal),
    }
    transpiler.sink.newline();
    transpiler.into_result()
}

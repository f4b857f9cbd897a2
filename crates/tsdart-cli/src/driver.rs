//! The compilation driver: discover dumps, load the program, translate
//! every file against the shared facade engine, write outputs.
//!
//! Files are independent once the catalogues are resolved, so translation
//! fans out over rayon at file granularity with a per-file diagnostics
//! collector.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::Glob;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, info_span};
use walkdir::WalkDir;

use tsdart_ast::{Program, SourceModule};
use tsdart_common::{Diagnostic, FatalError};
use tsdart_emitter::facade::default_catalog;
use tsdart_emitter::session::dart_file_name;
use tsdart_emitter::{translate_module, FacadeEngine, TranspileOptions};

use crate::args::CliArgs;

/// Everything the driver produced for one run.
pub struct RunOutcome {
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunOutcome {
    #[must_use]
    pub fn success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Collect dump files from the input paths, applying the filter glob to
/// directory walks.
pub fn discover_inputs(inputs: &[PathBuf], filter: &str) -> Result<Vec<PathBuf>> {
    let glob = Glob::new(filter)
        .with_context(|| format!("invalid filter glob: {filter}"))?
        .compile_matcher();
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file()
                    && glob.is_match(entry.file_name().to_string_lossy().as_ref())
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn load_module(path: &Path) -> Result<SourceModule> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read dump {}", path.display()))?;
    let mut module: SourceModule = serde_json::from_str(&text)
        .with_context(|| format!("malformed front-end dump {}", path.display()))?;
    module.connect();
    Ok(module)
}

fn load_module_map(path: Option<&Path>) -> Result<FxHashMap<String, String>> {
    let Some(path) = path else {
        return Ok(FxHashMap::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read module map {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("malformed module map {}", path.display()))
}

/// Run a full translation: returns the written files and every diagnostic.
pub fn run(args: &CliArgs) -> Result<RunOutcome> {
    let files = discover_inputs(&args.inputs, &args.filter)?;
    if files.is_empty() {
        anyhow::bail!("no input dumps found");
    }

    let modules = {
        let _span = info_span!("load_program", files = files.len()).entered();
        files
            .iter()
            .map(|path| load_module(path))
            .collect::<Result<Vec<_>>>()?
    };
    let module_map = load_module_map(args.module_map.as_deref())?;
    let program = Program {
        modules,
        module_map,
    };

    // Catalogue keys resolve against the module map exactly once; the
    // engine is read-only from here on.
    let facade = if args.no_translate_builtins {
        FacadeEngine::disabled()
    } else {
        FacadeEngine::resolve(default_catalog(), &program)
    };
    let options: TranspileOptions = args.to_options();

    let results: Vec<_> = {
        let _span = info_span!("translate_files", files = program.modules.len()).entered();
        program
            .modules
            .par_iter()
            .map(|module| (module, translate_module(module, &facade, &options)))
            .collect()
    };

    let mut written = Vec::new();
    let mut diagnostics = Vec::new();
    for (module, result) in results {
        match result {
            Ok(output) => {
                let out_path = args.out_dir.join(dart_file_name(&module.path));
                if let Some(parent) = out_path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                fs::write(&out_path, &output.code)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                debug!(file = %out_path.display(), "wrote output");
                if let Some(map) = &output.source_map {
                    let map_path = out_path.with_extension("dart.map.json");
                    let json = serde_json::to_string_pretty(map)?;
                    fs::write(&map_path, json)
                        .with_context(|| format!("failed to write {}", map_path.display()))?;
                    written.push(map_path);
                }
                written.push(out_path);
            }
            Err(FatalError::Single(diagnostic)) => diagnostics.push(diagnostic),
            Err(FatalError::Aggregate(mut batch)) => diagnostics.append(&mut batch),
        }
    }
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    Ok(RunOutcome {
        written,
        diagnostics,
    })
}

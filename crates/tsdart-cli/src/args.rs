use clap::Parser;
use std::path::PathBuf;

use tsdart_common::ReportMode;
use tsdart_emitter::TranspileOptions;

/// CLI arguments for the tsdart binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsdart",
    version,
    about = "Translates symbol-annotated TypeScript trees to Dart source"
)]
pub struct CliArgs {
    /// Front-end tree dumps (.ast.json) or directories to scan for them.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the generated Dart files are written into.
    #[arg(short = 'o', long = "out-dir", default_value = "out")]
    pub out_dir: PathBuf,

    /// JSON file mapping logical module names to canonical file identities,
    /// produced by the front end's module resolver.
    #[arg(long = "module-map")]
    pub module_map: Option<PathBuf>,

    /// Glob selecting dump files when an input is a directory.
    #[arg(long, default_value = "*.ast.json")]
    pub filter: String,

    /// Abort on the first diagnostic instead of aggregating all of them.
    #[arg(long = "fail-fast")]
    pub fail_fast: bool,

    /// Generate a library declaration per file.
    #[arg(long = "library-names")]
    pub library_names: bool,

    /// Generate a source-map file next to each output.
    #[arg(long = "source-maps")]
    pub source_maps: bool,

    /// Disable type-directed translation of built-in library calls.
    #[arg(long = "no-translate-builtins")]
    pub no_translate_builtins: bool,

    /// Do not annotate dynamic fallback types with the original type text.
    #[arg(long = "no-type-comments")]
    pub no_type_comments: bool,

    /// Do not enforce the underscore naming convention for private members.
    #[arg(long = "no-enforce-underscores")]
    pub no_enforce_underscores: bool,

    /// Root that file paths are relativized against for library names.
    #[arg(long = "base-path")]
    pub base_path: Option<String>,
}

impl CliArgs {
    #[must_use]
    pub fn to_options(&self) -> TranspileOptions {
        TranspileOptions {
            report_mode: if self.fail_fast {
                ReportMode::FailFast
            } else {
                ReportMode::Aggregate
            },
            translate_builtins: !self.no_translate_builtins,
            generate_library_name: self.library_names,
            generate_source_map: self.source_maps,
            type_comments: !self.no_type_comments,
            enforce_underscores: !self.no_enforce_underscores,
            base_path: self.base_path.clone(),
        }
    }
}

#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use tsdart_cli::args::CliArgs;
use tsdart_cli::{driver, tracing_config};

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless TSDART_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let outcome = driver::run(&args)?;

    for diagnostic in &outcome.diagnostics {
        eprintln!(
            "{} {}",
            format!("{}:{}:{}:", diagnostic.file, diagnostic.line, diagnostic.column).bold(),
            diagnostic.message.red()
        );
    }
    if !outcome.success() {
        eprintln!(
            "{}",
            format!("translation failed with {} error(s)", outcome.diagnostics.len()).red()
        );
        std::process::exit(EXIT_DIAGNOSTICS);
    }
    eprintln!("wrote {} file(s)", outcome.written.len());
    std::process::exit(EXIT_SUCCESS);
}

//! Tracing setup for the CLI.
//!
//! The subscriber is only initialised when `TSDART_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal runs. Values use the usual
//! `EnvFilter` syntax, e.g. `TSDART_LOG=tsdart_emitter=debug`.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = match std::env::var("TSDART_LOG").or_else(|_| std::env::var("RUST_LOG")) {
        Ok(value) if !value.is_empty() => value,
        _ => return,
    };
    let env_filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

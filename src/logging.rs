//! Tracing subscriber setup for the binary.
//!
//! Filter comes from `SHOPLIST_LOG` (env-filter syntax), else `debug` when verbose and
//! `warn` otherwise. `SHOPLIST_LOG_FORMAT=json` switches to JSON lines.

use std::env;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "SHOPLIST_LOG";
pub const LOG_FORMAT_ENV: &str = "SHOPLIST_LOG_FORMAT";

pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "shoplist=debug" } else { "warn" }
}

/// Installs the global subscriber. Logs go to stderr so stdout stays parseable.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let registry = tracing_subscriber::registry().with(filter);

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());
    match format.as_str() {
        "json" => {
            let _ = registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .try_init();
        }
        _ => {
            let _ = registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init();
        }
    }
}

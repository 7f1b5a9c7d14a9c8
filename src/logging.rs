//! `tracing` subscriber setup for the binary.
//!
//! Filter precedence: `FEH_LOG`, then `RUST_LOG`, then the configured
//! directive, then `info`. Logs go to stderr so reports on stdout stay clean.

use std::io;

use tracing_subscriber::EnvFilter;

pub fn filter_directive(configured: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("FEH_LOG")
        .or_else(|| lookup("RUST_LOG"))
        .filter(|v| !v.trim().is_empty())
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| "info".to_string())
}

/// Parse `directive`, falling back to `info` with a warning message.
pub fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new("info"),
            Some(format!("warning: invalid log filter '{directive}' ({e}); using 'info'")),
        ),
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(configured: Option<&str>) {
    let directive = filter_directive(configured, |key| std::env::var(key).ok());
    let (filter, warning) = build_filter(&directive);
    // No subscriber exists yet, so this goes straight to stderr.
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

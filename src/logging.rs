//! Log output for the CLI.
//!
//! Events go to stderr so stdout stays free for command output. `RUST_LOG`
//! replaces the computed filter entirely when it is set.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Crates whose events follow the configured level. Everything else
/// (hyper, rustls, reqwest, ...) only shows warnings.
const OWN_CRATES: &[&str] = &[
    "syncal",
    "syncal_core",
    "syncal_provider_google",
    "syncal_provider_icloud",
];

pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(parse_level(level))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map a level name to a tracing level; anything unknown is info.
pub fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn default_directives(level: Level) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_CRATES.iter().map(|krate| format!("{}={}", krate, level)));
    directives.join(",")
}

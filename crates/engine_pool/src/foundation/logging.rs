//! Logging utilities

/// Initialize logging with a default level, still overridable through `RUST_LOG`
///
/// Returns `false` when a logger was already installed.
pub fn init_with_level(level: log::LevelFilter) -> bool {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init()
        .is_ok()
}

/// Install a test-friendly logger; repeated calls are harmless
#[cfg(test)]
pub(crate) fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}

//! Logger setup. `RUST_LOG` wins over the configured level.

/// Install the global logger. Later calls are ignored, so a shim attaching
/// twice in one process does not panic.
pub fn init(level: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();

    if result.is_ok() {
        log::debug!("[logging] initialised at {}", level);
    }
}

use log::LevelFilter;

/// Initialize the logger with the specified level. `RUST_LOG` still wins for
/// individual modules. Safe to call more than once; later calls are ignored.
pub fn init_logger(level: LevelFilter) {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init();
}

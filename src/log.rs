use log::LevelFilter;

/// Environment variable that turns on debug logging, like `--debug`.
pub const DEBUG_ENV_VAR: &str = "CROSSWORD_DEBUG";

/// Initialize logging for the CLI.
///
/// Logs at `Info` by default and `Debug` if `debug_enabled` is true or `CROSSWORD_DEBUG` is set.
/// An explicit `RUST_LOG` overrides both.
pub fn init_logger(debug_enabled: bool) {
    let debug_enabled = debug_enabled || std::env::var_os(DEBUG_ENV_VAR).is_some();
    let level = if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    // Let RUST_LOG override our defaults if explicitly set
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    // A logger may already be installed (e.g. when embedding the library); keep it.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}

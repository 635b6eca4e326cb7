// StableBuddy - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr always. Optionally also to a file via a non-blocking writer.
// Never logs the model hub credential at any level.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Keeps the non-blocking file writer alive. Dropping it flushes and closes
/// the log file, so `main` must hold it for the lifetime of the process.
pub type LogGuard = Option<tracing_appender::non_blocking::WorkerGuard>;

/// Resolve the filter directive from the configured sources.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn filter_directive(
    rust_log: Option<&str>,
    debug_flag: bool,
    config_level: Option<&str>,
) -> String {
    if let Some(env) = rust_log {
        env.to_string()
    } else if debug_flag {
        "debug".to_string()
    } else if let Some(level) = config_level {
        level.to_string()
    } else {
        super::constants::DEFAULT_LOG_LEVEL.to_string()
    }
}

/// Open `path` as an append-only, never-rotated log file.
///
/// Fails (instead of panicking) when the directory cannot be created or the
/// file cannot be opened, so a bad `[logging] file` only costs the file layer.
pub fn open_log_file(
    path: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stablebuddy.log".to_string());
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name)
        .build(dir)
}

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
/// `log_file` is the optional log file path from config.toml. If it cannot
/// be opened, logging continues on stderr and a warning is emitted.
pub fn init(debug_flag: bool, config_level: Option<&str>, log_file: Option<&str>) -> LogGuard {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directive = filter_directive(rust_log.as_deref(), debug_flag, config_level);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let mut file_error = None;
    let (file_layer, guard) = match log_file.map(|f| open_log_file(Path::new(f))) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            file_error = Some(e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(e) = file_error {
        tracing::warn!(
            log_file = log_file.unwrap_or(""),
            error = %e,
            "Could not open log file; logging to stderr only"
        );
    }

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        log_file = log_file.unwrap_or(""),
        file_output = guard.is_some(),
        "Logging initialised"
    );

    guard
}

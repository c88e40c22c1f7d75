//! Stderr logging for the command line tool.
//!
//! # Invariants
//! - Logging init is idempotent for the same level.
//! - Re-initialization with a different level is rejected.
//! - Initialization must not panic.

use flexi_logger::{Logger, LoggerHandle};
use log::debug;
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    requested: &'static str,
    /// Spec the logger actually runs with; `RUST_LOG` when it is set.
    effective: String,
    _logger: LoggerHandle,
}

/// Starts the stderr logger. `RUST_LOG`, when set, takes precedence over
/// `level`.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when logging is already running at another level.
/// - Returns an error when the logger backend fails to start.
pub fn init_logging(level: &str) -> Result<(), String> {
    let normalized_level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let effective = effective_spec(normalized_level, std::env::var("RUST_LOG").ok());
        let logger = Logger::try_with_str(&effective)
            .map_err(|err| format!("invalid log spec `{effective}`: {err}"))?
            .log_to_stderr()
            .format(flexi_logger::default_format)
            .start()
            .map_err(|err| format!("failed to start logger: {err}"))?;

        debug!(
            "logging started level={} version={}",
            effective,
            env!("CARGO_PKG_VERSION")
        );

        Ok(LoggingState {
            requested: normalized_level,
            effective,
            _logger: logger,
        })
    })?;

    if state.requested != normalized_level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.requested, normalized_level
        ));
    }

    Ok(())
}

/// Level spec logging is running at, if started. Reflects `RUST_LOG` when
/// it overrode the requested level.
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.effective.as_str())
}

fn effective_spec(requested: &str, env_spec: Option<String>) -> String {
    match env_spec {
        Some(spec) if !spec.trim().is_empty() => spec.trim().to_string(),
        _ => requested.to_string(),
    }
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Ok("off"),
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(format!(
            "unsupported log level `{other}`; expected off|trace|debug|info|warn|error"
        )),
    }
}

//! Logging infrastructure for scanner observability.
//!
//! The crate logs through `tracing`. Every event uses target "rowscan" and
//! carries an `event` field for filtering.
//!
//! ## Library Integration
//!
//! A global subscriber is never installed here. Applications configure
//! tracing via `tracing_subscriber` or similar.
//!
//! ## Conventions
//!
//! - `event`: snake_case event name (required)
//! - `component`: module/subsystem (e.g., "merge", "filter")
//! - `scan_id`: per-scanner ULID, rendered with `%`
//! - Use `%` for Display, `?` for Debug formatting

/// Target for all scanner log events.
pub(crate) const ROWSCAN_TARGET: &str = "rowscan";

/// Macro for debug-level log events.
///
/// # Example
/// ```ignore
/// log_debug!(
///     component = "merge",
///     event = "scanner_opened",
///     scan_id = %scan_id,
///     sources = sources.len(),
/// );
/// ```
macro_rules! log_debug {
    ($($field:tt)*) => {
        ::tracing::debug!(target: $crate::observability::ROWSCAN_TARGET, $($field)*)
    };
}

/// Macro for warn-level log events.
macro_rules! log_warn {
    ($($field:tt)*) => {
        ::tracing::warn!(target: $crate::observability::ROWSCAN_TARGET, $($field)*)
    };
}

/// Macro for error-level log events.
macro_rules! log_error {
    ($($field:tt)*) => {
        ::tracing::error!(target: $crate::observability::ROWSCAN_TARGET, $($field)*)
    };
}

pub(crate) use log_debug;
pub(crate) use log_error;
pub(crate) use log_warn;

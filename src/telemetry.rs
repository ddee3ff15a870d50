//! Tracing subscriber set-up for the `fermata` binary.

use tracing::Level;
use tracing_subscriber::fmt;

/// Boxed error returned when a global subscriber is already installed.
pub type TelemetryError = Box<dyn std::error::Error + Send + Sync>;

/// Installs the global `fmt` subscriber with `level` as the maximum level.
///
/// # Errors
///
/// Returns an error when a global subscriber has already been set.
pub fn init_tracing(level: Level) -> Result<(), TelemetryError> {
    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
}

//! Diagnostics for the sluice workspace.
//!
//! Lightweight, configurable logging shared by every crate in the project.
//!
//! Usage:
//! - Set SLUICE_LOG=off (default) - no logs
//! - Set SLUICE_LOG=info - per-object transfer logs
//! - Set SLUICE_LOG=debug - partition and worker detail

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

static INIT: Once = Once::new();

/// Initialize diagnostics based on the SLUICE_LOG environment variable.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let log_level = std::env::var("SLUICE_LOG").unwrap_or_else(|_| "off".to_string());

        let min_level = match log_level.as_str() {
            "off" => return, // No setup needed
            "debug" => emit::Level::Debug,
            "info" => emit::Level::Info,
            "warn" => emit::Level::Warn,
            "error" => emit::Level::Error,
            other => {
                eprintln!("Warning: Unknown SLUICE_LOG value '{other}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min_level))
            .init();

        // The runtime must outlive every emitted event, so it is never dropped.
        std::mem::forget(rt);
    });
}

/// Log basic operations (listings, downloads, uploads, etc.)
///
/// Use this for operations that users might want to see in normal usage.
/// Examples: "Listed 120 objects", "Downloaded raw/a.png", "Uploaded 30 images"
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (partition sizes, worker activity, byte counts, etc.)
///
/// Use this for detail useful when debugging throughput or scheduling.
/// Examples: "Partition 3: processing 17 objects"
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log warning conditions (skipped inputs, fallbacks, recoverable errors)
///
/// Use this for issues that don't stop the run but should be noted.
/// Examples: "Skipping raw/broken.png: decode failed"
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log critical error conditions (failures that abort an operation)
///
/// Examples: "Failed to connect to destination store"
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        // Should not panic when called multiple times
        init_diagnostics();
        init_diagnostics();
        init_diagnostics();
    }

    #[test]
    fn test_macros_compile() {
        info!("Test message");
        debug!("Debug message with {value}", value: 42);
        warn!("Warning message");
        error!("Error message");
    }
}

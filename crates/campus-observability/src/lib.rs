//! Campus Observability
//!
//! Logging and metrics for the provisioning service and CLI:
//! - Console logging via `tracing-subscriber`
//! - Daily-rolling JSON log files via `tracing-appender`
//! - Provisioning counters via the `metrics` facade
//!
//! Compile-time switch: the `observability` feature (default). Runtime switch:
//! the `OBSERVABILITY_ENABLED` environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use campus_observability::{init_tracing, track_user_created};
//!
//! let _guard = init_tracing();
//! track_user_created("chile");
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled};
#[cfg(feature = "observability")]
pub use metrics::{track_provisioning_failure, track_user_created, track_username_conflict};

pub use basic_logging::init_basic_console_logging;

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    pub fn is_observability_enabled() -> bool {
        false
    }

    /// Falls back to console logging only.
    pub fn init_tracing() -> Option<()> {
        super::basic_logging::init_basic_console_logging();
        None
    }

    pub fn track_user_created(_country: &str) {}
    pub fn track_username_conflict(_attempt: u32) {}
    pub fn track_provisioning_failure(_reason: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

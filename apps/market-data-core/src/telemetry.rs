//! Console Tracing Setup
//!
//! Initializes a console `tracing` subscriber for binaries and test
//! harnesses that consume this crate.
//!
//! # Configuration
//!
//! - `RUST_LOG`: standard env-filter directives (default: `info`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use market_data_core::telemetry::init_telemetry;
//!
//! fn main() {
//!     init_telemetry();
//!     // ... application code
//! }
//! ```

use tracing_subscriber::EnvFilter;

/// Initialize console tracing with an env-filter.
///
/// Safe to call more than once: later calls are no-ops if a global
/// subscriber is already installed.
pub fn init_telemetry() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init();
}

// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::items_after_statements
    )
)]

//! Market Data Core - Rust Core Library
//!
//! Value-object layer for market data records. The crate defines the
//! [`TradeTick`] record: one timestamped market event carrying the venue
//! event time and the local ingest time as 128-bit integers, with a
//! serialize/deserialize state round trip suitable for persistence layers
//! built on top.
//!
//! # Architecture
//!
//! - **Domain**: Immutable value objects with equality by value
//!   - `market_data`: the `TradeTick` record, its packed storage layout,
//!     and the error taxonomy for rejected construction
//!
//! There is no application or infrastructure layer here: the crate is a
//! building block for larger market-data pipelines, not a pipeline itself.
//! Ingestion, streaming, and persistence belong to the consuming systems.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Telemetry setup for consumers that want console tracing.
pub mod telemetry;

// Domain re-exports
pub use domain::market_data::{MarketDataError, TickState, TradeTick};

//! Market Data Value Objects
//!
//! Immutable record types compared by value, not identity.

mod trade_tick;

pub use trade_tick::{TickState, TradeTick};

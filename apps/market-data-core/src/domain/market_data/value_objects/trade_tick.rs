//! Trade tick value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::domain::market_data::errors::MarketDataError;
use crate::domain::market_data::packed::PackedTick;

/// A single timestamped market event.
///
/// Carries the time the event occurred at the venue (`event_time`, unsigned
/// nanoseconds since the UNIX epoch) and the time the consuming system
/// constructed the record (`init_time`, signed nanoseconds; may predate the
/// epoch). Both fields are immutable after construction, and the record's
/// identity for equality is exactly the `(event_time, init_time)` pair.
///
/// The packed storage layout behind the record is the sole source of truth
/// for field values: accessors read from it and equality delegates to its
/// field-wise comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TradeTick {
    packed: PackedTick,
}

/// The minimal reconstruction state of a [`TradeTick`].
///
/// An ordered pair of `(event_time, init_time)`. Serializes as a
/// two-element sequence, so any persistence or wire layer built on top
/// preserves the exact two-field, fixed-width integer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickState(pub u128, pub i128);

impl TradeTick {
    /// Create a new record from typed field values.
    #[must_use]
    pub const fn new(event_time: u128, init_time: i128) -> Self {
        Self {
            packed: PackedTick::pack(event_time, init_time),
        }
    }

    /// Create a record stamped with the current wall clock as `init_time`.
    #[must_use]
    pub fn ingested_now(event_time: u128) -> Self {
        let now = Utc::now();
        let init_time = i128::from(now.timestamp()) * 1_000_000_000
            + i128::from(now.timestamp_subsec_nanos());
        Self::new(event_time, init_time)
    }

    /// Create a record from the decimal text of two integers of arbitrary
    /// width.
    ///
    /// This is the untyped construction boundary. Range validation is
    /// delegated entirely to the packed layout: a well-formed integer that
    /// cannot be represented in its field is rejected with
    /// [`MarketDataError::OutOfRange`], text that is not a decimal integer
    /// with [`MarketDataError::MalformedState`].
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for a negative `event_time`, an `event_time` at
    /// or above 2^128, or an `init_time` outside [-2^127, 2^127 - 1].
    /// Returns `MalformedState` for non-integer text.
    pub fn from_decimal(event_time: &str, init_time: &str) -> Result<Self, MarketDataError> {
        let packed = PackedTick::pack_decimal(event_time, init_time)?;
        Ok(Self { packed })
    }

    /// The venue event time, read from the packed layout.
    #[must_use]
    pub const fn event_time(&self) -> u128 {
        self.packed.event_time()
    }

    /// The record construction time, read from the packed layout.
    #[must_use]
    pub const fn init_time(&self) -> i128 {
        self.packed.init_time()
    }

    /// The event time as a chrono timestamp, when it fits the chrono range.
    #[must_use]
    pub fn event_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = i64::try_from(self.event_time()).ok()?;
        Some(DateTime::from_timestamp_nanos(nanos))
    }

    /// The construction time as a chrono timestamp, when it fits the
    /// chrono range.
    #[must_use]
    pub fn init_datetime(&self) -> Option<DateTime<Utc>> {
        let nanos = i64::try_from(self.init_time()).ok()?;
        Some(DateTime::from_timestamp_nanos(nanos))
    }

    /// Dump the record's state as the ordered `(event_time, init_time)`
    /// pair. Pure; always succeeds.
    #[must_use]
    pub const fn state(&self) -> TickState {
        TickState(self.event_time(), self.init_time())
    }

    /// Reconstruct a record from a typed state pair.
    ///
    /// The inverse of [`Self::state`]. Infallible: the pair's types already
    /// enforce the field widths. The result is a fresh, independent
    /// instance that compares equal to the record the state was dumped
    /// from.
    #[must_use]
    pub const fn from_state(state: &TickState) -> Self {
        Self::new(state.0, state.1)
    }

    /// Render the state pair as a two-element JSON array.
    ///
    /// # Panics
    ///
    /// Panics if JSON serialization fails, which cannot happen for a pair
    /// of integers.
    #[must_use]
    pub fn state_json(&self) -> String {
        serde_json::to_string(&self.state()).expect("integer pair serializes to JSON")
    }

    /// Reconstruct a record from a two-element JSON array of integers.
    ///
    /// This is the untyped deserialization boundary, the dual of
    /// [`Self::state_json`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedState` when the input is not valid JSON, not an
    /// array, does not have exactly two elements, or has an element that is
    /// not an integer number (strings, booleans, null, floats). Returns
    /// `OutOfRange` when an integer element does not fit its field's width
    /// and signedness.
    pub fn from_state_json(json: &str) -> Result<Self, MarketDataError> {
        let result = serde_json::from_str::<serde_json::Value>(json)
            .map_err(|e| MarketDataError::malformed(format!("invalid JSON: {e}")))
            .and_then(|value| Self::from_state_value(&value));
        if let Err(error) = &result {
            tracing::debug!(%error, "rejected trade tick state");
        }
        result
    }

    /// Reconstruct a record from an untyped JSON value holding the state
    /// pair.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::from_state_json`].
    pub fn from_state_value(state: &serde_json::Value) -> Result<Self, MarketDataError> {
        let elements = state
            .as_array()
            .ok_or_else(|| MarketDataError::malformed("state must be a two-element array"))?;
        if elements.len() != 2 {
            return Err(MarketDataError::malformed(format!(
                "state must have exactly 2 elements, got {}",
                elements.len()
            )));
        }
        let event_time = integer_text(&elements[0], "event_time")?;
        let init_time = integer_text(&elements[1], "init_time")?;
        Self::from_decimal(&event_time, &init_time)
    }
}

/// Extract the decimal text of a JSON integer element.
fn integer_text(element: &serde_json::Value, field: &str) -> Result<String, MarketDataError> {
    match element {
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(MarketDataError::malformed(format!(
            "'{field}' must be an integer, got {other}"
        ))),
    }
}

impl fmt::Display for TradeTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TradeTick(event_time={}, init_time={})",
            self.event_time(),
            self.init_time()
        )
    }
}

impl PartialOrd for TradeTick {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TradeTick {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.event_time(), self.init_time()).cmp(&(other.event_time(), other.init_time()))
    }
}

impl From<TickState> for TradeTick {
    fn from(state: TickState) -> Self {
        Self::from_state(&state)
    }
}

impl From<TradeTick> for TickState {
    fn from(tick: TradeTick) -> Self {
        tick.state()
    }
}

impl Serialize for TradeTick {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TradeTick {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let state = TickState::deserialize(deserializer)?;
        Ok(Self::from_state(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn new_and_accessors() {
        let tick = TradeTick::new(1_700_000_000_000_000_000, 1_700_000_000_000_000_500);
        assert_eq!(tick.event_time(), 1_700_000_000_000_000_000);
        assert_eq!(tick.init_time(), 1_700_000_000_000_000_500);
    }

    #[test]
    fn equality_is_by_field_pair() {
        let a = TradeTick::new(1, 2);
        let b = TradeTick::new(1, 2);
        let c = TradeTick::new(1, 3);
        let d = TradeTick::new(2, 2);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn negative_init_time_is_valid() {
        let tick = TradeTick::new(0, -1);
        assert_eq!(tick.init_time(), -1);
    }

    #[test]
    fn signed_range_boundaries() {
        let tick = TradeTick::new(0, i128::MIN);
        assert_eq!(tick.init_time(), i128::MIN);

        let tick = TradeTick::new(u128::MAX, i128::MAX);
        assert_eq!(tick.event_time(), u128::MAX);
        assert_eq!(tick.init_time(), i128::MAX);
    }

    #[test]
    fn from_decimal_accepts_full_width() {
        let tick = TradeTick::from_decimal(
            "340282366920938463463374607431768211455",
            "-170141183460469231731687303715884105728",
        )
        .unwrap();
        assert_eq!(tick.event_time(), u128::MAX);
        assert_eq!(tick.init_time(), i128::MIN);
    }

    #[test]
    fn from_decimal_rejects_negative_event_time() {
        let err = TradeTick::from_decimal("-1", "0").unwrap_err();
        assert!(matches!(err, MarketDataError::OutOfRange { field, .. } if field == "event_time"));
    }

    #[test]
    fn from_decimal_rejects_event_time_at_2_pow_128() {
        let err =
            TradeTick::from_decimal("340282366920938463463374607431768211456", "0").unwrap_err();
        assert!(matches!(err, MarketDataError::OutOfRange { field, .. } if field == "event_time"));
    }

    #[test]
    fn from_decimal_rejects_init_time_at_2_pow_127() {
        let err =
            TradeTick::from_decimal("0", "170141183460469231731687303715884105728").unwrap_err();
        assert!(matches!(err, MarketDataError::OutOfRange { field, .. } if field == "init_time"));
    }

    #[test]
    fn state_roundtrip_preserves_equality() {
        let tick = TradeTick::new(u128::MAX, -1);
        let restored = TradeTick::from_state(&tick.state());
        assert_eq!(tick, restored);
    }

    #[test]
    fn state_is_the_ordered_field_pair() {
        let tick = TradeTick::new(7, -9);
        assert_eq!(tick.state(), TickState(7, -9));
    }

    #[test]
    fn state_json_roundtrip() {
        let tick = TradeTick::new(u128::MAX, i128::MIN);
        let json = tick.state_json();
        let restored = TradeTick::from_state_json(&json).unwrap();
        assert_eq!(tick, restored);
    }

    #[test]
    fn state_json_shape() {
        let tick = TradeTick::new(1, -2);
        assert_eq!(tick.state_json(), "[1,-2]");
    }

    #[test_case("[1]"; "one element")]
    #[test_case("[1,2,3]"; "three elements")]
    #[test_case("[]"; "empty array")]
    #[test_case("{\"event_time\":1,\"init_time\":2}"; "object instead of array")]
    #[test_case("[\"1\",2]"; "string element")]
    #[test_case("[1,true]"; "boolean element")]
    #[test_case("[1,null]"; "null element")]
    #[test_case("[1.5,2]"; "float element")]
    #[test_case("not json"; "invalid json")]
    fn from_state_json_rejects_malformed(json: &str) {
        let err = TradeTick::from_state_json(json).unwrap_err();
        assert!(
            matches!(err, MarketDataError::MalformedState { .. }),
            "expected MalformedState for {json:?}, got {err:?}"
        );
    }

    #[test_case("[-1,0]", "event_time"; "negative event time")]
    #[test_case("[340282366920938463463374607431768211456,0]", "event_time"; "event time overflow")]
    #[test_case("[0,170141183460469231731687303715884105728]", "init_time"; "init time overflow")]
    fn from_state_json_rejects_out_of_range(json: &str, expected_field: &str) {
        let err = TradeTick::from_state_json(json).unwrap_err();
        assert!(
            matches!(err, MarketDataError::OutOfRange { ref field, .. } if field == expected_field),
            "expected OutOfRange on {expected_field} for {json:?}, got {err:?}"
        );
    }

    #[test]
    fn from_state_json_signed_lower_boundary() {
        let tick =
            TradeTick::from_state_json("[0,-170141183460469231731687303715884105728]").unwrap();
        assert_eq!(tick.init_time(), i128::MIN);
    }

    #[test]
    fn serde_roundtrip() {
        let tick = TradeTick::new(u128::MAX, -1);
        let json = serde_json::to_string(&tick).unwrap();
        let parsed: TradeTick = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tick);
    }

    #[test]
    fn ordering_is_by_event_time_then_init_time() {
        let a = TradeTick::new(1, 5);
        let b = TradeTick::new(2, 0);
        let c = TradeTick::new(2, 1);

        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn display_shows_both_fields() {
        let tick = TradeTick::new(1, -2);
        assert_eq!(format!("{tick}"), "TradeTick(event_time=1, init_time=-2)");
    }

    #[test]
    fn ingested_now_stamps_a_recent_init_time() {
        let tick = TradeTick::ingested_now(1_700_000_000_000_000_000);
        assert_eq!(tick.event_time(), 1_700_000_000_000_000_000);
        // Some time after 2020-01-01 in nanoseconds.
        assert!(tick.init_time() > 1_577_836_800_000_000_000);
    }

    #[test]
    fn datetime_conversions() {
        let tick = TradeTick::new(1_700_000_000_000_000_000, -1);
        let event = tick.event_datetime().unwrap();
        assert_eq!(event.timestamp(), 1_700_000_000);

        // u128::MAX does not fit chrono's range.
        let tick = TradeTick::new(u128::MAX, 0);
        assert!(tick.event_datetime().is_none());
    }

    #[test]
    fn conversions_between_tick_and_state() {
        let tick = TradeTick::new(3, -4);
        let state: TickState = tick.into();
        assert_eq!(state, TickState(3, -4));

        let back: TradeTick = state.into();
        assert_eq!(back, tick);
    }

    #[test]
    fn hash_works_for_collections() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(TradeTick::new(1, 2));
        set.insert(TradeTick::new(1, 3));
        set.insert(TradeTick::new(1, 2)); // duplicate

        assert_eq!(set.len(), 2);
    }
}

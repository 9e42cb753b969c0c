//! Packed storage layout for trade tick records.
//!
//! This module owns the fixed, field-ordered in-memory representation of a
//! record and is the sole authority on representable field ranges. The
//! value object in [`super::value_objects`] never inspects the layout
//! except through the entry points defined here.

use std::hash::{Hash, Hasher};
use std::num::IntErrorKind;

use super::errors::MarketDataError;

/// Fixed-size, field-ordered layout for one trade tick.
///
/// Field order is stable: `event_time` first, `init_time` second. Each
/// wrapper instance owns exactly one layout; copies are independent layouts,
/// never aliases.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct PackedTick {
    event_time: u128,
    init_time: i128,
}

impl PackedTick {
    /// Pack two typed field values into the layout.
    pub(crate) const fn pack(event_time: u128, init_time: i128) -> Self {
        Self {
            event_time,
            init_time,
        }
    }

    /// Pack from the decimal text of two integers of arbitrary width.
    ///
    /// This is the narrowing entry for untyped input. A well-formed integer
    /// that does not fit its field's width and signedness is rejected with
    /// [`MarketDataError::OutOfRange`]; text that is not a decimal integer
    /// at all is rejected with [`MarketDataError::MalformedState`].
    pub(crate) fn pack_decimal(
        event_time: &str,
        init_time: &str,
    ) -> Result<Self, MarketDataError> {
        let event_time = narrow_unsigned("event_time", event_time)?;
        let init_time = narrow_signed("init_time", init_time)?;
        Ok(Self::pack(event_time, init_time))
    }

    /// Read the event time from the layout.
    pub(crate) const fn event_time(&self) -> u128 {
        self.event_time
    }

    /// Read the init time from the layout.
    pub(crate) const fn init_time(&self) -> i128 {
        self.init_time
    }

    /// Field-wise equality over two layouts. Total for well-formed inputs.
    pub(crate) const fn fields_eq(&self, other: &Self) -> bool {
        self.event_time == other.event_time && self.init_time == other.init_time
    }
}

impl PartialEq for PackedTick {
    fn eq(&self, other: &Self) -> bool {
        self.fields_eq(other)
    }
}

impl Eq for PackedTick {}

impl Hash for PackedTick {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.event_time.hash(state);
        self.init_time.hash(state);
    }
}

/// Narrow decimal text into the unsigned 128-bit event time field.
fn narrow_unsigned(field: &str, text: &str) -> Result<u128, MarketDataError> {
    match text.parse::<u128>() {
        Ok(value) => Ok(value),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => {
            Err(MarketDataError::out_of_range(field, text))
        }
        // A negative integer is well-formed but unrepresentable here.
        Err(_) if is_decimal_integer(text) => Err(MarketDataError::out_of_range(field, text)),
        Err(_) => Err(MarketDataError::malformed(format!(
            "'{field}' is not an integer: {text}"
        ))),
    }
}

/// Narrow decimal text into the signed 128-bit init time field.
fn narrow_signed(field: &str, text: &str) -> Result<i128, MarketDataError> {
    match text.parse::<i128>() {
        Ok(value) => Ok(value),
        Err(e)
            if matches!(
                e.kind(),
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
            ) =>
        {
            Err(MarketDataError::out_of_range(field, text))
        }
        Err(_) => Err(MarketDataError::malformed(format!(
            "'{field}' is not an integer: {text}"
        ))),
    }
}

/// True if `text` is an optionally signed run of ASCII digits.
fn is_decimal_integer(text: &str) -> bool {
    let digits = text
        .strip_prefix('-')
        .or_else(|| text.strip_prefix('+'))
        .unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

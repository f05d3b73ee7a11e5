//! `DateTime`: a signed 64-bit count of 100ns ticks since the OPC UA epoch
//! (1601-01-01T00:00:00Z). Zero is the minimum DateTime.
//!
//! Grounded on `chrono::DateTime<Utc>` for the calendar-time conversion: the
//! wire/in-memory representation stays a plain tick count, but
//! [`DateTime::to_utc`]/[`DateTime::from_utc`] are the only place this
//! crate needs calendar arithmetic.

use std::io::{Read, Write};

use chrono::{TimeZone, Utc};

use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::{OPC_UA_EPOCH_UNIX_SECONDS, TICKS_PER_SECOND};
use crate::error::Result;

/// 100ns ticks since 1601-01-01T00:00:00Z. `0` is [`DateTime::MIN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DateTime(pub i64);

impl DateTime {
    /// The minimum representable DateTime: the OPC UA epoch itself.
    pub const MIN: DateTime = DateTime(0);

    pub fn from_ticks(ticks: i64) -> Self {
        DateTime(ticks)
    }

    pub fn ticks(&self) -> i64 {
        self.0
    }

    /// Convert to a calendar `chrono::DateTime<Utc>`. Saturates rather than
    /// panicking on a tick count so large it would overflow `chrono`'s range.
    pub fn to_utc(&self) -> chrono::DateTime<Utc> {
        let total_seconds_since_unix =
            OPC_UA_EPOCH_UNIX_SECONDS + self.0.div_euclid(TICKS_PER_SECOND);
        let nanos_within_second = self.0.rem_euclid(TICKS_PER_SECOND) * 100;
        Utc.timestamp_opt(total_seconds_since_unix, nanos_within_second as u32)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().expect("epoch is representable"))
    }

    /// Convert from a calendar `chrono::DateTime<Utc>` to ticks since the OPC
    /// UA epoch. Dates before 1601-01-01 saturate to [`DateTime::MIN`].
    pub fn from_utc(dt: chrono::DateTime<Utc>) -> Self {
        let unix_seconds = dt.timestamp();
        let nanos = dt.timestamp_subsec_nanos() as i64;
        let seconds_since_opc_epoch = unix_seconds - OPC_UA_EPOCH_UNIX_SECONDS;
        if seconds_since_opc_epoch < 0 {
            return DateTime::MIN;
        }
        let ticks = seconds_since_opc_epoch
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(nanos / 100);
        DateTime(ticks)
    }

    pub fn now() -> Self {
        DateTime::from_utc(Utc::now())
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_utc().to_rfc3339())
    }
}

impl BinaryEncode for DateTime {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        self.0.byte_len(ctx)
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.0.encode(stream, ctx)
    }
}

impl BinaryDecode for DateTime {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        Ok(DateTime(i64::decode(stream, ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn min_date_time_is_zero_ticks() {
        assert_eq!(DateTime::MIN.ticks(), 0);
    }

    #[test]
    fn epoch_round_trips_through_utc() {
        let epoch = DateTime::MIN;
        let utc = epoch.to_utc();
        assert_eq!(utc.timestamp(), OPC_UA_EPOCH_UNIX_SECONDS);
        assert_eq!(DateTime::from_utc(utc), epoch);
    }

    #[test]
    fn known_instant_round_trips() {
        let dt = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 0).unwrap();
        let converted = DateTime::from_utc(dt);
        assert_eq!(converted.to_utc().timestamp(), dt.timestamp());
    }

    #[test]
    fn pre_epoch_saturates_to_min() {
        let before = Utc.with_ymd_and_hms(1500, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(DateTime::from_utc(before), DateTime::MIN);
    }

    #[test]
    fn wire_round_trip_matches_i64() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let dt = DateTime(123_456_789);
        let bytes = dt.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, 123_456_789i64.to_le_bytes());
        let mut r = bytes.as_slice();
        assert_eq!(DateTime::decode(&mut r, &ctx).unwrap(), dt);
    }
}

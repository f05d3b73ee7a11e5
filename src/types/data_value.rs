//! `DataValue`: a `Variant` plus up to five optional metadata fields, with
//! the guarantee that absent fields read back as their zero value
//! (spec.md §3, scenario S6).

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::data_value_encoding;
use crate::error::Result;

use super::status_code::StatusCode;
use super::variant::Variant;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    pub value: Variant,
    pub status: Option<StatusCode>,
    pub source_timestamp: Option<i64>,
    pub source_picoseconds: Option<u16>,
    pub server_timestamp: Option<i64>,
    pub server_picoseconds: Option<u16>,
}

impl DataValue {
    pub fn status_only(status: StatusCode) -> Self {
        DataValue {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Lexicographic compare by (status, server time, server picos, source
    /// time, source picos, value); absent fields compare as their zero
    /// value.
    pub fn compare(&self, other: &DataValue) -> Ordering {
        self.status
            .unwrap_or(StatusCode::GOOD)
            .cmp(&other.status.unwrap_or(StatusCode::GOOD))
            .then_with(|| {
                self.server_timestamp
                    .unwrap_or(0)
                    .cmp(&other.server_timestamp.unwrap_or(0))
            })
            .then_with(|| {
                self.server_picoseconds
                    .unwrap_or(0)
                    .cmp(&other.server_picoseconds.unwrap_or(0))
            })
            .then_with(|| {
                self.source_timestamp
                    .unwrap_or(0)
                    .cmp(&other.source_timestamp.unwrap_or(0))
            })
            .then_with(|| {
                self.source_picoseconds
                    .unwrap_or(0)
                    .cmp(&other.source_picoseconds.unwrap_or(0))
            })
            .then_with(|| self.value.compare(&other.value))
    }
}

impl BinaryEncode for DataValue {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        1 + if self.value.is_null() { 0 } else { self.value.byte_len(ctx) }
            + self.status.map_or(0, |_| 4)
            + self.source_timestamp.map_or(0, |_| 8)
            + self.source_picoseconds.map_or(0, |_| 2)
            + self.server_timestamp.map_or(0, |_| 8)
            + self.server_picoseconds.map_or(0, |_| 2)
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        let mut mask = 0u8;
        if !self.value.is_null() {
            mask |= data_value_encoding::VALUE;
        }
        if self.status.is_some() {
            mask |= data_value_encoding::STATUS_CODE;
        }
        if self.source_timestamp.is_some() {
            mask |= data_value_encoding::SOURCE_TIMESTAMP;
        }
        if self.source_picoseconds.is_some() {
            mask |= data_value_encoding::SOURCE_PICOSECONDS;
        }
        if self.server_timestamp.is_some() {
            mask |= data_value_encoding::SERVER_TIMESTAMP;
        }
        if self.server_picoseconds.is_some() {
            mask |= data_value_encoding::SERVER_PICOSECONDS;
        }
        mask.encode(stream, ctx)?;
        if mask & data_value_encoding::VALUE != 0 {
            self.value.encode(stream, ctx)?;
        }
        if let Some(v) = self.status {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.source_timestamp {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.source_picoseconds {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.server_timestamp {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.server_picoseconds {
            v.encode(stream, ctx)?;
        }
        Ok(())
    }
}

impl BinaryDecode for DataValue {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let mask = u8::decode(stream, ctx)?;
        let mut dv = DataValue::default();
        if mask & data_value_encoding::VALUE != 0 {
            dv.value = Variant::decode(stream, ctx)?;
        }
        if mask & data_value_encoding::STATUS_CODE != 0 {
            dv.status = Some(StatusCode::decode(stream, ctx)?);
        }
        if mask & data_value_encoding::SOURCE_TIMESTAMP != 0 {
            dv.source_timestamp = Some(i64::decode(stream, ctx)?);
        }
        if mask & data_value_encoding::SOURCE_PICOSECONDS != 0 {
            dv.source_picoseconds = Some(u16::decode(stream, ctx)?);
        }
        if mask & data_value_encoding::SERVER_TIMESTAMP != 0 {
            dv.server_timestamp = Some(i64::decode(stream, ctx)?);
        }
        if mask & data_value_encoding::SERVER_PICOSECONDS != 0 {
            dv.server_picoseconds = Some(u16::decode(stream, ctx)?);
        }
        Ok(dv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn scenario_s6_status_only_data_value() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let dv = DataValue::status_only(StatusCode(0x8002_0000));
        let bytes = dv.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, vec![0x02, 0x00, 0x00, 0x02, 0x80]);

        let mut r = bytes.as_slice();
        let decoded = DataValue::decode(&mut r, &ctx).unwrap();
        assert!(decoded.value.is_null());
        assert_eq!(decoded.source_timestamp, None);
        assert_eq!(decoded.source_picoseconds, None);
        assert_eq!(decoded.server_timestamp, None);
        assert_eq!(decoded.server_picoseconds, None);
        assert_eq!(decoded.status, Some(StatusCode(0x8002_0000)));
    }
}

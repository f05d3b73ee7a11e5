//! `StatusCode`: an opaque 32-bit wire value. The top two bits classify
//! Good/Uncertain/Bad; everything else the codec treats as opaque.

use std::io::{Read, Write};

use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct StatusCode(pub u32);

/// `BadTooManyOperations`, used by [`crate::transport::framing`] when a
/// message exceeds the configured chunk count.
pub const BAD_TOO_MANY_OPERATIONS: StatusCode = StatusCode(0x8100_0000);

impl StatusCode {
    pub const GOOD: StatusCode = StatusCode(0);

    pub fn is_good(&self) -> bool {
        self.0 & 0xC000_0000 == 0
    }

    pub fn is_uncertain(&self) -> bool {
        self.0 & 0xC000_0000 == 0x4000_0000
    }

    pub fn is_bad(&self) -> bool {
        self.0 & 0xC000_0000 == 0x8000_0000
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        StatusCode(value)
    }
}

impl BinaryEncode for StatusCode {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        4
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.0.encode(stream, ctx)
    }
}

impl BinaryDecode for StatusCode {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        Ok(StatusCode(u32::decode(stream, ctx)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn scenario_s6_status_code_bytes() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let status = StatusCode(0x8002_0000);
        let bytes = status.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, vec![0x00, 0x00, 0x02, 0x80]);
        assert!(status.is_bad());
    }

    #[test]
    fn good_is_not_bad_or_uncertain() {
        assert!(StatusCode::GOOD.is_good());
        assert!(!StatusCode::GOOD.is_bad());
        assert!(!StatusCode::GOOD.is_uncertain());
    }
}

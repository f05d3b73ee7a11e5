//! 128-bit `Guid`: four fields (32+16+16 bits, wire-little-endian) plus 8
//! raw trailing bytes, parseable from the canonical 8-4-4-4-12 hex form.
//!
//! Backed by `uuid::Uuid` for parsing/formatting and field layout, since the
//! `uuid` crate already encodes the same RFC 4122 field split this type
//! needs on the wire.

use std::io::{Read, Write};

use uuid::Uuid;

use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Guid(Uuid);

impl Guid {
    pub const fn nil() -> Self {
        Guid(Uuid::nil())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Guid(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parse the canonical 8-4-4-4-12 hex form (hyphenated, case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s)
            .map(Guid)
            .map_err(|e| Error::invalid_parameters(format!("malformed Guid '{s}': {e}")))
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Lexicographic compare field-by-field, with the trailing 8 bytes
    /// (Data4) compared as raw bytes -- matches `BuiltinId::Guid`'s C1
    /// compare contract.
    pub fn compare(&self, other: &Guid) -> std::cmp::Ordering {
        let (f1, f2, f3, d4) = self.0.as_fields();
        let (o1, o2, o3, od4) = other.0.as_fields();
        f1.cmp(&o1)
            .then(f2.cmp(&o2))
            .then(f3.cmp(&o3))
            .then(d4.cmp(od4))
    }
}

impl std::fmt::Display for Guid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl BinaryEncode for Guid {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        16
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        let (d1, d2, d3, d4) = self.0.as_fields();
        d1.encode(stream, ctx)?;
        d2.encode(stream, ctx)?;
        d3.encode(stream, ctx)?;
        stream.write_all(d4).map_err(Error::from)
    }
}

impl BinaryDecode for Guid {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let d1 = u32::decode(stream, ctx)?;
        let d2 = u16::decode(stream, ctx)?;
        let d3 = u16::decode(stream, ctx)?;
        let mut d4 = [0u8; 8];
        stream.read_exact(&mut d4).map_err(Error::from)?;
        Ok(Guid(Uuid::from_fields(d1, d2, d3, &d4)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn guid_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let guid = Guid::parse("72962b91-fa75-4ae6-8d28-b404dc7daf63").unwrap();
        let bytes = guid.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes.len(), 16);
        let mut r = bytes.as_slice();
        let decoded = Guid::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, guid);
    }

    #[test]
    fn nil_guid_is_nil() {
        assert!(Guid::nil().is_nil());
    }
}

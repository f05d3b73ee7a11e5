//! Endianness-normalized primitive read/write.
//!
//! Grounded on the free-function style of
//! `examples/other_examples/...async-opcua-types-src-encoding.rs.rs`
//! (`write_i32`/`read_i32`/...), adapted to return this crate's `Error` and
//! to use `byteorder::LittleEndian` the way the teacher crate already does
//! for its own integer/float writes.

use std::io::{Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Error, Result};

use super::{BinaryDecode, BinaryEncode, Context};

/// Canonical quiet-NaN bit pattern used so that any NaN, however it arrived,
/// round-trips to the same bits on both ends.
const CANONICAL_NAN_F32_BITS: u32 = 0x7fc0_0000;
const CANONICAL_NAN_F64_BITS: u64 = 0x7ff8_0000_0000_0000;

fn canonicalize_f32(v: f32) -> f32 {
    if v.is_nan() {
        f32::from_bits(CANONICAL_NAN_F32_BITS)
    } else {
        v
    }
}

fn canonicalize_f64(v: f64) -> f64 {
    if v.is_nan() {
        f64::from_bits(CANONICAL_NAN_F64_BITS)
    } else {
        v
    }
}

macro_rules! impl_scalar {
    ($ty:ty, $write_fn:ident, $read_fn:ident, $width:expr) => {
        impl BinaryEncode for $ty {
            fn byte_len(&self, _ctx: &Context<'_>) -> usize {
                $width
            }

            fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
                let mut buf = [0u8; $width];
                LittleEndian::$write_fn(&mut buf, *self);
                stream.write_all(&buf).map_err(Error::from)
            }
        }

        impl BinaryDecode for $ty {
            fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
                let mut buf = [0u8; $width];
                stream.read_exact(&mut buf).map_err(Error::from)?;
                Ok(LittleEndian::$read_fn(&buf))
            }
        }
    };
}

impl_scalar!(i16, write_i16, read_i16, 2);
impl_scalar!(u16, write_u16, read_u16, 2);
impl_scalar!(i32, write_i32, read_i32, 4);
impl_scalar!(u32, write_u32, read_u32, 4);
impl_scalar!(i64, write_i64, read_i64, 8);
impl_scalar!(u64, write_u64, read_u64, 8);

impl BinaryEncode for bool {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        1
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
        stream
            .write_all(&[if *self { 1 } else { 0 }])
            .map_err(Error::from)
    }
}

impl BinaryDecode for bool {
    fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
        let mut buf = [0u8; 1];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        // "A non-zero decoded byte becomes the canonical value 1."
        Ok(buf[0] != 0)
    }
}

impl BinaryEncode for i8 {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        1
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
        stream.write_all(&[*self as u8]).map_err(Error::from)
    }
}

impl BinaryDecode for i8 {
    fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
        let mut buf = [0u8; 1];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        Ok(buf[0] as i8)
    }
}

impl BinaryEncode for u8 {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        1
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
        stream.write_all(&[*self]).map_err(Error::from)
    }
}

impl BinaryDecode for u8 {
    fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
        let mut buf = [0u8; 1];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        Ok(buf[0])
    }
}

impl BinaryEncode for f32 {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        4
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
        let mut buf = [0u8; 4];
        LittleEndian::write_f32(&mut buf, canonicalize_f32(*self));
        stream.write_all(&buf).map_err(Error::from)
    }
}

impl BinaryDecode for f32 {
    fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
        let mut buf = [0u8; 4];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        Ok(canonicalize_f32(LittleEndian::read_f32(&buf)))
    }
}

impl BinaryEncode for f64 {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        8
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, _ctx: &Context<'_>) -> Result<()> {
        let mut buf = [0u8; 8];
        LittleEndian::write_f64(&mut buf, canonicalize_f64(*self));
        stream.write_all(&buf).map_err(Error::from)
    }
}

impl BinaryDecode for f64 {
    fn decode<R: Read + ?Sized>(stream: &mut R, _ctx: &Context<'_>) -> Result<Self> {
        let mut buf = [0u8; 8];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        Ok(canonicalize_f64(LittleEndian::read_f64(&buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    fn ctx(limits: &EncodingLimits) -> Context<'_> {
        Context::new(limits)
    }

    #[test]
    fn bool_nonzero_byte_normalizes_to_true() {
        let limits = EncodingLimits::standard();
        let mut buf: &[u8] = &[0x2a];
        let v = bool::decode(&mut buf, &ctx(&limits)).unwrap();
        assert!(v);
    }

    #[test]
    fn nan_round_trips_to_canonical_bits() {
        let limits = EncodingLimits::standard();
        let mut out = Vec::new();
        f64::NAN.encode(&mut out, &ctx(&limits)).unwrap();
        assert_eq!(
            &out,
            &CANONICAL_NAN_F64_BITS.to_le_bytes(),
            "encoded NaN must use the canonical bit pattern"
        );
        let mut input = out.as_slice();
        let decoded = f64::decode(&mut input, &ctx(&limits)).unwrap();
        assert!(decoded.is_nan());
        assert_eq!(decoded.to_bits(), CANONICAL_NAN_F64_BITS);
    }

    #[test]
    fn i32_little_endian_wire() {
        let limits = EncodingLimits::standard();
        let mut out = Vec::new();
        7i32.encode(&mut out, &ctx(&limits)).unwrap();
        assert_eq!(out, vec![0x07, 0x00, 0x00, 0x00]);
    }
}

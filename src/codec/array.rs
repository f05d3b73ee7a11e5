//! Generic array read/write: the `Option<Vec<T>>` shape shared by every
//! built-in and composite array field. Unlike [`super::bytes`]'s
//! `String`/`ByteString`, arrays do *not* preserve a null(-1)/empty(0)
//! distinction -- a -1 length collapses to an empty array on both encode and
//! decode, matching `SOPC_Variant_Write_Internal`'s "encode NULL arrays as
//! empty" and `SOPC_Read_Array`'s `if (*noOfElts < 0) *noOfElts = 0;`. `None`
//! here is only an in-memory convenience for "no elements provided"; it is
//! never distinguishable on the wire from `Some(vec![])`, and decode never
//! produces it.
//!
//! Grounded on the `Option<Vec<T>>` blanket impls in
//! `examples/other_examples/...async-opcua-types-src-encoding.rs.rs`. That
//! file bulk-`memcpy`s primitive-cell arrays on little-endian hosts as an
//! optimization; this crate keeps the plain element-wise loop for every type
//! except `u8`/`i8`, where [`write_byte_array`]/[`read_byte_array`] already
//! get a single bulk copy for free from `Write::write_all`/`Read::read_exact`
//! -- a correctness-preserving subset of that optimization that needs no
//! unsafe transmute.

use std::io::{Read, Write};

use crate::error::{Error, Result};

use super::{BinaryDecode, BinaryEncode, Context};

/// Decode a wire length, collapsing any negative value (canonically -1) to
/// an empty array rather than treating it as absent.
fn check_len(len: i32, ctx: &Context<'_>) -> Result<usize> {
    if len < 0 {
        return Ok(0);
    }
    let len = len as usize;
    if len as u64 > ctx.limits().max_array_length as u64 {
        return Err(Error::out_of_memory(format!(
            "array length {} exceeds max_array_length {}",
            len,
            ctx.limits().max_array_length
        )));
    }
    Ok(len)
}

/// Write an `Option<Vec<T>>` as OPC UA encodes it: a 4-byte length followed
/// by each element in order. `None` encodes identically to `Some(vec![])`
/// -- length 0, no elements.
pub fn write_array<T, W>(items: &Option<Vec<T>>, stream: &mut W, ctx: &Context<'_>) -> Result<()>
where
    T: BinaryEncode,
    W: Write + ?Sized,
{
    match items {
        None => 0i32.encode(stream, ctx),
        Some(v) => {
            (v.len() as i32).encode(stream, ctx)?;
            for item in v {
                item.encode(stream, ctx)?;
            }
            Ok(())
        }
    }
}

pub fn array_byte_len<T: BinaryEncode>(items: &Option<Vec<T>>, ctx: &Context<'_>) -> usize {
    4 + items
        .as_ref()
        .map_or(0, |v| v.iter().map(|i| i.byte_len(ctx)).sum())
}

/// Read an `Option<Vec<T>>`, rejecting a claimed length over
/// `max_array_length` before any per-element allocation happens. Always
/// returns `Some` -- a negative wire length decodes to `Some(vec![])`.
pub fn read_array<T, R>(stream: &mut R, ctx: &Context<'_>) -> Result<Option<Vec<T>>>
where
    T: BinaryDecode,
    R: Read + ?Sized,
{
    let len = i32::decode(stream, ctx)?;
    let len = check_len(len, ctx)?;
    let mut items = Vec::new();
    items.try_reserve(len).map_err(|_| {
        Error::out_of_memory(format!("failed to reserve {len} array elements"))
    })?;
    for _ in 0..len {
        items.push(T::decode(stream, ctx)?);
    }
    Ok(Some(items))
}

/// Write a `Byte`/`SByte` array with a single bulk copy, relying on
/// `write_all` rather than looping per element. `None` encodes identically
/// to `Some(vec![])` -- length 0, no bytes.
pub fn write_byte_array<W: Write + ?Sized>(
    items: &Option<Vec<u8>>,
    stream: &mut W,
    ctx: &Context<'_>,
) -> Result<()> {
    match items {
        None => 0i32.encode(stream, ctx),
        Some(v) => {
            (v.len() as i32).encode(stream, ctx)?;
            stream.write_all(v).map_err(Error::from)
        }
    }
}

/// Read a `Byte`/`SByte` array with a single bulk copy via `read_exact`.
/// Always returns `Some` -- a negative wire length decodes to `Some(vec![])`.
pub fn read_byte_array<R: Read + ?Sized>(
    stream: &mut R,
    ctx: &Context<'_>,
) -> Result<Option<Vec<u8>>> {
    let len = i32::decode(stream, ctx)?;
    let len = check_len(len, ctx)?;
    let mut buf = vec![0u8; len];
    stream.read_exact(&mut buf).map_err(Error::from)?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn int32_array_round_trip_scenario_s5() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let values: Option<Vec<i32>> = Some(vec![1, 2, 3]);
        let mut out = Vec::new();
        write_array(&values, &mut out, &ctx).unwrap();
        assert_eq!(
            out,
            vec![
                0x03, 0x00, 0x00, 0x00, // length 3
                0x01, 0x00, 0x00, 0x00, // 1
                0x02, 0x00, 0x00, 0x00, // 2
                0x03, 0x00, 0x00, 0x00, // 3
            ]
        );
        let mut r: &[u8] = &out;
        let decoded: Option<Vec<i32>> = read_array(&mut r, &ctx).unwrap();
        assert_eq!(decoded, values);
    }

    #[test]
    fn null_array_encodes_as_empty() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let values: Option<Vec<i32>> = None;
        let mut out = Vec::new();
        write_array(&values, &mut out, &ctx).unwrap();
        assert_eq!(out, vec![0x00, 0x00, 0x00, 0x00]);

        let mut r: &[u8] = &out;
        let decoded: Option<Vec<i32>> = read_array(&mut r, &ctx).unwrap();
        assert_eq!(decoded, Some(vec![]));
    }

    #[test]
    fn minus_one_length_decodes_as_empty_not_null() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut out = Vec::new();
        (-1i32).encode(&mut out, &ctx).unwrap();
        let mut r: &[u8] = &out;
        let decoded: Option<Vec<i32>> = read_array(&mut r, &ctx).unwrap();
        assert_eq!(decoded, Some(vec![]));
    }

    #[test]
    fn oversized_array_rejected_before_allocating() {
        let limits = EncodingLimits::builder().max_array_length(2).build().unwrap();
        let ctx = Context::new(&limits);
        let mut bytes: Vec<u8> = vec![];
        (i32::MAX).encode(&mut bytes, &ctx).unwrap();
        let mut r: &[u8] = &bytes;
        let err = read_array::<i32, _>(&mut r, &ctx).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::OutOfMemory);
    }

    #[test]
    fn byte_array_bulk_round_trip() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let values = Some(vec![1u8, 2, 3, 4]);
        let mut out = Vec::new();
        write_byte_array(&values, &mut out, &ctx).unwrap();
        let mut r: &[u8] = &out;
        let decoded = read_byte_array(&mut r, &ctx).unwrap();
        assert_eq!(decoded, values);
    }
}

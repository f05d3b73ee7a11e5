//! String / ByteString / XmlElement: a semantic (length, bytes) pair where
//! length -1 is the null value, distinct from the zero-length value, plus an
//! ownership flag recording whether the backing storage is externally owned
//! (set by "attach", cleared by "copy").
//!
//! Per spec.md §9's design note, the ownership flag is modeled as a sum type
//! rather than a nullable buffer plus a boolean: `Cow<'static, [u8]>` is the
//! standard library's own `{Owned(Vec<u8>), Borrowed(&[u8])}`, so `attach`
//! produces `Cow::Borrowed` and `deep_copy`/decode always produce
//! `Cow::Owned`.

use std::borrow::Cow;
use std::io::{Read, Write};

use crate::error::{Error, Result};

use super::{BinaryDecode, BinaryEncode, Context};

/// A length-prefixed byte string. `None` is the OPC UA null value (wire
/// length -1); `Some(Cow::Borrowed(&[]))` / `Some(Cow::Owned(vec![]))` are
/// both the empty value (wire length 0) and compare equal.
#[derive(Debug, Clone, Default)]
pub struct ByteString(pub Option<Cow<'static, [u8]>>);

impl PartialEq for ByteString {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => a.as_ref() == b.as_ref(),
            _ => false,
        }
    }
}
impl Eq for ByteString {}

impl ByteString {
    pub const fn null() -> Self {
        ByteString(None)
    }

    pub fn empty() -> Self {
        ByteString(Some(Cow::Owned(Vec::new())))
    }

    /// Attach a caller-owned static buffer without copying it. Clearing this
    /// value never frees `bytes` -- mirrors the C API's "attach" family.
    pub const fn attach(bytes: &'static [u8]) -> Self {
        ByteString(Some(Cow::Borrowed(bytes)))
    }

    pub fn from_vec(bytes: Vec<u8>) -> Self {
        ByteString(Some(Cow::Owned(bytes)))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Wire-length semantics: -1 for null, else the byte length.
    pub fn wire_len(&self) -> i32 {
        match &self.0 {
            None => -1,
            Some(b) => b.len() as i32,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    /// Deep-copy this value: always produces an owned buffer, and never
    /// retains a borrow of the source's storage (matches the C API's "copy"
    /// family, which clears the source's ownership flag on the destination).
    pub fn deep_copy(&self) -> Self {
        ByteString(self.0.as_ref().map(|b| Cow::Owned(b.to_vec())))
    }

    /// Inclusive `[start..end]` byte-range extract. Out-of-range requests
    /// yield an empty result, never an error (per spec.md's Variant range-get
    /// semantics, which this type shares since ByteString/String are the two
    /// scalar types a range-get may dereference).
    pub fn range_get(&self, start: usize, end: usize) -> ByteString {
        match &self.0 {
            None => ByteString::null(),
            Some(b) => {
                if start > end || start >= b.len() {
                    ByteString::empty()
                } else {
                    let end = end.min(b.len().saturating_sub(1));
                    ByteString::from_vec(b[start..=end].to_vec())
                }
            }
        }
    }
}

impl BinaryEncode for ByteString {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        4 + self.0.as_ref().map_or(0, |b| b.len())
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.wire_len().encode(stream, ctx)?;
        if let Some(bytes) = &self.0 {
            stream.write_all(bytes).map_err(Error::from)?;
        }
        Ok(())
    }
}

impl BinaryDecode for ByteString {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let len = i32::decode(stream, ctx)?;
        if len < -1 {
            return Err(Error::encoding("negative ByteString length other than -1"));
        }
        if len == -1 {
            return Ok(ByteString::null());
        }
        let len = len as usize;
        if len as u64 > ctx.limits().max_string_length as u64 {
            return Err(Error::out_of_memory(format!(
                "ByteString length {} exceeds max_string_length {}",
                len,
                ctx.limits().max_string_length
            )));
        }
        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).map_err(Error::from)?;
        Ok(ByteString::from_vec(buf))
    }
}

/// A length-prefixed UTF-8 string with the same null/empty distinction as
/// [`ByteString`].
#[derive(Debug, Clone, Default)]
pub struct UaString(pub Option<Cow<'static, str>>);

impl PartialEq for UaString {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_deref() == other.0.as_deref()
    }
}
impl Eq for UaString {}

impl UaString {
    pub const fn null() -> Self {
        UaString(None)
    }

    pub fn empty() -> Self {
        UaString(Some(Cow::Owned(String::new())))
    }

    pub const fn attach(s: &'static str) -> Self {
        UaString(Some(Cow::Borrowed(s)))
    }

    pub fn from_string(s: String) -> Self {
        UaString(Some(Cow::Owned(s)))
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn wire_len(&self) -> i32 {
        self.0.as_ref().map_or(-1, |s| s.len() as i32)
    }

    pub fn deep_copy(&self) -> Self {
        UaString(self.0.as_ref().map(|s| Cow::Owned(s.to_string())))
    }

    /// Byte-range extract, dereferencing the string as its UTF-8 bytes (see
    /// [`ByteString::range_get`]). The result is not re-validated as UTF-8
    /// by this call; callers that need a `UaString` back should go through
    /// `ByteString` and re-encode, mirroring the C API which treats this as
    /// a raw byte operation.
    pub fn byte_range_get(&self, start: usize, end: usize) -> ByteString {
        match &self.0 {
            None => ByteString::null(),
            Some(s) => ByteString::from_vec(s.as_bytes().to_vec()).range_get(start, end),
        }
    }
}

impl From<&'static str> for UaString {
    fn from(s: &'static str) -> Self {
        UaString::attach(s)
    }
}

impl From<String> for UaString {
    fn from(s: String) -> Self {
        UaString::from_string(s)
    }
}

impl BinaryEncode for UaString {
    fn byte_len(&self, _ctx: &Context<'_>) -> usize {
        4 + self.0.as_ref().map_or(0, |s| s.len())
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.wire_len().encode(stream, ctx)?;
        if let Some(s) = &self.0 {
            stream.write_all(s.as_bytes()).map_err(Error::from)?;
        }
        Ok(())
    }
}

impl BinaryDecode for UaString {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let bytes = ByteString::decode(stream, ctx)?;
        match bytes.0 {
            None => Ok(UaString::null()),
            Some(b) => {
                let s = String::from_utf8(b.into_owned())
                    .map_err(|e| Error::encoding(format!("string is not valid UTF-8: {e}")))?;
                Ok(UaString::from_string(s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn null_and_empty_string_are_distinct_on_the_wire() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);

        let mut null_bytes = Vec::new();
        UaString::null().encode(&mut null_bytes, &ctx).unwrap();
        assert_eq!(null_bytes, vec![0xff, 0xff, 0xff, 0xff]);

        let mut empty_bytes = Vec::new();
        UaString::empty().encode(&mut empty_bytes, &ctx).unwrap();
        assert_eq!(empty_bytes, vec![0x00, 0x00, 0x00, 0x00]);

        assert_ne!(null_bytes, empty_bytes);

        let mut r: &[u8] = &null_bytes;
        assert!(UaString::decode(&mut r, &ctx).unwrap().is_null());
        let mut r: &[u8] = &empty_bytes;
        assert_eq!(
            UaString::decode(&mut r, &ctx).unwrap().as_str(),
            Some("")
        );
    }

    #[test]
    fn string_round_trip_ok() {
        // Scenario S3 from spec.md §8.
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let s = UaString::from_string("OK".to_string());
        let mut out = Vec::new();
        s.encode(&mut out, &ctx).unwrap();
        assert_eq!(out, vec![0x02, 0x00, 0x00, 0x00, 0x4F, 0x4B]);

        let mut r: &[u8] = &out;
        let decoded = UaString::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded.as_str(), Some("OK"));
    }

    #[test]
    fn null_string_scenario_s4() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut out = Vec::new();
        UaString::null().encode(&mut out, &ctx).unwrap();
        assert_eq!(out, vec![0xFF, 0xFF, 0xFF, 0xFF]);
        let mut r: &[u8] = &out;
        assert_eq!(i32::decode(&mut r, &ctx).is_err(), false);
    }

    #[test]
    fn oversized_string_rejected_without_allocating() {
        let limits = EncodingLimits::builder()
            .max_string_length(4)
            .build()
            .unwrap();
        let ctx = Context::new(&limits);
        let mut bytes: Vec<u8> = vec![10, 0, 0, 0]; // claims length 10
        bytes.extend(std::iter::repeat(0u8).take(2)); // but not enough data follows
        let mut r: &[u8] = &bytes;
        let err = ByteString::decode(&mut r, &ctx).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::OutOfMemory);
    }

    #[test]
    fn range_get_out_of_range_is_empty_not_error() {
        let bs = ByteString::from_vec(vec![1, 2, 3]);
        assert_eq!(bs.range_get(10, 20), ByteString::empty());
    }
}

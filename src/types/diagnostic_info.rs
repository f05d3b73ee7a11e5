//! `DiagnosticInfo`: a recursive record of seven optional fields, whose
//! `inner_diagnostic_info` field makes it a linked list capped by
//! `max_nested_diag_info` (spec.md §3, §4.3).

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::UaString;
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::diagnostic_info_encoding;
use crate::error::Result;

use super::status_code::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagnosticInfo {
    pub symbolic_id: Option<i32>,
    pub namespace: Option<i32>,
    pub localized_text: Option<i32>,
    pub locale: Option<i32>,
    pub additional_info: Option<UaString>,
    pub inner_status_code: Option<StatusCode>,
    pub inner_diagnostic_info: Option<Box<DiagnosticInfo>>,
}

impl DiagnosticInfo {
    pub fn is_null(&self) -> bool {
        self.symbolic_id.is_none()
            && self.namespace.is_none()
            && self.localized_text.is_none()
            && self.locale.is_none()
            && self.additional_info.is_none()
            && self.inner_status_code.is_none()
            && self.inner_diagnostic_info.is_none()
    }

    /// Depth of the `inner_diagnostic_info` chain, including `self`.
    pub fn depth(&self) -> u32 {
        let mut depth = 1;
        let mut cur = self.inner_diagnostic_info.as_deref();
        while let Some(d) = cur {
            depth += 1;
            cur = d.inner_diagnostic_info.as_deref();
        }
        depth
    }

    /// Field-by-field ordering, recursing into the `inner_diagnostic_info`
    /// chain; `None` sorts before `Some` at every optional field.
    pub fn compare(&self, other: &DiagnosticInfo) -> Ordering {
        self.symbolic_id
            .cmp(&other.symbolic_id)
            .then_with(|| self.namespace.cmp(&other.namespace))
            .then_with(|| self.localized_text.cmp(&other.localized_text))
            .then_with(|| self.locale.cmp(&other.locale))
            .then_with(|| {
                self.additional_info
                    .as_ref()
                    .and_then(|s| s.as_bytes())
                    .cmp(&other.additional_info.as_ref().and_then(|s| s.as_bytes()))
            })
            .then_with(|| self.inner_status_code.cmp(&other.inner_status_code))
            .then_with(|| match (&self.inner_diagnostic_info, &other.inner_diagnostic_info) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.compare(b),
            })
    }
}

impl BinaryEncode for DiagnosticInfo {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        1 + self.symbolic_id.map_or(0, |_| 4)
            + self.namespace.map_or(0, |_| 4)
            + self.localized_text.map_or(0, |_| 4)
            + self.locale.map_or(0, |_| 4)
            + self.additional_info.as_ref().map_or(0, |s| s.byte_len(ctx))
            + self.inner_status_code.map_or(0, |_| 4)
            + self
                .inner_diagnostic_info
                .as_ref()
                .map_or(0, |d| d.byte_len(ctx))
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        let mut mask = 0u8;
        if self.symbolic_id.is_some() {
            mask |= diagnostic_info_encoding::SYMBOLIC_ID;
        }
        if self.namespace.is_some() {
            mask |= diagnostic_info_encoding::NAMESPACE;
        }
        if self.localized_text.is_some() {
            mask |= diagnostic_info_encoding::LOCALIZED_TEXT;
        }
        if self.locale.is_some() {
            mask |= diagnostic_info_encoding::LOCALE;
        }
        if self.additional_info.is_some() {
            mask |= diagnostic_info_encoding::ADDITIONAL_INFO;
        }
        if self.inner_status_code.is_some() {
            mask |= diagnostic_info_encoding::INNER_STATUS_CODE;
        }
        if self.inner_diagnostic_info.is_some() {
            mask |= diagnostic_info_encoding::INNER_DIAGNOSTIC_INFO;
        }
        mask.encode(stream, ctx)?;
        if let Some(v) = self.symbolic_id {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.namespace {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.localized_text {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.locale {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = &self.additional_info {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = self.inner_status_code {
            v.encode(stream, ctx)?;
        }
        if let Some(v) = &self.inner_diagnostic_info {
            let inner_ctx = ctx.enter_diag_info()?;
            v.encode(stream, &inner_ctx)?;
        }
        Ok(())
    }
}

impl BinaryDecode for DiagnosticInfo {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let mask = u8::decode(stream, ctx)?;
        let mut info = DiagnosticInfo::default();
        if mask & diagnostic_info_encoding::SYMBOLIC_ID != 0 {
            info.symbolic_id = Some(i32::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::NAMESPACE != 0 {
            info.namespace = Some(i32::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::LOCALIZED_TEXT != 0 {
            info.localized_text = Some(i32::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::LOCALE != 0 {
            info.locale = Some(i32::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::ADDITIONAL_INFO != 0 {
            info.additional_info = Some(UaString::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::INNER_STATUS_CODE != 0 {
            info.inner_status_code = Some(StatusCode::decode(stream, ctx)?);
        }
        if mask & diagnostic_info_encoding::INNER_DIAGNOSTIC_INFO != 0 {
            let inner_ctx = ctx.enter_diag_info()?;
            info.inner_diagnostic_info = Some(Box::new(DiagnosticInfo::decode(stream, &inner_ctx)?));
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn empty_diagnostic_info_is_a_single_zero_byte() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let info = DiagnosticInfo::default();
        let bytes = info.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, vec![0x00]);
        assert!(info.is_null());
    }

    #[test]
    fn nesting_cap_rejects_overdeep_chain() {
        // Testable property 5 (DiagnosticInfo's independent counter).
        let limits = EncodingLimits::builder().max_nested_diag_info(2).build().unwrap();
        let ctx = Context::new(&limits);
        let mut chain = DiagnosticInfo::default();
        for _ in 0..5 {
            chain = DiagnosticInfo {
                inner_diagnostic_info: Some(Box::new(chain)),
                ..Default::default()
            };
        }
        let err = chain.encode_to_vec(&ctx).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::InvalidState);
    }

    #[test]
    fn round_trips_with_inner_chain() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let info = DiagnosticInfo {
            symbolic_id: Some(3),
            inner_diagnostic_info: Some(Box::new(DiagnosticInfo {
                locale: Some(1),
                ..Default::default()
            })),
            ..Default::default()
        };
        let bytes = info.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = DiagnosticInfo::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, info);
    }
}

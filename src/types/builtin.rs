//! Built-in Type Registry (C1): a uniform vtable-like set of operations --
//! size, initialize, clear, copy, compare, encode, decode -- over the 25
//! OPC UA built-in types, indexed by [`BuiltinId`].
//!
//! Per spec.md §9's design note, this is realized as a closed tagged union
//! ([`ScalarValue`], in `variant.rs`) plus free functions dispatching on it,
//! rather than a literal function-pointer table indexed by an integer --
//! Rust's exhaustive `match` over the enum *is* the vtable, checked at
//! compile time. `clear`/`initialize` collapse into ordinary construction
//! and `Drop`: there is no separate release step to forget to call.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::{ByteString, UaString};
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::BuiltinId;
use crate::error::{Error, Result};

use super::data_value::DataValue;
use super::diagnostic_info::DiagnosticInfo;
use super::expanded_node_id::ExpandedNodeId;
use super::extension_object::ExtensionObject;
use super::guid::Guid;
use super::localized_text::LocalizedText;
use super::node_id::NodeId;
use super::qualified_name::QualifiedName;
use super::status_code::StatusCode;
use super::variant::{self, ScalarValue, Variant};

pub use variant::{decode_scalar as decode, encode_scalar as encode, scalar_byte_len as byte_len};

/// `initialize`: the type's zero state. `Null`'s zero state has no
/// representation as a `ScalarValue` (see [`ScalarValue`]'s doc comment),
/// so it is rejected here the same way [`decode`] rejects it.
pub fn zero_value(id: BuiltinId) -> Result<ScalarValue> {
    use BuiltinId::*;
    Ok(match id {
        Null => return Err(Error::invalid_parameters("Null has no built-in cell value")),
        Boolean => ScalarValue::Boolean(false),
        SByte => ScalarValue::SByte(0),
        Byte => ScalarValue::Byte(0),
        Int16 => ScalarValue::Int16(0),
        UInt16 => ScalarValue::UInt16(0),
        Int32 => ScalarValue::Int32(0),
        UInt32 => ScalarValue::UInt32(0),
        Int64 => ScalarValue::Int64(0),
        UInt64 => ScalarValue::UInt64(0),
        Float => ScalarValue::Float(0.0),
        Double => ScalarValue::Double(0.0),
        String => ScalarValue::String(UaString::null()),
        DateTime => ScalarValue::DateTime(super::date_time::DateTime::MIN),
        Guid => ScalarValue::Guid(Guid::nil()),
        ByteString => ScalarValue::ByteString(ByteString::null()),
        XmlElement => ScalarValue::XmlElement(ByteString::null()),
        NodeId => ScalarValue::NodeId(Box::new(NodeId::null_numeric())),
        ExpandedNodeId => {
            ScalarValue::ExpandedNodeId(Box::new(ExpandedNodeId::local(NodeId::null_numeric())))
        }
        StatusCode => ScalarValue::StatusCode(StatusCode::GOOD),
        QualifiedName => ScalarValue::QualifiedName(Box::new(QualifiedName::default())),
        LocalizedText => ScalarValue::LocalizedText(Box::new(LocalizedText::default())),
        ExtensionObject => ScalarValue::ExtensionObject(Box::new(ExtensionObject::none())),
        DataValue => ScalarValue::DataValue(Box::new(self::DataValue::default())),
        Variant => ScalarValue::Variant(Box::new(self::Variant::null())),
        DiagnosticInfo => ScalarValue::DiagnosticInfo(Box::new(DiagnosticInfo::default())),
    })
}

/// `copy`: a deep copy, independent of any shared storage in `src` (mirrors
/// spec.md's "copy operations" clearing the ownership flag on the result).
/// `ScalarValue` has value semantics throughout, so `Clone` already does
/// this; kept as a named entry point to mirror the C1 contract in C4.
pub fn copy(src: &ScalarValue) -> ScalarValue {
    src.clone()
}

/// `compare`: per-type ordering, delegating to [`variant::compare_scalar`].
/// Returns `invalid-parameters` if `a` and `b` are not the same built-in
/// type, which the C API's untyped `void*` signature cannot express but
/// which is always a caller bug here.
pub fn compare(a: &ScalarValue, b: &ScalarValue) -> Result<Ordering> {
    if a.builtin_id() != b.builtin_id() {
        return Err(Error::invalid_parameters(
            "compare requires both cells to be the same built-in type",
        ));
    }
    Ok(variant::compare_scalar(a, b))
}

/// `size`: this crate's in-memory cells are not fixed-size C structs, so
/// `size` here means "exact encoded wire length", which is the sense C3
/// and C4 actually need it in.
pub fn size(value: &ScalarValue, ctx: &Context<'_>) -> usize {
    byte_len(value, ctx)
}

#[allow(unused)]
fn assert_vtable_shape<R: Read + ?Sized, W: Write + ?Sized>() {
    let _: fn(BuiltinId, &mut R, &Context<'_>) -> Result<ScalarValue> = decode;
    let _: fn(&ScalarValue, &mut W, &Context<'_>) -> Result<()> = encode;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn null_is_rejected_not_a_cell_value() {
        assert!(zero_value(BuiltinId::Null).is_err());
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut buf: &[u8] = &[];
        assert!(decode(BuiltinId::Null, &mut buf, &ctx).is_err());
    }

    #[test]
    fn every_non_null_builtin_round_trips() {
        // Testable property 1, restricted to defaults (per-value fuzzing
        // lives in the codec-level unit tests for each concrete type).
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        for raw in 1..BuiltinId::COUNT as u8 {
            let id = BuiltinId::from_u8(raw).unwrap();
            let value = zero_value(id).unwrap();
            let bytes = {
                let mut out = Vec::new();
                encode(&value, &mut out, &ctx).unwrap();
                out
            };
            let mut r = bytes.as_slice();
            let decoded = decode(id, &mut r, &ctx).unwrap();
            assert_eq!(compare(&value, &decoded).unwrap(), Ordering::Equal);
        }
    }
}

//! `Variant`: a self-describing value carrier holding any built-in type as
//! a scalar, a one-dimensional array, or a row-major matrix.
//!
//! Per spec.md §9's design note, the ownership flag called for on array
//! storage ("owned (cleared on drop) or borrowed (not cleared)") is
//! realized with `Rc<Vec<ScalarValue>>` rather than a boolean: a shallow
//! copy is `Rc::clone` (cheap, shared storage, nothing to free explicitly),
//! and [`Variant::set_range`] calls `Rc::make_mut`, which clones the
//! backing vector the moment a second owner exists and otherwise mutates in
//! place -- exactly the "copy to private storage before partial mutation"
//! rule in spec.md §4.2, for free from the standard library.

use std::cmp::Ordering;
use std::io::{Read, Write};
use std::rc::Rc;

use crate::codec::bytes::{ByteString, UaString};
use crate::codec::{array, BinaryDecode, BinaryEncode, Context};
use crate::constants::{variant_encoding, BuiltinId};
use crate::error::{Error, Result};

use super::data_value::DataValue;
use super::date_time::DateTime;
use super::diagnostic_info::DiagnosticInfo;
use super::expanded_node_id::ExpandedNodeId;
use super::extension_object::ExtensionObject;
use super::guid::Guid;
use super::localized_text::LocalizedText;
use super::node_id::NodeId;
use super::qualified_name::QualifiedName;
use super::status_code::StatusCode;

/// The value a single Variant cell can hold. `Variant` nests here only
/// because it is a legal *array element* type, never a legal scalar --
/// enforced by [`Variant::scalar`] and by decode.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(UaString),
    DateTime(DateTime),
    Guid(Guid),
    ByteString(ByteString),
    XmlElement(ByteString),
    NodeId(Box<NodeId>),
    ExpandedNodeId(Box<ExpandedNodeId>),
    StatusCode(StatusCode),
    QualifiedName(Box<QualifiedName>),
    LocalizedText(Box<LocalizedText>),
    ExtensionObject(Box<ExtensionObject>),
    DataValue(Box<DataValue>),
    Variant(Box<Variant>),
    DiagnosticInfo(Box<DiagnosticInfo>),
}

impl ScalarValue {
    pub fn builtin_id(&self) -> BuiltinId {
        use ScalarValue::*;
        match self {
            Boolean(_) => BuiltinId::Boolean,
            SByte(_) => BuiltinId::SByte,
            Byte(_) => BuiltinId::Byte,
            Int16(_) => BuiltinId::Int16,
            UInt16(_) => BuiltinId::UInt16,
            Int32(_) => BuiltinId::Int32,
            UInt32(_) => BuiltinId::UInt32,
            Int64(_) => BuiltinId::Int64,
            UInt64(_) => BuiltinId::UInt64,
            Float(_) => BuiltinId::Float,
            Double(_) => BuiltinId::Double,
            String(_) => BuiltinId::String,
            DateTime(_) => BuiltinId::DateTime,
            Guid(_) => BuiltinId::Guid,
            ByteString(_) => BuiltinId::ByteString,
            XmlElement(_) => BuiltinId::XmlElement,
            NodeId(_) => BuiltinId::NodeId,
            ExpandedNodeId(_) => BuiltinId::ExpandedNodeId,
            StatusCode(_) => BuiltinId::StatusCode,
            QualifiedName(_) => BuiltinId::QualifiedName,
            LocalizedText(_) => BuiltinId::LocalizedText,
            ExtensionObject(_) => BuiltinId::ExtensionObject,
            DataValue(_) => BuiltinId::DataValue,
            Variant(_) => BuiltinId::Variant,
            DiagnosticInfo(_) => BuiltinId::DiagnosticInfo,
        }
    }
}

pub(crate) fn encode_scalar<W: Write + ?Sized>(
    value: &ScalarValue,
    stream: &mut W,
    ctx: &Context<'_>,
) -> Result<()> {
    use ScalarValue::*;
    match value {
        Boolean(v) => v.encode(stream, ctx),
        SByte(v) => v.encode(stream, ctx),
        Byte(v) => v.encode(stream, ctx),
        Int16(v) => v.encode(stream, ctx),
        UInt16(v) => v.encode(stream, ctx),
        Int32(v) => v.encode(stream, ctx),
        UInt32(v) => v.encode(stream, ctx),
        Int64(v) => v.encode(stream, ctx),
        UInt64(v) => v.encode(stream, ctx),
        Float(v) => v.encode(stream, ctx),
        Double(v) => v.encode(stream, ctx),
        String(v) => v.encode(stream, ctx),
        DateTime(v) => v.encode(stream, ctx),
        Guid(v) => v.encode(stream, ctx),
        ByteString(v) => v.encode(stream, ctx),
        XmlElement(v) => v.encode(stream, ctx),
        NodeId(v) => v.encode(stream, ctx),
        ExpandedNodeId(v) => v.encode(stream, ctx),
        StatusCode(v) => v.encode(stream, ctx),
        QualifiedName(v) => v.encode(stream, ctx),
        LocalizedText(v) => v.encode(stream, ctx),
        ExtensionObject(v) => v.encode(stream, ctx),
        DataValue(v) => {
            let inner = ctx.enter_struct()?;
            v.encode(stream, &inner)
        }
        Variant(v) => {
            let inner = ctx.enter_struct()?;
            v.encode(stream, &inner)
        }
        DiagnosticInfo(v) => v.encode(stream, ctx),
    }
}

pub(crate) fn scalar_byte_len(value: &ScalarValue, ctx: &Context<'_>) -> usize {
    use ScalarValue::*;
    match value {
        Boolean(v) => v.byte_len(ctx),
        SByte(v) => v.byte_len(ctx),
        Byte(v) => v.byte_len(ctx),
        Int16(v) => v.byte_len(ctx),
        UInt16(v) => v.byte_len(ctx),
        Int32(v) => v.byte_len(ctx),
        UInt32(v) => v.byte_len(ctx),
        Int64(v) => v.byte_len(ctx),
        UInt64(v) => v.byte_len(ctx),
        Float(v) => v.byte_len(ctx),
        Double(v) => v.byte_len(ctx),
        String(v) => v.byte_len(ctx),
        DateTime(v) => v.byte_len(ctx),
        Guid(v) => v.byte_len(ctx),
        ByteString(v) => v.byte_len(ctx),
        XmlElement(v) => v.byte_len(ctx),
        NodeId(v) => v.byte_len(ctx),
        ExpandedNodeId(v) => v.byte_len(ctx),
        StatusCode(v) => v.byte_len(ctx),
        QualifiedName(v) => v.byte_len(ctx),
        LocalizedText(v) => v.byte_len(ctx),
        ExtensionObject(v) => v.byte_len(ctx),
        DataValue(v) => v.byte_len(ctx),
        Variant(v) => v.byte_len(ctx),
        DiagnosticInfo(v) => v.byte_len(ctx),
    }
}

pub(crate) fn decode_scalar<R: Read + ?Sized>(
    builtin_id: BuiltinId,
    stream: &mut R,
    ctx: &Context<'_>,
) -> Result<ScalarValue> {
    use BuiltinId::*;
    Ok(match builtin_id {
        Null => return Err(Error::encoding("Null is not a valid Variant cell type")),
        Boolean => ScalarValue::Boolean(bool::decode(stream, ctx)?),
        SByte => ScalarValue::SByte(i8::decode(stream, ctx)?),
        Byte => ScalarValue::Byte(u8::decode(stream, ctx)?),
        Int16 => ScalarValue::Int16(i16::decode(stream, ctx)?),
        UInt16 => ScalarValue::UInt16(u16::decode(stream, ctx)?),
        Int32 => ScalarValue::Int32(i32::decode(stream, ctx)?),
        UInt32 => ScalarValue::UInt32(u32::decode(stream, ctx)?),
        Int64 => ScalarValue::Int64(i64::decode(stream, ctx)?),
        UInt64 => ScalarValue::UInt64(u64::decode(stream, ctx)?),
        Float => ScalarValue::Float(f32::decode(stream, ctx)?),
        Double => ScalarValue::Double(f64::decode(stream, ctx)?),
        String => ScalarValue::String(UaString::decode(stream, ctx)?),
        DateTime => ScalarValue::DateTime(super::date_time::DateTime::decode(stream, ctx)?),
        Guid => ScalarValue::Guid(Guid::decode(stream, ctx)?),
        ByteString => ScalarValue::ByteString(ByteString::decode(stream, ctx)?),
        XmlElement => ScalarValue::XmlElement(ByteString::decode(stream, ctx)?),
        NodeId => ScalarValue::NodeId(Box::new(super::node_id::NodeId::decode(stream, ctx)?)),
        ExpandedNodeId => {
            ScalarValue::ExpandedNodeId(Box::new(ExpandedNodeId::decode(stream, ctx)?))
        }
        StatusCode => ScalarValue::StatusCode(StatusCode::decode(stream, ctx)?),
        QualifiedName => ScalarValue::QualifiedName(Box::new(QualifiedName::decode(stream, ctx)?)),
        LocalizedText => {
            ScalarValue::LocalizedText(Box::new(LocalizedText::decode(stream, ctx)?))
        }
        ExtensionObject => {
            ScalarValue::ExtensionObject(Box::new(super::extension_object::decode_with_registry(
                stream, ctx,
            )?))
        }
        DataValue => {
            let inner = ctx.enter_struct()?;
            ScalarValue::DataValue(Box::new(DataValue::decode(stream, &inner)?))
        }
        Variant => {
            let inner = ctx.enter_struct()?;
            ScalarValue::Variant(Box::new(self::Variant::decode(stream, &inner)?))
        }
        DiagnosticInfo => ScalarValue::DiagnosticInfo(Box::new(DiagnosticInfo::decode(stream, ctx)?)),
    })
}

#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Scalar(ScalarValue),
    Array {
        element_type: BuiltinId,
        values: Rc<Vec<ScalarValue>>,
    },
    Matrix {
        element_type: BuiltinId,
        dims: Vec<i32>,
        values: Rc<Vec<ScalarValue>>,
    },
}

/// `None` is the null Variant (wire type id 0, no flags, no body).
#[derive(Debug, Clone, PartialEq)]
pub struct Variant(Option<Shape>);

impl Default for Variant {
    fn default() -> Self {
        Variant::null()
    }
}

impl Variant {
    pub fn null() -> Self {
        Variant(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// Build a scalar Variant. Rejects `ScalarValue::Variant` -- a Variant
    /// is never a legal scalar cell type (spec.md §3), only a legal array
    /// element.
    pub fn scalar(value: ScalarValue) -> Result<Self> {
        if matches!(value, ScalarValue::Variant(_)) {
            return Err(Error::invalid_parameters(
                "a Variant cannot hold another Variant as a scalar",
            ));
        }
        Ok(Variant(Some(Shape::Scalar(value))))
    }

    pub fn array(element_type: BuiltinId, values: Vec<ScalarValue>) -> Self {
        Variant(Some(Shape::Array {
            element_type,
            values: Rc::new(values),
        }))
    }

    pub fn matrix(element_type: BuiltinId, dims: Vec<i32>, values: Vec<ScalarValue>) -> Result<Self> {
        let expected: i64 = dims.iter().map(|&d| d.max(0) as i64).product();
        if expected != values.len() as i64 {
            return Err(Error::encoding(
                "matrix dimension product does not match element count",
            ));
        }
        Ok(Variant(Some(Shape::Matrix {
            element_type,
            dims,
            values: Rc::new(values),
        })))
    }

    pub fn type_id(&self) -> BuiltinId {
        match &self.0 {
            None => BuiltinId::Null,
            Some(Shape::Scalar(v)) => v.builtin_id(),
            Some(Shape::Array { element_type, .. }) => *element_type,
            Some(Shape::Matrix { element_type, .. }) => *element_type,
        }
    }

    /// A cheap shallow copy: shares array/matrix storage (`Rc::clone`);
    /// [`Variant::set_range`] on either copy triggers the private-storage
    /// copy, never a cross-copy mutation (Testable Property 10).
    pub fn shallow_copy(&self) -> Self {
        self.clone()
    }

    /// Extract an inclusive `[start..end]` range from an array/matrix
    /// Variant, or from a String/ByteString scalar dereferenced as bytes.
    /// Out-of-range requests yield an empty result, never an error.
    pub fn range_get(&self, start: usize, end: usize) -> Result<Variant> {
        match &self.0 {
            Some(Shape::Array { element_type, values }) => {
                let slice = range_slice(values, start, end);
                Ok(Variant::array(*element_type, slice.to_vec()))
            }
            Some(Shape::Matrix { element_type, values, .. }) => {
                let slice = range_slice(values, start, end);
                Ok(Variant::array(*element_type, slice.to_vec()))
            }
            Some(Shape::Scalar(ScalarValue::String(s))) => {
                let bytes = s.as_str().map(|s| s.as_bytes().to_vec()).unwrap_or_default();
                let ranged = ByteString::from_vec(bytes).range_get(start, end);
                Variant::scalar(ScalarValue::ByteString(ranged))
            }
            Some(Shape::Scalar(ScalarValue::ByteString(b))) => {
                Variant::scalar(ScalarValue::ByteString(b.range_get(start, end)))
            }
            _ => Err(Error::invalid_parameters(
                "range-get requires an array, matrix, String, or ByteString Variant",
            )),
        }
    }

    /// Write `src`'s elements into `[start..end]` of this Variant's array
    /// storage. `src.len()` must equal the range length. Converts shared
    /// (`Rc`-aliased) storage to a private copy before mutating -- no
    /// aliased mutation, ever (Testable Property 10).
    pub fn set_range(&mut self, start: usize, end: usize, src: &[ScalarValue]) -> Result<()> {
        let values = match &mut self.0 {
            Some(Shape::Array { values, .. }) => values,
            Some(Shape::Matrix { values, .. }) => values,
            _ => return Err(Error::invalid_parameters("set-range requires an array or matrix Variant")),
        };
        if end < start || end - start + 1 != src.len() {
            return Err(Error::invalid_parameters(
                "set-range source length does not match the target range length",
            ));
        }
        if end >= values.len() {
            return Err(Error::invalid_parameters("set-range target range is out of bounds"));
        }
        let private = Rc::make_mut(values);
        private[start..=end].clone_from_slice(src);
        Ok(())
    }

    pub fn compare(&self, other: &Variant) -> Ordering {
        self.type_id()
            .cmp(&other.type_id())
            .then_with(|| shape_rank(&self.0).cmp(&shape_rank(&other.0)))
            .then_with(|| match (&self.0, &other.0) {
                (None, None) => Ordering::Equal,
                (Some(Shape::Scalar(a)), Some(Shape::Scalar(b))) => compare_scalar(a, b),
                (Some(Shape::Array { values: a, .. }), Some(Shape::Array { values: b, .. })) => {
                    compare_slices(a, b)
                }
                (
                    Some(Shape::Matrix { dims: da, values: a, .. }),
                    Some(Shape::Matrix { dims: db, values: b, .. }),
                ) => da.cmp(db).then_with(|| compare_slices(a, b)),
                _ => Ordering::Equal,
            })
    }
}

fn shape_rank(shape: &Option<Shape>) -> u8 {
    match shape {
        None => 0,
        Some(Shape::Scalar(_)) => 1,
        Some(Shape::Array { .. }) => 2,
        Some(Shape::Matrix { .. }) => 3,
    }
}

fn compare_slices(a: &[ScalarValue], b: &[ScalarValue]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        for (x, y) in a.iter().zip(b.iter()) {
            let c = compare_scalar(x, y);
            if c != Ordering::Equal {
                return c;
            }
        }
        Ordering::Equal
    })
}

pub(crate) fn compare_scalar(a: &ScalarValue, b: &ScalarValue) -> Ordering {
    use ScalarValue::*;
    match (a, b) {
        (Boolean(x), Boolean(y)) => x.cmp(y),
        (SByte(x), SByte(y)) => x.cmp(y),
        (Byte(x), Byte(y)) => x.cmp(y),
        (Int16(x), Int16(y)) => x.cmp(y),
        (UInt16(x), UInt16(y)) => x.cmp(y),
        (Int32(x), Int32(y)) => x.cmp(y),
        (UInt32(x), UInt32(y)) => x.cmp(y),
        (Int64(x), Int64(y)) => x.cmp(y),
        (UInt64(x), UInt64(y)) => x.cmp(y),
        (Float(x), Float(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Double(x), Double(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (String(x), String(y)) => x.as_str().cmp(&y.as_str()),
        (DateTime(x), DateTime(y)) => x.cmp(y),
        (Guid(x), Guid(y)) => x.compare(y),
        (ByteString(x), ByteString(y)) | (XmlElement(x), XmlElement(y)) => {
            x.as_bytes().cmp(&y.as_bytes())
        }
        (NodeId(x), NodeId(y)) => x.compare(y),
        (ExpandedNodeId(x), ExpandedNodeId(y)) => x.compare(y),
        (StatusCode(x), StatusCode(y)) => x.cmp(y),
        (QualifiedName(x), QualifiedName(y)) => x.compare(y),
        (LocalizedText(x), LocalizedText(y)) => x.compare(y),
        (ExtensionObject(x), ExtensionObject(y)) => x.compare(y),
        (DataValue(x), DataValue(y)) => x.compare(y),
        (Variant(x), Variant(y)) => x.compare(y),
        (DiagnosticInfo(x), DiagnosticInfo(y)) => x.compare(y),
        _ => Ordering::Equal,
    }
}

fn range_slice(values: &[ScalarValue], start: usize, end: usize) -> &[ScalarValue] {
    if start > end || start >= values.len() {
        &[]
    } else {
        let end = end.min(values.len().saturating_sub(1));
        &values[start..=end]
    }
}

impl BinaryEncode for Variant {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        1 + match &self.0 {
            None => 0,
            Some(Shape::Scalar(v)) => scalar_byte_len(v, ctx),
            Some(Shape::Array { values, .. }) => {
                4 + values.iter().map(|v| scalar_byte_len(v, ctx)).sum::<usize>()
            }
            Some(Shape::Matrix { values, dims, .. }) => {
                4 + values.iter().map(|v| scalar_byte_len(v, ctx)).sum::<usize>()
                    + 4
                    + dims.len() * 4
            }
        }
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        let ctx_inner = ctx.enter_struct()?;
        match &self.0 {
            None => 0u8.encode(stream, ctx),
            Some(Shape::Scalar(v)) => {
                v.builtin_id().as_u8().encode(stream, ctx)?;
                encode_scalar(v, stream, &ctx_inner)
            }
            Some(Shape::Array { element_type, values }) => {
                (element_type.as_u8() | variant_encoding::ARRAY_VALUES_FLAG).encode(stream, ctx)?;
                (values.len() as i32).encode(stream, &ctx_inner)?;
                for v in values.iter() {
                    encode_scalar(v, stream, &ctx_inner)?;
                }
                Ok(())
            }
            Some(Shape::Matrix { element_type, dims, values }) => {
                (element_type.as_u8()
                    | variant_encoding::ARRAY_VALUES_FLAG
                    | variant_encoding::ARRAY_DIMENSIONS_FLAG)
                    .encode(stream, ctx)?;
                (values.len() as i32).encode(stream, &ctx_inner)?;
                for v in values.iter() {
                    encode_scalar(v, stream, &ctx_inner)?;
                }
                array::write_array(&Some(dims.clone()), stream, &ctx_inner)
            }
        }
    }
}

impl BinaryDecode for Variant {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let ctx_inner = ctx.enter_struct()?;
        let encoding_byte = u8::decode(stream, ctx)?;
        let has_array = encoding_byte & variant_encoding::ARRAY_VALUES_FLAG != 0;
        let has_dims = encoding_byte & variant_encoding::ARRAY_DIMENSIONS_FLAG != 0;
        let builtin_id = BuiltinId::from_u8(encoding_byte & variant_encoding::TYPE_ID_MASK)
            .ok_or_else(|| Error::encoding("unrecognized Variant built-in type id"))?;

        if !has_array {
            if builtin_id == BuiltinId::Null {
                return Ok(Variant::null());
            }
            let value = decode_scalar(builtin_id, stream, &ctx_inner)?;
            return Variant::scalar(value);
        }

        let len = i32::decode(stream, &ctx_inner)?;
        let len = if len < 0 { 0 } else { len as usize };
        if len as u64 > ctx.limits().max_array_length as u64 {
            return Err(Error::out_of_memory("Variant array length exceeds max_array_length"));
        }
        let mut values = Vec::new();
        values
            .try_reserve(len)
            .map_err(|_| Error::out_of_memory("failed to reserve Variant array elements"))?;
        for _ in 0..len {
            values.push(decode_scalar(builtin_id, stream, &ctx_inner)?);
        }

        if has_dims {
            let dims: Option<Vec<i32>> = array::read_array(stream, &ctx_inner)?;
            let dims = dims.unwrap_or_default();
            let expected: i64 = dims.iter().map(|&d| d.max(0) as i64).product();
            if expected != values.len() as i64 {
                return Err(Error::encoding(
                    "matrix dimension product does not match element count",
                ));
            }
            Ok(Variant(Some(Shape::Matrix {
                element_type: builtin_id,
                dims,
                values: Rc::new(values),
            })))
        } else {
            Ok(Variant::array(builtin_id, values))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn scenario_s5_int32_array() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let v = Variant::array(
            BuiltinId::Int32,
            vec![ScalarValue::Int32(7), ScalarValue::Int32(8), ScalarValue::Int32(9)],
        );
        let bytes = v.encode_to_vec(&ctx).unwrap();
        assert_eq!(
            bytes,
            vec![
                0x86, // type 6 | array flag
                0x03, 0x00, 0x00, 0x00, // length 3
                0x07, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x00,
            ]
        );
        let mut r = bytes.as_slice();
        let decoded = Variant::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, v);
    }

    #[test]
    fn variant_of_variant_rejected_as_scalar() {
        let inner = Variant::scalar(ScalarValue::Int32(1)).unwrap();
        let err = Variant::scalar(ScalarValue::Variant(Box::new(inner))).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::InvalidParameters);
    }

    #[test]
    fn variant_of_variant_permitted_as_array_element() {
        let inner = Variant::scalar(ScalarValue::Int32(1)).unwrap();
        let array = Variant::array(BuiltinId::Variant, vec![ScalarValue::Variant(Box::new(inner))]);
        assert!(!array.is_null());
    }

    #[test]
    fn set_range_does_not_mutate_shallow_copy() {
        // Testable property 10.
        let mut v = Variant::array(
            BuiltinId::Int32,
            vec![ScalarValue::Int32(1), ScalarValue::Int32(2), ScalarValue::Int32(3)],
        );
        let w = v.shallow_copy();
        v.set_range(0, 0, &[ScalarValue::Int32(99)]).unwrap();
        assert_eq!(v.range_get(0, 0).unwrap(), Variant::array(BuiltinId::Int32, vec![ScalarValue::Int32(99)]));
        assert_eq!(w.range_get(0, 0).unwrap(), Variant::array(BuiltinId::Int32, vec![ScalarValue::Int32(1)]));
    }

    #[test]
    fn matrix_rejects_dimension_mismatch() {
        let err = Variant::matrix(BuiltinId::Int32, vec![2, 2], vec![ScalarValue::Int32(1)]).unwrap_err();
        assert_eq!(err.kind(), crate::error::Kind::EncodingError);
    }

    #[test]
    fn range_get_out_of_range_array_is_empty() {
        let v = Variant::array(BuiltinId::Int32, vec![ScalarValue::Int32(1)]);
        let empty = v.range_get(5, 10).unwrap();
        assert_eq!(empty, Variant::array(BuiltinId::Int32, vec![]));
    }
}

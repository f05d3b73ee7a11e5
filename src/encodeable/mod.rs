//! EncodeableType Engine (C4): reflection-style iteration over a
//! registered composite type's field descriptors, providing generic
//! init/clear/encode/decode/copy/compare for any of them.
//!
//! Grounded on `sopc_encodeabletype.h`'s `SOPC_EncodeableType_FieldDescriptor`
//! (`isBuiltIn`/`isArrayLength`/`isToEncode`/`nsIndex`/`typeIndex`/`offset`)
//! and `SOPC_EncodeableType` (name, three type ids, namespace, field
//! array). Per spec.md §9's design note to "reach fields by `(base_ptr,
//! offset)` and treat offsets as opaque", this engine reaches fields by
//! index into an ordered `Vec<Cell>` instead of raw pointer arithmetic --
//! the safe-Rust counterpart of an opaque offset, since a composite here
//! has no native Rust struct of its own; it *is* its field vector.

pub mod registry;

use std::io::{Read, Write};

use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::BuiltinId;
use crate::error::{Error, Result};
use crate::types::builtin;
use crate::types::variant::ScalarValue;

/// What kind of value a field descriptor's slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Builtin(BuiltinId),
    /// A nested registered composite, resolved by `(namespace_index,
    /// type_index)` through [`registry`] at encode/decode time.
    Composite {
        namespace_index: u16,
        type_index: u32,
    },
    /// Paired with the descriptor immediately following it (spec.md §3
    /// Invariant 1): that descriptor's kind is the array's element kind.
    ArrayLength,
}

/// One field in a registered composite's schema (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub is_to_encode: bool,
    pub kind: FieldKind,
}

/// Static description of a registered composite wire type.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeableType {
    pub name: &'static str,
    pub namespace_index: u16,
    pub type_id: u32,
    pub binary_encoding_id: u32,
    pub xml_encoding_id: u32,
    pub fields: &'static [FieldDescriptor],
}

/// A single field's runtime value: either a built-in cell or a nested
/// composite instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Builtin(ScalarValue),
    Composite(Box<CompositeInstance>),
}

/// One logical field's runtime storage -- a scalar cell, or (for an
/// `isArrayLength`-paired field) an optional vector of cells.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSlot {
    Scalar(Cell),
    Array(Option<Vec<Cell>>),
}

/// A runtime instance of a registered composite: its static type
/// description plus one [`FieldSlot`] per logical field (array pairs
/// collapse to a single slot).
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeInstance {
    pub type_descriptor: &'static EncodeableType,
    pub fields: Vec<FieldSlot>,
}

impl CompositeInstance {
    pub fn byte_len(&self, ctx: &Context<'_>) -> usize {
        self.type_descriptor.byte_len(&self.fields, ctx)
    }

    pub fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.type_descriptor.encode(&self.fields, stream, ctx)
    }

    pub fn encode_to_vec(&self, ctx: &Context<'_>) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.byte_len(ctx));
        self.encode(&mut buf, ctx)?;
        Ok(buf)
    }

    /// `copy`: deep clone, independent of `self`'s storage.
    pub fn copy(&self) -> CompositeInstance {
        self.clone()
    }

    /// `EncodeableObject_Move`: move `source`'s field content into `self`,
    /// then reset `source` to its freshly-initialized zero state. Requires
    /// both instances to share an `EncodeableType`, the same way `Variant`'s
    /// own move operation requires matching shapes before transferring
    /// ownership.
    pub fn move_from(&mut self, source: &mut CompositeInstance) -> Result<()> {
        if self.type_descriptor.binary_encoding_id != source.type_descriptor.binary_encoding_id {
            return Err(Error::invalid_parameters(
                "move requires both composites to share an EncodeableType",
            ));
        }
        std::mem::swap(&mut self.fields, &mut source.fields);
        *source = source.type_descriptor.init()?;
        Ok(())
    }

    /// `EncodeableObject_Delete`: explicit named counterpart to dropping a
    /// `Box<CompositeInstance>`. Rust's `Drop` already releases everything
    /// `self` owns; this exists only so callers porting the `Create`/`Delete`
    /// pairing have a matching call to make.
    pub fn delete(instance: Box<CompositeInstance>) {
        drop(instance);
    }

    /// `compare`: lengths first, then fields in descriptor order.
    pub fn compare(&self, other: &CompositeInstance) -> Result<std::cmp::Ordering> {
        if self.type_descriptor.binary_encoding_id != other.type_descriptor.binary_encoding_id {
            return Err(Error::invalid_parameters(
                "compare requires both composites to share an EncodeableType",
            ));
        }
        for (a, b) in self.fields.iter().zip(other.fields.iter()) {
            let ord = match (a, b) {
                (FieldSlot::Scalar(Cell::Builtin(x)), FieldSlot::Scalar(Cell::Builtin(y))) => {
                    builtin::compare(x, y)?
                }
                (FieldSlot::Scalar(Cell::Composite(x)), FieldSlot::Scalar(Cell::Composite(y))) => {
                    x.compare(y)?
                }
                (FieldSlot::Array(x), FieldSlot::Array(y)) => {
                    let xs = x.as_deref().unwrap_or(&[]);
                    let ys = y.as_deref().unwrap_or(&[]);
                    let len_ord = xs.len().cmp(&ys.len());
                    if len_ord != std::cmp::Ordering::Equal {
                        len_ord
                    } else {
                        let mut elem_ord = std::cmp::Ordering::Equal;
                        for (ca, cb) in xs.iter().zip(ys.iter()) {
                            elem_ord = match (ca, cb) {
                                (Cell::Builtin(x), Cell::Builtin(y)) => builtin::compare(x, y)?,
                                (Cell::Composite(x), Cell::Composite(y)) => x.compare(y)?,
                                _ => return Err(Error::invalid_state("mismatched array element cell shapes")),
                            };
                            if elem_ord != std::cmp::Ordering::Equal {
                                break;
                            }
                        }
                        elem_ord
                    }
                }
                _ => return Err(Error::invalid_state("mismatched field slot shapes")),
            };
            if ord != std::cmp::Ordering::Equal {
                return Ok(ord);
            }
        }
        Ok(std::cmp::Ordering::Equal)
    }
}

impl EncodeableType {
    /// `GetName`: the type's human-readable name, as carried by
    /// `SOPC_EncodeableType.TypeName`.
    pub fn get_name(&self) -> &'static str {
        self.name
    }

    /// `EncodeableObject_Create`: allocate and initialize a fresh instance
    /// of this type, boxed so callers can hold it by a stable address the
    /// way a `SOPC_EncodeableType_Create` caller holds a `void*`.
    pub fn create(&'static self) -> Result<Box<CompositeInstance>> {
        Ok(Box::new(self.init()?))
    }

    /// `initialize`: a fresh instance with every field at its zero value.
    pub fn init(&'static self) -> Result<CompositeInstance> {
        let mut fields = Vec::with_capacity(self.fields.len());
        let mut i = 0;
        while i < self.fields.len() {
            let desc = &self.fields[i];
            match desc.kind {
                FieldKind::ArrayLength => {
                    fields.push(FieldSlot::Array(Some(Vec::new())));
                    i += 2;
                }
                FieldKind::Builtin(id) => {
                    fields.push(FieldSlot::Scalar(Cell::Builtin(builtin::zero_value(id)?)));
                    i += 1;
                }
                FieldKind::Composite {
                    namespace_index,
                    type_index,
                } => {
                    let nested = registry::get_encodeable_type(namespace_index, type_index)
                        .ok_or_else(|| Error::invalid_state("referenced composite is not registered"))?;
                    fields.push(FieldSlot::Scalar(Cell::Composite(Box::new(nested.init()?))));
                    i += 1;
                }
            }
        }
        Ok(CompositeInstance {
            type_descriptor: self,
            fields,
        })
    }

    pub fn byte_len(&self, fields: &[FieldSlot], ctx: &Context<'_>) -> usize {
        let mut total = 0;
        let mut slot = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let desc = &self.fields[i];
            match desc.kind {
                FieldKind::ArrayLength => {
                    if let Some(FieldSlot::Array(items)) = fields.get(slot) {
                        total += 4;
                        if let Some(items) = items {
                            for item in items {
                                total += cell_byte_len(item, ctx);
                            }
                        }
                    }
                    i += 2;
                }
                _ => {
                    if let Some(FieldSlot::Scalar(cell)) = fields.get(slot) {
                        total += cell_byte_len(cell, ctx);
                    }
                    i += 1;
                }
            }
            slot += 1;
        }
        total
    }

    /// `encode`: walk descriptors in order, writing only `isToEncode`
    /// fields, threading the nesting budget through every composite field.
    pub fn encode<W: Write + ?Sized>(
        &self,
        fields: &[FieldSlot],
        stream: &mut W,
        ctx: &Context<'_>,
    ) -> Result<()> {
        let ctx = ctx.enter_struct()?;
        let mut slot = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let desc = &self.fields[i];
            let field = fields
                .get(slot)
                .ok_or_else(|| Error::invalid_state("composite instance is missing a field slot"))?;
            match desc.kind {
                FieldKind::ArrayLength => {
                    let items = match field {
                        FieldSlot::Array(items) => items,
                        _ => return Err(Error::invalid_state("expected an array field slot")),
                    };
                    if desc.is_to_encode {
                        match items {
                            None => 0i32.encode(stream, &ctx)?,
                            Some(v) => {
                                (v.len() as i32).encode(stream, &ctx)?;
                                for item in v {
                                    encode_cell(item, stream, &ctx)?;
                                }
                            }
                        }
                    }
                    i += 2;
                }
                _ => {
                    let cell = match field {
                        FieldSlot::Scalar(cell) => cell,
                        _ => return Err(Error::invalid_state("expected a scalar field slot")),
                    };
                    if desc.is_to_encode {
                        encode_cell(cell, stream, &ctx)?;
                    }
                    i += 1;
                }
            }
            slot += 1;
        }
        Ok(())
    }

    /// `decode`: init first so a partial failure leaves an already
    /// zero-valued instance behind (spec.md §4.4: "Decode invokes init
    /// first so a partial failure can safely clear").
    pub fn decode<R: Read + ?Sized>(
        &'static self,
        stream: &mut R,
        ctx: &Context<'_>,
    ) -> Result<CompositeInstance> {
        let mut instance = self.init()?;
        match self.decode_into(&mut instance, stream, ctx) {
            Ok(()) => Ok(instance),
            Err(e) => {
                // "the whole object is cleared before return."
                instance = self.init()?;
                let _ = &instance;
                Err(e)
            }
        }
    }

    fn decode_into<R: Read + ?Sized>(
        &'static self,
        instance: &mut CompositeInstance,
        stream: &mut R,
        ctx: &Context<'_>,
    ) -> Result<()> {
        let ctx = ctx.enter_struct()?;
        let mut slot = 0;
        let mut i = 0;
        while i < self.fields.len() {
            let desc = &self.fields[i];
            match desc.kind {
                FieldKind::ArrayLength => {
                    let elem_desc = self
                        .fields
                        .get(i + 1)
                        .ok_or_else(|| Error::invalid_state("array length descriptor missing its pair"))?;
                    if desc.is_to_encode {
                        let len = i32::decode(stream, &ctx)?;
                        let len = if len < 0 { 0 } else { len as usize };
                        if len as u64 > ctx.limits().max_array_length as u64 {
                            return Err(Error::out_of_memory(
                                "composite array field exceeds max_array_length",
                            ));
                        }
                        let mut items = Vec::new();
                        items
                            .try_reserve(len)
                            .map_err(|_| Error::out_of_memory("failed to reserve array field"))?;
                        for _ in 0..len {
                            items.push(decode_cell(elem_desc.kind, stream, &ctx)?);
                        }
                        instance.fields[slot] = FieldSlot::Array(Some(items));
                    }
                    i += 2;
                }
                kind => {
                    if desc.is_to_encode {
                        instance.fields[slot] = FieldSlot::Scalar(decode_cell(kind, stream, &ctx)?);
                    }
                    i += 1;
                }
            }
            slot += 1;
        }
        Ok(())
    }
}

fn cell_byte_len(cell: &Cell, ctx: &Context<'_>) -> usize {
    match cell {
        Cell::Builtin(v) => builtin::byte_len(v, ctx),
        Cell::Composite(c) => c.byte_len(ctx),
    }
}

fn encode_cell<W: Write + ?Sized>(cell: &Cell, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
    match cell {
        Cell::Builtin(v) => builtin::encode(v, stream, ctx),
        Cell::Composite(c) => c.encode(stream, ctx),
    }
}

fn decode_cell<R: Read + ?Sized>(kind: FieldKind, stream: &mut R, ctx: &Context<'_>) -> Result<Cell> {
    match kind {
        FieldKind::Builtin(id) => Ok(Cell::Builtin(builtin::decode(id, stream, ctx)?)),
        FieldKind::Composite {
            namespace_index,
            type_index,
        } => {
            let descriptor = registry::get_encodeable_type(namespace_index, type_index)
                .ok_or_else(|| Error::invalid_state("referenced composite is not registered"))?;
            Ok(Cell::Composite(Box::new(descriptor.decode(stream, ctx)?)))
        }
        FieldKind::ArrayLength => Err(Error::invalid_state(
            "an array-length descriptor cannot itself be a field's element kind",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    static SCALAR_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "id",
            is_to_encode: true,
            kind: FieldKind::Builtin(BuiltinId::Int32),
        },
        FieldDescriptor {
            name: "name",
            is_to_encode: true,
            kind: FieldKind::Builtin(BuiltinId::String),
        },
    ];

    static SCALAR_TYPE: EncodeableType = EncodeableType {
        name: "TestScalarRecord",
        namespace_index: 1,
        type_id: 1000,
        binary_encoding_id: 1001,
        xml_encoding_id: 1002,
        fields: SCALAR_FIELDS,
    };

    static ARRAY_FIELDS: &[FieldDescriptor] = &[
        FieldDescriptor {
            name: "values_length",
            is_to_encode: true,
            kind: FieldKind::ArrayLength,
        },
        FieldDescriptor {
            name: "values",
            is_to_encode: true,
            kind: FieldKind::Builtin(BuiltinId::Int32),
        },
    ];

    static ARRAY_TYPE: EncodeableType = EncodeableType {
        name: "TestArrayRecord",
        namespace_index: 1,
        type_id: 2000,
        binary_encoding_id: 2001,
        xml_encoding_id: 2002,
        fields: ARRAY_FIELDS,
    };

    #[test]
    fn scalar_composite_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut instance = SCALAR_TYPE.init().unwrap();
        instance.fields[0] = FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(42)));
        instance.fields[1] = FieldSlot::Scalar(Cell::Builtin(ScalarValue::String(
            crate::codec::bytes::UaString::from_string("widget".to_string()),
        )));

        let bytes = instance.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = SCALAR_TYPE.decode(&mut r, &ctx).unwrap();
        assert_eq!(instance.compare(&decoded).unwrap(), std::cmp::Ordering::Equal);
    }

    #[test]
    fn array_paired_descriptor_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut instance = ARRAY_TYPE.init().unwrap();
        instance.fields[0] = FieldSlot::Array(Some(vec![
            Cell::Builtin(ScalarValue::Int32(1)),
            Cell::Builtin(ScalarValue::Int32(2)),
        ]));

        let bytes = instance.encode_to_vec(&ctx).unwrap();
        assert_eq!(&bytes[0..4], &2i32.to_le_bytes());
        let mut r = bytes.as_slice();
        let decoded = ARRAY_TYPE.decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded.fields, instance.fields);
    }

    #[test]
    fn create_then_delete_round_trip() {
        let instance = SCALAR_TYPE.create().unwrap();
        assert_eq!(instance.type_descriptor.get_name(), "TestScalarRecord");
        EncodeableType::delete(instance);
    }

    #[test]
    fn move_transfers_fields_and_resets_source() {
        let mut source = SCALAR_TYPE.init().unwrap();
        source.fields[0] = FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(42)));
        let mut dest = SCALAR_TYPE.init().unwrap();

        dest.move_from(&mut source).unwrap();

        assert_eq!(dest.fields[0], FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(42))));
        assert_eq!(source.fields[0], FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(0))));
    }

    #[test]
    fn move_rejects_mismatched_types() {
        let mut source = ARRAY_TYPE.init().unwrap();
        let mut dest = SCALAR_TYPE.init().unwrap();
        assert!(dest.move_from(&mut source).is_err());
    }

    #[test]
    fn not_to_encode_field_is_skipped_on_wire() {
        static FIELDS: &[FieldDescriptor] = &[
            FieldDescriptor {
                name: "internal_only",
                is_to_encode: false,
                kind: FieldKind::Builtin(BuiltinId::Int32),
            },
            FieldDescriptor {
                name: "wire_field",
                is_to_encode: true,
                kind: FieldKind::Builtin(BuiltinId::Int32),
            },
        ];
        static TY: EncodeableType = EncodeableType {
            name: "PartialRecord",
            namespace_index: 1,
            type_id: 3000,
            binary_encoding_id: 3001,
            xml_encoding_id: 3002,
            fields: FIELDS,
        };
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let mut instance = TY.init().unwrap();
        instance.fields[0] = FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(999)));
        instance.fields[1] = FieldSlot::Scalar(Cell::Builtin(ScalarValue::Int32(7)));
        let bytes = instance.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, 7i32.to_le_bytes());
    }
}

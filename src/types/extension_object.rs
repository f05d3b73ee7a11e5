//! `ExtensionObject`: a typed container carrying no body, a raw
//! `ByteString` body, an XML body, or a decoded in-memory composite
//! described by a registered [`crate::encodeable::EncodeableType`].

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::ByteString;
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::extension_object_encoding;
use crate::encodeable::{registry, CompositeInstance};
use crate::error::{Error, Result};

use super::expanded_node_id::ExpandedNodeId;

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    None,
    ByteString(ByteString),
    Xml(ByteString),
    /// A decoded in-memory object. Encoded identically to `ByteString` --
    /// the inner composite's wire form, length-prefixed -- which spec.md
    /// §3 describes as a "back-patched length-prefix": since the codec
    /// writes to a plain `Write` stream with no seek, the back-patch is
    /// realized by encoding the composite into a scratch buffer first to
    /// learn its length, then writing that buffer as the ByteString body.
    Object(CompositeInstance),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionObject {
    pub type_id: ExpandedNodeId,
    pub body: Body,
}

impl ExtensionObject {
    pub fn none() -> Self {
        ExtensionObject {
            type_id: ExpandedNodeId::local(super::node_id::NodeId::null_numeric()),
            body: Body::None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.body, Body::None) && self.type_id.is_null()
    }

    /// Orders by `type_id`, then by body form, then by body content. Two
    /// `Body::Object`s whose `CompositeInstance`s carry different
    /// `EncodeableType`s fall back to `Ordering::Equal` for the body term --
    /// that mismatch is a type error, not an orderable difference, and
    /// `type_id`/`body_rank` have already distinguished them in every case
    /// that matters.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.type_id.compare(&other.type_id).then_with(|| {
            body_rank(&self.body).cmp(&body_rank(&other.body)).then_with(|| match (&self.body, &other.body) {
                (Body::None, Body::None) => Ordering::Equal,
                (Body::ByteString(a), Body::ByteString(b)) | (Body::Xml(a), Body::Xml(b)) => {
                    a.as_bytes().cmp(&b.as_bytes())
                }
                (Body::Object(a), Body::Object(b)) => a.compare(b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            })
        })
    }
}

fn body_rank(body: &Body) -> u8 {
    match body {
        Body::None => 0,
        Body::ByteString(_) => 1,
        Body::Xml(_) => 2,
        Body::Object(_) => 3,
    }
}

impl BinaryEncode for ExtensionObject {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        let body_len = match &self.body {
            Body::None => 1,
            Body::ByteString(b) => 1 + b.byte_len(ctx),
            Body::Xml(b) => 1 + b.byte_len(ctx),
            Body::Object(obj) => 1 + 4 + obj.byte_len(ctx),
        };
        self.type_id.byte_len(ctx) + body_len
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.type_id.encode(stream, ctx)?;
        match &self.body {
            Body::None => extension_object_encoding::NONE.encode(stream, ctx),
            Body::ByteString(b) => {
                extension_object_encoding::BYTE_STRING.encode(stream, ctx)?;
                b.encode(stream, ctx)
            }
            Body::Xml(b) => {
                extension_object_encoding::XML_ELEMENT.encode(stream, ctx)?;
                b.encode(stream, ctx)
            }
            Body::Object(obj) => {
                extension_object_encoding::BYTE_STRING.encode(stream, ctx)?;
                let inner_ctx = ctx.enter_struct()?;
                let encoded = obj.encode_to_vec(&inner_ctx)?;
                ByteString::from_vec(encoded).encode(stream, ctx)
            }
        }
    }
}

impl BinaryDecode for ExtensionObject {
    /// Decodes to `Body::None`/`ByteString`/`Xml` only -- resolving a
    /// `ByteString` body into `Body::Object` requires a registry lookup by
    /// `type_id`, done by [`decode_with_registry`] instead.
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let type_id = ExpandedNodeId::decode(stream, ctx)?;
        let form = u8::decode(stream, ctx)?;
        let body = match form {
            extension_object_encoding::NONE => Body::None,
            extension_object_encoding::BYTE_STRING => Body::ByteString(ByteString::decode(stream, ctx)?),
            extension_object_encoding::XML_ELEMENT => Body::Xml(ByteString::decode(stream, ctx)?),
            other => {
                return Err(Error::encoding(format!(
                    "unrecognized ExtensionObject body form {other:#x}"
                )))
            }
        };
        Ok(ExtensionObject { type_id, body })
    }
}

/// Decode an ExtensionObject, then resolve a `ByteString` body into
/// `Body::Object` if `type_id`'s binary encoding id is registered.
pub fn decode_with_registry<R: Read + ?Sized>(
    stream: &mut R,
    ctx: &Context<'_>,
) -> Result<ExtensionObject> {
    let mut obj = ExtensionObject::decode(stream, ctx)?;
    if let Body::ByteString(bytes) = &obj.body {
        if let Some(bytes) = bytes.as_bytes() {
            if let Some(descriptor) = registry::get_by_binary_encoding_id(&obj.type_id.node_id) {
                let inner_ctx = ctx.enter_struct()?;
                let mut reader = bytes;
                let instance = descriptor.decode(&mut reader, &inner_ctx)?;
                obj.body = Body::Object(instance);
            }
        }
    }
    Ok(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;
    use crate::types::node_id::NodeId;

    #[test]
    fn none_body_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let obj = ExtensionObject::none();
        let bytes = obj.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = ExtensionObject::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, obj);
    }

    #[test]
    fn byte_string_body_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let obj = ExtensionObject {
            type_id: ExpandedNodeId::local(NodeId::numeric(1, 100)),
            body: Body::ByteString(ByteString::from_vec(vec![1, 2, 3])),
        };
        let bytes = obj.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = ExtensionObject::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, obj);
    }
}

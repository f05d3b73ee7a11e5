//! `NodeId`: a tagged union over {Numeric, String, Guid, ByteString} plus a
//! namespace index, with space-optimal wire encoding selected at encode
//! time.
//!
//! Grounded on `sopc_encoder.c`'s `SOPC_NodeIdEncoding_*` selection logic:
//! two-byte when ns=0 and the numeric id fits a `u8`, four-byte when ns fits
//! a `u8` and the id fits a `u16`, full numeric otherwise.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::{ByteString, UaString};
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::node_id_encoding;
use crate::error::{Error, Result};

use super::guid::Guid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Numeric(u32),
    String(UaString),
    Guid(Guid),
    ByteString(ByteString),
}

/// Ordering rank used by [`NodeId::compare`]; matches the wire form
/// ordering (numeric, string, guid, byte string).
fn identifier_rank(id: &Identifier) -> u8 {
    match id {
        Identifier::Numeric(_) => 0,
        Identifier::String(_) => 1,
        Identifier::Guid(_) => 2,
        Identifier::ByteString(_) => 3,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId {
    pub namespace_index: u16,
    pub identifier: Identifier,
}

impl NodeId {
    pub fn numeric(namespace_index: u16, id: u32) -> Self {
        NodeId {
            namespace_index,
            identifier: Identifier::Numeric(id),
        }
    }

    pub fn string(namespace_index: u16, id: UaString) -> Self {
        NodeId {
            namespace_index,
            identifier: Identifier::String(id),
        }
    }

    pub fn guid(namespace_index: u16, id: Guid) -> Self {
        NodeId {
            namespace_index,
            identifier: Identifier::Guid(id),
        }
    }

    pub fn byte_string(namespace_index: u16, id: ByteString) -> Self {
        NodeId {
            namespace_index,
            identifier: Identifier::ByteString(id),
        }
    }

    pub fn null_numeric() -> Self {
        NodeId::numeric(0, 0)
    }

    /// A NodeId is null when its namespace is 0 and its identifier is the
    /// type's zero value (spec.md §3 invariant).
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0
            && match &self.identifier {
                Identifier::Numeric(v) => *v == 0,
                Identifier::String(s) => s.is_null(),
                Identifier::Guid(g) => g.is_nil(),
                Identifier::ByteString(b) => b.is_null(),
            }
    }

    /// Lexicographic compare by (identifier-type, namespace, identifier).
    pub fn compare(&self, other: &NodeId) -> Ordering {
        identifier_rank(&self.identifier)
            .cmp(&identifier_rank(&other.identifier))
            .then(self.namespace_index.cmp(&other.namespace_index))
            .then_with(|| match (&self.identifier, &other.identifier) {
                (Identifier::Numeric(a), Identifier::Numeric(b)) => a.cmp(b),
                (Identifier::String(a), Identifier::String(b)) => a.as_str().cmp(&b.as_str()),
                (Identifier::Guid(a), Identifier::Guid(b)) => a.compare(b),
                (Identifier::ByteString(a), Identifier::ByteString(b)) => {
                    a.as_bytes().cmp(&b.as_bytes())
                }
                _ => Ordering::Equal, // unreachable: rank already discriminated
            })
    }

    /// Parse the canonical `ns=<u16>;<i|s|g|b>=<identifier>` form. Absent
    /// `ns=` means namespace 0.
    pub fn parse(s: &str) -> Result<Self> {
        let mut namespace_index: u16 = 0;
        let mut id_part: Option<&str> = None;
        for segment in s.split(';') {
            if let Some(rest) = segment.strip_prefix("ns=") {
                namespace_index = rest
                    .parse()
                    .map_err(|_| Error::invalid_parameters(format!("bad ns= in NodeId '{s}'")))?;
            } else {
                id_part = Some(segment);
            }
        }
        let id_part = id_part
            .ok_or_else(|| Error::invalid_parameters(format!("missing identifier in NodeId '{s}'")))?;
        let identifier = if let Some(rest) = id_part.strip_prefix("i=") {
            Identifier::Numeric(
                rest.parse()
                    .map_err(|_| Error::invalid_parameters(format!("bad i= in NodeId '{s}'")))?,
            )
        } else if let Some(rest) = id_part.strip_prefix("s=") {
            Identifier::String(UaString::from_string(rest.to_string()))
        } else if let Some(rest) = id_part.strip_prefix("g=") {
            Identifier::Guid(Guid::parse(rest)?)
        } else if let Some(rest) = id_part.strip_prefix("b=") {
            Identifier::ByteString(ByteString::from_vec(
                hex::decode(rest)
                    .map_err(|_| Error::invalid_parameters(format!("bad b= hex in NodeId '{s}'")))?,
            ))
        } else {
            return Err(Error::invalid_parameters(format!(
                "unrecognized identifier prefix in NodeId '{s}'"
            )));
        };
        Ok(NodeId {
            namespace_index,
            identifier,
        })
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ns={};", self.namespace_index)?;
        match &self.identifier {
            Identifier::Numeric(v) => write!(f, "i={v}"),
            Identifier::String(v) => write!(f, "s={}", v.as_str().unwrap_or_default()),
            Identifier::Guid(v) => write!(f, "g={v}"),
            Identifier::ByteString(v) => write!(
                f,
                "b={}",
                v.as_bytes().map(hex::encode).unwrap_or_default()
            ),
        }
    }
}

/// The space-optimal wire form of a numeric NodeId, used by both encode
/// (to choose) and tests (to assert the choice per spec.md Testable
/// Property 7).
pub fn space_optimal_numeric_form(namespace_index: u16, id: u32) -> u8 {
    if namespace_index == 0 && id <= u8::MAX as u32 {
        node_id_encoding::TWO_BYTE
    } else if namespace_index <= u8::MAX as u16 && id <= u16::MAX as u32 {
        node_id_encoding::FOUR_BYTE
    } else {
        node_id_encoding::NUMERIC
    }
}

impl BinaryEncode for NodeId {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        match &self.identifier {
            Identifier::Numeric(id) => match space_optimal_numeric_form(self.namespace_index, *id) {
                node_id_encoding::TWO_BYTE => 2,
                node_id_encoding::FOUR_BYTE => 4,
                _ => 7,
            },
            Identifier::String(s) => 3 + s.byte_len(ctx),
            Identifier::Guid(g) => 3 + g.byte_len(ctx),
            Identifier::ByteString(b) => 3 + b.byte_len(ctx),
        }
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        match &self.identifier {
            Identifier::Numeric(id) => {
                match space_optimal_numeric_form(self.namespace_index, *id) {
                    node_id_encoding::TWO_BYTE => {
                        node_id_encoding::TWO_BYTE.encode(stream, ctx)?;
                        (*id as u8).encode(stream, ctx)
                    }
                    node_id_encoding::FOUR_BYTE => {
                        node_id_encoding::FOUR_BYTE.encode(stream, ctx)?;
                        (self.namespace_index as u8).encode(stream, ctx)?;
                        (*id as u16).encode(stream, ctx)
                    }
                    _ => {
                        node_id_encoding::NUMERIC.encode(stream, ctx)?;
                        self.namespace_index.encode(stream, ctx)?;
                        id.encode(stream, ctx)
                    }
                }
            }
            Identifier::String(s) => {
                node_id_encoding::STRING.encode(stream, ctx)?;
                self.namespace_index.encode(stream, ctx)?;
                s.encode(stream, ctx)
            }
            Identifier::Guid(g) => {
                node_id_encoding::GUID.encode(stream, ctx)?;
                self.namespace_index.encode(stream, ctx)?;
                g.encode(stream, ctx)
            }
            Identifier::ByteString(b) => {
                node_id_encoding::BYTE_STRING.encode(stream, ctx)?;
                self.namespace_index.encode(stream, ctx)?;
                b.encode(stream, ctx)
            }
        }
    }
}

impl BinaryDecode for NodeId {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let encoding_byte = u8::decode(stream, ctx)?;
        match encoding_byte & node_id_encoding::TYPE_MASK {
            node_id_encoding::TWO_BYTE => {
                let id = u8::decode(stream, ctx)?;
                Ok(NodeId::numeric(0, id as u32))
            }
            node_id_encoding::FOUR_BYTE => {
                let ns = u8::decode(stream, ctx)?;
                let id = u16::decode(stream, ctx)?;
                Ok(NodeId::numeric(ns as u16, id as u32))
            }
            node_id_encoding::NUMERIC => {
                let ns = u16::decode(stream, ctx)?;
                let id = u32::decode(stream, ctx)?;
                Ok(NodeId::numeric(ns, id))
            }
            node_id_encoding::STRING => {
                let ns = u16::decode(stream, ctx)?;
                let id = UaString::decode(stream, ctx)?;
                Ok(NodeId::string(ns, id))
            }
            node_id_encoding::GUID => {
                let ns = u16::decode(stream, ctx)?;
                let id = Guid::decode(stream, ctx)?;
                Ok(NodeId::guid(ns, id))
            }
            node_id_encoding::BYTE_STRING => {
                let ns = u16::decode(stream, ctx)?;
                let id = ByteString::decode(stream, ctx)?;
                Ok(NodeId::byte_string(ns, id))
            }
            other => Err(Error::encoding(format!(
                "unrecognized NodeId encoding byte form {other:#x}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn scenario_s1_two_byte_node_id() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let node = NodeId::numeric(0, 42);
        let bytes = node.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, vec![0x00, 0x2A]);
    }

    #[test]
    fn scenario_s2_four_byte_node_id() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let node = NodeId::numeric(5, 1025);
        let bytes = node.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, vec![0x01, 0x05, 0x01, 0x04]);
    }

    #[test]
    fn numeric_re_encodes_to_space_optimal_form_regardless_of_source_form() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        // Force the full numeric wire form for a value that fits two-byte.
        let forced = vec![node_id_encoding::NUMERIC, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00];
        let mut r = forced.as_slice();
        let decoded = NodeId::decode(&mut r, &ctx).unwrap();
        let re_encoded = decoded.encode_to_vec(&ctx).unwrap();
        assert_eq!(re_encoded, vec![0x00, 0x07]);
    }

    #[test]
    fn parse_canonical_form() {
        let node = NodeId::parse("ns=2;i=1001").unwrap();
        assert_eq!(node, NodeId::numeric(2, 1001));
        let default_ns = NodeId::parse("i=1").unwrap();
        assert_eq!(default_ns, NodeId::numeric(0, 1));
    }

    #[test]
    fn null_numeric_node_id_is_null() {
        assert!(NodeId::null_numeric().is_null());
        assert!(!NodeId::numeric(0, 1).is_null());
    }
}

//! `ExpandedNodeId`: a `NodeId` augmented with an optional namespace URI and
//! an optional server index, each flagged by a bit ORed into the NodeId
//! wire encoding byte.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::UaString;
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::constants::node_id_encoding;
use crate::error::Result;

use super::node_id::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedNodeId {
    pub node_id: NodeId,
    pub namespace_uri: Option<UaString>,
    pub server_index: Option<u32>,
}

impl ExpandedNodeId {
    pub fn local(node_id: NodeId) -> Self {
        ExpandedNodeId {
            node_id,
            namespace_uri: None,
            server_index: None,
        }
    }

    pub fn is_null(&self) -> bool {
        self.node_id.is_null() && self.namespace_uri.is_none() && self.server_index.is_none()
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.node_id
            .compare(&other.node_id)
            .then_with(|| {
                self.namespace_uri
                    .as_ref()
                    .and_then(|s| s.as_str())
                    .cmp(&other.namespace_uri.as_ref().and_then(|s| s.as_str()))
            })
            .then_with(|| self.server_index.cmp(&other.server_index))
    }
}

impl BinaryEncode for ExpandedNodeId {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        self.node_id.byte_len(ctx)
            + self.namespace_uri.as_ref().map_or(0, |u| u.byte_len(ctx))
            + self.server_index.map_or(0, |_| 4)
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        // Encode the NodeId body first, capture its first byte to OR the
        // ExpandedNodeId flags into, then emit the remainder unchanged.
        let body = self.node_id.encode_to_vec(ctx)?;
        let (encoding_byte, rest) = body.split_first().expect("NodeId body is never empty");
        let mut encoding_byte = *encoding_byte;
        if self.namespace_uri.is_some() {
            encoding_byte |= node_id_encoding::NAMESPACE_URI_FLAG;
        }
        if self.server_index.is_some() {
            encoding_byte |= node_id_encoding::SERVER_INDEX_FLAG;
        }
        encoding_byte.encode(stream, ctx)?;
        stream.write_all(rest).map_err(crate::error::Error::from)?;
        if let Some(uri) = &self.namespace_uri {
            uri.encode(stream, ctx)?;
        }
        if let Some(index) = self.server_index {
            index.encode(stream, ctx)?;
        }
        Ok(())
    }
}

impl BinaryDecode for ExpandedNodeId {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let encoding_byte = u8::decode(stream, ctx)?;
        let has_uri = encoding_byte & node_id_encoding::NAMESPACE_URI_FLAG != 0;
        let has_server_index = encoding_byte & node_id_encoding::SERVER_INDEX_FLAG != 0;
        let base_byte = encoding_byte & (node_id_encoding::TYPE_MASK);
        let node_id = decode_node_id_body(base_byte, stream, ctx)?;
        let namespace_uri = if has_uri {
            Some(UaString::decode(stream, ctx)?)
        } else {
            None
        };
        let server_index = if has_server_index {
            Some(u32::decode(stream, ctx)?)
        } else {
            None
        };
        Ok(ExpandedNodeId {
            node_id,
            namespace_uri,
            server_index,
        })
    }
}

/// Decode a NodeId body given its already-consumed encoding byte (the base
/// form bits only, with the ExpandedNodeId flags already stripped).
fn decode_node_id_body<R: Read + ?Sized>(
    base_byte: u8,
    stream: &mut R,
    ctx: &Context<'_>,
) -> Result<NodeId> {
    // Re-synthesize a single-byte prefix so NodeId::decode can be reused
    // without duplicating its form-dispatch logic.
    let mut chained = std::io::Cursor::new([base_byte]).chain(stream);
    NodeId::decode(&mut chained, ctx)
}

//! `QualifiedName`: a namespace-scoped name, `(namespace_index, name)`.

use std::cmp::Ordering;
use std::io::{Read, Write};

use crate::codec::bytes::UaString;
use crate::codec::{BinaryDecode, BinaryEncode, Context};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QualifiedName {
    pub namespace_index: u16,
    pub name: UaString,
}

impl QualifiedName {
    pub fn new(namespace_index: u16, name: impl Into<UaString>) -> Self {
        QualifiedName {
            namespace_index,
            name: name.into(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_null()
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        self.namespace_index
            .cmp(&other.namespace_index)
            .then_with(|| self.name.as_str().cmp(&other.name.as_str()))
    }
}

impl BinaryEncode for QualifiedName {
    fn byte_len(&self, ctx: &Context<'_>) -> usize {
        2 + self.name.byte_len(ctx)
    }

    fn encode<W: Write + ?Sized>(&self, stream: &mut W, ctx: &Context<'_>) -> Result<()> {
        self.namespace_index.encode(stream, ctx)?;
        self.name.encode(stream, ctx)
    }
}

impl BinaryDecode for QualifiedName {
    fn decode<R: Read + ?Sized>(stream: &mut R, ctx: &Context<'_>) -> Result<Self> {
        let namespace_index = u16::decode(stream, ctx)?;
        let name = UaString::decode(stream, ctx)?;
        Ok(QualifiedName {
            namespace_index,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::EncodingLimits;

    #[test]
    fn qualified_name_round_trips() {
        let limits = EncodingLimits::standard();
        let ctx = Context::new(&limits);
        let qn = QualifiedName::new(2, "Temperature".to_string());
        let bytes = qn.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = QualifiedName::decode(&mut r, &ctx).unwrap();
        assert_eq!(decoded, qn);
    }
}

//! Wire-level constants: built-in type identifiers, encoding mask bits and
//! the historical defaults the OPC UA Binary mapping assigns to the core.

/// One of the 25 OPC UA built-in types, tagged with its wire binary
/// identifier. `Variant` compares first by this id, and the Variant wire
/// encoding byte packs it into its low 6 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum BuiltinId {
    Null = 0,
    Boolean = 1,
    SByte = 2,
    Byte = 3,
    Int16 = 4,
    UInt16 = 5,
    Int32 = 6,
    UInt32 = 7,
    Int64 = 8,
    UInt64 = 9,
    Float = 10,
    Double = 11,
    String = 12,
    DateTime = 13,
    Guid = 14,
    ByteString = 15,
    XmlElement = 16,
    NodeId = 17,
    ExpandedNodeId = 18,
    StatusCode = 19,
    QualifiedName = 20,
    LocalizedText = 21,
    ExtensionObject = 22,
    DataValue = 23,
    Variant = 24,
    DiagnosticInfo = 25,
}

impl BuiltinId {
    /// Total number of built-in types (one past the highest id).
    pub const COUNT: usize = 26;

    /// Resolve a wire id to a `BuiltinId`, rejecting anything outside 0..26.
    pub fn from_u8(id: u8) -> Option<BuiltinId> {
        use BuiltinId::*;
        Some(match id {
            0 => Null,
            1 => Boolean,
            2 => SByte,
            3 => Byte,
            4 => Int16,
            5 => UInt16,
            6 => Int32,
            7 => UInt32,
            8 => Int64,
            9 => UInt64,
            10 => Float,
            11 => Double,
            12 => String,
            13 => DateTime,
            14 => Guid,
            15 => ByteString,
            16 => XmlElement,
            17 => NodeId,
            18 => ExpandedNodeId,
            19 => StatusCode,
            20 => QualifiedName,
            21 => LocalizedText,
            22 => ExtensionObject,
            23 => DataValue,
            24 => Variant,
            25 => DiagnosticInfo,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// NodeId encoding-byte forms (low bits of the single encoding byte).
pub mod node_id_encoding {
    pub const TWO_BYTE: u8 = 0x00;
    pub const FOUR_BYTE: u8 = 0x01;
    pub const NUMERIC: u8 = 0x02;
    pub const STRING: u8 = 0x03;
    pub const GUID: u8 = 0x04;
    pub const BYTE_STRING: u8 = 0x05;
    /// Mask selecting the base NodeId form, leaving the ExpandedNodeId flags.
    pub const TYPE_MASK: u8 = 0x0f;
    /// Set when an ExpandedNodeId carries a namespace URI string.
    pub const NAMESPACE_URI_FLAG: u8 = 0x80;
    /// Set when an ExpandedNodeId carries a server index.
    pub const SERVER_INDEX_FLAG: u8 = 0x40;
}

/// Variant encoding-byte bit layout: built-in type id in the low 6 bits, and
/// two shape flags in bits 6/7.
pub mod variant_encoding {
    pub const TYPE_ID_MASK: u8 = 0x3f;
    pub const ARRAY_VALUES_FLAG: u8 = 0x80;
    pub const ARRAY_DIMENSIONS_FLAG: u8 = 0x40;
}

/// DataValue encoding-mask bit layout (presence bits for the 5 optional
/// fields).
pub mod data_value_encoding {
    pub const VALUE: u8 = 0x01;
    pub const STATUS_CODE: u8 = 0x02;
    pub const SOURCE_TIMESTAMP: u8 = 0x04;
    pub const SOURCE_PICOSECONDS: u8 = 0x10;
    pub const SERVER_TIMESTAMP: u8 = 0x08;
    pub const SERVER_PICOSECONDS: u8 = 0x20;
}

/// DiagnosticInfo encoding-mask bit layout (presence bits for the 7 optional
/// fields).
pub mod diagnostic_info_encoding {
    pub const SYMBOLIC_ID: u8 = 0x01;
    pub const NAMESPACE: u8 = 0x02;
    pub const LOCALIZED_TEXT: u8 = 0x04;
    pub const LOCALE: u8 = 0x08;
    pub const ADDITIONAL_INFO: u8 = 0x10;
    pub const INNER_STATUS_CODE: u8 = 0x20;
    pub const INNER_DIAGNOSTIC_INFO: u8 = 0x40;
}

/// ExtensionObject body-encoding byte.
pub mod extension_object_encoding {
    pub const NONE: u8 = 0x00;
    pub const BYTE_STRING: u8 = 0x01;
    pub const XML_ELEMENT: u8 = 0x02;
}

/// Null string / byte string length on the wire and in memory.
pub const NULL_LENGTH: i32 = -1;

/// Default recursion cap for `DiagnosticInfo.inner_diagnostic_info` chains
/// (spec default, independent of `max_nested_struct`).
pub const DEFAULT_MAX_NESTED_DIAG_INFO: u32 = 100;

/// Default recursion cap for nested composites/Variants/ExtensionObjects.
pub const DEFAULT_MAX_NESTED_STRUCT: u32 = 100;

/// OPC UA epoch (1601-01-01T00:00:00Z) expressed as a Unix timestamp, used
/// to convert between `DateTime`'s 100ns-tick representation and calendar
/// time.
pub const OPC_UA_EPOCH_UNIX_SECONDS: i64 = -11_644_473_600;

/// Number of 100ns ticks per second, used by the same conversion.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

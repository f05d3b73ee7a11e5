//! Binary codec and TCP transport core of an OPC UA Binary (IEC 62541)
//! toolkit: the 25 built-in types, the composite/array/matrix encoding
//! rules built on top of them, the dynamic EncodeableType registry
//! structured messages are described through, and the socket + framing
//! layer that carries the resulting bytes over TCP.
//!
//! Crate layout mirrors the component breakdown:
//! - [`constants`], [`limits`] -- shared identifiers and the process-wide
//!   encoding limit record.
//! - [`codec`] -- the `BinaryEncode`/`BinaryDecode` traits, the nesting
//!   budget, and the string/bytes/array wire helpers built on them.
//! - [`types`] -- the built-in scalar cells and the composite wrapper types
//!   (`NodeId`, `Variant`, `DataValue`, `DiagnosticInfo`, `ExtensionObject`,
//!   ...).
//! - [`encodeable`] -- the reflection-style engine and registry that let a
//!   message type be described once, by its field list, and encoded,
//!   decoded, and copied generically from that description.
//! - [`transport`] -- TCP sockets and the chunk/byte accounting that caps a
//!   message's size on the wire.
//! - [`error`] -- the shared `Result`/`Error` type every layer above
//!   returns.

pub mod codec;
pub mod constants;
pub mod encodeable;
pub mod error;
pub mod limits;
pub mod transport;
pub mod types;

pub use codec::{BinaryDecode, BinaryEncode, Context, NestingBudget};
pub use constants::BuiltinId;
pub use encodeable::{registry as encodeable_registry, CompositeInstance, EncodeableType, FieldDescriptor, FieldKind};
pub use error::{Error, Result};
pub use limits::EncodingLimits;

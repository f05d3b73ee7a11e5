//! The OPC UA built-in value types: the 25 scalar cells ([`builtin`],
//! [`variant::ScalarValue`]), their composite wrappers (`DataValue`,
//! `DiagnosticInfo`, `ExtensionObject`), and the identifier types
//! (`NodeId`, `ExpandedNodeId`, `Guid`, `StatusCode`, `QualifiedName`,
//! `LocalizedText`) that built-ins and composites are built from.

pub mod builtin;
pub mod data_value;
pub mod date_time;
pub mod diagnostic_info;
pub mod expanded_node_id;
pub mod extension_object;
pub mod guid;
pub mod localized_text;
pub mod node_id;
pub mod qualified_name;
pub mod status_code;
pub mod variant;

pub use data_value::DataValue;
pub use date_time::DateTime;
pub use diagnostic_info::DiagnosticInfo;
pub use expanded_node_id::ExpandedNodeId;
pub use extension_object::{Body as ExtensionObjectBody, ExtensionObject};
pub use guid::Guid;
pub use localized_text::LocalizedText;
pub use node_id::{Identifier as NodeIdIdentifier, NodeId};
pub use qualified_name::QualifiedName;
pub use status_code::StatusCode;
pub use variant::{ScalarValue, Variant};

//! Dynamic registry of [`EncodeableType`]s, keyed by `(namespace_index,
//! type_id)` and, separately, by `(namespace_index, binary_encoding_id)`.
//!
//! Grounded on `sopc_encodeabletype.c`'s global table of registered types
//! plus `SOPC_EncodeableType_AddTypesArray`/`RemoveTypesArray`: registration
//! happens in bulk at startup, lookup happens constantly and concurrently
//! from worker threads, so this uses a `RwLock` rather than the mutex the
//! rest of this crate would otherwise reach for.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::node_id::{Identifier, NodeId};

use super::EncodeableType;

type Key = (u16, u32);

struct Tables {
    by_type_id: HashMap<Key, &'static EncodeableType>,
    by_binary_encoding_id: HashMap<Key, &'static EncodeableType>,
}

impl Tables {
    fn new() -> Self {
        Tables {
            by_type_id: HashMap::new(),
            by_binary_encoding_id: HashMap::new(),
        }
    }
}

fn tables() -> &'static RwLock<Tables> {
    static TABLES: std::sync::OnceLock<RwLock<Tables>> = std::sync::OnceLock::new();
    TABLES.get_or_init(|| RwLock::new(Tables::new()))
}

/// Register one type. Rejects a duplicate `(namespace_index, type_id)` or
/// `(namespace_index, binary_encoding_id)`, per spec.md's supplement of
/// `SOPC_EncodeableType_AddTypesArray`'s duplicate-rejection behaviour.
pub fn register_type(descriptor: &'static EncodeableType) -> Result<()> {
    let type_key = (descriptor.namespace_index, descriptor.type_id);
    let binary_key = (descriptor.namespace_index, descriptor.binary_encoding_id);
    let mut guard = tables().write().expect("encodeable type registry poisoned");
    if guard.by_type_id.contains_key(&type_key) {
        return Err(Error::invalid_parameters(format!(
            "type id {:?} is already registered",
            type_key
        )));
    }
    if guard.by_binary_encoding_id.contains_key(&binary_key) {
        return Err(Error::invalid_parameters(format!(
            "binary encoding id {:?} is already registered",
            binary_key
        )));
    }
    guard.by_type_id.insert(type_key, descriptor);
    guard.by_binary_encoding_id.insert(binary_key, descriptor);
    Ok(())
}

/// Register many types atomically: either all succeed, or none are added.
/// Mirrors `SOPC_EncodeableType_AddTypesArray`'s all-or-nothing contract.
pub fn register_types_array(descriptors: &[&'static EncodeableType]) -> Result<()> {
    let guard = tables().read().expect("encodeable type registry poisoned");
    for d in descriptors {
        let type_key = (d.namespace_index, d.type_id);
        let binary_key = (d.namespace_index, d.binary_encoding_id);
        if guard.by_type_id.contains_key(&type_key) || guard.by_binary_encoding_id.contains_key(&binary_key) {
            return Err(Error::invalid_parameters(format!(
                "type id {:?} is already registered",
                type_key
            )));
        }
    }
    drop(guard);
    let mut guard = tables().write().expect("encodeable type registry poisoned");
    for d in descriptors {
        guard.by_type_id.insert((d.namespace_index, d.type_id), d);
        guard
            .by_binary_encoding_id
            .insert((d.namespace_index, d.binary_encoding_id), d);
    }
    Ok(())
}

/// Remove one type by its `(namespace_index, type_id)` key.
pub fn unregister_type(namespace_index: u16, type_id: u32) -> Result<()> {
    let mut guard = tables().write().expect("encodeable type registry poisoned");
    let descriptor = guard
        .by_type_id
        .remove(&(namespace_index, type_id))
        .ok_or_else(|| Error::invalid_parameters("no type registered under that type id"))?;
    guard
        .by_binary_encoding_id
        .remove(&(descriptor.namespace_index, descriptor.binary_encoding_id));
    Ok(())
}

/// Remove every registered type, as `SOPC_EncodeableType_RemoveTypesArray`
/// does for the whole table at toolkit shutdown.
pub fn unregister_all() {
    let mut guard = tables().write().expect("encodeable type registry poisoned");
    guard.by_type_id.clear();
    guard.by_binary_encoding_id.clear();
}

/// Look up a registered type's human-readable name, the one piece of an
/// `EncodeableType` a caller can retrieve without already holding a
/// reference to the descriptor itself.
pub fn get_name(namespace_index: u16, type_id: u32) -> Option<&'static str> {
    get_encodeable_type(namespace_index, type_id).map(|d| d.name)
}

pub fn get_encodeable_type(namespace_index: u16, type_id: u32) -> Option<&'static EncodeableType> {
    tables()
        .read()
        .expect("encodeable type registry poisoned")
        .by_type_id
        .get(&(namespace_index, type_id))
        .copied()
}

/// Resolve a type by the numeric `NodeId` an `ExtensionObject`'s
/// `type_id.node_id` field carries. Non-numeric node ids never identify a
/// binary encoding id and always miss.
pub fn get_by_binary_encoding_id(node_id: &NodeId) -> Option<&'static EncodeableType> {
    let numeric_id = match node_id.identifier {
        Identifier::Numeric(id) => id,
        _ => return None,
    };
    tables()
        .read()
        .expect("encodeable type registry poisoned")
        .by_binary_encoding_id
        .get(&(node_id.namespace_index, numeric_id))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodeable::{FieldDescriptor, FieldKind};
    use crate::constants::BuiltinId;

    static FIELDS: &[FieldDescriptor] = &[FieldDescriptor {
        name: "value",
        is_to_encode: true,
        kind: FieldKind::Builtin(BuiltinId::Int32),
    }];

    static TY: EncodeableType = EncodeableType {
        name: "RegistryTestRecord",
        namespace_index: 7,
        type_id: 9001,
        binary_encoding_id: 9002,
        xml_encoding_id: 9003,
        fields: FIELDS,
    };

    #[test]
    fn register_then_look_up_by_both_keys() {
        // Registration is process-global and this test file may run
        // alongside others; tolerate an already-registered duplicate from a
        // previous run in the same process.
        let _ = register_type(&TY);
        assert!(get_encodeable_type(7, 9001).is_some());
        let node_id = NodeId::numeric(7, 9002);
        assert!(get_by_binary_encoding_id(&node_id).is_some());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let _ = register_type(&TY);
        assert!(register_type(&TY).is_err());
    }

    #[test]
    fn get_name_resolves_through_the_registry() {
        let _ = register_type(&TY);
        assert_eq!(get_name(7, 9001), Some("RegistryTestRecord"));
        assert_eq!(get_name(7, 404), None);
    }

    #[test]
    fn non_numeric_node_id_never_resolves() {
        let node_id = NodeId::string(0, "not-a-binary-encoding-id".into());
        assert!(get_by_binary_encoding_id(&node_id).is_none());
    }
}

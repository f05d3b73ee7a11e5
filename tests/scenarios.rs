//! End-to-end wire-format scenarios, assembled at the crate boundary rather
//! than inside any one module: each test below drives a value through the
//! public API exactly as an external caller would, and checks the resulting
//! bytes against the literal hex sequences the wire format guarantees.

use opcua_core::codec::bytes::UaString;
use opcua_core::codec::{BinaryDecode, BinaryEncode};
use opcua_core::limits::EncodingLimits;
use opcua_core::types::node_id::NodeId;
use opcua_core::types::status_code::StatusCode;
use opcua_core::types::{DataValue, ScalarValue, Variant};
use opcua_core::{constants::BuiltinId, Context};

fn standard_ctx(limits: &EncodingLimits) -> Context<'_> {
    Context::new(limits)
}

#[test]
fn scenario_s1_two_byte_node_id() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let id = NodeId::numeric(0, 42);
    let bytes = id.encode_to_vec(&ctx).unwrap();
    assert_eq!(bytes, vec![0x00, 0x2A]);
}

#[test]
fn scenario_s2_four_byte_node_id() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let id = NodeId::numeric(5, 1025);
    let bytes = id.encode_to_vec(&ctx).unwrap();
    assert_eq!(bytes, vec![0x01, 0x05, 0x01, 0x04]);
}

#[test]
fn scenario_s3_string_round_trip() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let s = UaString::from_string("OK".to_string());
    let bytes = s.encode_to_vec(&ctx).unwrap();
    assert_eq!(bytes, vec![0x02, 0x00, 0x00, 0x00, 0x4F, 0x4B]);

    let mut r = bytes.as_slice();
    let decoded = UaString::decode(&mut r, &ctx).unwrap();
    assert_eq!(decoded.as_bytes(), Some(&b"OK"[..]));
}

#[test]
fn scenario_s4_null_string() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let s = UaString::null();
    let bytes = s.encode_to_vec(&ctx).unwrap();
    assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF]);

    let mut r = bytes.as_slice();
    let decoded = UaString::decode(&mut r, &ctx).unwrap();
    assert!(decoded.is_null());
}

#[test]
fn scenario_s5_variant_of_int32_array() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let v = Variant::array(
        BuiltinId::Int32,
        vec![ScalarValue::Int32(7), ScalarValue::Int32(8), ScalarValue::Int32(9)],
    );
    let bytes = v.encode_to_vec(&ctx).unwrap();
    assert_eq!(
        bytes,
        vec![
            0x86, // type 6 (Int32) | array flag (0x80)
            0x03, 0x00, 0x00, 0x00, // length 3
            0x07, 0x00, 0x00, 0x00, // 7
            0x08, 0x00, 0x00, 0x00, // 8
            0x09, 0x00, 0x00, 0x00, // 9
        ]
    );

    let mut r = bytes.as_slice();
    let decoded = Variant::decode(&mut r, &ctx).unwrap();
    assert_eq!(decoded.compare(&v), std::cmp::Ordering::Equal);
}

#[test]
fn scenario_s6_data_value_with_only_status_code() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);
    let dv = DataValue::status_only(StatusCode(0x8002_0000));
    let bytes = dv.encode_to_vec(&ctx).unwrap();
    assert_eq!(bytes, vec![0x02, 0x00, 0x00, 0x02, 0x80]);

    let mut r = bytes.as_slice();
    let decoded = DataValue::decode(&mut r, &ctx).unwrap();
    assert!(decoded.value.is_null());
    assert_eq!(decoded.source_timestamp, None);
    assert_eq!(decoded.source_picoseconds, None);
    assert_eq!(decoded.server_timestamp, None);
    assert_eq!(decoded.server_picoseconds, None);
    assert_eq!(decoded.status, Some(StatusCode(0x8002_0000)));
}

#[test]
fn node_id_round_trips_to_its_space_optimal_form() {
    // Any encoding form of the same (ns, id) pair re-encodes to the
    // unique space-optimal form on the next round-trip.
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);

    let two_byte = NodeId::numeric(0, 42);
    let four_byte = NodeId::numeric(5, 1025);
    let numeric_form = NodeId::numeric(5, 100_000);

    for id in [two_byte, four_byte, numeric_form] {
        let bytes = id.encode_to_vec(&ctx).unwrap();
        let mut r = bytes.as_slice();
        let decoded = NodeId::decode(&mut r, &ctx).unwrap();
        let re_encoded = decoded.encode_to_vec(&ctx).unwrap();
        assert_eq!(bytes, re_encoded);
    }
}

#[test]
fn null_and_empty_strings_are_distinct_on_the_wire() {
    let limits = EncodingLimits::standard();
    let ctx = standard_ctx(&limits);

    let null = UaString::null();
    let empty = UaString::from_string(String::new());
    let null_bytes = null.encode_to_vec(&ctx).unwrap();
    let empty_bytes = empty.encode_to_vec(&ctx).unwrap();

    assert_ne!(null_bytes, empty_bytes);
    assert_eq!(null_bytes, vec![0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(empty_bytes, vec![0x00, 0x00, 0x00, 0x00]);

    let mut r = null_bytes.as_slice();
    assert!(UaString::decode(&mut r, &ctx).unwrap().is_null());
    let mut r = empty_bytes.as_slice();
    let decoded_empty = UaString::decode(&mut r, &ctx).unwrap();
    assert!(!decoded_empty.is_null());
    assert_eq!(decoded_empty.as_bytes(), Some(&b""[..]));
}

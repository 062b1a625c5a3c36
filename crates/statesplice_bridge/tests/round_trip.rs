//! Tests for raw field access through [`RawBridge`].
//!
//! - set-then-get returns a bit-identical value for every blittable type
//! - alternate field names resolve
//! - width and bounds violations are rejected before memory is touched

use statesplice_bridge::{BridgeError, HostBridge, HostLayout, RawBridge, RawInstance};

#[repr(C)]
#[derive(Debug, Default)]
struct LoaderMirror {
    load_cursor: i32,
    load_state: i32,
    progress: f64,
    seed: u64,
    generate_new: bool,
    loading_operation_active: bool,
}

fn loader_bridge() -> RawBridge {
    use core::mem::offset_of;

    RawBridge::new(
        HostLayout::new()
            .with_field::<i32>("loadCursor", offset_of!(LoaderMirror, load_cursor))
            .with_field::<i32>(
                "NativeFieldInfoPtr_loadState",
                offset_of!(LoaderMirror, load_state),
            )
            .with_field::<f64>("progress", offset_of!(LoaderMirror, progress))
            .with_field::<u64>("seed", offset_of!(LoaderMirror, seed))
            .with_field::<bool>("generateNew", offset_of!(LoaderMirror, generate_new))
            .with_field::<bool>(
                "loadingOperationActive",
                offset_of!(LoaderMirror, loading_operation_active),
            ),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed Struct Access
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn writes_land_in_the_mirrored_struct() {
    let bridge = loader_bridge();
    let mut loader = LoaderMirror::default();

    {
        // SAFETY: `loader_bridge` mirrors `LoaderMirror` field for field.
        let mut instance = unsafe { RawInstance::from_mut(&mut loader) };
        bridge.set(&mut instance, "loadCursor", 4_i32).unwrap();
        bridge.set(&mut instance, "loadState", 9_i32).unwrap();
        bridge.set(&mut instance, "generateNew", true).unwrap();
    }

    assert_eq!(loader.load_cursor, 4);
    assert_eq!(loader.load_state, 9);
    assert!(loader.generate_new);
    assert!(!loader.loading_operation_active);
}

#[test]
fn reads_see_values_written_by_the_host() {
    let bridge = loader_bridge();
    let mut loader = LoaderMirror {
        load_cursor: 2,
        load_state: 5,
        loading_operation_active: true,
        ..LoaderMirror::default()
    };

    // SAFETY: `loader_bridge` mirrors `LoaderMirror` field for field.
    let instance = unsafe { RawInstance::from_mut(&mut loader) };
    assert_eq!(bridge.get::<i32>(&instance, "loadCursor").unwrap(), 2);
    assert_eq!(bridge.get::<i32>(&instance, "loadState").unwrap(), 5);
    assert!(bridge.get::<bool>(&instance, "loadingOperationActive").unwrap());
}

// ─────────────────────────────────────────────────────────────────────────────
// Error Paths
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_field_is_not_found() {
    let bridge = loader_bridge();
    let mut bytes = [0u8; 64];
    let instance = RawInstance::from_bytes(&mut bytes);

    let err = bridge.get::<bool>(&instance, "subOperationDone").unwrap_err();
    assert!(matches!(err, BridgeError::FieldNotFound { .. }));
}

#[test]
fn width_mismatch_is_rejected() {
    let bridge = loader_bridge();
    let mut bytes = [0u8; 64];
    let instance = RawInstance::from_bytes(&mut bytes);

    let err = bridge.get::<i64>(&instance, "loadCursor").unwrap_err();
    assert_eq!(
        err,
        BridgeError::SizeMismatch {
            field: "loadCursor".to_string(),
            expected: 4,
            actual: 8,
        }
    );
}

#[test]
fn field_past_instance_end_is_rejected() {
    let bridge = RawBridge::new(HostLayout::new().with_field::<u64>("seed", 4));
    let mut bytes = [0u8; 8];
    let mut instance = RawInstance::from_bytes(&mut bytes);

    let err = bridge.set(&mut instance, "seed", 1_u64).unwrap_err();
    assert!(matches!(
        err,
        BridgeError::OutOfBounds {
            offset: 4,
            size: 8,
            instance_size: 8,
            ..
        }
    ));
    assert_eq!(bytes, [0u8; 8]);
}

#[test]
fn null_pointer_is_refused() {
    // SAFETY: a null pointer is never dereferenced; the constructor rejects it.
    let instance = unsafe { RawInstance::from_raw_parts(core::ptr::null_mut(), 16) };
    assert!(instance.is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Property Tests
// ─────────────────────────────────────────────────────────────────────────────

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn i32_round_trips(value in any::<i32>(), offset in 0usize..60) {
            let bridge = RawBridge::new(HostLayout::new().with_field::<i32>("field", offset));
            let mut bytes = [0u8; 64];
            let mut instance = RawInstance::from_bytes(&mut bytes);
            bridge.set(&mut instance, "field", value).unwrap();
            prop_assert_eq!(bridge.get::<i32>(&instance, "field").unwrap(), value);
        }

        #[test]
        fn u64_round_trips_unaligned(value in any::<u64>(), offset in 0usize..56) {
            let bridge = RawBridge::new(HostLayout::new().with_field::<u64>("NativeFieldInfoPtr_field", offset));
            let mut bytes = [0u8; 64];
            let mut instance = RawInstance::from_bytes(&mut bytes);
            bridge.set(&mut instance, "field", value).unwrap();
            prop_assert_eq!(bridge.get::<u64>(&instance, "field").unwrap(), value);
        }

        #[test]
        fn f64_round_trips_bit_identical(bits in any::<u64>()) {
            let value = f64::from_bits(bits);
            let bridge = RawBridge::new(HostLayout::new().with_field::<f64>("field", 8));
            let mut bytes = [0u8; 16];
            let mut instance = RawInstance::from_bytes(&mut bytes);
            bridge.set(&mut instance, "field", value).unwrap();
            prop_assert_eq!(bridge.get::<f64>(&instance, "field").unwrap().to_bits(), bits);
        }

        #[test]
        fn bool_round_trips(value in any::<bool>()) {
            let bridge = RawBridge::new(HostLayout::new().with_field::<bool>("flag", 3));
            let mut bytes = [0u8; 4];
            let mut instance = RawInstance::from_bytes(&mut bytes);
            bridge.set(&mut instance, "flag", value).unwrap();
            prop_assert_eq!(bridge.get::<bool>(&instance, "flag").unwrap(), value);
        }
    }
}

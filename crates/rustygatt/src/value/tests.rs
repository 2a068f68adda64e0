//! Unit tests for attribute values and codecs

use super::codec::*;
use super::store::AttributeValue;
use crate::error::GattError;

#[test]
fn test_default_codec_round_trip() {
    for value in [0u8, 1, 0x7F, 0xFF] {
        assert_eq!(default_deserializer::<u8>(&default_serializer(value)), value);
    }
    for value in [0u16, 0x1234, u16::MAX] {
        assert_eq!(default_deserializer::<u16>(&default_serializer(value)), value);
    }
    for value in [0u32, 0xDEAD_BEEF, u32::MAX] {
        assert_eq!(default_deserializer::<u32>(&default_serializer(value)), value);
    }
    for value in [i16::MIN, -1, 0, i16::MAX] {
        assert_eq!(default_deserializer::<i16>(&default_serializer(value)), value);
    }
    for value in [i32::MIN, -0x1234_5678, 0, i32::MAX] {
        assert_eq!(default_deserializer::<i32>(&default_serializer(value)), value);
    }
    for value in [0u64, 0x0102_0304_0506_0708, u64::MAX] {
        assert_eq!(default_deserializer::<u64>(&default_serializer(value)), value);
    }
    for value in [i64::MIN, -1, 0, i64::MAX] {
        assert_eq!(default_deserializer::<i64>(&default_serializer(value)), value);
    }
    for value in [i8::MIN, -1, 0, i8::MAX] {
        assert_eq!(default_deserializer::<i8>(&default_serializer(value)), value);
    }
    let value = 0x0102_0304_0506_0708_090A_0B0C_0D0E_0F10u128;
    assert_eq!(default_deserializer::<u128>(&default_serializer(value)), value);
    for value in [i128::MIN, -1, 0, i128::MAX] {
        assert_eq!(default_deserializer::<i128>(&default_serializer(value)), value);
    }
    assert!(default_deserializer::<bool>(&default_serializer(true)));
    assert!(!default_deserializer::<bool>(&default_serializer(false)));
}

#[test]
fn test_default_codec_wire_order() {
    // Byte-reversed relative to a little-endian in-memory layout
    assert_eq!(default_serializer(0x1234u16), vec![0x12, 0x34]);
    assert_eq!(default_serializer(0x0102_0304u32), vec![0x01, 0x02, 0x03, 0x04]);
    assert_eq!(default_serializer(-2i16), vec![0xFF, 0xFE]);
    assert_eq!(default_serializer(0xABu8), vec![0xAB]);
}

#[test]
fn test_default_codec_truncated_input() {
    // Missing high-order bytes are zero
    assert_eq!(default_deserializer::<u32>(&[0x12, 0x34]), 0x1234);
    assert_eq!(default_deserializer::<u16>(&[]), 0);
    assert_eq!(default_deserializer::<u64>(&[0xFF]), 0xFF);

    // Extra bytes are ignored
    assert_eq!(default_deserializer::<u16>(&[0x12, 0x34, 0x56]), 0x1234);
}

#[test]
fn test_typed_access() {
    let mut value = AttributeValue::new();
    assert!(value.is_empty());

    value.set_integral(0x0102u16);
    assert_eq!(value.raw(), &[0x01, 0x02]);
    assert_eq!(value.get_integral::<u16>(), 0x0102);

    value.set("hello", |s: &str| s.as_bytes().to_vec());
    assert_eq!(value.to_raw(), b"hello".to_vec());
    assert_eq!(value.get(|b: &[u8]| b.len()), 5);
}

#[test]
fn test_prepared_write_across_pdus() {
    let mut value = AttributeValue::new();
    let conn = 1;

    value.write_start(conn);
    assert!(value.write_ongoing(conn));
    assert!(value.write_add(conn, &[0xAA, 0xBB]));
    assert!(value.write_add(conn, &[0xCC]));
    assert!(value.raw().is_empty());

    assert!(value.write_commit(conn));
    assert_eq!(value.raw(), &[0xAA, 0xBB, 0xCC]);
    assert!(!value.write_ongoing(conn));

    // Nothing left to commit
    assert!(!value.write_commit(conn));
    assert_eq!(value.raw(), &[0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_write_without_transaction() {
    let mut value = AttributeValue::with_value(vec![1, 2, 3]);

    assert!(!value.write_add(7, &[9]));
    assert!(!value.write_commit(7));
    assert_eq!(value.try_write_add(7, &[9]), Err(GattError::NoActiveTransaction(7)));
    assert_eq!(value.try_write_commit(7), Err(GattError::NoActiveTransaction(7)));
    assert_eq!(value.raw(), &[1, 2, 3]);

    // Empty payloads are fine once a transaction is open
    value.write_start(7);
    assert!(value.write_add(7, &[]));
    assert_eq!(value.try_write_commit(7), Ok(()));
    assert!(value.raw().is_empty());
}

#[test]
fn test_write_restart_discards_buffer() {
    let mut value = AttributeValue::new();

    value.write_start(1);
    value.write_add(1, &[1, 2, 3]);
    value.write_start(1);
    value.write_add(1, &[4]);
    value.write_commit(1);

    assert_eq!(value.raw(), &[4]);
}

#[test]
fn test_write_abort_leaves_value() {
    let mut value = AttributeValue::with_value(vec![5, 6]);

    value.write_start(1);
    value.write_add(1, &[0xEE; 8]);
    value.write_abort(1);

    assert_eq!(value.raw(), &[5, 6]);
    assert!(!value.write_ongoing(1));

    // Aborting with nothing open is a no-op
    value.write_abort(1);
    assert_eq!(value.read_abort(1), None);
    assert_eq!(value.raw(), &[5, 6]);
}

#[test]
fn test_write_isolation() {
    let mut value = AttributeValue::with_value(vec![0]);

    value.write_start(1);
    value.write_start(2);
    value.write_add(1, &[1, 1]);
    value.write_add(2, &[2, 2, 2]);

    assert!(value.write_commit(1));
    assert_eq!(value.raw(), &[1, 1]);
    assert!(value.write_ongoing(2));

    value.write_add(2, &[2]);
    assert!(value.write_commit(2));
    assert_eq!(value.raw(), &[2, 2, 2, 2]);
}

#[test]
fn test_long_read_chunks() {
    let mut value = AttributeValue::with_value((0..10).collect());
    let conn = 3;

    value.read_start(conn);
    assert_eq!(value.read_advance(conn, 4), vec![0, 1, 2, 3]);
    assert_eq!(value.read_advance(conn, 4), vec![4, 5, 6, 7]);
    assert_eq!(value.read_advance(conn, 4), vec![8, 9]);
    assert!(value.read_advance(conn, 4).is_empty());

    value.read_abort(conn);
    assert!(value.read_advance(conn, 4).is_empty());
    assert_eq!(value.try_read_advance(conn, 4), Err(GattError::NoActiveTransaction(conn)));
}

#[test]
fn test_long_read_reassembly() {
    for len in [0usize, 1, 7, 8, 9, 64, 100] {
        for max_len in [1usize, 3, 8, 22] {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let mut value = AttributeValue::with_value(data.clone());
            value.read_start(0);

            let mut chunks = Vec::new();
            loop {
                let chunk = value.read_advance(0, max_len);
                let last = chunk.len() < max_len;
                chunks.push(chunk);
                if last {
                    break;
                }
            }

            assert_eq!(chunks.concat(), data);
            let (last, full) = chunks.split_last().unwrap();
            assert!(full.iter().all(|c| c.len() == max_len));
            assert_eq!(last.len(), len % max_len);
        }
    }
}

#[test]
fn test_read_snapshot_stability() {
    let mut value = AttributeValue::with_value(vec![1, 2, 3, 4, 5, 6]);

    value.read_start(1);
    assert_eq!(value.read_advance(1, 2), vec![1, 2]);

    // Another connection commits a new value mid-read
    value.write_start(2);
    value.write_add(2, &[9, 9]);
    value.write_commit(2);
    value.set_integral(0u8);

    assert_eq!(value.read_advance(1, 2), vec![3, 4]);
    assert_eq!(value.read_advance(1, 2), vec![5, 6]);

    // Closing the read hands back the snapshot, not the committed value
    let snapshot = value.read_abort(1).unwrap();
    assert_eq!(&snapshot[..], &[1, 2, 3, 4, 5, 6]);
    assert_eq!(value.raw(), &[0]);

    // A new read sees the latest value
    value.read_start(1);
    assert_eq!(value.read_advance(1, 8), vec![0]);
}

#[test]
fn test_read_and_write_are_independent() {
    let mut value = AttributeValue::with_value(vec![1, 2, 3]);

    value.read_start(1);
    value.write_start(1);
    assert!(value.read_ongoing(1));
    assert!(value.write_ongoing(1));

    value.write_add(1, &[7]);
    value.read_abort(1);
    assert!(value.write_ongoing(1));
    assert!(value.write_commit(1));

    value.read_start(1);
    value.write_start(1);
    value.abort_all(1);
    assert!(!value.read_ongoing(1));
    assert!(!value.write_ongoing(1));
    assert_eq!(value.raw(), &[7]);
}

// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use googletest::assert_that;
use googletest::prelude::contains_substring;
use openhash::compress::Codec;
use openhash::compress::Lz4Codec;
use openhash::compress::Uncompressed;
use openhash::error::ErrorKind;
use openhash::int2long::Int2LongOpenHashTable;

/// Serializes a small two-entry table without compression so tests can tamper with it.
fn raw_two_entries() -> Vec<u8> {
    let mut table = Int2LongOpenHashTable::new(8);
    table.put(1, 10);
    table.put(2, 20);
    table.serialize_with(&Uncompressed)
}

fn assert_rejected(bytes: &[u8], expected_message: &str) {
    let mut target = Int2LongOpenHashTable::new(8);
    target.put(100, 1000);

    let err = target
        .deserialize_into_with(bytes, &Uncompressed)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring(expected_message));

    // A failed load must not touch the target.
    assert_eq!(target.size(), 1);
    assert_eq!(target.get(100), 1000);
}

#[test]
fn test_serde() {
    let mut table = Int2LongOpenHashTable::new(16384);
    let num_entries = 1_000_000;
    for i in 0..num_entries {
        assert_eq!(table.put(i, i as i64), -1);
    }

    let bytes = table.serialize();
    let mut restored = Int2LongOpenHashTable::new(16384);
    restored.deserialize_into(&bytes).unwrap();

    assert_eq!(restored.size(), num_entries as usize);
    for i in 0..num_entries {
        assert_eq!(restored.get(i), i as i64);
    }
}

#[test]
fn test_serde_empty() {
    let table = Int2LongOpenHashTable::new(8);
    let restored = Int2LongOpenHashTable::deserialize(&table.serialize()).unwrap();
    assert!(restored.is_empty());
    assert!(!restored.entries().has_next());
}

#[test]
fn test_serde_carries_default_and_load_factor() {
    let mut table = Int2LongOpenHashTable::builder()
        .load_factor(0.5)
        .default_return_value(i64::MIN)
        .build();
    table.put(-5, 5);

    let restored = Int2LongOpenHashTable::deserialize(&table.serialize()).unwrap();
    assert_eq!(restored.default_return_value(), i64::MIN);
    assert_eq!(restored.load_factor(), 0.5);
    assert_eq!(restored.get(4), i64::MIN);
    assert_eq!(restored, table);
}

#[test]
fn test_serde_replaces_existing_contents() {
    let mut table = Int2LongOpenHashTable::new(8);
    for key in 0..100 {
        table.put(key, -(key as i64));
    }
    for key in 0..50 {
        table.remove(key);
    }

    let mut target = Int2LongOpenHashTable::new(16384);
    for key in 1000..2000 {
        target.put(key, 1);
    }
    target.deserialize_into(&table.serialize()).unwrap();

    assert_eq!(target.size(), 50);
    assert!(!target.contains_key(1500));
    assert!(!target.contains_key(10));
    assert_eq!(target.get(75), -75);
    assert_eq!(target, table);

    // The restored table keeps working as a table.
    target.put(10, 10);
    assert_eq!(target.size(), 51);
}

#[test]
fn test_serde_with_custom_codec() {
    struct Xor(u8);

    impl Codec for Xor {
        fn compress(&self, bytes: &[u8]) -> Vec<u8> {
            bytes.iter().map(|b| b ^ self.0).collect()
        }

        fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, openhash::error::Error> {
            Ok(self.compress(bytes))
        }
    }

    let table: Int2LongOpenHashTable = (0..1000).map(|k| (k, k as i64 + 1)).collect();
    let bytes = table.serialize_with(&Xor(0x5a));
    let mut restored = Int2LongOpenHashTable::default();
    restored.deserialize_into_with(&bytes, &Xor(0x5a)).unwrap();
    assert_eq!(restored, table);

    // Bytes from one codec are not readable through another.
    assert!(restored.deserialize_into_with(&bytes, &Uncompressed).is_err());
}

#[test]
fn test_lz4_is_smaller_than_raw_for_sequential_keys() {
    let table: Int2LongOpenHashTable = (0..10_000).map(|k| (k, 0)).collect();
    let raw = table.serialize_with(&Uncompressed);
    let compressed = table.serialize_with(&Lz4Codec);
    assert!(compressed.len() < raw.len());
}

#[test]
fn test_reject_corrupt_compressed_bytes() {
    let mut target = Int2LongOpenHashTable::new(8);
    let err = target.deserialize_into(&[1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDeserializeData);
    assert_that!(err.message(), contains_substring("decompress"));
}

#[test]
fn test_reject_wrong_format_id() {
    let mut bytes = raw_two_entries();
    bytes[2] = 0;
    assert_rejected(&bytes, "invalid format id");
}

#[test]
fn test_reject_unsupported_serial_version() {
    let mut bytes = raw_two_entries();
    bytes[1] = 9;
    assert_rejected(&bytes, "unsupported serial version");
}

#[test]
fn test_reject_bad_lg_capacity() {
    let mut bytes = raw_two_entries();
    bytes[4] = 2;
    assert_rejected(&bytes, "lg_capacity must be in");
    bytes[4] = 40;
    assert_rejected(&bytes, "lg_capacity must be in");
}

#[test]
fn test_reject_bad_load_factor() {
    let mut bytes = raw_two_entries();
    bytes[24..32].copy_from_slice(&1.0f64.to_le_bytes());
    assert_rejected(&bytes, "load_factor must be in");
    bytes[24..32].copy_from_slice(&f64::NAN.to_le_bytes());
    assert_rejected(&bytes, "load_factor must be in");
    bytes[24..32].copy_from_slice(&1e-300f64.to_le_bytes());
    assert_rejected(&bytes, "load_factor must be in [0.1, 1.0)");
    bytes[24..32].copy_from_slice(&0.09f64.to_le_bytes());
    assert_rejected(&bytes, "load_factor must be in");
}

#[test]
fn test_reject_invalid_preamble_longs() {
    let mut bytes = raw_two_entries();
    bytes[0] = 3;
    assert_rejected(&bytes, "invalid preamble longs");
}

#[test]
fn test_reject_size_exceeding_used() {
    let mut bytes = raw_two_entries();
    bytes[8..12].copy_from_slice(&3u32.to_le_bytes());
    assert_rejected(&bytes, "exceeds used slots");
}

#[test]
fn test_reject_used_over_threshold() {
    let mut bytes = raw_two_entries();
    // 8 slots at load factor 0.7 allow 5 used slots.
    bytes[12..16].copy_from_slice(&6u32.to_le_bytes());
    assert_rejected(&bytes, "exceed threshold");
}

#[test]
fn test_reject_empty_flag_mismatch() {
    let mut bytes = raw_two_entries();
    bytes[3] = 1 << 2;
    assert_rejected(&bytes, "empty flag");
}

#[test]
fn test_reject_duplicate_key() {
    let mut bytes = raw_two_entries();
    bytes[32..36].copy_from_slice(&5i32.to_le_bytes());
    bytes[36..40].copy_from_slice(&5i32.to_le_bytes());
    assert_rejected(&bytes, "duplicate key 5");
}

#[test]
fn test_reject_truncated_entries() {
    let bytes = raw_two_entries();
    assert_rejected(&bytes[..bytes.len() - 1], "insufficient data");
    assert_rejected(&bytes[..10], "insufficient data");
}

#[test]
fn test_reject_trailing_bytes() {
    let mut bytes = raw_two_entries();
    bytes.push(0);
    assert_rejected(&bytes, "trailing bytes");
}

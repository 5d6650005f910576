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
use googletest::prelude::eq;
use googletest::prelude::ge;
use openhash::int2long::DEFAULT_RETURN_VALUE;
use openhash::int2long::ITERATOR_EXHAUSTED;
use openhash::int2long::Int2LongOpenHashTable;

#[test]
fn test_size() {
    let mut table = Int2LongOpenHashTable::new(16384);
    table.put(1, 3);
    assert_eq!(table.get(1), 3);
    table.put(1, 5);
    assert_eq!(table.get(1), 5);
    assert_eq!(table.size(), 1);
}

#[test]
fn test_default_return_value() {
    let mut table = Int2LongOpenHashTable::new(16384);
    assert_eq!(table.size(), 0);
    assert_eq!(table.get(1), -1);

    table.set_default_return_value(i64::MIN);
    assert_eq!(table.get(1), i64::MIN);
    assert_eq!(table.remove(1), i64::MIN);
    assert_eq!(table.put(1, 7), i64::MIN);

    // Stored entries are not rewritten when the default changes.
    table.set_default_return_value(0);
    assert_eq!(table.get(1), 7);
    assert_eq!(table.get(2), 0);
}

#[test]
fn test_put_returns_previous_value() {
    let mut table = Int2LongOpenHashTable::new(8);
    assert_eq!(table.put(-3, 30), DEFAULT_RETURN_VALUE);
    assert_eq!(table.put(-3, 31), 30);
    assert_eq!(table.put(-3, 32), 31);
    assert_eq!(table.get(-3), 32);
    assert_eq!(table.size(), 1);
}

#[test]
fn test_extreme_keys_and_values() {
    let mut table = Int2LongOpenHashTable::new(8);
    table.put(i32::MIN, i64::MAX);
    table.put(i32::MAX, i64::MIN);
    table.put(0, 0);
    assert_eq!(table.get(i32::MIN), i64::MAX);
    assert_eq!(table.get(i32::MAX), i64::MIN);
    assert_eq!(table.get(0), 0);
    assert_eq!(table.size(), 3);
}

#[test]
fn test_put_and_get() {
    let mut table = Int2LongOpenHashTable::new(16384);
    let num_entries = 1_000_000;
    for i in 0..num_entries {
        assert_eq!(table.put(i, i as i64), -1);
    }
    assert_eq!(table.size(), num_entries as usize);
    for i in 0..num_entries {
        assert_eq!(table.get(i), i as i64);
    }
    assert!(table.capacity().is_power_of_two());
}

#[test]
fn test_put_remove_get() {
    let mut table = Int2LongOpenHashTable::new(16384);
    table.set_default_return_value(0);
    let num_entries = 1_000_000;
    for i in 0..num_entries {
        assert_eq!(table.put(i, i as i64), 0);
        assert_eq!(table.put(-i, -i as i64), 0);
        if i % 2 == 0 {
            assert_eq!(table.remove(i), i as i64);
        } else {
            assert_eq!(table.put(i, i as i64), i as i64);
        }
    }
    assert_eq!(
        table.size(),
        (num_entries + (num_entries / 2) - 1) as usize
    );
    for i in 0..num_entries {
        if i % 2 == 0 {
            assert!(!table.contains_key(i));
        } else {
            assert_eq!(table.get(i), i as i64);
        }
        assert_eq!(table.get(-i), -i as i64);
    }
}

#[test]
fn test_remove_semantics() {
    let mut table = Int2LongOpenHashTable::new(8);
    for key in 0..100 {
        table.put(key, key as i64 * 10);
    }

    assert_eq!(table.remove(42), 420);
    assert!(!table.contains_key(42));
    assert_eq!(table.get(42), DEFAULT_RETURN_VALUE);
    assert_eq!(table.size(), 99);

    // Removing again is a miss.
    assert_eq!(table.remove(42), DEFAULT_RETURN_VALUE);
    assert_eq!(table.size(), 99);

    // Re-inserting after removal starts fresh.
    assert_eq!(table.put(42, 1), DEFAULT_RETURN_VALUE);
    assert_eq!(table.size(), 100);
}

#[test]
fn test_size_tracks_distinct_live_keys() {
    let mut table = Int2LongOpenHashTable::new(8);
    let mut expected = std::collections::HashMap::new();
    // Deterministic mix of puts and removes over a small key space.
    let mut state = 0x2545_f491_u32;
    for step in 0..50_000 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let key = (state % 512) as i32 - 256;
        if state % 3 == 0 {
            assert_eq!(
                table.remove(key),
                expected.remove(&key).unwrap_or(DEFAULT_RETURN_VALUE)
            );
        } else {
            assert_eq!(
                table.put(key, step),
                expected.insert(key, step).unwrap_or(DEFAULT_RETURN_VALUE)
            );
        }
        assert_eq!(table.size(), expected.len());
    }
    for (&key, &value) in &expected {
        assert_eq!(table.get(key), value);
    }
    assert_eq!(table.iter().count(), expected.len());
}

#[test]
fn test_incr() {
    let mut table = Int2LongOpenHashTable::new(8);
    table.set_default_return_value(-7);
    assert_eq!(table.incr(1, 5), 5);
    assert_eq!(table.incr(1, 5), 10);
    assert_eq!(table.incr(2, -1), -1);
    assert_eq!(table.get(1), 10);
    assert_eq!(table.size(), 2);

    table.remove(1);
    assert_eq!(table.incr(1, 3), 3);
}

#[test]
fn test_iterator() {
    let mut table = Int2LongOpenHashTable::new(1000);
    let entries = table.entries();
    assert!(!entries.has_next());

    let num_entries = 1_000_000;
    for i in 0..num_entries {
        assert_eq!(table.put(i, i as i64), -1);
    }
    assert_eq!(table.size(), num_entries as usize);

    let mut entries = table.entries();
    assert!(entries.has_next());
    let mut visited = 0;
    while entries.has_next() {
        assert_ne!(entries.next(), ITERATOR_EXHAUSTED);
        let k = entries.key();
        let v = entries.value();
        assert_eq!(k as i64, v);
        visited += 1;
    }
    assert_eq!(visited, num_entries);
    assert_eq!(entries.next(), ITERATOR_EXHAUSTED);
}

#[test]
fn test_iterator_after_removals() {
    let mut table = Int2LongOpenHashTable::new(8);
    for key in 0..1000 {
        table.put(key, key as i64);
    }
    for key in (0..1000).filter(|k| k % 3 != 0) {
        table.remove(key);
    }

    let mut keys = vec![];
    let mut entries = table.entries();
    while entries.has_next() {
        entries.next();
        assert_eq!(table.get(entries.key()), entries.value());
        keys.push(entries.key());
    }
    keys.sort();
    assert_eq!(keys, (0..1000).filter(|k| k % 3 == 0).collect::<Vec<_>>());
}

#[test]
fn test_iterator_on_cleared_table() {
    let mut table: Int2LongOpenHashTable = (0..100).map(|k| (k, 1)).collect();
    table.clear();
    let mut entries = table.entries();
    assert!(!entries.has_next());
    assert_eq!(entries.next(), ITERATOR_EXHAUSTED);
    assert_eq!(table.iter().next(), None);
}

#[test]
fn test_builder_configuration() {
    let mut table = Int2LongOpenHashTable::builder()
        .capacity(1000)
        .load_factor(0.5)
        .default_return_value(0)
        .build();
    assert_that!(table.capacity(), eq(1024));
    assert_that!(table.load_factor(), eq(0.5));
    assert_that!(table.get(1), eq(0));

    for key in 0..600 {
        table.put(key, 1);
    }
    // 600 entries exceed half of 1024 slots.
    assert_that!(table.capacity(), ge(2048));
}

#[test]
fn test_keys_and_values_are_aligned() {
    let table: Int2LongOpenHashTable = (0..64).map(|k| (k, k as i64 * k as i64)).collect();
    let keys = table.keys();
    let values = table.values();
    assert_eq!(keys.len(), 64);
    for (key, value) in keys.iter().zip(&values) {
        assert_eq!(*key as i64 * *key as i64, *value);
    }
}

#[test]
fn test_logical_equality_ignores_layout() {
    let mut small = Int2LongOpenHashTable::new(8);
    let mut large = Int2LongOpenHashTable::new(4096);
    for key in (0..100).rev() {
        small.put(key, key as i64);
    }
    for key in 0..150 {
        large.put(key, key as i64);
    }
    for key in 100..150 {
        large.remove(key);
    }
    assert_eq!(small, large);

    large.set_default_return_value(0);
    assert_ne!(small, large);
}

#[test]
fn test_debug_prints_entries() {
    let mut table = Int2LongOpenHashTable::new(8);
    table.put(1, 2);
    assert_eq!(format!("{table:?}"), "{1: 2}");
}

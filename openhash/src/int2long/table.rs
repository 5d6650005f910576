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

use std::fmt;

use log::debug;
use log::trace;

use super::DEFAULT_CAPACITY;
use super::DEFAULT_LOAD_FACTOR;
use super::DEFAULT_RETURN_VALUE;
use super::MAX_LG_CAPACITY;
use super::MIN_CAPACITY;
use super::MIN_LOAD_FACTOR;
use super::iter::Iter;
use super::iter::MapIterator;
use crate::error::Error;

/// Slot has never held an entry. Terminates probe sequences.
const FREE: u8 = 0;
/// Slot holds a live entry.
const FULL: u8 = 1;
/// Tombstone left by `remove`. Skipped by lookups, reusable by inserts.
const REMOVED: u8 = 2;

/// Hash table from `i32` keys to `i64` values with open addressing and linear probing.
///
/// See the [module level documentation](crate::int2long) for more.
#[derive(Clone)]
pub struct Int2LongOpenHashTable {
    keys: Vec<i32>,
    values: Vec<i64>,
    states: Vec<u8>,

    // Number of FULL slots.
    size: usize,
    // Number of FULL and REMOVED slots; drives rehashing.
    used: usize,
    // Largest `used` allowed before the next claim of a FREE slot rehashes.
    threshold: usize,

    load_factor: f64,
    default_return_value: i64,
}

enum Probe {
    Occupied(usize),
    // First tombstone on the probe path if any, otherwise the FREE slot that ended it.
    Vacant(usize),
}

impl Int2LongOpenHashTable {
    /// Creates a table with at least `capacity_hint` slots.
    ///
    /// The hint is rounded up to a power of two no smaller than
    /// [`MIN_CAPACITY`](super::MIN_CAPACITY).
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity exceeds `2^MAX_LG_CAPACITY` slots.
    ///
    /// # Examples
    ///
    /// ```
    /// # use openhash::int2long::Int2LongOpenHashTable;
    /// let table = Int2LongOpenHashTable::new(1000);
    /// assert_eq!(table.capacity(), 1024);
    /// assert!(table.is_empty());
    /// ```
    pub fn new(capacity_hint: usize) -> Self {
        Self::with_config(
            rounded_capacity(capacity_hint),
            DEFAULT_LOAD_FACTOR,
            DEFAULT_RETURN_VALUE,
        )
    }

    /// Like [`new`](Self::new), but reports allocation failure instead of aborting.
    ///
    /// # Panics
    ///
    /// Panics if the rounded capacity exceeds `2^MAX_LG_CAPACITY` slots.
    pub fn try_new(capacity_hint: usize) -> Result<Self, Error> {
        let capacity = rounded_capacity(capacity_hint);
        let mut table = Self::with_config(MIN_CAPACITY, DEFAULT_LOAD_FACTOR, DEFAULT_RETURN_VALUE);
        table.reserve_slots(capacity)?;
        table.reset_slots(capacity);
        Ok(table)
    }

    /// Returns a builder to configure capacity, load factor and default return value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use openhash::int2long::Int2LongOpenHashTable;
    /// let table = Int2LongOpenHashTable::builder()
    ///     .capacity(100)
    ///     .load_factor(0.5)
    ///     .default_return_value(0)
    ///     .build();
    /// assert_eq!(table.capacity(), 128);
    /// assert_eq!(table.get(1), 0);
    /// ```
    pub fn builder() -> Int2LongOpenHashTableBuilder {
        Int2LongOpenHashTableBuilder::default()
    }

    fn with_config(capacity: usize, load_factor: f64, default_return_value: i64) -> Self {
        debug_assert!(capacity.is_power_of_two() && capacity >= MIN_CAPACITY);
        Self {
            keys: vec![0; capacity],
            values: vec![0; capacity],
            states: vec![FREE; capacity],
            size: 0,
            used: 0,
            threshold: threshold_for(capacity, load_factor),
            load_factor,
            default_return_value,
        }
    }

    /// Associates `value` with `key`.
    ///
    /// Returns the previous value, or the default return value if `key` was absent.
    pub fn put(&mut self, key: i32, value: i64) -> i64 {
        match self.probe(key) {
            Probe::Occupied(index) => std::mem::replace(&mut self.values[index], value),
            Probe::Vacant(index) => {
                self.claim(index, key, value);
                self.default_return_value
            }
        }
    }

    /// Adds `delta` to the value of `key` and returns the new value.
    ///
    /// An absent key starts from zero, not from the default return value. Overflow wraps.
    ///
    /// # Examples
    ///
    /// ```
    /// # use openhash::int2long::Int2LongOpenHashTable;
    /// let mut table = Int2LongOpenHashTable::default();
    /// assert_eq!(table.incr(3, 5), 5);
    /// assert_eq!(table.incr(3, -2), 3);
    /// ```
    pub fn incr(&mut self, key: i32, delta: i64) -> i64 {
        match self.probe(key) {
            Probe::Occupied(index) => {
                let value = self.values[index].wrapping_add(delta);
                self.values[index] = value;
                value
            }
            Probe::Vacant(index) => {
                self.claim(index, key, delta);
                delta
            }
        }
    }

    /// Returns the value of `key`, or the default return value if absent.
    pub fn get(&self, key: i32) -> i64 {
        match self.find(key) {
            Some(index) => self.values[index],
            None => self.default_return_value,
        }
    }

    /// Removes `key`, returning its value, or the default return value if absent.
    ///
    /// The slot becomes a tombstone until the next rehash.
    pub fn remove(&mut self, key: i32) -> i64 {
        match self.find(key) {
            Some(index) => {
                self.states[index] = REMOVED;
                self.size -= 1;
                self.values[index]
            }
            None => self.default_return_value,
        }
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: i32) -> bool {
        self.find(key).is_some()
    }

    /// Number of entries.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of entries. Same as [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.states.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Value returned by `get`, `put` and `remove` for absent keys.
    pub fn default_return_value(&self) -> i64 {
        self.default_return_value
    }

    /// Sets the value returned for absent keys. Stored entries are unaffected.
    pub fn set_default_return_value(&mut self, value: i64) {
        self.default_return_value = value;
    }

    /// Removes every entry and tombstone, keeping capacity and configuration.
    pub fn clear(&mut self) {
        trace!(
            "clearing table: capacity={}, size={}, used={}",
            self.capacity(),
            self.size,
            self.used
        );
        self.states.fill(FREE);
        self.size = 0;
        self.used = 0;
    }

    /// Cursor over the current entries. See [`MapIterator`].
    pub fn entries(&self) -> MapIterator<'_> {
        MapIterator::new(self)
    }

    /// Iterator over `(key, value)` pairs in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Keys in slot order.
    pub fn keys(&self) -> Vec<i32> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Values in slot order.
    pub fn values(&self) -> Vec<i64> {
        self.iter().map(|(_, value)| value).collect()
    }

    /// Index of the first live slot at or after `from`, or `capacity()` if there is none.
    pub(super) fn next_occupied(&self, from: usize) -> usize {
        self.states
            .iter()
            .skip(from)
            .position(|&state| state == FULL)
            .map_or(self.states.len(), |offset| from + offset)
    }

    pub(super) fn entry_at(&self, index: usize) -> (i32, i64) {
        debug_assert_eq!(self.states[index], FULL);
        (self.keys[index], self.values[index])
    }

    pub(super) fn used(&self) -> usize {
        self.used
    }

    /// Replaces all state with `keys`/`values`, reusing the slot arrays where possible.
    ///
    /// Callers guarantee that keys are distinct and that `keys.len()` fits under the threshold
    /// of `capacity`. Nothing is modified if allocation fails.
    pub(super) fn restore(
        &mut self,
        capacity: usize,
        load_factor: f64,
        default_return_value: i64,
        keys: &[i32],
        values: &[i64],
    ) -> Result<(), Error> {
        debug_assert_eq!(keys.len(), values.len());
        debug_assert!(keys.len() <= threshold_for(capacity, load_factor));
        self.reserve_slots(capacity)?;
        self.load_factor = load_factor;
        self.default_return_value = default_return_value;
        self.reset_slots(capacity);

        let mask = capacity - 1;
        for (&key, &value) in keys.iter().zip(values) {
            let index = self.free_slot(key, mask);
            self.place(index, key, value);
        }
        self.size = keys.len();
        self.used = keys.len();
        Ok(())
    }

    // Lookup probe: stops at the key or at the first FREE slot. Tombstones are skipped.
    fn find(&self, key: i32) -> Option<usize> {
        let mask = self.states.len() - 1;
        let mut index = home_slot(key, mask);
        for _ in 0..self.states.len() {
            match self.states[index] {
                FREE => return None,
                FULL if self.keys[index] == key => return Some(index),
                _ => {}
            }
            index = (index + 1) & mask;
        }
        None
    }

    // Insertion probe: like `find`, but remembers the first tombstone for reuse.
    fn probe(&self, key: i32) -> Probe {
        let mask = self.states.len() - 1;
        let mut index = home_slot(key, mask);
        let mut tombstone = None;
        for _ in 0..self.states.len() {
            match self.states[index] {
                FREE => return Probe::Vacant(tombstone.unwrap_or(index)),
                FULL if self.keys[index] == key => return Probe::Occupied(index),
                REMOVED if tombstone.is_none() => tombstone = Some(index),
                _ => {}
            }
            index = (index + 1) & mask;
        }
        match tombstone {
            Some(index) => Probe::Vacant(index),
            None => unreachable!("threshold keeps at least one FREE slot"),
        }
    }

    // Stores a new entry at a slot returned by `probe`, rehashing first if taking a FREE slot
    // would push `used` over the threshold.
    fn claim(&mut self, index: usize, key: i32, value: i64) {
        let mut index = index;
        if self.states[index] == FREE {
            if self.used + 1 > self.threshold {
                self.rehash(self.grown_capacity());
                index = self.free_slot(key, self.states.len() - 1);
            }
            self.used += 1;
        }
        self.place(index, key, value);
        self.size += 1;
    }

    fn place(&mut self, index: usize, key: i32, value: i64) {
        self.states[index] = FULL;
        self.keys[index] = key;
        self.values[index] = value;
    }

    // First FREE slot on the probe path of `key`. Only valid on a table without tombstones
    // where `key` is absent.
    fn free_slot(&self, key: i32, mask: usize) -> usize {
        let mut index = home_slot(key, mask);
        while self.states[index] != FREE {
            index = (index + 1) & mask;
        }
        index
    }

    // Smallest capacity holding one more live entry. When that is the current capacity, the
    // table is compacted in place if tombstones make up at least half of the used slots and
    // doubled otherwise, so tombstone churn near the threshold cannot rehash on every insert.
    fn grown_capacity(&self) -> usize {
        let capacity = self.capacity();
        let fitted = capacity_for(self.size + 1, self.load_factor);
        if fitted > capacity {
            fitted
        } else if self.used - self.size >= self.used / 2 {
            capacity
        } else {
            capacity * 2
        }
    }

    fn rehash(&mut self, new_capacity: usize) {
        assert!(
            new_capacity <= 1 << MAX_LG_CAPACITY,
            "table cannot grow beyond 2^{MAX_LG_CAPACITY} slots, size={}",
            self.size
        );
        debug!(
            "rehashing table: capacity {} -> {}, size={}, tombstones dropped={}",
            self.capacity(),
            new_capacity,
            self.size,
            self.used - self.size
        );

        let old_keys = std::mem::replace(&mut self.keys, vec![0; new_capacity]);
        let old_values = std::mem::replace(&mut self.values, vec![0; new_capacity]);
        let old_states = std::mem::replace(&mut self.states, vec![FREE; new_capacity]);

        let mask = new_capacity - 1;
        for (i, &state) in old_states.iter().enumerate() {
            if state == FULL {
                let index = self.free_slot(old_keys[i], mask);
                self.place(index, old_keys[i], old_values[i]);
            }
        }
        self.used = self.size;
        self.threshold = threshold_for(new_capacity, self.load_factor);
    }

    // Makes sure the slot arrays can hold `capacity` slots without reallocating.
    fn reserve_slots(&mut self, capacity: usize) -> Result<(), Error> {
        self.keys
            .try_reserve_exact(capacity.saturating_sub(self.keys.len()))
            .map_err(|err| Error::allocation_failed("key array", capacity, err))?;
        self.values
            .try_reserve_exact(capacity.saturating_sub(self.values.len()))
            .map_err(|err| Error::allocation_failed("value array", capacity, err))?;
        self.states
            .try_reserve_exact(capacity.saturating_sub(self.states.len()))
            .map_err(|err| Error::allocation_failed("state array", capacity, err))?;
        Ok(())
    }

    fn reset_slots(&mut self, capacity: usize) {
        self.keys.clear();
        self.keys.resize(capacity, 0);
        self.values.clear();
        self.values.resize(capacity, 0);
        self.states.clear();
        self.states.resize(capacity, FREE);
        self.size = 0;
        self.used = 0;
        self.threshold = threshold_for(capacity, self.load_factor);
    }
}

impl Default for Int2LongOpenHashTable {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for Int2LongOpenHashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Two tables are equal when they hold the same mapping and the same default return value,
/// regardless of capacity or slot layout.
impl PartialEq for Int2LongOpenHashTable {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self.default_return_value == other.default_return_value
            && self
                .iter()
                .all(|(key, value)| other.find(key).is_some_and(|i| other.values[i] == value))
    }
}

impl Eq for Int2LongOpenHashTable {}

impl Extend<(i32, i64)> for Int2LongOpenHashTable {
    fn extend<I: IntoIterator<Item = (i32, i64)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl FromIterator<(i32, i64)> for Int2LongOpenHashTable {
    fn from_iter<I: IntoIterator<Item = (i32, i64)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let expected = iter.size_hint().0;
        let mut table = Self::with_config(
            capacity_for(expected, DEFAULT_LOAD_FACTOR).max(DEFAULT_CAPACITY),
            DEFAULT_LOAD_FACTOR,
            DEFAULT_RETURN_VALUE,
        );
        table.extend(iter);
        table
    }
}

impl<'a> IntoIterator for &'a Int2LongOpenHashTable {
    type Item = (i32, i64);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for [`Int2LongOpenHashTable`].
#[derive(Debug)]
pub struct Int2LongOpenHashTableBuilder {
    capacity: usize,
    load_factor: f64,
    default_return_value: i64,
}

impl Default for Int2LongOpenHashTableBuilder {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
            default_return_value: DEFAULT_RETURN_VALUE,
        }
    }
}

impl Int2LongOpenHashTableBuilder {
    /// Set the initial capacity hint. Rounded up like [`Int2LongOpenHashTable::new`].
    pub fn capacity(mut self, capacity_hint: usize) -> Self {
        self.capacity = capacity_hint;
        self
    }

    /// Set the load factor.
    ///
    /// # Panics
    ///
    /// Panics if `load_factor` is not in `[MIN_LOAD_FACTOR, 1.0)`.
    pub fn load_factor(mut self, load_factor: f64) -> Self {
        assert!(
            valid_load_factor(load_factor),
            "load_factor must be in [{MIN_LOAD_FACTOR}, 1.0), got {load_factor}"
        );
        self.load_factor = load_factor;
        self
    }

    /// Set the value returned for absent keys.
    pub fn default_return_value(mut self, value: i64) -> Self {
        self.default_return_value = value;
        self
    }

    pub fn build(self) -> Int2LongOpenHashTable {
        Int2LongOpenHashTable::with_config(
            rounded_capacity(self.capacity),
            self.load_factor,
            self.default_return_value,
        )
    }
}

/// Home slot of `key`: the murmur3 32-bit finalizer, masked to the table.
#[inline]
fn home_slot(key: i32, mask: usize) -> usize {
    (fmix32(key as u32) as usize) & mask
}

#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

fn rounded_capacity(capacity_hint: usize) -> usize {
    match capacity_hint
        .max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .filter(|&capacity| capacity <= 1 << MAX_LG_CAPACITY)
    {
        Some(capacity) => capacity,
        None => panic!("capacity must be at most 2^{MAX_LG_CAPACITY}, got {capacity_hint}"),
    }
}

/// Number of used slots a table of `capacity` slots may hold. Leaves at least one slot FREE so
/// every probe sequence terminates.
pub(super) fn threshold_for(capacity: usize, load_factor: f64) -> usize {
    ((capacity as f64 * load_factor) as usize).clamp(1, capacity - 1)
}

/// Smallest power-of-two capacity whose threshold admits `entries` used slots.
///
/// # Panics
///
/// Panics if that capacity exceeds `2^MAX_LG_CAPACITY` slots.
pub(super) fn capacity_for(entries: usize, load_factor: f64) -> usize {
    let mut capacity = MIN_CAPACITY;
    while threshold_for(capacity, load_factor) < entries {
        assert!(
            capacity < 1 << MAX_LG_CAPACITY,
            "table cannot grow beyond 2^{MAX_LG_CAPACITY} slots, entries={entries}"
        );
        capacity <<= 1;
    }
    capacity
}

pub(super) fn valid_load_factor(load_factor: f64) -> bool {
    (MIN_LOAD_FACTOR..1.0).contains(&load_factor)
}

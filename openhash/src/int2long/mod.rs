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

//! Open-addressing hash table mapping `i32` keys to `i64` values.
//!
//! [`Int2LongOpenHashTable`] stores keys, values and a per-slot state in three parallel arrays
//! whose length is always a power of two. Collisions are resolved by linear probing from the
//! key's home slot. Removal leaves a tombstone so probe chains of later keys stay intact;
//! tombstones are only reclaimed when the table rehashes.
//!
//! Absent keys are signaled by a configurable default return value (initially `-1`) instead of
//! an `Option`. A stored value equal to the default is indistinguishable from an absent key, so
//! use [`contains_key`](Int2LongOpenHashTable::contains_key) when that matters.
//!
//! # Usage
//!
//! ```rust
//! # use openhash::int2long::Int2LongOpenHashTable;
//! let mut table = Int2LongOpenHashTable::new(1024);
//! assert_eq!(table.put(7, 3), -1);
//! assert_eq!(table.put(7, 5), 3);
//! assert_eq!(table.get(7), 5);
//! assert_eq!(table.get(8), -1);
//!
//! table.set_default_return_value(0);
//! assert_eq!(table.remove(7), 5);
//! assert_eq!(table.get(7), 0);
//! assert!(table.is_empty());
//! ```
//!
//! # Iteration
//!
//! ```rust
//! # use openhash::int2long::Int2LongOpenHashTable;
//! let table: Int2LongOpenHashTable = (0..10).map(|i| (i, i as i64 * 2)).collect();
//!
//! let mut entries = table.entries();
//! while entries.has_next() {
//!     entries.next();
//!     assert_eq!(entries.value(), entries.key() as i64 * 2);
//! }
//! assert_eq!(entries.next(), -1);
//!
//! assert_eq!(table.iter().map(|(_, v)| v).sum::<i64>(), 90);
//! ```
//!
//! # Serialization
//!
//! ```rust
//! # use openhash::int2long::Int2LongOpenHashTable;
//! let mut table = Int2LongOpenHashTable::new(64);
//! table.incr(42, 2);
//!
//! let bytes = table.serialize();
//! let mut restored = Int2LongOpenHashTable::new(16);
//! restored.deserialize_into(&bytes).unwrap();
//! assert_eq!(restored.get(42), 2);
//! ```

mod iter;
mod serialization;
mod table;

pub use self::iter::Iter;
pub use self::iter::MapIterator;
pub use self::table::Int2LongOpenHashTable;
pub use self::table::Int2LongOpenHashTableBuilder;

/// Default load factor.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.7;
/// Smallest accepted load factor. Load factors must lie in `[MIN_LOAD_FACTOR, 1.0)`.
pub const MIN_LOAD_FACTOR: f64 = 0.1;
/// Smallest slot array a table allocates.
pub const MIN_CAPACITY: usize = 8;
/// Slot count used by [`Int2LongOpenHashTable::default`].
pub const DEFAULT_CAPACITY: usize = 16;
/// Largest supported log2 of the slot count.
pub const MAX_LG_CAPACITY: u8 = 31;
/// Initial value returned for absent keys.
pub const DEFAULT_RETURN_VALUE: i64 = -1;
/// Returned by [`MapIterator::next`] once every entry has been visited.
///
/// Independent of the table's configured default return value.
pub const ITERATOR_EXHAUSTED: i64 = -1;

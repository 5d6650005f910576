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

use std::iter::FusedIterator;

use super::ITERATOR_EXHAUSTED;
use super::table::Int2LongOpenHashTable;

/// Forward-only cursor over the entries of an [`Int2LongOpenHashTable`].
///
/// The cursor borrows the table, so it cannot outlive a mutation; call
/// [`entries`](Int2LongOpenHashTable::entries) again after mutating to observe the new state.
///
/// ```
/// # use openhash::int2long::Int2LongOpenHashTable;
/// let mut table = Int2LongOpenHashTable::new(16);
/// table.put(1, 100);
///
/// let mut entries = table.entries();
/// assert!(entries.has_next());
/// assert_eq!(entries.next(), 100);
/// assert_eq!((entries.key(), entries.value()), (1, 100));
/// assert!(!entries.has_next());
/// assert_eq!(entries.next(), -1);
/// ```
#[derive(Debug, Clone)]
pub struct MapIterator<'a> {
    table: &'a Int2LongOpenHashTable,
    // Slot the cursor sits on, set by a successful `next`.
    current: Option<usize>,
    // Next live slot ahead of the cursor, or the table capacity when there is none.
    upcoming: usize,
}

impl<'a> MapIterator<'a> {
    pub(super) fn new(table: &'a Int2LongOpenHashTable) -> Self {
        Self {
            table,
            current: None,
            upcoming: table.next_occupied(0),
        }
    }

    /// Returns true if a live entry remains ahead of the cursor.
    pub fn has_next(&self) -> bool {
        self.upcoming < self.table.capacity()
    }

    /// Moves the cursor to the next live entry and returns its value.
    ///
    /// Returns [`ITERATOR_EXHAUSTED`] (`-1`) once every entry has been visited, and keeps
    /// returning it on further calls.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> i64 {
        if !self.has_next() {
            self.current = None;
            return ITERATOR_EXHAUSTED;
        }
        let index = self.upcoming;
        self.current = Some(index);
        self.upcoming = self.table.next_occupied(index + 1);
        self.table.entry_at(index).1
    }

    /// Key of the entry under the cursor.
    ///
    /// # Panics
    ///
    /// Panics unless the last call to [`next`](Self::next) moved onto an entry.
    pub fn key(&self) -> i32 {
        self.table.entry_at(self.position()).0
    }

    /// Value of the entry under the cursor.
    ///
    /// # Panics
    ///
    /// Panics unless the last call to [`next`](Self::next) moved onto an entry.
    pub fn value(&self) -> i64 {
        self.table.entry_at(self.position()).1
    }

    fn position(&self) -> usize {
        match self.current {
            Some(index) => index,
            None => panic!("iterator is not positioned on an entry; call next() first"),
        }
    }
}

/// Iterator over the `(key, value)` pairs of an [`Int2LongOpenHashTable`], in slot order.
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    table: &'a Int2LongOpenHashTable,
    index: usize,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(table: &'a Int2LongOpenHashTable) -> Self {
        Self {
            table,
            index: 0,
            remaining: table.size(),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = (i32, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.table.next_occupied(self.index);
        self.index = index + 1;
        self.remaining -= 1;
        Some(self.table.entry_at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

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

//! Binary serialization for [`Int2LongOpenHashTable`].
//!
//! The uncompressed form is passed through a [`Codec`] (LZ4 by default). The layout is private
//! to this module and only needs to be read back by the same crate version.
//!
//! ## Preamble Layout (Little Endian)
//!
//! | Byte  | Field | Description |
//! |-------|-------|-------------|
//! | 0 | preamble_longs | Number of 8-byte longs in the preamble (4) |
//! | 1 | serial_version | Serialization version (currently 1) |
//! | 2 | format_id | Identifies an `i32 -> i64` table |
//! | 3 | flags | Bit 2: table is empty |
//! | 4 | lg_capacity | Log2 of the slot count |
//! | 5-7 | unused | Zero |
//! | 8-11 | size | Number of live entries |
//! | 12-15 | used | Live entries plus tombstones at serialization time |
//! | 16-23 | default_return_value | Value returned for absent keys |
//! | 24-31 | load_factor | Load factor as a 64-bit float |
//!
//! The preamble is followed by `size` keys (4 bytes each) and then `size` values (8 bytes
//! each), both in slot order. Tombstones are not written, so a restored table has no
//! tombstones.

use log::debug;

use super::MAX_LG_CAPACITY;
use super::MIN_CAPACITY;
use super::MIN_LOAD_FACTOR;
use super::table::Int2LongOpenHashTable;
use super::table::threshold_for;
use super::table::valid_load_factor;
use crate::codec::TableBytes;
use crate::codec::TableSlice;
use crate::compress::Codec;
use crate::compress::Lz4Codec;
use crate::error::Error;

pub(super) const PREAMBLE_LONGS: u8 = 4;
pub(super) const SERIAL_VERSION: u8 = 1;
pub(super) const INT2LONG_FORMAT_ID: u8 = 0x24;

pub(super) const FLAG_EMPTY: u8 = 1 << 2;

pub(super) const PREAMBLE_BYTES: usize = PREAMBLE_LONGS as usize * 8;
pub(super) const KEY_SIZE_BYTES: usize = 4;
pub(super) const VALUE_SIZE_BYTES: usize = 8;

impl Int2LongOpenHashTable {
    /// Serializes this table to LZ4-compressed bytes.
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_with(&Lz4Codec)
    }

    /// Serializes this table and compresses the result with `codec`.
    pub fn serialize_with<C: Codec + ?Sized>(&self, codec: &C) -> Vec<u8> {
        let size = self.size();
        let mut bytes =
            TableBytes::with_capacity(PREAMBLE_BYTES + size * (KEY_SIZE_BYTES + VALUE_SIZE_BYTES));

        let flags = if size == 0 { FLAG_EMPTY } else { 0 };
        bytes.write_u8(PREAMBLE_LONGS);
        bytes.write_u8(SERIAL_VERSION);
        bytes.write_u8(INT2LONG_FORMAT_ID);
        bytes.write_u8(flags);
        bytes.write_u8(self.capacity().trailing_zeros() as u8);
        bytes.write(&[0u8; 3]);
        bytes.write_u32_le(size as u32);
        bytes.write_u32_le(self.used() as u32);
        bytes.write_i64_le(self.default_return_value());
        bytes.write_f64_le(self.load_factor());

        for (key, _) in self.iter() {
            bytes.write_i32_le(key);
        }
        for (_, value) in self.iter() {
            bytes.write_i64_le(value);
        }

        codec.compress(&bytes.into_bytes())
    }

    /// Deserializes LZ4-compressed bytes into a new table.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut table = Self::new(MIN_CAPACITY);
        table.deserialize_into(bytes)?;
        Ok(table)
    }

    /// Replaces the contents of this table with LZ4-compressed bytes produced by
    /// [`serialize`](Self::serialize).
    ///
    /// The existing slot arrays are reused when they are large enough. On error the table is
    /// left unchanged.
    pub fn deserialize_into(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.deserialize_into_with(bytes, &Lz4Codec)
    }

    /// Like [`deserialize_into`](Self::deserialize_into), decompressing with `codec`.
    pub fn deserialize_into_with<C: Codec + ?Sized>(
        &mut self,
        bytes: &[u8],
        codec: &C,
    ) -> Result<(), Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |_| Error::insufficient_data(tag)
        }

        let raw = codec.decompress(bytes)?;
        let mut cursor = TableSlice::new(&raw);

        let preamble_longs = cursor.read_u8().map_err(make_error("preamble_longs"))?;
        let serial_version = cursor.read_u8().map_err(make_error("serial_version"))?;
        let format_id = cursor.read_u8().map_err(make_error("format_id"))?;
        let flags = cursor.read_u8().map_err(make_error("flags"))?;
        let lg_capacity = cursor.read_u8().map_err(make_error("lg_capacity"))?;
        let mut unused = [0u8; 3];
        cursor
            .read_exact(&mut unused)
            .map_err(make_error("unused"))?;
        let size = cursor.read_u32_le().map_err(make_error("size"))? as usize;
        let used = cursor.read_u32_le().map_err(make_error("used"))? as usize;
        let default_return_value = cursor
            .read_i64_le()
            .map_err(make_error("default_return_value"))?;
        let load_factor = cursor.read_f64_le().map_err(make_error("load_factor"))?;

        if format_id != INT2LONG_FORMAT_ID {
            return Err(Error::deserial(format!(
                "invalid format id: expected {INT2LONG_FORMAT_ID}, got {format_id}"
            )));
        }
        if serial_version != SERIAL_VERSION {
            return Err(Error::deserial(format!(
                "unsupported serial version: expected {SERIAL_VERSION}, got {serial_version}"
            )));
        }
        if preamble_longs != PREAMBLE_LONGS {
            return Err(Error::deserial(format!(
                "invalid preamble longs: expected {PREAMBLE_LONGS}, got {preamble_longs}"
            )));
        }
        let min_lg_capacity = MIN_CAPACITY.trailing_zeros() as u8;
        if !(min_lg_capacity..=MAX_LG_CAPACITY).contains(&lg_capacity) {
            return Err(Error::deserial(format!(
                "lg_capacity must be in [{min_lg_capacity}, {MAX_LG_CAPACITY}], got {lg_capacity}"
            )));
        }
        if !valid_load_factor(load_factor) {
            return Err(Error::deserial(format!(
                "load_factor must be in [{MIN_LOAD_FACTOR}, 1.0), got {load_factor}"
            )));
        }
        if ((flags & FLAG_EMPTY) != 0) != (size == 0) {
            return Err(Error::deserial(format!(
                "empty flag does not match size {size}"
            )));
        }
        if size > used {
            return Err(Error::deserial(format!(
                "size {size} exceeds used slots {used}"
            )));
        }
        let capacity = 1usize << lg_capacity;
        let threshold = threshold_for(capacity, load_factor);
        if used > threshold {
            return Err(Error::deserial(format!(
                "used slots {used} exceed threshold {threshold} of capacity {capacity}"
            ))
            .with_context("load_factor", load_factor));
        }

        let expected = size * (KEY_SIZE_BYTES + VALUE_SIZE_BYTES);
        let remaining = cursor.remaining();
        if remaining < expected {
            return Err(Error::insufficient_data("entries")
                .with_context("expected_bytes", expected)
                .with_context("actual_bytes", remaining));
        }
        if remaining > expected {
            return Err(Error::deserial(format!(
                "{} trailing bytes after {size} entries",
                remaining - expected
            )));
        }

        let mut keys = Vec::with_capacity(size);
        for _ in 0..size {
            keys.push(cursor.read_i32_le().map_err(make_error("keys"))?);
        }
        let mut values = Vec::with_capacity(size);
        for _ in 0..size {
            values.push(cursor.read_i64_le().map_err(make_error("values"))?);
        }

        let mut sorted = keys.clone();
        sorted.sort_unstable();
        if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(Error::deserial(format!("duplicate key {}", pair[0])));
        }

        self.restore(capacity, load_factor, default_return_value, &keys, &values)?;
        debug!(
            "deserialized table: capacity={capacity}, size={size}, tombstones dropped={}",
            used - size
        );
        Ok(())
    }
}

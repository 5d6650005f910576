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

//! # Open-addressing hash tables for primitive keys and values
//!
//! This crate provides hash tables specialized for primitive key and value types. Storing keys
//! and values unboxed in flat, power-of-two sized arrays keeps the memory layout predictable
//! and every operation O(1) amortized, which matters on hot paths that keep millions of
//! integer-keyed counters or accumulators.
//!
//! Tables are single-owner structures. They are `Send` and `Sync` like any plain `Vec`-backed
//! value, but perform no internal synchronization.
//!
//! ## Tables
//!
//! - [`int2long::Int2LongOpenHashTable`]: `i32` keys to `i64` values, with tombstone removal, a
//!   configurable default return value, a cursor iterator and compressed serialization.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod compress;
pub mod error;
pub mod int2long;

mod codec;

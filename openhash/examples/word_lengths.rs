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

//! Counts word lengths of a text with an `Int2LongOpenHashTable`, then ships the counters
//! through serialization as a worker would to a coordinator.

use openhash::int2long::Int2LongOpenHashTable;

const TEXT: &str = "the quick brown fox jumps over the lazy dog while the cat sleeps \
                    under a warm and quiet window in the afternoon sun";

fn main() {
    let mut counters = Int2LongOpenHashTable::new(64);
    counters.set_default_return_value(0);

    for word in TEXT.split_whitespace() {
        counters.incr(word.len() as i32, 1);
    }

    let bytes = counters.serialize();
    println!(
        "{} distinct lengths, {} serialized bytes",
        counters.size(),
        bytes.len()
    );

    let mut merged = Int2LongOpenHashTable::new(64);
    if let Err(err) = merged.deserialize_into(&bytes) {
        eprintln!("failed to restore counters: {err}");
        std::process::exit(1);
    }

    let mut rows: Vec<(i32, i64)> = merged.iter().collect();
    rows.sort_unstable();
    for (len, count) in rows {
        println!("{len:>3} chars: {count}");
    }
    println!("words of length 42: {}", merged.get(42));
}

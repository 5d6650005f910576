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

//! Byte-level compression used to shrink serialized tables.
//!
//! Tables treat the codec as a black box: [`Codec::compress`] must be lossless and
//! deterministic, and [`Codec::decompress`] must invert it exactly.

use crate::error::Error;

/// A lossless byte codec applied to the serialized form of a table.
pub trait Codec {
    /// Compress `bytes`.
    fn compress(&self, bytes: &[u8]) -> Vec<u8>;

    /// Invert [`Codec::compress`].
    ///
    /// Fails with [`ErrorKind::MalformedDeserializeData`](crate::error::ErrorKind) if `bytes`
    /// were not produced by this codec.
    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, Error>;
}

/// LZ4 block compression with the uncompressed length prepended.
///
/// This is the codec used by `serialize` and `deserialize_into`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn compress(&self, bytes: &[u8]) -> Vec<u8> {
        lz4_flex::compress_prepend_size(bytes)
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        lz4_flex::decompress_size_prepended(bytes).map_err(|err| {
            Error::deserial("failed to decompress table bytes")
                .with_context("compressed_len", bytes.len())
                .set_source(err)
        })
    }
}

/// Identity codec, for callers that compress at another layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Uncompressed;

impl Codec for Uncompressed {
    fn compress(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }

    fn decompress(&self, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(bytes.to_vec())
    }
}

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

//! Hashing primitives.
//!
//! Every filter position is derived from a single MurmurHash3 x64/128 evaluation with
//! seed 0. The raw digest is exposed too, both as the `(h1, h2)` word pair and packed
//! into one signed 128-bit value, so that fixtures pinned to exact digests can be
//! checked from any implementation.

mod murmurhash;
mod positions;

use std::hash::Hasher;

pub use self::murmurhash::MurmurHash3X64128;
pub use self::positions::BitPositions;

/// Seed used for every key hashed into a filter.
pub const FILTER_SEED: u32 = 0;

/// Computes the MurmurHash3 x64/128 digest of `key`.
///
/// Returns the two 64-bit words `(h1, h2)` of the digest.
///
/// # Examples
///
/// ```
/// # use bloof::hash::hash128;
/// let (h1, h2) = hash128(b"foo", 0);
/// assert_eq!(h1, 0xe271865701f54561);
/// assert_eq!(h2, 0x7eaf87e42bba7d87);
/// ```
pub fn hash128(key: &[u8], seed: u32) -> (u64, u64) {
    let mut hasher = MurmurHash3X64128::with_seed(seed);
    hasher.write(key);
    hasher.finish128()
}

/// Computes the MurmurHash3 x64/128 digest of `key` packed as `(h1 << 64) | h2`,
/// reinterpreted as a signed 128-bit integer.
///
/// Digests can be chained by seeding the next evaluation with the low 32 bits of the
/// previous one (`digest as u32`).
///
/// # Examples
///
/// ```
/// # use bloof::hash::hash;
/// let h1 = hash("foo", 0);
/// let h2 = hash("foo", h1 as u32);
/// assert_eq!(h1, -39287385592190013122878999397579195001);
/// assert_eq!(h2, -73964642705803263641983394469427790275);
/// ```
pub fn hash(key: impl AsRef<[u8]>, seed: u32) -> i128 {
    let (h1, h2) = hash128(key.as_ref(), seed);
    pack(h1, h2)
}

/// Computes the packed digest of a signed 64-bit integer, using the same 8-byte
/// little-endian encoding that [`LongBloomFilter`](crate::bloom::LongBloomFilter) keys use.
pub fn hash_long(value: i64, seed: u32) -> i128 {
    hash(value.to_le_bytes(), seed)
}

fn pack(h1: u64, h2: u64) -> i128 {
    ((u128::from(h1) << 64) | u128::from(h2)) as i128
}

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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! a key is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not
//! in set".
//!
//! # Properties
//!
//! - **No false negatives**: If a key was added, `contains()` always returns `true`
//! - **Possible false positives**: `contains()` may return `true` for keys never added
//! - **Fixed size**: A filter never resizes; `size` and `hashes` are set at construction
//! - **Portable**: The serialized form is byte-exact across implementations
//!
//! # Key domains
//!
//! Every filter is bound to one key domain:
//!
//! | Filter | Domain | Canonical bytes |
//! |--------|--------|-----------------|
//! | [`StringBloomFilter`] | [`ByteKeys`] | raw bytes (text as UTF-8) |
//! | [`LongBloomFilter`] | [`LongKeys`] | 8 bytes, little-endian two's complement |
//! | [`UIntBloomFilter`] | [`UIntKeys`] | 4 bytes, little-endian |
//!
//! Integer filters accept any primitive integer type and reject values that do not fit
//! the domain width with [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange).
//!
//! # Usage
//!
//! ```rust
//! use bloof::bloom::LongBloomFilter;
//!
//! let mut filter = LongBloomFilter::new(500, 9).unwrap();
//! filter.add(1015).unwrap();
//! filter.extend([10, 25, 35]).unwrap();
//!
//! assert!(filter.contains(1015).unwrap());
//! assert!(!filter.contains(2015).unwrap());
//!
//! // Ship it around as base64
//! let text = filter.to_base64();
//! let restored = LongBloomFilter::from_base64(&text).unwrap();
//! assert_eq!(restored, filter);
//! ```
//!
//! # Sizing
//!
//! Use [`crate::optimizer`] to pick `(k, buckets per element)` from the tabulated false
//! positive model, then [`BloomFilterBuilder::with_specification`]:
//!
//! ```rust
//! # use bloof::bloom::BloomFilterBuilder;
//! # use bloof::bloom::ByteKeys;
//! # use bloof::optimizer::compute_spec_from_fp_rate;
//! let spec = compute_spec_from_fp_rate(20, 0.01).unwrap();
//! let filter = BloomFilterBuilder::<ByteKeys>::with_specification(spec, 10_000)
//!     .build()
//!     .unwrap();
//! assert_eq!(filter.size(), 100_000);
//! assert_eq!(filter.hashes(), 5);
//! ```
//!
//! # Implementation Details
//!
//! - One MurmurHash3 x64/128 evaluation (seed 0) per key
//! - Double hashing derives the `k` positions, see [`crate::hash::BitPositions`]
//! - Bits packed most significant bit first; see [`BitSet`]
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod bitset;
mod builder;
mod filter;
mod key;
mod serialization;

pub use self::bitset::BitSet;
pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_HASHES;
pub use self::builder::MAX_SIZE;
pub use self::builder::MIN_HASHES;
pub use self::builder::MIN_SIZE;
pub use self::filter::BloomFilter;
pub use self::key::ByteKeys;
pub use self::key::EncodeKey;
pub use self::key::EncodedKey;
pub use self::key::KeyDomain;
pub use self::key::LongKeys;
pub use self::key::UIntKeys;
pub use self::serialization::HEADER_BYTES;

/// A Bloom filter over byte string keys.
pub type StringBloomFilter = BloomFilter<ByteKeys>;

/// A Bloom filter over signed 64-bit integer keys.
pub type LongBloomFilter = BloomFilter<LongKeys>;

/// A Bloom filter over unsigned 32-bit integer keys.
pub type UIntBloomFilter = BloomFilter<UIntKeys>;

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

use std::f64::consts::LN_2;
use std::marker::PhantomData;

use super::BitSet;
use super::BloomFilter;
use super::KeyDomain;
use crate::error::Error;
use crate::optimizer::BloomSpecification;

/// Smallest accepted filter size in bits.
pub const MIN_SIZE: u32 = 1;
/// Largest accepted filter size in bits; the serialized header stores it as an `i32`.
pub const MAX_SIZE: u32 = i32::MAX as u32;
/// Smallest accepted number of hash functions.
pub const MIN_HASHES: u32 = 1;
/// Largest accepted number of hash functions; serialized as an `i32`.
pub const MAX_HASHES: u32 = i32::MAX as u32;

/// Builder for creating [`BloomFilter`] instances.
///
/// Provides three construction modes:
/// - [`with_size()`](Self::with_size): explicit bit count and hash count
/// - [`with_specification()`](Self::with_specification): a [`BloomSpecification`] from the
///   optimizer scaled to an expected number of items
/// - [`with_accuracy()`](Self::with_accuracy): closed-form sizing for a target false
///   positive probability
///
/// Limits are checked by [`build()`](Self::build), so every mode reports bad input the
/// same way.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder<D: KeyDomain> {
    size: u64,
    hashes: u64,
    domain: PhantomData<D>,
}

impl<D: KeyDomain> BloomFilterBuilder<D> {
    /// Creates a builder for a filter of `size` bits and `hashes` hash functions.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::BloomFilterBuilder;
    /// # use bloof::bloom::ByteKeys;
    /// let filter = BloomFilterBuilder::<ByteKeys>::with_size(10_000, 7)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.size(), 10_000);
    /// ```
    pub fn with_size(size: u32, hashes: u32) -> Self {
        BloomFilterBuilder {
            size: u64::from(size),
            hashes: u64::from(hashes),
            domain: PhantomData,
        }
    }

    /// Creates a builder sized by a [`BloomSpecification`]:
    /// `size = buckets_per_element * expected_items`, `hashes = k`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::BloomFilterBuilder;
    /// # use bloof::bloom::LongKeys;
    /// # use bloof::optimizer::compute_spec_from_buckets;
    /// let spec = compute_spec_from_buckets(10).unwrap();
    /// let filter = BloomFilterBuilder::<LongKeys>::with_specification(spec, 1000)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.size(), 10_000);
    /// assert_eq!(filter.hashes(), 7);
    /// ```
    pub fn with_specification(spec: BloomSpecification, expected_items: u32) -> Self {
        BloomFilterBuilder {
            size: u64::from(spec.buckets_per_element) * u64::from(expected_items),
            hashes: u64::from(spec.k),
            domain: PhantomData,
        }
    }

    /// Creates a builder sized for `expected_items` keys at false positive probability
    /// `fpp`, using [`suggest_size`](Self::suggest_size) and
    /// [`suggest_hashes`](Self::suggest_hashes).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// `expected_items` is 0 or `fpp` is not in (0.0, 1.0).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::BloomFilterBuilder;
    /// # use bloof::bloom::ByteKeys;
    /// let filter = BloomFilterBuilder::<ByteKeys>::with_accuracy(1000, 0.01)
    ///     .unwrap()
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.size(), 9586);
    /// assert_eq!(filter.hashes(), 6);
    /// ```
    pub fn with_accuracy(expected_items: u32, fpp: f64) -> Result<Self, Error> {
        if expected_items == 0 {
            return Err(Error::invalid_parameter(
                "expected_items must be greater than 0",
            ));
        }
        if !(fpp > 0.0 && fpp < 1.0) {
            return Err(
                Error::invalid_parameter("fpp must be between 0.0 and 1.0 (exclusive)")
                    .with_context("fpp", fpp),
            );
        }

        let size = Self::suggest_size(expected_items, fpp);
        let hashes = Self::suggest_hashes(expected_items, size);
        Ok(BloomFilterBuilder {
            size,
            hashes,
            domain: PhantomData,
        })
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if the
    /// size is outside `[MIN_SIZE, MAX_SIZE]` or the hash count is outside
    /// `[MIN_HASHES, MAX_HASHES]`.
    pub fn build(self) -> Result<BloomFilter<D>, Error> {
        let size = check_range("size", self.size, MIN_SIZE, MAX_SIZE)?;
        let hashes = check_range("hashes", self.hashes, MIN_HASHES, MAX_HASHES)?;
        tracing::trace!(size, hashes, domain = D::NAME, "building bloom filter");
        Ok(BloomFilter::from_parts(hashes, BitSet::new(size)))
    }

    /// Suggests the number of bits for `expected_items` keys at false positive
    /// probability `fpp`.
    ///
    /// Formula: `m = ceil(n * ln(p) / ln(1 / 2^ln(2)))`
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::BloomFilterBuilder;
    /// # use bloof::bloom::ByteKeys;
    /// let bits = BloomFilterBuilder::<ByteKeys>::suggest_size(1000, 0.01);
    /// assert_eq!(bits, 9586);
    /// ```
    pub fn suggest_size(expected_items: u32, fpp: f64) -> u64 {
        let n = f64::from(expected_items);
        let denominator = (1.0 / 2.0f64.powf(LN_2)).ln();
        (n * fpp.ln() / denominator).ceil() as u64
    }

    /// Suggests the number of hash functions for `expected_items` keys in `size` bits.
    ///
    /// Formula: `k = floor(ln(2) * m / n)`, at least 1.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::BloomFilterBuilder;
    /// # use bloof::bloom::ByteKeys;
    /// assert_eq!(BloomFilterBuilder::<ByteKeys>::suggest_hashes(1000, 9586), 6);
    /// assert_eq!(BloomFilterBuilder::<ByteKeys>::suggest_hashes(100, 100), 1);
    /// ```
    pub fn suggest_hashes(expected_items: u32, size: u64) -> u64 {
        let k = (LN_2 * size as f64 / f64::from(expected_items)) as u64;
        k.max(u64::from(MIN_HASHES))
    }
}

fn check_range(name: &'static str, value: u64, min: u32, max: u32) -> Result<u32, Error> {
    if value < u64::from(min) {
        return Err(Error::invalid_parameter(format!("{name} must be at least {min}"))
            .with_context(name, value));
    }
    u32::try_from(value)
        .ok()
        .filter(|v| *v <= max)
        .ok_or_else(|| {
            Error::invalid_parameter(format!("{name} must not exceed {max}"))
                .with_context(name, value)
        })
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::bloom::ByteKeys;
    use crate::bloom::LongKeys;
    use crate::error::ErrorKind;

    #[test]
    fn test_builder_with_size() {
        let filter = BloomFilterBuilder::<ByteKeys>::with_size(1024, 5)
            .build()
            .unwrap();
        assert_eq!(filter.size(), 1024);
        assert_eq!(filter.hashes(), 5);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_builder_with_accuracy() {
        let filter = BloomFilterBuilder::<LongKeys>::with_accuracy(10, 0.1)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(filter.size(), 48);
        assert_eq!(filter.hashes(), 3);
    }

    #[test]
    fn test_high_fpp_keeps_one_hash() {
        let builder = BloomFilterBuilder::<ByteKeys>::with_accuracy(100, 0.5).unwrap();
        let filter = builder.build().unwrap();
        assert_eq!(filter.size(), 145);
        assert_eq!(filter.hashes(), 1);
    }

    #[test]
    fn test_with_accuracy_invalid() {
        let err = BloomFilterBuilder::<ByteKeys>::with_accuracy(0, 0.01).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        for fpp in [0.0, 1.0, 1.5, -0.1, f64::NAN] {
            let err = BloomFilterBuilder::<ByteKeys>::with_accuracy(100, fpp).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_specification_overflow() {
        let spec = BloomSpecification::new(7, 10);
        let err = BloomFilterBuilder::<ByteKeys>::with_specification(spec, u32::MAX)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_snapshot!(
            err,
            @"InvalidParameter, context: { size: 42949672950 } => size must not exceed 2147483647"
        );
    }

    #[test]
    fn test_zero_size_message() {
        let err = BloomFilterBuilder::<ByteKeys>::with_size(0, 3)
            .build()
            .unwrap_err();
        assert_snapshot!(err, @"InvalidParameter, context: { size: 0 } => size must be at least 1");
    }
}

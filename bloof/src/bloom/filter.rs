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

use std::marker::PhantomData;

use super::BitSet;
use super::BloomFilterBuilder;
use super::EncodeKey;
use super::KeyDomain;
use crate::error::Error;
use crate::hash::BitPositions;

/// A Bloom filter over keys of domain `D`.
///
/// Provides fast membership queries with:
/// - No false negatives (added keys always report `true`)
/// - Tunable false positive rate
/// - Constant space usage of `size` bits
///
/// Each key is hashed once with MurmurHash3 x64/128 and mapped to `hashes` bit
/// positions by double hashing (see [`BitPositions`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter<D: KeyDomain> {
    /// Number of hash functions to use (k)
    pub(super) num_hashes: u32,
    /// Bit array of `size` bits (m)
    pub(super) bits: BitSet,
    pub(super) domain: PhantomData<D>,
}

impl<D: KeyDomain> BloomFilter<D> {
    /// Creates an empty filter of `size` bits using `hashes` hash functions.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// either argument is zero or exceeds `i32::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::StringBloomFilter;
    /// let mut filter = StringBloomFilter::new(500, 9).unwrap();
    /// filter.add("test").unwrap();
    ///
    /// assert!(filter.contains("test").unwrap());
    /// assert!(!filter.contains("duck").unwrap());
    /// ```
    pub fn new(size: u32, hashes: u32) -> Result<Self, Error> {
        BloomFilterBuilder::with_size(size, hashes).build()
    }

    pub(super) fn from_parts(num_hashes: u32, bits: BitSet) -> Self {
        BloomFilter {
            num_hashes,
            bits,
            domain: PhantomData,
        }
    }

    /// Adds a key to the filter.
    ///
    /// After adding, `contains(key)` always returns `true` until the filter is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange) if the key does
    /// not fit the filter's key domain. The filter is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::LongBloomFilter;
    /// let mut filter = LongBloomFilter::new(500, 9).unwrap();
    /// filter.add(1015).unwrap();
    /// assert!(filter.contains(1015u16).unwrap());
    /// assert!(filter.add(u64::MAX).is_err());
    /// ```
    pub fn add<K: EncodeKey<D>>(&mut self, key: K) -> Result<(), Error> {
        let encoded = key.encode_key()?;
        for position in self.positions(encoded.as_ref()) {
            self.bits.set(position);
        }
        Ok(())
    }

    /// Adds every key in order.
    ///
    /// Stops at the first key that fails to encode and returns its error; keys before it
    /// stay added.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::UIntBloomFilter;
    /// let mut filter = UIntBloomFilter::new(500, 9).unwrap();
    /// filter.extend([10, 25, 35]).unwrap();
    /// assert!(filter.contains(25).unwrap());
    /// ```
    pub fn extend<I>(&mut self, keys: I) -> Result<(), Error>
    where
        I: IntoIterator,
        I::Item: EncodeKey<D>,
    {
        keys.into_iter().try_for_each(|key| self.add(key))
    }

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: the key was **possibly** added (or is a false positive)
    /// - `false`: the key was **definitely not** added
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange) if the key does
    /// not fit the filter's key domain.
    pub fn contains<K: EncodeKey<D>>(&self, key: K) -> Result<bool, Error> {
        let encoded = key.encode_key()?;
        if self.is_empty() {
            return Ok(false);
        }
        Ok(self
            .positions(encoded.as_ref())
            .all(|position| self.bits.test(position)))
    }

    /// Tests and adds a key in a single hashing pass.
    ///
    /// Returns whether the key was possibly already in the set before it was added.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::StringBloomFilter;
    /// let mut filter = StringBloomFilter::new(1000, 5).unwrap();
    /// assert!(!filter.contains_and_add("apple").unwrap());
    /// assert!(filter.contains_and_add("apple").unwrap());
    /// ```
    pub fn contains_and_add<K: EncodeKey<D>>(&mut self, key: K) -> Result<bool, Error> {
        let encoded = key.encode_key()?;
        let mut was_present = true;
        for position in self.positions(encoded.as_ref()) {
            if self.bits.set(position) {
                was_present = false;
            }
        }
        Ok(was_present)
    }

    /// Resets every bit to zero, keeping `size` and `hashes`.
    pub fn clear(&mut self) {
        self.bits.clear_all();
    }

    /// Merges another filter into this one via bitwise OR (union).
    ///
    /// After merging, this filter recognizes keys added to either filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if the
    /// filters are not compatible (see [`is_compatible`](Self::is_compatible)).
    pub fn union(&mut self, other: &BloomFilter<D>) -> Result<(), Error> {
        if !self.is_compatible(other) {
            return Err(
                Error::invalid_parameter("cannot union incompatible Bloom filters")
                    .with_context("size", format!("{} vs {}", self.size(), other.size()))
                    .with_context("hashes", format!("{} vs {}", self.hashes(), other.hashes())),
            );
        }
        self.bits.union_with(&other.bits)
    }

    /// Checks whether two filters have the same `size` and `hashes`.
    pub fn is_compatible(&self, other: &BloomFilter<D>) -> bool {
        self.size() == other.size() && self.hashes() == other.hashes()
    }

    /// Returns the total number of bits in the filter (m).
    pub fn size(&self) -> u32 {
        self.bits.num_bits()
    }

    /// Returns the number of hash functions used (k).
    pub fn hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the underlying bit array.
    pub fn bits(&self) -> &BitSet {
        &self.bits
    }

    /// Returns whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones() == 0
    }

    /// Returns the number of bits set to 1.
    pub fn bits_used(&self) -> u64 {
        self.bits.count_ones()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / f64::from(self.size())
    }

    /// Estimates the current false positive probability as `load_factor^k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powf(f64::from(self.num_hashes))
    }

    fn positions(&self, key: &[u8]) -> BitPositions {
        BitPositions::new(key, self.num_hashes, self.size())
    }
}

#[cfg(test)]
mod tests {
    use crate::bloom::LongBloomFilter;
    use crate::bloom::StringBloomFilter;
    use crate::bloom::UIntBloomFilter;
    use crate::error::ErrorKind;

    #[test]
    fn test_add_and_contains() {
        let mut filter = StringBloomFilter::new(500, 9).unwrap();
        assert!(!filter.contains("test").unwrap());

        filter.add("test").unwrap();
        assert!(filter.contains("test").unwrap());
        assert!(filter.contains(b"test").unwrap());
        assert!(filter.contains(String::from("test")).unwrap());
        assert!(!filter.contains("duck").unwrap());
        assert!(!filter.is_empty());
    }

    #[test]
    fn test_add_sets_exactly_the_derived_positions() {
        let mut filter = StringBloomFilter::new(500, 3).unwrap();
        filter.add("foo").unwrap();
        assert_eq!(filter.bits_used(), 3);
        for position in [197, 184, 287] {
            assert!(filter.bits().test(position));
        }
    }

    #[test]
    fn test_long_keys() {
        let mut filter = LongBloomFilter::new(500, 9).unwrap();
        filter.add(1015i64).unwrap();
        filter.add(1015i64).unwrap();

        assert_eq!(filter.size(), 500);
        assert!(filter.contains(1015i64).unwrap());
        assert!(filter.contains(1015).unwrap());
        assert!(filter.contains(1015u64).unwrap());
        assert!(!filter.contains(2015).unwrap());
    }

    #[test]
    fn test_out_of_range_leaves_filter_untouched() {
        let mut filter = UIntBloomFilter::new(64, 3).unwrap();
        let err = filter.add(-5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(filter.is_empty());

        let err = filter.contains(1u64 << 40).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_extend_stops_at_failing_key() {
        let mut filter = UIntBloomFilter::new(500, 9).unwrap();
        let err = filter.extend([10i64, 25, -1, 35]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert!(filter.contains(10).unwrap());
        assert!(filter.contains(25).unwrap());
        assert!(!filter.contains(35).unwrap());
    }

    #[test]
    fn test_extend_matches_repeated_add() {
        let mut extended = LongBloomFilter::new(500, 9).unwrap();
        extended.extend([10, 25, 35]).unwrap();

        let mut added = LongBloomFilter::new(500, 9).unwrap();
        for key in [10, 25, 35] {
            added.add(key).unwrap();
        }
        assert_eq!(extended, added);

        let mut from_slice = LongBloomFilter::new(500, 9).unwrap();
        from_slice.extend(&[10i64, 25, 35]).unwrap();
        assert_eq!(extended, from_slice);
    }

    #[test]
    fn test_clear() {
        let mut filter = LongBloomFilter::new(500, 9).unwrap();
        filter.add(1015).unwrap();
        filter.clear();

        assert!(filter.is_empty());
        assert!(!filter.contains(1015).unwrap());
        assert_eq!(filter.size(), 500);
        assert_eq!(filter.hashes(), 9);
    }

    #[test]
    fn test_union() {
        let mut left = StringBloomFilter::new(1000, 4).unwrap();
        let mut right = StringBloomFilter::new(1000, 4).unwrap();
        left.add("a").unwrap();
        right.add("b").unwrap();

        left.union(&right).unwrap();
        assert!(left.contains("a").unwrap());
        assert!(left.contains("b").unwrap());
    }

    #[test]
    fn test_union_incompatible() {
        let mut left = StringBloomFilter::new(1000, 4).unwrap();
        let other_size = StringBloomFilter::new(1001, 4).unwrap();
        let other_hashes = StringBloomFilter::new(1000, 5).unwrap();

        assert!(!left.is_compatible(&other_size));
        assert!(!left.is_compatible(&other_hashes));
        let err = left.union(&other_size).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        let err = left.union(&other_hashes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_statistics() {
        let mut filter = StringBloomFilter::new(1000, 5).unwrap();
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        filter.add("test").unwrap();
        assert!(filter.bits_used() > 0 && filter.bits_used() <= 5);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    fn test_invalid_parameters() {
        for (size, hashes) in [(0, 1), (1, 0), (0, 0), (u32::MAX, 1), (1, u32::MAX)] {
            let err = StringBloomFilter::new(size, hashes).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
        assert!(StringBloomFilter::new(1, 1).is_ok());
    }

    #[test]
    fn test_single_bit_filter() {
        let mut filter = StringBloomFilter::new(1, 4).unwrap();
        filter.add("anything").unwrap();
        assert!(filter.contains("anything").unwrap());
        assert!(filter.contains("everything").unwrap());
        assert_eq!(filter.bits_used(), 1);
    }
}

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

use super::FILTER_SEED;
use super::hash128;

/// Iterator over the `k` bit positions of a key in an `m`-bit array.
///
/// Positions use double hashing over one 128-bit digest:
///
/// ```text
/// position(i) = (h1 + i * h2) mod m,   i = 0, 1, ..., k - 1
/// ```
///
/// where the sum and product wrap at 64 bits.
#[derive(Debug, Clone)]
pub struct BitPositions {
    h1: u64,
    h2: u64,
    num_bits: u64,
    next: u32,
    num_hashes: u32,
}

impl BitPositions {
    /// Derives the positions of `key` for a filter of `num_bits` bits and
    /// `num_hashes` hash functions.
    ///
    /// `num_bits` must be non-zero; filters guarantee this at construction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::hash::BitPositions;
    /// let positions: Vec<u64> = BitPositions::new(b"foo", 3, 500).collect();
    /// assert_eq!(positions, vec![197, 184, 287]);
    /// ```
    pub fn new(key: &[u8], num_hashes: u32, num_bits: u32) -> Self {
        debug_assert!(num_bits > 0);
        let (h1, h2) = hash128(key, FILTER_SEED);
        BitPositions {
            h1,
            h2,
            num_bits: u64::from(num_bits),
            next: 0,
            num_hashes,
        }
    }
}

impl Iterator for BitPositions {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.next >= self.num_hashes {
            return None;
        }
        let hash = self
            .h1
            .wrapping_add(u64::from(self.next).wrapping_mul(self.h2));
        self.next += 1;
        Some(hash % self.num_bits)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.num_hashes - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitPositions {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_position_is_h1() {
        let (h1, _) = hash128(b"foo", 0);
        let mut positions = BitPositions::new(b"foo", 1, 500);
        assert_eq!(positions.next(), Some(h1 % 500));
        assert_eq!(positions.next(), None);
    }

    #[test]
    fn test_positions_follow_double_hashing() {
        let (h1, h2) = hash128(b"foo", 0);
        let positions: Vec<u64> = BitPositions::new(b"foo", 5, 64).collect();
        let expected: Vec<u64> = (0..5u64)
            .map(|i| h1.wrapping_add(i.wrapping_mul(h2)) % 64)
            .collect();
        assert_eq!(positions, expected);
        assert_eq!(positions, vec![33, 40, 47, 54, 61]);
    }

    #[test]
    fn test_positions_in_range() {
        for num_bits in [1, 7, 8, 63, 64, 65, 1000] {
            let positions = BitPositions::new(b"range", 11, num_bits);
            assert_eq!(positions.len(), 11);
            assert!(positions.into_iter().all(|p| p < u64::from(num_bits)));
        }
    }
}

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

use crate::error::Error;

/// A fixed-length array of bits packed into `u64` words.
///
/// Bit `i` is stored most significant bit first: it lives in byte `i / 8` of the
/// serialized form under mask `0x80 >> (i % 8)`. Keeping the words in that order makes
/// [`to_bytes`](Self::to_bytes) a plain big-endian dump of the words. Bits past `num_bits`
/// in the last word are always zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSet {
    num_bits: u32,
    /// Count of bits set to 1
    num_bits_set: u64,
    /// Length = ceil(num_bits / 64)
    words: Vec<u64>,
}

impl BitSet {
    /// Creates a zeroed bit set of `num_bits` bits.
    pub fn new(num_bits: u32) -> Self {
        let num_words = num_bits.div_ceil(64) as usize;
        BitSet {
            num_bits,
            num_bits_set: 0,
            words: vec![0u64; num_words],
        }
    }

    /// Returns the number of bytes in the packed form of a `num_bits` bit set.
    pub fn byte_len(num_bits: u32) -> usize {
        num_bits.div_ceil(8) as usize
    }

    /// Returns the number of addressable bits.
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Returns the number of bits set to 1.
    pub fn count_ones(&self) -> u64 {
        self.num_bits_set
    }

    /// Sets bit `index`, returning whether it was previously clear.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_bits`.
    pub fn set(&mut self, index: u64) -> bool {
        let (word, mask) = self.locate(index);
        if self.words[word] & mask != 0 {
            return false;
        }
        self.words[word] |= mask;
        self.num_bits_set += 1;
        true
    }

    /// Returns whether bit `index` is set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_bits`.
    pub fn test(&self, index: u64) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word] & mask != 0
    }

    /// Clears every bit, keeping the length.
    pub fn clear_all(&mut self) {
        self.words.fill(0);
        self.num_bits_set = 0;
    }

    /// ORs `other` into this bit set.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
    /// the lengths differ.
    pub fn union_with(&mut self, other: &BitSet) -> Result<(), Error> {
        if self.num_bits != other.num_bits {
            return Err(Error::invalid_parameter("cannot union bit sets of different lengths")
                .with_context("left", self.num_bits)
                .with_context("right", other.num_bits));
        }

        let mut num_bits_set = 0;
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= *other_word;
            num_bits_set += u64::from(word.count_ones());
        }
        self.num_bits_set = num_bits_set;
        Ok(())
    }

    /// Returns the packed form: `ceil(num_bits / 8)` bytes, padding bits zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = Self::byte_len(self.num_bits);
        self.words
            .iter()
            .flat_map(|w| w.to_be_bytes())
            .take(len)
            .collect()
    }

    /// Rebuilds a bit set of `num_bits` bits from its packed form.
    ///
    /// Padding bits past `num_bits` in the final byte are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedData`](crate::error::ErrorKind::MalformedData) if
    /// `bytes` is not exactly `ceil(num_bits / 8)` bytes long.
    pub fn from_bytes(bytes: &[u8], num_bits: u32) -> Result<Self, Error> {
        let expected = Self::byte_len(num_bits);
        if bytes.len() != expected {
            return Err(Error::malformed("bit data length does not match the bit count")
                .with_context("num_bits", num_bits)
                .with_context("expected_bytes", expected)
                .with_context("actual_bytes", bytes.len()));
        }

        let mut words: Vec<u64> = bytes
            .chunks(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[..chunk.len()].copy_from_slice(chunk);
                u64::from_be_bytes(buf)
            })
            .collect();

        let excess_bits = num_bits % 64;
        if excess_bits != 0 {
            if let Some(last) = words.last_mut() {
                *last &= u64::MAX << (64 - excess_bits);
            }
        }

        let num_bits_set = words.iter().map(|w| u64::from(w.count_ones())).sum();
        Ok(BitSet {
            num_bits,
            num_bits_set,
            words,
        })
    }

    fn locate(&self, index: u64) -> (usize, u64) {
        assert!(
            index < u64::from(self.num_bits),
            "bit index {index} out of range for {} bits",
            self.num_bits
        );
        let word = (index >> 6) as usize;
        let mask = 1u64 << (63 - (index & 63));
        (word, mask)
    }
}

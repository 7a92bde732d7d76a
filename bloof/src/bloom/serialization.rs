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

//! Binary and base64 forms of a filter.
//!
//! ```text
//! [size m: i32 BE][hashes k: i32 BE][ceil(m / 8) bytes of packed bits]
//! ```
//!
//! The bytes carry no key domain; the caller decides which filter type reads them.

use std::io::Cursor;

use byteorder::BE;
use byteorder::ReadBytesExt;

use super::BitSet;
use super::BloomFilter;
use super::KeyDomain;
use crate::codec::FilterBytes;
use crate::codec::decode_base64;
use crate::codec::encode_base64;
use crate::error::Error;

/// Length of the `size` and `hashes` header fields.
pub const HEADER_BYTES: usize = 8;

impl<D: KeyDomain> BloomFilter<D> {
    /// Returns the length of [`to_bytes`](Self::to_bytes) output: `8 + ceil(size / 8)`.
    pub fn serialized_len(&self) -> usize {
        HEADER_BYTES + BitSet::byte_len(self.size())
    }

    /// Serializes the filter.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::LongBloomFilter;
    /// let mut filter = LongBloomFilter::new(500, 9).unwrap();
    /// filter.add(1015).unwrap();
    ///
    /// let bytes = filter.to_bytes();
    /// assert_eq!(bytes.len(), 8 + 63);
    /// assert_eq!(LongBloomFilter::from_bytes(&bytes).unwrap(), filter);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = FilterBytes::with_capacity(self.serialized_len());
        // Both fields are at most i32::MAX, checked at construction.
        bytes.write_i32_be(self.size() as i32);
        bytes.write_i32_be(self.hashes() as i32);
        bytes.write(&self.bits.to_bytes());
        bytes.into_bytes()
    }

    /// Deserializes a filter from [`to_bytes`](Self::to_bytes) output.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedData`](crate::error::ErrorKind::MalformedData) if:
    /// - the data is shorter than the header or the declared bit data
    /// - `size` or `hashes` is not positive
    /// - bytes follow the declared bit data
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::parse(bytes).inspect_err(|err| {
            tracing::debug!(len = bytes.len(), %err, "rejected serialized bloom filter");
        })
    }

    /// Serializes the filter as standard base64 without line wrapping.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloof::bloom::StringBloomFilter;
    /// let mut filter = StringBloomFilter::new(20, 3).unwrap();
    /// filter.add("a").unwrap();
    /// assert_eq!(filter.to_base64(), "AAAAFAAAAANUAAA=");
    /// ```
    pub fn to_base64(&self) -> String {
        encode_base64(&self.to_bytes())
    }

    /// Deserializes a filter from [`to_base64`](Self::to_base64) output.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedData`](crate::error::ErrorKind::MalformedData) if the
    /// text is not valid base64 or the decoded bytes are rejected by
    /// [`from_bytes`](Self::from_bytes).
    pub fn from_base64(text: &str) -> Result<Self, Error> {
        let bytes = decode_base64(text)?;
        Self::from_bytes(&bytes)
    }

    fn parse(bytes: &[u8]) -> Result<Self, Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |_| Error::insufficient_data(tag)
        }

        let mut cursor = Cursor::new(bytes);
        let size = cursor.read_i32::<BE>().map_err(make_error("size"))?;
        let hashes = cursor.read_i32::<BE>().map_err(make_error("hashes"))?;

        let size = positive("size", size)?;
        let hashes = positive("hashes", hashes)?;

        let data = &bytes[HEADER_BYTES..];
        let expected = BitSet::byte_len(size);
        if data.len() < expected {
            return Err(Error::insufficient_data("bit data")
                .with_context("expected", expected)
                .with_context("actual", data.len()));
        }
        if data.len() > expected {
            return Err(Error::malformed("trailing bytes after bit data")
                .with_context("expected", expected)
                .with_context("actual", data.len()));
        }

        let bits = BitSet::from_bytes(data, size)?;
        Ok(BloomFilter::from_parts(hashes, bits))
    }
}

fn positive(name: &'static str, value: i32) -> Result<u32, Error> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            Error::malformed(format!("{name} must be positive")).with_context(name, value)
        })
}

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

//! Key domains and their canonical byte encodings.
//!
//! A filter is bound to exactly one domain at compile time. Integer domains encode keys
//! as fixed-width little-endian two's complement, so every accepted integer type that
//! holds the same value hashes to the same positions.

use crate::error::Error;

mod private {
    pub trait Sealed {}
}

/// The closed set of key domains a [`BloomFilter`](super::BloomFilter) can be bound to.
pub trait KeyDomain: private::Sealed + 'static {
    /// Name of the domain, used in error messages.
    const NAME: &'static str;
}

/// Arbitrary byte strings. Text is hashed as its UTF-8 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteKeys {}

/// Signed 64-bit integers, encoded as 8 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LongKeys {}

/// Unsigned 32-bit integers, encoded as 4 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UIntKeys {}

impl private::Sealed for ByteKeys {}
impl private::Sealed for LongKeys {}
impl private::Sealed for UIntKeys {}

impl KeyDomain for ByteKeys {
    const NAME: &'static str = "bytes";
}

impl KeyDomain for LongKeys {
    const NAME: &'static str = "i64";
}

impl KeyDomain for UIntKeys {
    const NAME: &'static str = "u32";
}

/// The canonical bytes of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedKey<'a> {
    /// A byte string key, borrowed as is.
    Bytes(&'a [u8]),
    /// An `i64` key.
    Long([u8; 8]),
    /// A `u32` key.
    UInt([u8; 4]),
}

impl AsRef<[u8]> for EncodedKey<'_> {
    fn as_ref(&self) -> &[u8] {
        match self {
            EncodedKey::Bytes(bytes) => bytes,
            EncodedKey::Long(bytes) => bytes,
            EncodedKey::UInt(bytes) => bytes,
        }
    }
}

/// A value that can be used as a key of domain `D`.
pub trait EncodeKey<D: KeyDomain> {
    /// Returns the canonical bytes of this key.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::OutOfRange`](crate::error::ErrorKind::OutOfRange) if the value
    /// does not fit the width of `D`.
    fn encode_key(&self) -> Result<EncodedKey<'_>, Error>;
}

impl<T: AsRef<[u8]> + ?Sized> EncodeKey<ByteKeys> for &T {
    fn encode_key(&self) -> Result<EncodedKey<'_>, Error> {
        Ok(EncodedKey::Bytes((**self).as_ref()))
    }
}

impl EncodeKey<ByteKeys> for String {
    fn encode_key(&self) -> Result<EncodedKey<'_>, Error> {
        Ok(EncodedKey::Bytes(self.as_bytes()))
    }
}

impl EncodeKey<ByteKeys> for Vec<u8> {
    fn encode_key(&self) -> Result<EncodedKey<'_>, Error> {
        Ok(EncodedKey::Bytes(self))
    }
}

macro_rules! impl_integer_keys {
    ($domain:ty, $width:ty, $variant:ident => $($int:ty),+ $(,)?) => {$(
        impl EncodeKey<$domain> for $int {
            #[allow(clippy::useless_conversion)]
            fn encode_key(&self) -> Result<EncodedKey<'_>, Error> {
                let value = <$width>::try_from(*self)
                    .map_err(|_| Error::out_of_range(<$domain as KeyDomain>::NAME, self))?;
                Ok(EncodedKey::$variant(value.to_le_bytes()))
            }
        }

        impl EncodeKey<$domain> for &$int {
            fn encode_key(&self) -> Result<EncodedKey<'_>, Error> {
                <$int as EncodeKey<$domain>>::encode_key(*self)
            }
        }
    )+};
}

impl_integer_keys!(
    LongKeys, i64, Long =>
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

impl_integer_keys!(
    UIntKeys, u32, UInt =>
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn encode<D: KeyDomain, K: EncodeKey<D>>(key: K) -> Result<Vec<u8>, Error> {
        key.encode_key().map(|encoded| encoded.as_ref().to_vec())
    }

    #[test]
    fn test_byte_keys_are_raw_bytes() {
        assert_eq!(encode::<ByteKeys, _>("foo").unwrap(), b"foo");
        assert_eq!(encode::<ByteKeys, _>(b"foo").unwrap(), b"foo");
        assert_eq!(encode::<ByteKeys, _>(&b"foo"[..]).unwrap(), b"foo");
        assert_eq!(encode::<ByteKeys, _>(String::from("foo")).unwrap(), b"foo");
        assert_eq!(encode::<ByteKeys, _>(vec![0u8, 1]).unwrap(), vec![0, 1]);
        assert_eq!(encode::<ByteKeys, _>("é").unwrap(), vec![0xc3, 0xa9]);
    }

    #[test]
    fn test_long_keys_are_little_endian() {
        assert_eq!(
            encode::<LongKeys, _>(1015i64).unwrap(),
            vec![0xf7, 0x03, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(encode::<LongKeys, _>(-1i64).unwrap(), vec![0xff; 8]);
        assert_eq!(
            encode::<LongKeys, _>(i64::MIN).unwrap(),
            vec![0, 0, 0, 0, 0, 0, 0, 0x80]
        );
    }

    #[test]
    fn test_equal_values_encode_identically() {
        let expected = encode::<LongKeys, _>(1015i64).unwrap();
        assert_eq!(encode::<LongKeys, _>(1015i32).unwrap(), expected);
        assert_eq!(encode::<LongKeys, _>(1015u16).unwrap(), expected);
        assert_eq!(encode::<LongKeys, _>(1015u64).unwrap(), expected);
        assert_eq!(encode::<LongKeys, _>(1015i128).unwrap(), expected);
        assert_eq!(encode::<LongKeys, _>(&1015usize).unwrap(), expected);

        let expected = encode::<UIntKeys, _>(7u32).unwrap();
        assert_eq!(expected, vec![7, 0, 0, 0]);
        assert_eq!(encode::<UIntKeys, _>(7i64).unwrap(), expected);
        assert_eq!(encode::<UIntKeys, _>(&7u8).unwrap(), expected);
    }

    #[test]
    fn test_out_of_range_keys() {
        let err = encode::<LongKeys, _>(u64::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        let err = encode::<LongKeys, _>(i128::from(i64::MAX) + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let err = encode::<UIntKeys, _>(-1i32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        let err = encode::<UIntKeys, _>(1u64 << 32).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        assert!(encode::<UIntKeys, _>(u64::from(u32::MAX)).is_ok());
        assert!(encode::<LongKeys, _>(i128::from(i64::MIN)).is_ok());
    }
}

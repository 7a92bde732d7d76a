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

//! Byte and text encodings shared by the filter serialization code.

mod encode;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

pub(crate) use self::encode::FilterBytes;
use crate::error::Error;

/// Encodes bytes as standard-alphabet, padded base64 without line wrapping.
pub(crate) fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard-alphabet, padded base64.
pub(crate) fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(text.trim_end())
        .map_err(|err| Error::malformed(format!("invalid base64: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_base64_round_trip() {
        let bytes = [0u8, 0, 0, 20, 0, 0, 0, 3, 0x54, 0, 0];
        let text = encode_base64(&bytes);
        assert_eq!(text, "AAAAFAAAAANUAAA=");
        assert_eq!(decode_base64(&text).unwrap(), bytes);
    }

    #[test]
    fn test_trailing_newline_is_accepted() {
        assert_eq!(decode_base64("AAAAFA==\n").unwrap(), vec![0, 0, 0, 20]);
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_base64("not base64!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
    }
}

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

use std::fmt;

/// A `(k, buckets_per_element)` choice for a Bloom filter.
///
/// A filter for `n` expected elements built from a specification has
/// `buckets_per_element * n` bits and `k` hash functions; see
/// [`BloomFilterBuilder::with_specification`](crate::bloom::BloomFilterBuilder::with_specification).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BloomSpecification {
    /// Number of hash functions.
    pub k: u32,
    /// Bits allocated per expected element.
    pub buckets_per_element: u32,
}

impl BloomSpecification {
    /// Creates a specification.
    pub const fn new(k: u32, buckets_per_element: u32) -> Self {
        BloomSpecification {
            k,
            buckets_per_element,
        }
    }
}

impl fmt::Display for BloomSpecification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k = {}, buckets per element = {}",
            self.k, self.buckets_per_element
        )
    }
}

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

//! Empirical false positive probabilities of a Bloom filter.
//!
//! `PROBS[b][k]` is the false positive probability observed with `b` buckets (bits) per
//! element and `k` hash functions. Rows 0 and 1 are placeholders. Column 0 (no hash
//! functions) is always 1.0, and rows end at or just past each row's optimum.

use std::sync::LazyLock;

/// Largest tabulated number of buckets per element.
pub(super) const MAX_BUCKETS: usize = 20;

#[allow(clippy::excessive_precision)]
pub(super) static PROBS: [&[f64]; MAX_BUCKETS + 1] = [
    &[1.0], // 0: placeholder
    &[1.0, 1.0], // 1: placeholder
    &[1.0, 0.393, 0.400],
    &[1.0, 0.283, 0.237, 0.253],
    &[1.0, 0.221, 0.155, 0.147, 0.160],
    &[1.0, 0.181, 0.109, 0.092, 0.092, 0.101], // 5
    &[1.0, 0.154, 0.0804, 0.0609, 0.0561, 0.0578, 0.0638],
    &[1.0, 0.133, 0.0618, 0.0423, 0.0359, 0.0347, 0.0364],
    &[1.0, 0.118, 0.0489, 0.0306, 0.024, 0.0217, 0.0216, 0.0229],
    &[1.0, 0.105, 0.0397, 0.0228, 0.0166, 0.0141, 0.0133, 0.0135, 0.0145],
    &[1.0, 0.0952, 0.0329, 0.0174, 0.0118, 0.00943, 0.00844, 0.00819, 0.00846], // 10
    &[1.0, 0.0869, 0.0276, 0.0136, 0.00864, 0.0065, 0.00552, 0.00513, 0.00509],
    &[1.0, 0.08, 0.0236, 0.0108, 0.00646, 0.00459, 0.00371, 0.00329, 0.00314],
    &[1.0, 0.074, 0.0203, 0.00875, 0.00492, 0.00332, 0.00255, 0.00217, 0.00199, 0.00194],
    &[
        1.0, 0.0689, 0.0177, 0.00718, 0.00381, 0.00244, 0.00179, 0.00146, 0.00129, 0.00121,
        0.0012,
    ],
    &[
        1.0, 0.0645, 0.0156, 0.00596, 0.003, 0.00183, 0.00128, 0.001, 0.000852, 0.000775,
        0.000744,
    ], // 15
    &[
        1.0, 0.0606, 0.0138, 0.005, 0.00239, 0.00139, 0.000935, 0.000702, 0.000574, 0.000505,
        0.00047, 0.000459,
    ],
    &[
        1.0, 0.0571, 0.0123, 0.00423, 0.00193, 0.00107, 0.000692, 0.000499, 0.000394,
        0.000335, 0.000302, 0.000287, 0.000284,
    ],
    &[
        1.0, 0.054, 0.0111, 0.00362, 0.00158, 0.000839, 0.000519, 0.00036, 0.000275, 0.000226,
        0.000198, 0.000183, 0.000176,
    ],
    &[
        1.0, 0.0513, 0.00998, 0.00312, 0.0013, 0.000663, 0.000394, 0.000264, 0.000194,
        0.000155, 0.000132, 0.000118, 0.000111, 0.000109,
    ],
    &[
        1.0, 0.0488, 0.00906, 0.0027, 0.00108, 0.00053, 0.000303, 0.000196, 0.00014, 0.000108,
        8.89e-05, 7.77e-05, 7.12e-05, 6.79e-05, 6.71e-05,
    ], // 20
];

/// For each row of [`PROBS`], the `k` with the lowest false positive probability. Ties go
/// to the smaller `k`; the result is at least 1.
pub(super) static OPT_K_PER_BUCKETS: LazyLock<[usize; MAX_BUCKETS + 1]> = LazyLock::new(|| {
    let mut opt_k = [1; MAX_BUCKETS + 1];
    for (row, probs) in opt_k.iter_mut().zip(PROBS.iter()) {
        let mut best = 0;
        for (k, p) in probs.iter().enumerate() {
            if *p < probs[best] {
                best = k;
            }
        }
        *row = best.max(1);
    }
    opt_k
});

/// Returns the tabulated false positive probability, if `(buckets, k)` is in the table.
pub(super) fn probability(buckets: usize, k: usize) -> Option<f64> {
    PROBS.get(buckets)?.get(k).copied()
}

/// Returns the largest tabulated `k` of a row.
pub(super) fn max_k(buckets: usize) -> usize {
    PROBS[buckets].len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_well_formed() {
        for (buckets, probs) in PROBS.iter().enumerate() {
            assert!(!probs.is_empty());
            assert_eq!(probs[0], 1.0, "row {buckets}");
            assert!(probs.len() <= buckets + 1, "row {buckets}");
            assert!(probs.iter().all(|p| *p > 0.0 && *p <= 1.0));
        }
    }

    #[test]
    fn test_rows_track_the_analytic_model() {
        for buckets in 2..=MAX_BUCKETS {
            for k in 1..=max_k(buckets) {
                let model = (1.0 - (-(k as f64) / buckets as f64).exp()).powi(k as i32);
                let tabulated = probability(buckets, k).unwrap();
                assert!(
                    (tabulated - model).abs() / model < 0.02,
                    "buckets = {buckets}, k = {k}: {tabulated} vs {model}"
                );
            }
        }
    }

    #[test]
    fn test_opt_k_per_buckets() {
        assert_eq!(
            *OPT_K_PER_BUCKETS,
            [1, 1, 1, 2, 3, 3, 4, 5, 6, 6, 7, 8, 8, 9, 10, 10, 11, 12, 12, 13, 14]
        );
    }

    #[test]
    fn test_probability_lookup() {
        assert_eq!(probability(2, 1), Some(0.393));
        assert_eq!(probability(20, 14), Some(6.71e-05));
        assert_eq!(probability(20, 15), None);
        assert_eq!(probability(21, 1), None);
    }
}

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

//! Bloom filter parameter selection.
//!
//! Both entry points are pure functions over a fixed table of empirically measured false
//! positive probabilities, indexed by buckets (bits) per element and number of hash
//! functions. They return a [`BloomSpecification`] that sizes a filter relative to the
//! number of elements it is expected to hold.
//!
//! # Examples
//!
//! ```
//! # use bloof::optimizer::BloomSpecification;
//! # use bloof::optimizer::compute_spec_from_buckets;
//! # use bloof::optimizer::compute_spec_from_fp_rate;
//! // Best k for a fixed memory budget of 10 bits per element
//! let spec = compute_spec_from_buckets(10).unwrap();
//! assert_eq!(spec, BloomSpecification::new(7, 10));
//!
//! // Cheapest filter meeting a 1% false positive ceiling
//! let spec = compute_spec_from_fp_rate(20, 0.01).unwrap();
//! assert_eq!(spec, BloomSpecification::new(5, 10));
//! ```

mod probability_table;
mod specification;

pub use self::specification::BloomSpecification;
use self::probability_table::MAX_BUCKETS;
use self::probability_table::OPT_K_PER_BUCKETS;
use self::probability_table::PROBS;
use self::probability_table::max_k;
use self::probability_table::probability;
use crate::error::Error;

/// Smallest accepted buckets-per-element budget.
pub const MIN_BUCKETS_PER_ELEMENT: u32 = 1;
/// Largest accepted buckets-per-element budget, the last row of the table.
pub const MAX_BUCKETS_PER_ELEMENT: u32 = MAX_BUCKETS as u32;

/// Smallest row with real measurements; rows 0 and 1 are placeholders.
const MIN_BUCKETS: usize = 2;

/// Returns the number of hash functions that minimizes the false positive probability
/// at `buckets_per_element`, or `None` outside the table.
///
/// # Examples
///
/// ```
/// # use bloof::optimizer::optimal_k;
/// assert_eq!(optimal_k(2), Some(1));
/// assert_eq!(optimal_k(10), Some(7));
/// assert_eq!(optimal_k(21), None);
/// ```
pub fn optimal_k(buckets_per_element: u32) -> Option<u32> {
    let opt_k = OPT_K_PER_BUCKETS.get(buckets_per_element as usize)?;
    Some(*opt_k as u32)
}

/// Returns the tabulated false positive probability for `buckets_per_element` and `k`,
/// or `None` outside the table.
pub fn false_positive_probability(buckets_per_element: u32, k: u32) -> Option<f64> {
    probability(buckets_per_element as usize, k as usize)
}

/// Returns the specification with the optimal `k` for a fixed `buckets_per_element`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
/// `buckets_per_element` is not in `[1, 20]`.
pub fn compute_spec_from_buckets(buckets_per_element: u32) -> Result<BloomSpecification, Error> {
    let buckets = check_buckets("buckets_per_element", buckets_per_element)?;
    let k = OPT_K_PER_BUCKETS[buckets] as u32;
    Ok(BloomSpecification::new(k, buckets_per_element))
}

/// Returns the cheapest specification whose false positive probability does not exceed
/// `max_false_positive_probability`, using at most `max_buckets_per_element` buckets.
///
/// Buckets per element grow from 2 until the optimal `k` of the row meets the target;
/// then `k` is lowered while the target still holds. Memory is treated as more expensive
/// than hashing, so the bucket count is never traded back down.
///
/// A target at or above the best probability of the 2-bucket row short-circuits to
/// `BloomSpecification::new(2, optimal_k(2))`.
///
/// # Errors
///
/// - [`ErrorKind::InvalidParameter`](crate::error::ErrorKind::InvalidParameter) if
///   `max_buckets_per_element` is not in `[1, 20]` or the probability is NaN
/// - [`ErrorKind::UnsatisfiableConstraint`](crate::error::ErrorKind::UnsatisfiableConstraint)
///   if the probability is below the last tabulated entry of the `max_buckets_per_element`
///   row
///
/// # Examples
///
/// ```
/// # use bloof::error::ErrorKind;
/// # use bloof::optimizer::compute_spec_from_fp_rate;
/// let err = compute_spec_from_fp_rate(20, 1e-10).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::UnsatisfiableConstraint);
/// ```
pub fn compute_spec_from_fp_rate(
    max_buckets_per_element: u32,
    max_false_positive_probability: f64,
) -> Result<BloomSpecification, Error> {
    let max_buckets = check_buckets("max_buckets_per_element", max_buckets_per_element)?;
    let target = max_false_positive_probability;
    if target.is_nan() {
        return Err(Error::invalid_parameter(
            "max_false_positive_probability must not be NaN",
        ));
    }

    let opt_k = &*OPT_K_PER_BUCKETS;
    let min_k = opt_k[MIN_BUCKETS];
    if target >= PROBS[MIN_BUCKETS][min_k] {
        return Ok(BloomSpecification::new(2, min_k as u32));
    }

    let unsatisfiable = || {
        tracing::debug!(
            max_buckets_per_element,
            max_false_positive_probability,
            "false positive ceiling is not reachable"
        );
        Error::unsatisfiable(max_false_positive_probability, max_buckets)
    };
    if target < PROBS[max_buckets][max_k(max_buckets)] {
        return Err(unsatisfiable());
    }

    let buckets = (MIN_BUCKETS..=max_buckets)
        .find(|&b| PROBS[b][opt_k[b]] <= target)
        .ok_or_else(unsatisfiable)?;
    let mut k = opt_k[buckets];
    while k > 1 && PROBS[buckets][k - 1] <= target {
        k -= 1;
    }

    let spec = BloomSpecification::new(k as u32, buckets as u32);
    tracing::trace!(%spec, max_false_positive_probability, "computed bloom specification");
    Ok(spec)
}

fn check_buckets(name: &'static str, value: u32) -> Result<usize, Error> {
    if !(MIN_BUCKETS_PER_ELEMENT..=MAX_BUCKETS_PER_ELEMENT).contains(&value) {
        return Err(Error::invalid_parameter(format!(
            "{name} must be between {MIN_BUCKETS_PER_ELEMENT} and {MAX_BUCKETS_PER_ELEMENT}"
        ))
        .with_context(name, value));
    }
    Ok(value as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bucket_range_is_checked() {
        for buckets in [0, 21, u32::MAX] {
            let err = compute_spec_from_buckets(buckets).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
            let err = compute_spec_from_fp_rate(buckets, 0.01).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        }
    }

    #[test]
    fn test_nan_probability() {
        let err = compute_spec_from_fp_rate(20, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_single_bucket_budget() {
        assert_eq!(
            compute_spec_from_fp_rate(1, 0.5).unwrap(),
            BloomSpecification::new(2, 1)
        );
        let err = compute_spec_from_fp_rate(1, 0.3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsatisfiableConstraint);
    }

    #[test]
    fn test_exact_table_hits() {
        // The last entry of a row is reachable exactly.
        assert_eq!(
            compute_spec_from_fp_rate(20, 6.71e-05).unwrap(),
            BloomSpecification::new(14, 20)
        );
        assert_eq!(
            compute_spec_from_fp_rate(20, 0.393).unwrap(),
            BloomSpecification::new(2, 1)
        );
    }

    #[test]
    fn test_table_accessors() {
        assert_eq!(false_positive_probability(10, 7), Some(0.00819));
        assert_eq!(false_positive_probability(10, 9), None);
        assert_eq!(optimal_k(0), Some(1));
        assert_eq!(optimal_k(5), Some(3));
    }
}

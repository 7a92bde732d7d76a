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

//! Error types for Bloom filter operations

use std::fmt;

/// ErrorKind is all kinds of Error of bloof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A construction parameter (size, hash count, buckets per element) is invalid.
    InvalidParameter,
    /// A key does not fit the fixed width of the filter's key domain.
    OutOfRange,
    /// Serialized filter data is truncated or inconsistent.
    MalformedData,
    /// The requested false positive ceiling cannot be met within the bucket budget.
    UnsatisfiableConstraint,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "InvalidParameter",
            ErrorKind::OutOfRange => "OutOfRange",
            ErrorKind::MalformedData => "MalformedData",
            ErrorKind::UnsatisfiableConstraint => "UnsatisfiableConstraint",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all bloof functions.
///
/// # Examples
///
/// ```
/// # use bloof::error::Error;
/// # use bloof::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidParameter, "size must be at least 1");
/// assert_eq!(err.kind(), ErrorKind::InvalidParameter);
/// assert_eq!(err.message(), "size must be at least 1");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: vec![],
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within bloof crate.
impl Error {
    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, msg)
    }

    pub(crate) fn out_of_range(domain: &'static str, value: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::OutOfRange,
            format!("key {value} does not fit the {domain} key domain"),
        )
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedData, msg)
    }

    pub(crate) fn insufficient_data(msg: impl fmt::Display) -> Self {
        Self::malformed(format!("insufficient data: {msg}"))
    }

    pub(crate) fn unsatisfiable(max_false_positive_probability: f64, max_buckets: usize) -> Self {
        Self::new(
            ErrorKind::UnsatisfiableConstraint,
            format!(
                "cannot achieve a false positive probability of {max_false_positive_probability} \
                 with at most {max_buckets} buckets per element"
            ),
        )
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            for (i, (k, v)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", k, v)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_format_consistency() {
        let err = Error::new(ErrorKind::InvalidParameter, "hashes must be at least 1");
        assert_snapshot!(err, @"InvalidParameter => hashes must be at least 1");
    }

    #[test]
    fn test_format_with_multiple_contexts() {
        let err = Error::new(ErrorKind::MalformedData, "parsing failed")
            .with_context("size", 500)
            .with_context("available", 12);
        assert_snapshot!(err, @"MalformedData, context: { size: 500, available: 12 } => parsing failed");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = Error::out_of_range("u32", -1);
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_snapshot!(err, @"OutOfRange => key -1 does not fit the u32 key domain");
    }

    #[test]
    fn test_unsatisfiable_names_parameters() {
        let err = Error::unsatisfiable(1e-10, 20);
        assert_eq!(err.kind(), ErrorKind::UnsatisfiableConstraint);
        assert_snapshot!(
            err,
            @"UnsatisfiableConstraint => cannot achieve a false positive probability of 0.0000000001 with at most 20 buckets per element"
        );
    }
}

//! Custom error types for the gateway adapter.
//!
//! This module defines error types that are specific to the adapter's domain,
//! providing more meaningful error information than stringly-typed failures
//! and keeping the propagation policy explicit: nothing is corrected silently.

use std::fmt;

/// Custom error type for the adapter.
#[derive(Debug)]
pub enum AdapterError {
    /// A required gateway event field was absent or mistyped
    MalformedEvent(String),
    /// A status description was required but the status code has no known
    /// reason phrase
    UnknownStatusCode(u16),
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEvent(msg) => write!(f, "malformed gateway event: {msg}"),
            Self::UnknownStatusCode(code) => {
                write!(f, "no known reason phrase for status code {code}")
            }
        }
    }
}

impl std::error::Error for AdapterError {}

//! Error types for the promise fake

use crate::prelude::*;
use crate::value::Value;
use thiserror::Error;

/// Direction of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Resolve,
    Reject,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Resolve => "resolve",
            Direction::Reject => "reject",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the fake itself.
///
/// Everything except [`FakeError::Uncaught`] means the test wired its fake
/// incorrectly. None of these are routed into a chain's error handlers.
#[derive(Debug, Error)]
pub enum FakeError {
    #[error(
        "Received unexpected value for then, catch or finally. Expected undefined or function, but got value of type {type_of}"
    )]
    UnacceptableHandler { type_of: &'static str },

    #[error("No error handling provided! Make sure your promise has a catch.")]
    NoErrorHandling,

    #[error("Cannot {direction} a promise twice")]
    SettledTwice { direction: Direction },

    #[error("Thenable is in a state where resolve cannot be called")]
    Unresolvable,

    /// A simulated error escaped the chain: thrown by an executor, an error
    /// handler or a completion handler
    #[error("Uncaught {value}")]
    Uncaught { value: Value },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}

impl FakeError {
    /// Model an executor (or any other code) throwing `value`
    pub fn thrown(value: impl Into<Value>) -> Self {
        FakeError::Uncaught {
            value: value.into(),
        }
    }

    /// Whether this error means the fake was misused, as opposed to a
    /// simulated error escaping
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, FakeError::Uncaught { .. })
    }

    /// Extract a value handlers can inspect
    pub fn to_value(&self) -> Value {
        match self {
            FakeError::Uncaught { value } => value.clone(),
            FakeError::UnacceptableHandler { .. }
            | FakeError::NoErrorHandling
            | FakeError::SettledTwice { .. }
            | FakeError::Unresolvable => Value::error(self.to_string()),
            FakeError::InvalidOptions(_) => Value::error_named("SyntaxError", self.to_string()),
        }
    }
}

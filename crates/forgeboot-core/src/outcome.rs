//! Result envelope returned by every wrapped operation.
//!
//! Callers that need to branch on the result match on [`Outcome`]; callers
//! that forward it to an HTTP client serialize it. The payload's fields
//! sit next to `success`, so a payload `{"user": ...}` becomes
//! `{"success": true, "user": ...}`, a unit payload becomes
//! `{"success": true}`, and a failure becomes
//! `{"success": false, "error": "..."}`.

use std::future::Future;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::error::{Error, Result};

/// Success payload or failure description.
///
/// The payload must serialize as a struct, a map, or unit to be flattened
/// into the envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation completed and produced a payload
    Success(T),

    /// The operation failed
    Failure {
        /// Human-readable error message
        error: String,
    },
}

impl<T> Outcome<T> {
    /// Build a failure envelope from any displayable error.
    pub fn failure(error: impl ToString) -> Self {
        Outcome::Failure {
            error: error.to_string(),
        }
    }

    /// Run an operation and capture its result in an envelope.
    ///
    /// Errors are logged at debug level; deciding how loudly to report
    /// them is left to the caller.
    pub async fn capture<F>(operation: &str, fut: F) -> Self
    where
        F: Future<Output = Result<T>>,
    {
        match fut.await {
            Ok(value) => Outcome::Success(value),
            Err(e) => {
                debug!(operation = operation, error = %e, "Operation failed");
                Outcome::from_error(e)
            }
        }
    }

    fn from_error(error: Error) -> Self {
        Outcome::failure(error)
    }

    /// Check if this is a success.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Check if this is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    /// Error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { error } => Some(error),
        }
    }

    /// Payload, if this is a success.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(data) => Some(data),
            Outcome::Failure { .. } => None,
        }
    }

    /// Map the payload, keeping failures as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(data) => Outcome::Success(f(data)),
            Outcome::Failure { error } => Outcome::Failure { error },
        }
    }

    /// Convert into a standard `Result` with the message as error.
    pub fn into_result(self) -> std::result::Result<T, String> {
        match self {
            Outcome::Success(data) => Ok(data),
            Outcome::Failure { error } => Err(error),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Outcome::Success(data),
            Err(e) => Outcome::from_error(e),
        }
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T> {
    success: bool,
    #[serde(flatten)]
    payload: &'a T,
}

#[derive(Serialize)]
struct FailureEnvelope<'a> {
    success: bool,
    error: &'a str,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Outcome::Success(payload) => SuccessEnvelope {
                success: true,
                payload,
            }
            .serialize(serializer),
            Outcome::Failure { error } => FailureEnvelope {
                success: false,
                error,
            }
            .serialize(serializer),
        }
    }
}

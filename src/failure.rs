//! The failure signal returned by setup, test and teardown bodies.
//!
//! Every body returns an [`Outcome`]. The engine only distinguishes two kinds
//! of failure: [`Failure::Assertion`], produced by the assertion catalog and
//! classified as an ordinary test failure, and [`Failure::Defect`], anything
//! else, which is captured and listed in the run's error report.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of running one body.
pub type Outcome = Result<(), Failure>;

/// Failure kind reported for assertion failures.
pub const ASSERTION_KIND: &str = "AssertionFailure";
/// Failure kind reported for panicking bodies.
pub const PANIC_KIND: &str = "panic";
/// Failure kind used for failures raised from plain strings.
pub const RAISED_KIND: &str = "Error";

/// Tagged failure produced by a body.
#[derive(Debug, Error)]
pub enum Failure {
    /// A violated assertion. Expected outcome, never a defect.
    #[error("{message}")]
    Assertion { message: String },
    /// Any other failure.
    #[error("{cause}")]
    Defect {
        kind: String,
        #[source]
        cause: BoxError,
    },
}

/// Plain-message error carried by defects raised without a concrete error type.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct Raised(pub String);

impl Failure {
    pub fn assertion(message: impl Into<String>) -> Self {
        Failure::Assertion {
            message: message.into(),
        }
    }

    /// Wraps a concrete error; its type name becomes the failure kind.
    pub fn defect<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Failure::Defect {
            kind: short_type_name::<E>().to_string(),
            cause: Box::new(error),
        }
    }

    /// Raises a defect of an explicit kind, e.g. `Failure::raised("NameError", "...")`.
    pub fn raised(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Failure::Defect {
            kind: kind.into(),
            cause: Box::new(Raised(message.into())),
        }
    }

    /// Converts a panic payload caught at a phase boundary.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Failure::raised(PANIC_KIND, message)
    }

    pub fn is_assertion(&self) -> bool {
        matches!(self, Failure::Assertion { .. })
    }

    pub fn kind(&self) -> &str {
        match self {
            Failure::Assertion { .. } => ASSERTION_KIND,
            Failure::Defect { kind, .. } => kind,
        }
    }
}

impl From<std::io::Error> for Failure {
    fn from(error: std::io::Error) -> Self {
        Failure::defect(error)
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Failure::raised(RAISED_KIND, message)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Failure::raised(RAISED_KIND, message)
    }
}

/// Runs `body`, turning a panic into a [`Failure::Defect`] of kind `panic`.
///
/// The process panic hook still runs; the `testique` binary installs a quiet
/// one.
pub fn capture<F>(body: F) -> Outcome
where
    F: FnOnce() -> Outcome,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(outcome) => outcome,
        Err(payload) => Err(Failure::from_panic(payload)),
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

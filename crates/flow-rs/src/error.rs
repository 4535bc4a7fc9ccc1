//! Error taxonomy shared across tensor determination and generator dispatch.

use thiserror::Error;

/// Crate-wide result alias; every fallible API in flow-rs returns this.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by metadata resolution, axis lookups, and factory dispatch.
///
/// All variants carry enough context to identify the failing field or name;
/// none of them is retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Required metadata was read before it was resolved, or a lookup name
    /// matched nothing.
    #[error("value error: {0}")]
    Value(String),

    /// A dispatch arm with no implementation was reached, e.g. an unknown
    /// generator device name.
    #[error("unimplemented: {0}")]
    Unimplemented(String),

    /// Axis index past the rank of the shape being queried.
    #[error("axis index {index} is out of range for rank {rank}")]
    IndexOutOfRange { index: usize, rank: usize },
}

impl Error {
    /// Builds the canonical error for a metadata field read before determination.
    pub(crate) fn undetermined(field: &str) -> Self {
        Error::Value(format!("{field} is not determined"))
    }
}

use thiserror::Error;

/// Failures of the predecessor-based delete. Nothing else in the list fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SkipListError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("no such node was found")]
    NotFound,
}

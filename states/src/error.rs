use thiserror::Error;

use crate::QueryKey;

/// The in-flight request for a key was cancelled or superseded before it
/// completed. Its result, if any, was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Query {key} was cancelled")]
pub struct Cancelled {
    pub key: QueryKey,
}

impl Cancelled {
    pub fn new(key: QueryKey) -> Self {
        Self { key }
    }
}

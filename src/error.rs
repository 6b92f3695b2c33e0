use thiserror::Error;

/// Errors reported by document store operations.
///
/// A rejected operation never leaves a partial change behind; the document
/// is exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Attempted to remove the only page of a site
    #[error("Cannot remove the only page of site {site_id}")]
    LastPage { site_id: String },

    /// Attempted to remove the only site of the document
    #[error("Cannot remove the only site")]
    LastSite,

    /// Reorder indices outside the current block sequence
    #[error("Invalid block index: from {from} to {to} with {len} blocks")]
    InvalidIndex { from: usize, to: usize, len: usize },

    /// The target of an operation that must produce a value does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

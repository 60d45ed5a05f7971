use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Every variant is a precondition violation detected before any parallel
/// work starts; nothing here is transient or retryable, and a failed run
/// exposes no partial state.
#[derive(Error, Debug)]
pub enum KMeansError {
    /// Rejected run parameters (zero clusters, attributes, points or
    /// iterations, or more clusters than points).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An attribute vector whose length differs from the store's
    /// dimensionality.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Malformed dataset input (header line or numeric table).
    #[error("malformed dataset: {0}")]
    Dataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, KMeansError>;

//! Upload error types.

use podcopy_transfer::StagingError;

/// Request-level errors: the batch is rejected before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("missing required parameters: {0}")]
    MissingParameter(String),

    #[error("no files to upload")]
    EmptyBatch,

    #[error("too many files: {count} exceeds the limit of {max}")]
    TooManyFiles { count: usize, max: usize },
}

/// Per-file errors, recorded in that file's result and never propagated.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file name cannot be empty")]
    EmptyName,

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("destination path cannot be empty")]
    InvalidDestination,

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error("failed to open staged file: {0}")]
    OpenStaged(#[source] std::io::Error),

    /// Failure reported by the remote writer, shown verbatim.
    #[error("{0}")]
    Remote(String),
}

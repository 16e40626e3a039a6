//! Per-file building blocks of a pod upload: name sanitization, remote
//! path construction and private local staging of incoming bytes.

mod path;
mod sanitize;
mod staging;

pub use path::{is_traversal_name, join_remote_path};
pub use sanitize::{is_forbidden_char, sanitize_file_name};
pub use staging::{FALLBACK_STAGED_NAME, STAGING_DIR_PREFIX, StagedFile, StagingArea};

/// Errors produced while staging an upload on local disk.
#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("failed to create temp directory: {0}")]
    CreateDir(#[source] std::io::Error),

    #[error("failed to create temp file: {0}")]
    CreateFile(#[source] std::io::Error),

    #[error("failed to write temp file: {0}")]
    Write(#[source] std::io::Error),
}

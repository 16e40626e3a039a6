//! Batch upload of local files into a running pod container.
//!
//! This crate holds the **orchestration** only. Delivering bytes into
//! the container is delegated to a [`RemoteWriter`] supplied by the
//! caller, which keeps the pipeline testable with mocks.
//!
//! # Pipeline
//!
//! 1. **Validate**: reject malformed batches before any work starts
//! 2. **Admit**: at most `concurrency` files run at once
//! 3. **Stage**: persist each stream into a private temp directory
//! 4. **Write**: hand the staged file to the remote writer
//! 5. **Release**: delete the staging directory
//! 6. **Aggregate**: record the outcome in the file's slot

pub mod aggregate;
pub mod dispatch;
pub mod error;
pub mod types;
pub mod validation;
pub mod writer;

pub use aggregate::Aggregator;
pub use dispatch::BatchUploader;
pub use error::{BatchError, UploadError};
pub use types::{BatchConfig, BatchRequest, UploadItem};
pub use validation::validate_request;
pub use writer::RemoteWriter;

pub use podcopy_protocol::{BatchUploadResult, FileStatus, FileUploadResult, PodTarget};

/// Default maximum number of files accepted in one batch.
pub const DEFAULT_MAX_FILES: usize = 50;

/// Default number of files uploaded concurrently.
pub const DEFAULT_CONCURRENCY: usize = 5;

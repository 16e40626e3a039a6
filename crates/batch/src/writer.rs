//! Remote writer trait.
//!
//! The application implements this on top of whatever mechanism streams
//! bytes into a container (exec + `cat`, a tar stream, an agent...).

use std::future::Future;
use std::pin::Pin;

use podcopy_protocol::PodTarget;

use crate::error::UploadError;

/// Writes one file into a running container.
pub trait RemoteWriter: Send + Sync {
    /// Streams `source` into `dest_path` inside `target`.
    ///
    /// Any error returned here becomes the file's error detail unchanged,
    /// so implementations should describe the failure fully.
    fn write_file<'a>(
        &'a self,
        target: &'a PodTarget,
        dest_path: &'a str,
        source: tokio::fs::File,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + 'a>>;
}

//! Batch dispatcher: bounded fan-out of the per-file upload pipeline.
//!
//! Every file runs in its own task behind a shared semaphore. A failure
//! in one file is recorded in that file's result and never reaches its
//! siblings.
//!
//! Tasks are detached: if the caller stops awaiting [`BatchUploader::upload`],
//! admitted and queued files still run to completion and clean up their
//! staging directories. There is no per-file timeout either; a hung
//! remote write is bounded only by the writer itself.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use podcopy_protocol::{BatchUploadResult, FileUploadResult, PodTarget};
use podcopy_transfer::{
    StagedFile, StagingArea, is_traversal_name, join_remote_path, sanitize_file_name,
};
use tokio::io::AsyncRead;
use tokio::sync::Semaphore;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::aggregate::Aggregator;
use crate::error::{BatchError, UploadError};
use crate::types::{BatchConfig, BatchRequest, UploadItem};
use crate::validation::validate_request;
use crate::writer::RemoteWriter;

/// Uploads batches of files into pod containers.
pub struct BatchUploader {
    writer: Arc<dyn RemoteWriter>,
    config: BatchConfig,
    staging: StagingArea,
}

impl BatchUploader {
    /// Creates an uploader delivering files through `writer`.
    pub fn new(writer: Arc<dyn RemoteWriter>, config: BatchConfig) -> Self {
        let staging = StagingArea::new(config.staging_dir.clone());
        Self {
            writer,
            config,
            staging,
        }
    }

    /// Uploads every file of `request` and reports one result per file.
    ///
    /// Returns `Err` only when the request itself is malformed; in that
    /// case nothing has been staged or sent. Otherwise the result is
    /// `Ok` even if every file failed.
    pub async fn upload(&self, request: BatchRequest) -> Result<BatchUploadResult, BatchError> {
        validate_request(&request, self.config.max_files)?;

        let batch_id = uuid::Uuid::new_v4();
        let span = info_span!("batch_upload", %batch_id, pod = %request.target);
        Ok(self.run_batch(request).instrument(span).await)
    }

    /// Uploads a single file outside of any batch.
    pub async fn upload_file(
        &self,
        target: &PodTarget,
        dest_dir: &str,
        item: UploadItem,
    ) -> FileUploadResult {
        let pipeline = FilePipeline {
            writer: self.writer.clone(),
            staging: self.staging.clone(),
            target: target.clone(),
            dest_dir: dest_dir.to_string(),
        };
        pipeline.run(item).await
    }

    async fn run_batch(&self, request: BatchRequest) -> BatchUploadResult {
        let start_time = Utc::now();
        let started = Instant::now();

        let BatchRequest {
            target,
            dest_dir,
            items,
        } = request;

        info!(dest = %dest_dir, files = items.len(), "batch upload accepted");

        let aggregator = Arc::new(Aggregator::new(
            items.iter().map(|item| (item.name(), item.size())),
        ));
        let gate = Arc::new(Semaphore::new(self.config.effective_concurrency()));
        let pipeline = Arc::new(FilePipeline {
            writer: self.writer.clone(),
            staging: self.staging.clone(),
            target,
            dest_dir,
        });

        let mut handles = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let gate = gate.clone();
            let pipeline = pipeline.clone();
            let aggregator = aggregator.clone();
            let task = async move {
                // The gate is never closed.
                let Ok(_permit) = gate.acquire_owned().await else {
                    return;
                };
                let result = pipeline.run(item).await;
                aggregator.record(index, result);
            };
            handles.push(tokio::spawn(task.in_current_span()));
        }

        // Completion barrier.
        for handle in handles {
            if let Err(e) = handle.await {
                warn!(error = %e, "upload task did not complete");
            }
        }

        // Every task has been joined, so this is normally the last handle.
        let aggregator = Arc::try_unwrap(aggregator).unwrap_or_else(|shared| {
            warn!("aggregator still shared after the barrier");
            shared.take()
        });
        let result = aggregator.finish(start_time, started);
        info!(
            total = result.total_files,
            success = result.success_count,
            failed = result.failure_count,
            duration_ms = result.duration.as_millis() as u64,
            "batch upload completed"
        );
        result
    }
}

/// Everything one file needs to go from client stream to container.
struct FilePipeline {
    writer: Arc<dyn RemoteWriter>,
    staging: StagingArea,
    target: PodTarget,
    dest_dir: String,
}

impl FilePipeline {
    async fn run(&self, item: UploadItem) -> FileUploadResult {
        let (name, declared_size, mut reader) = item.into_parts();

        match self.transfer(&name, &mut *reader).await {
            Ok(size) => {
                debug!(file = %name, bytes = size, "upload done");
                FileUploadResult::done(name, size)
            }
            Err(e) => {
                warn!(file = %name, error = %e, "upload failed");
                FileUploadResult::failed(name, declared_size, e.to_string())
            }
        }
    }

    /// Stage, write, release. Returns the number of bytes delivered.
    async fn transfer(
        &self,
        name: &str,
        reader: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<u64, UploadError> {
        if self.dest_dir.is_empty() {
            return Err(UploadError::InvalidDestination);
        }
        if name.is_empty() {
            return Err(UploadError::EmptyName);
        }

        let sanitized = sanitize_file_name(name);
        if is_traversal_name(&sanitized) {
            return Err(UploadError::InvalidName(sanitized));
        }

        let staged = self.staging.stage(name, reader).await?;
        let dest_path = join_remote_path(&self.dest_dir, &sanitized);
        let outcome = self.write_staged(&staged, &dest_path).await;

        let size = staged.size();
        if let Err(e) = staged.release().await {
            warn!(file = %name, error = %e, "failed to remove staging directory");
        }

        outcome.map(|()| size)
    }

    async fn write_staged(&self, staged: &StagedFile, dest_path: &str) -> Result<(), UploadError> {
        let source = staged.open().await.map_err(UploadError::OpenStaged)?;
        debug!(dest = %dest_path, bytes = staged.size(), "writing to container");
        self.writer
            .write_file(&self.target, dest_path, source)
            .await
    }
}

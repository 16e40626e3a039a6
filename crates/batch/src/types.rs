//! Data types for the batch upload flow.

use std::path::{Path, PathBuf};

use podcopy_protocol::PodTarget;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncRead;
use tokio::sync::Semaphore;

use crate::{DEFAULT_CONCURRENCY, DEFAULT_MAX_FILES};

/// One named byte stream to upload.
pub struct UploadItem {
    name: String,
    size: u64,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl UploadItem {
    /// Wraps an arbitrary stream. `size` is the size announced by the
    /// client and is reported for files that fail before staging.
    pub fn new(
        name: impl Into<String>,
        size: u64,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            reader: Box::new(reader),
        }
    }

    /// Builds an item from an in-memory buffer.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let size = data.len() as u64;
        Self::new(name, size, std::io::Cursor::new(data))
    }

    /// Opens a local file; the item is named after the file.
    pub async fn open(path: &Path) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        let size = file.metadata().await?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, size, file))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn into_parts(self) -> (String, u64, Box<dyn AsyncRead + Send + Unpin>) {
        (self.name, self.size, self.reader)
    }
}

impl std::fmt::Debug for UploadItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadItem")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// A batch of files bound for one directory of one container.
#[derive(Debug)]
pub struct BatchRequest {
    pub target: PodTarget,
    /// Directory inside the container the files are written to.
    pub dest_dir: String,
    pub items: Vec<UploadItem>,
}

impl BatchRequest {
    pub fn new(target: PodTarget, dest_dir: impl Into<String>, items: Vec<UploadItem>) -> Self {
        Self {
            target,
            dest_dir: dest_dir.into(),
            items,
        }
    }
}

/// Tunables of the batch uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    /// Largest accepted batch.
    pub max_files: usize,
    /// Files uploaded at the same time. `0` behaves like `1`.
    pub concurrency: usize,
    /// Where staging directories are created (system temp dir if unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            concurrency: DEFAULT_CONCURRENCY,
            staging_dir: None,
        }
    }
}

impl BatchConfig {
    /// Concurrency actually used by the admission gate, clamped to
    /// `1..=Semaphore::MAX_PERMITS`.
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::AsyncReadExt;

    use super::*;

    #[test]
    fn config_defaults() {
        let cfg = BatchConfig::default();
        assert_eq!(cfg.max_files, 50);
        assert_eq!(cfg.concurrency, 5);
        assert!(cfg.staging_dir.is_none());
    }

    #[test]
    fn config_partial_json_uses_defaults() {
        let cfg: BatchConfig = serde_json::from_str(r#"{"concurrency":2}"#).unwrap();
        assert_eq!(cfg.concurrency, 2);
        assert_eq!(cfg.max_files, DEFAULT_MAX_FILES);

        let cfg: BatchConfig =
            serde_json::from_str(r#"{"maxFiles":10,"stagingDir":"/var/tmp/podcopy"}"#).unwrap();
        assert_eq!(cfg.max_files, 10);
        assert_eq!(cfg.staging_dir, Some(PathBuf::from("/var/tmp/podcopy")));
    }

    #[test]
    fn zero_concurrency_is_one() {
        let cfg = BatchConfig {
            concurrency: 0,
            ..BatchConfig::default()
        };
        assert_eq!(cfg.effective_concurrency(), 1);
    }

    #[test]
    fn huge_concurrency_is_capped() {
        let cfg = BatchConfig {
            concurrency: usize::MAX,
            ..BatchConfig::default()
        };
        assert_eq!(cfg.effective_concurrency(), Semaphore::MAX_PERMITS);
    }

    #[tokio::test]
    async fn from_bytes_reports_size() {
        let item = UploadItem::from_bytes("a.txt", b"hello".to_vec());
        assert_eq!(item.name(), "a.txt");
        assert_eq!(item.size(), 5);

        let (_, _, mut reader) = item.into_parts();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        assert_eq!(buf, b"hello");
    }

    #[tokio::test]
    async fn open_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        std::fs::write(&path, b"# notes").unwrap();

        let item = UploadItem::open(&path).await.unwrap();
        assert_eq!(item.name(), "notes.md");
        assert_eq!(item.size(), 7);
    }

    #[tokio::test]
    async fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(UploadItem::open(&dir.path().join("missing")).await.is_err());
    }
}

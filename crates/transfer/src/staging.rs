//! Private on-disk staging of incoming upload streams.
//!
//! Every staged upload gets its own temporary directory, so two uploads
//! with the same client-supplied name never touch the same file. The
//! directory is owned by the returned [`StagedFile`] and removed when it
//! is released or dropped.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::debug;

use crate::StagingError;

/// Prefix of every per-upload staging directory.
pub const STAGING_DIR_PREFIX: &str = "upload-";

/// File name used inside the staging directory when the client-supplied
/// name is not a single plain path component.
pub const FALLBACK_STAGED_NAME: &str = "upload.bin";

/// Root under which per-upload staging directories are created.
#[derive(Debug, Clone, Default)]
pub struct StagingArea {
    root: Option<PathBuf>,
}

impl StagingArea {
    /// Stages under `root`, or under the system temp dir when `None`.
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Returns the directory new staging directories are created in.
    pub fn root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Persists `reader` to a fresh private directory.
    ///
    /// The returned file is fully written, flushed and synced. If any
    /// step fails the partially written directory is removed before the
    /// error is returned.
    pub async fn stage<R>(
        &self,
        original_name: &str,
        reader: &mut R,
    ) -> Result<StagedFile, StagingError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let root = self.root();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(STAGING_DIR_PREFIX)
                .tempdir_in(&root)
        })
        .await
        .map_err(|e| StagingError::CreateDir(std::io::Error::other(e)))?
        .map_err(StagingError::CreateDir)?;

        let path = dir.path().join(staged_name(original_name));

        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(StagingError::CreateFile)?;
        let size = tokio::io::copy(reader, &mut file)
            .await
            .map_err(StagingError::Write)?;
        file.flush().await.map_err(StagingError::Write)?;
        file.sync_all().await.map_err(StagingError::Write)?;
        drop(file);

        debug!(path = %path.display(), bytes = size, "staged upload");

        Ok(StagedFile { dir, path, size })
    }
}

/// Picks the name of the staged file inside its private directory.
fn staged_name(original: &str) -> &str {
    let mut components = Path::new(original).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == OsStr::new(original) => original,
        _ => FALLBACK_STAGED_NAME,
    }
}

/// An upload persisted in its own temporary directory.
///
/// Owns the directory: [`release`](Self::release) removes it, and so does
/// dropping the value.
#[derive(Debug)]
pub struct StagedFile {
    dir: TempDir,
    path: PathBuf,
    size: u64,
}

impl StagedFile {
    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Private directory holding the staged file.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Number of bytes written to disk.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Opens an independent read handle on the staged file.
    pub async fn open(&self) -> std::io::Result<tokio::fs::File> {
        tokio::fs::File::open(&self.path).await
    }

    /// Deletes the staged file and its directory.
    pub async fn release(self) -> std::io::Result<()> {
        let dir = self.dir;
        let shown = dir.path().display().to_string();
        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(std::io::Error::other)??;
        debug!(dir = %shown, "released staging directory");
        Ok(())
    }
}

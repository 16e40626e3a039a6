use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coordinates of the container that receives the files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodTarget {
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub pod_name: String,
    #[serde(default)]
    pub container_name: String,
}

impl PodTarget {
    pub fn new(
        namespace: impl Into<String>,
        pod_name: impl Into<String>,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            pod_name: pod_name.into(),
            container_name: container_name.into(),
        }
    }
}

impl std::fmt::Display for PodTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}:{}",
            self.namespace, self.pod_name, self.container_name
        )
    }
}

/// Final state of a single file in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "error")]
    Error,
}

/// Outcome of uploading one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileUploadResult {
    /// Name as supplied by the client, before sanitization.
    pub file_name: String,
    pub status: FileStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    pub size: u64,
}

impl FileUploadResult {
    /// Builds a successful result.
    pub fn done(file_name: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            status: FileStatus::Done,
            error: String::new(),
            size,
        }
    }

    /// Builds a failed result carrying a human-readable reason.
    pub fn failed(file_name: impl Into<String>, size: u64, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            status: FileStatus::Error,
            error: error.into(),
            size,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == FileStatus::Done
    }
}

/// Aggregate outcome of a batch upload.
///
/// `files[i]` always describes the i-th file of the request, whatever
/// order the uploads finished in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchUploadResult {
    pub total_files: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub files: Vec<FileUploadResult>,
    /// Elapsed wall-clock time, encoded as integer nanoseconds.
    #[serde(with = "duration_nanos")]
    pub duration: Duration,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl BatchUploadResult {
    /// Returns `true` if every file was uploaded.
    pub fn all_succeeded(&self) -> bool {
        self.failure_count == 0 && self.success_count == self.total_files
    }
}

/// Go encodes `time.Duration` as an int64 nanosecond count.
mod duration_nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = i64::try_from(d.as_nanos()).unwrap_or(i64::MAX);
        nanos.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = i64::deserialize(deserializer)?;
        let nanos = u64::try_from(nanos)
            .map_err(|_| serde::de::Error::custom("negative duration"))?;
        Ok(Duration::from_nanos(nanos))
    }
}

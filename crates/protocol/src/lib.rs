//! Wire types shared by the podcopy batch uploader and its callers.
//!
//! Field names and encodings match the JSON of the pod file API
//! (`snake_case` result fields, Go-style nanosecond durations), so
//! existing frontends keep parsing the result.

mod types;

pub use types::{BatchUploadResult, FileStatus, FileUploadResult, PodTarget};

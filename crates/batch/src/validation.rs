use crate::error::BatchError;
use crate::types::BatchRequest;

/// Checks batch-level preconditions.
///
/// Rejects, in order:
/// - Empty container, namespace, pod or destination path
/// - A batch without files
/// - A batch with more than `max_files` files
///
/// Has no side effects; nothing is staged or sent when it fails.
pub fn validate_request(request: &BatchRequest, max_files: usize) -> Result<(), BatchError> {
    let required = [
        ("containerName", request.target.container_name.as_str()),
        ("namespace", request.target.namespace.as_str()),
        ("podName", request.target.pod_name.as_str()),
        ("path", request.dest_dir.as_str()),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(BatchError::MissingParameter(missing.join(", ")));
    }

    if request.items.is_empty() {
        return Err(BatchError::EmptyBatch);
    }

    if request.items.len() > max_files {
        return Err(BatchError::TooManyFiles {
            count: request.items.len(),
            max: max_files,
        });
    }

    Ok(())
}

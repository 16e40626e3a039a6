//! Remote writer backed by `kubectl exec`.
//!
//! The staged file is piped into `sh -c 'cat > "$1"'` running inside the
//! target container, so the container only needs a POSIX shell and `cat`.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use podcopy_batch::{PodTarget, RemoteWriter, UploadError};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Shell snippet run in the container; the destination is passed as `$1`.
const WRITE_SCRIPT: &str = "cat > \"$1\"";

/// Implements [`RemoteWriter`] by shelling out to `kubectl exec`.
pub struct KubectlWriter {
    program: String,
    context: Option<String>,
}

impl KubectlWriter {
    pub fn new(program: impl Into<String>, context: Option<String>) -> Self {
        Self {
            program: program.into(),
            context,
        }
    }

    /// Arguments passed to `kubectl` for one write.
    pub fn command_args(&self, target: &PodTarget, dest_path: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(14);
        if let Some(context) = &self.context {
            args.push("--context".to_string());
            args.push(context.clone());
        }
        args.extend(
            [
                "exec",
                "-i",
                "-n",
                &target.namespace,
                &target.pod_name,
                "-c",
                &target.container_name,
                "--",
                "sh",
                "-c",
                WRITE_SCRIPT,
                "sh",
                dest_path,
            ]
            .map(String::from),
        );
        args
    }
}

/// Collects whatever `kubectl` wrote to stderr. A read error keeps the
/// bytes read so far.
async fn read_stderr<R: AsyncRead + Unpin>(stderr: &mut R) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Err(e) = stderr.read_to_end(&mut buf).await {
        tracing::debug!(error = %e, bytes = buf.len(), "failed to read kubectl stderr");
    }
    buf
}

impl RemoteWriter for KubectlWriter {
    fn write_file<'a>(
        &'a self,
        target: &'a PodTarget,
        dest_path: &'a str,
        mut source: tokio::fs::File,
    ) -> Pin<Box<dyn Future<Output = Result<(), UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let mut child = tokio::process::Command::new(&self.program)
                .args(self.command_args(target, dest_path))
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
                .map_err(|e| UploadError::Remote(format!("failed to run {}: {e}", self.program)))?;

            let (Some(mut stdin), Some(mut stderr)) = (child.stdin.take(), child.stderr.take())
            else {
                return Err(UploadError::Remote("kubectl pipes unavailable".into()));
            };

            // Feed stdin and drain stderr together so neither pipe can fill up.
            let feed = async move {
                let copied = tokio::io::copy(&mut source, &mut stdin).await;
                drop(stdin);
                copied
            };
            let (copied, stderr_buf) = tokio::join!(feed, read_stderr(&mut stderr));

            let status = child
                .wait()
                .await
                .map_err(|e| UploadError::Remote(format!("kubectl exec failed: {e}")))?;

            if !status.success() {
                let stderr = String::from_utf8_lossy(&stderr_buf).trim().to_string();
                return Err(UploadError::Remote(if stderr.is_empty() {
                    format!("kubectl exec exited with {status}")
                } else {
                    stderr
                }));
            }

            let bytes = copied.map_err(|e| {
                UploadError::Remote(format!("failed to stream file to kubectl: {e}"))
            })?;
            tracing::debug!(dest = %dest_path, bytes, "kubectl exec write complete");
            Ok(())
        })
    }
}

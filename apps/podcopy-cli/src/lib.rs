//! `podcopy`: upload local files into a running pod container.

mod config;
mod kubectl;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use podcopy_batch::{
    BatchError, BatchRequest, BatchUploadResult, BatchUploader, PodTarget, UploadItem,
};

pub use config::{CliConfig, default_config_path};
pub use kubectl::KubectlWriter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "podcopy",
    version,
    about = "Upload local files into a running pod container"
)]
pub struct Cli {
    /// Namespace of the target pod
    #[arg(short = 'n', long)]
    pub namespace: String,

    /// Name of the target pod
    #[arg(short = 'p', long)]
    pub pod: String,

    /// Container inside the pod
    #[arg(short = 'c', long)]
    pub container: String,

    /// Destination directory inside the container
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dest: String,

    /// Config file (defaults to ~/.config/podcopy/config.json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Kube context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Number of files uploaded at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Maximum number of files per batch
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Parent directory for staging directories
    #[arg(long, value_name = "DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Local files to upload
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut CliConfig) {
        if let Some(context) = &self.context {
            config.context = Some(context.clone());
        }
        if let Some(concurrency) = self.concurrency {
            config.batch.concurrency = concurrency;
        }
        if let Some(max_files) = self.max_files {
            config.batch.max_files = max_files;
        }
        if let Some(dir) = &self.staging_dir {
            config.batch.staging_dir = Some(dir.clone());
        }
    }

    fn target(&self) -> PodTarget {
        PodTarget::new(&self.namespace, &self.pod, &self.container)
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info,podcopy=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one batch upload described by `cli`.
///
/// Per-file failures are part of the returned result. An error is
/// returned only when the config or a local file cannot be read, or
/// when the batch itself is rejected.
pub async fn run(cli: Cli) -> anyhow::Result<BatchUploadResult> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // Refuse oversized batches before any local file descriptor is taken.
    if cli.files.len() > config.batch.max_files {
        return Err(BatchError::TooManyFiles {
            count: cli.files.len(),
            max: config.batch.max_files,
        }
        .into());
    }

    let mut items = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        let item = UploadItem::open(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;
        items.push(item);
    }

    let writer = Arc::new(KubectlWriter::new(
        config.kubectl.clone(),
        config.context.clone(),
    ));
    let uploader = BatchUploader::new(writer, config.batch);
    let request = BatchRequest::new(cli.target(), cli.dest.clone(), items);

    tracing::info!(
        pod = %request.target,
        dest = %request.dest_dir,
        files = request.items.len(),
        "starting upload"
    );
    let result = uploader.upload(request).await?;
    Ok(result)
}

//! CLI configuration management.
//!
//! Read from `~/.config/podcopy/config.json` (Linux/macOS) or
//! `%APPDATA%\podcopy\config.json` (Windows), or from an explicit path.

use std::path::{Path, PathBuf};

use anyhow::Context;
use podcopy_batch::BatchConfig;
use serde::{Deserialize, Serialize};

/// Settings of the `podcopy` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CliConfig {
    /// Batch limits and staging location.
    #[serde(flatten)]
    pub batch: BatchConfig,

    /// `kubectl` binary used to reach the cluster.
    pub kubectl: String,

    /// Kube context; the current context when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            batch: BatchConfig::default(),
            kubectl: "kubectl".into(),
            context: None,
        }
    }
}

impl CliConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist and parse. The default file is
    /// optional; if it cannot be parsed a warning is logged and defaults
    /// are used.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("failed to parse config {}", path.display()));
        }

        let path = default_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }
}

/// Returns the default config file location.
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("podcopy").join("config.json"))
}

fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var("APPDATA").context("APPDATA is not set")?;
        Ok(PathBuf::from(appdata))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = CliConfig::default();
        assert_eq!(cfg.kubectl, "kubectl");
        assert_eq!(cfg.batch.max_files, 50);
        assert_eq!(cfg.batch.concurrency, 5);
        assert!(cfg.context.is_none());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"concurrency":3,"kubectl":"/usr/local/bin/kubectl","context":"staging"}"#,
        )
        .unwrap();

        let cfg = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.batch.concurrency, 3);
        assert_eq!(cfg.batch.max_files, 50);
        assert_eq!(cfg.kubectl, "/usr/local/bin/kubectl");
        assert_eq!(cfg.context.as_deref(), Some("staging"));
    }

    #[test]
    fn explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CliConfig::load(Some(&dir.path().join("nope.json"))).is_err());
    }

    #[test]
    fn explicit_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = CliConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn json_roundtrip_is_flat() {
        let cfg = CliConfig {
            batch: BatchConfig {
                max_files: 10,
                concurrency: 2,
                staging_dir: Some(PathBuf::from("/var/tmp/podcopy")),
            },
            kubectl: "kubectl".into(),
            context: None,
        };
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(value["maxFiles"], serde_json::json!(10));
        assert_eq!(value["stagingDir"], serde_json::json!("/var/tmp/podcopy"));
        assert!(value.get("context").is_none());

        let parsed: CliConfig = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn default_path_ends_with_podcopy_config() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with("podcopy/config.json"), "got {path:?}");
    }
}

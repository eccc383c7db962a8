// src/fs_ops.rs
//! File system helpers for the output file

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Write to a sibling temp file, then rename over `path`.
    ///
    /// Readers see either the previous file or the complete new one.
    pub async fn write_atomic(path: &Path, content: &str) -> Result<()> {
        let parent = Self::parent_dir(path);
        Self::ensure_dir_exists(&parent).await?;

        let target = path.to_path_buf();
        let content = content.to_string();
        tokio::task::spawn_blocking(move || Self::write_atomic_blocking(&parent, &target, &content))
            .await
            .context("Atomic write task panicked")??;

        Ok(())
    }

    fn write_atomic_blocking(parent: &Path, target: &Path, content: &str) -> Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

        tmp.write_all(content.as_bytes())
            .context("Failed to write temp file")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush temp file")?;

        tmp.persist(target)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace {}", target.display()))?;

        Ok(())
    }

    fn parent_dir(path: &Path) -> PathBuf {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

//! Filesystem helpers shared by the profile store, credential store and history log.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::info;

/// Creates `dir` (and parents) if it does not exist yet.
pub async fn ensure_dir(dir: &Path) -> Result<()> {
    if !fs::try_exists(dir).await.unwrap_or(false) {
        fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        info!("Created directory {}", dir.display());
    }
    Ok(())
}

/// Writes `contents` to a uniquely named sibling temp file and renames it over
/// `path`, so readers see either the old file or the new one, never a torn write.
/// Concurrent writers to the same path each get their own temp file; the last
/// rename wins.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            ensure_dir(parent).await?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };

    let target = path.to_path_buf();
    let contents = contents.to_vec();
    task::spawn_blocking(move || -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(&contents)
            .with_context(|| format!("Failed to write file: {}", tmp.path().display()))?;
        tmp.persist(&target)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move {} into place", target.display()))?;
        Ok(())
    })
    .await
    .context("File write task failed")?
}

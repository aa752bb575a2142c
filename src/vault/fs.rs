//! On-disk [`Vault`] rooted at a directory.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

use super::{Vault, VaultFile};

/// A vault backed by a directory tree on the local filesystem.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a vault-relative path onto the filesystem.
    ///
    /// Rejects absolute paths and `..` so nothing is written outside the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let mut full = self.root.clone();
        for part in path.split('/') {
            match part {
                "" | "." => continue,
                ".." => bail!("Vault path escapes the vault root: {}", path),
                _ => full.push(part),
            }
        }
        if path.starts_with('/') {
            bail!("Vault paths must be relative: {}", path);
        }
        Ok(full)
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn ensure_folder(&self, path: &str) -> Result<()> {
        let dir = self.resolve(path)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create folder {}", dir.display()))
    }

    async fn get_file(&self, path: &str) -> Result<Option<VaultFile>> {
        let full = self.resolve(path)?;
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => Ok(Some(VaultFile {
                path: path.to_string(),
            })),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to stat {}", full.display())),
        }
    }

    async fn create(&self, path: &str, content: &str) -> Result<VaultFile> {
        let full = self.resolve(path)?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .await
            .with_context(|| format!("Failed to create {}", full.display()))?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(VaultFile {
            path: path.to_string(),
        })
    }

    async fn modify(&self, file: &VaultFile, content: &str) -> Result<()> {
        let full = self.resolve(&file.path)?;
        tokio::fs::write(&full, content)
            .await
            .with_context(|| format!("Failed to write {}", full.display()))
    }
}

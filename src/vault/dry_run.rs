//! Copy-on-write [`Vault`] overlay for `--dry-run`.
//!
//! Existence checks see the real vault, but every write lands in memory,
//! so a dry run reports exactly which notes would be created or updated
//! without touching disk.

use anyhow::Result;
use async_trait::async_trait;

use super::{MemoryVault, Vault, VaultFile};

pub struct DryRunVault<'a> {
    inner: &'a dyn Vault,
    overlay: MemoryVault,
}

impl<'a> DryRunVault<'a> {
    pub fn new(inner: &'a dyn Vault) -> Self {
        Self {
            inner,
            overlay: MemoryVault::new(),
        }
    }

    /// Paths that would have been written, sorted.
    pub fn planned(&self) -> Vec<String> {
        self.overlay.paths()
    }

    /// Content that would have been written to `path`.
    pub fn planned_content(&self, path: &str) -> Option<String> {
        self.overlay.read(path)
    }
}

#[async_trait]
impl<'a> Vault for DryRunVault<'a> {
    async fn ensure_folder(&self, path: &str) -> Result<()> {
        self.overlay.ensure_folder(path).await
    }

    async fn get_file(&self, path: &str) -> Result<Option<VaultFile>> {
        if let Some(file) = self.overlay.get_file(path).await? {
            return Ok(Some(file));
        }
        self.inner.get_file(path).await
    }

    async fn create(&self, path: &str, content: &str) -> Result<VaultFile> {
        self.overlay.create(path, content).await
    }

    async fn modify(&self, file: &VaultFile, content: &str) -> Result<()> {
        self.overlay.insert(&file.path, content);
        Ok(())
    }
}

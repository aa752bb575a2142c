//! In-memory [`Vault`] for dry runs and tests.
//!
//! Uses `BTreeMap`/`BTreeSet` behind `std::sync::RwLock`, so listings come
//! back sorted by path.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{Vault, VaultFile};

pub struct MemoryVault {
    files: RwLock<BTreeMap<String, String>>,
    folders: RwLock<BTreeSet<String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            folders: RwLock::new(BTreeSet::new()),
        }
    }

    /// Seed a file, as if it had been written by an earlier run.
    pub fn insert(&self, path: &str, content: &str) {
        self.files
            .write()
            .unwrap()
            .insert(path.to_string(), content.to_string());
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.files.read().unwrap().keys().cloned().collect()
    }

    pub fn has_folder(&self, path: &str) -> bool {
        self.folders.read().unwrap().contains(path)
    }
}

impl Default for MemoryVault {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Vault for MemoryVault {
    async fn ensure_folder(&self, path: &str) -> Result<()> {
        self.folders.write().unwrap().insert(path.to_string());
        Ok(())
    }

    async fn get_file(&self, path: &str) -> Result<Option<VaultFile>> {
        Ok(self.files.read().unwrap().contains_key(path).then(|| VaultFile {
            path: path.to_string(),
        }))
    }

    async fn create(&self, path: &str, content: &str) -> Result<VaultFile> {
        let mut files = self.files.write().unwrap();
        if files.contains_key(path) {
            bail!("File already exists: {}", path);
        }
        files.insert(path.to_string(), content.to_string());
        Ok(VaultFile {
            path: path.to_string(),
        })
    }

    async fn modify(&self, file: &VaultFile, content: &str) -> Result<()> {
        let mut files = self.files.write().unwrap();
        match files.get_mut(&file.path) {
            Some(existing) => {
                *existing = content.to_string();
                Ok(())
            }
            None => bail!("File not found: {}", file.path),
        }
    }
}

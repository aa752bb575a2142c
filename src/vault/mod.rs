//! Vault storage abstraction.
//!
//! The [`Vault`] trait is the file store that contact notes are written
//! into. Paths are vault-relative strings with `/` separators
//! (e.g. `People/@Jane Doe.md`), independent of the host platform.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod dry_run;
pub mod fs;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

pub use dry_run::DryRunVault;
pub use fs::FsVault;
pub use memory::MemoryVault;

/// Handle to a file that exists in the vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFile {
    pub path: String,
}

/// Abstract file store for contact notes.
///
/// # Operations
///
/// - [`ensure_folder`](Vault::ensure_folder) is idempotent: an existing
///   folder is not an error.
/// - [`get_file`](Vault::get_file) returns `None` for missing paths and for
///   paths that are folders.
/// - [`create`](Vault::create) fails if anything already exists at the path.
/// - [`modify`](Vault::modify) replaces the whole content of the file.
#[async_trait]
pub trait Vault: Send + Sync {
    async fn ensure_folder(&self, path: &str) -> Result<()>;

    async fn get_file(&self, path: &str) -> Result<Option<VaultFile>>;

    async fn create(&self, path: &str, content: &str) -> Result<VaultFile>;

    async fn modify(&self, file: &VaultFile, content: &str) -> Result<()>;
}

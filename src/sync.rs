//! Sync orchestration.
//!
//! Runs one full pass: check the token, fetch every contact page, then
//! write the notes. This is the only place errors are turned into
//! user-facing notices; everything below it just propagates.
//!
//! Nothing guards against two syncs running at once against the same
//! vault. Each run fetches everything again; there is no delta sync.

use anyhow::Result;

use crate::config::Config;
use crate::connector_graph::{contacts_url, fetch_all_contacts, GraphClient, PageFetcher};
use crate::error::SyncError;
use crate::models::SyncResult;
use crate::progress::{SyncProgressEvent, SyncProgressReporter};
use crate::vault::{DryRunVault, FsVault, Vault};
use crate::writer::{write_contact_files, WriteOptions};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Fetch and render, but keep every write in memory.
    pub dry_run: bool,
    /// In a dry run, also collect the rendered content of each note.
    pub show: bool,
}

/// Outcome of [`run_sync`].
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub result: SyncResult,
    /// Paths that were (or, in a dry run, would be) written, sorted.
    pub paths: Vec<String>,
    /// Path and rendered content per planned note, when
    /// [`SyncOptions::show`] is set on a dry run.
    pub previews: Vec<(String, String)>,
}

/// Sync against Microsoft Graph and the on-disk vault from `config`.
pub async fn run_sync(
    config: &Config,
    options: SyncOptions,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncReport> {
    let fetcher = GraphClient::new();
    let vault = FsVault::new(&config.vault.root);

    if options.dry_run {
        let dry = DryRunVault::new(&vault);
        let result = sync_contacts(config, &fetcher, &dry, reporter).await?;
        let paths = dry.planned();
        let previews = if options.show {
            paths
                .iter()
                .filter_map(|p| dry.planned_content(p).map(|c| (p.clone(), c)))
                .collect()
        } else {
            Vec::new()
        };
        return Ok(SyncReport {
            result,
            paths,
            previews,
        });
    }

    let result = sync_contacts(config, &fetcher, &vault, reporter).await?;
    Ok(SyncReport {
        result,
        ..SyncReport::default()
    })
}

/// One sync pass with explicit collaborators.
///
/// Fails with [`SyncError::MissingToken`] before any request when no token
/// is available. Any other failure is reported as a notice and returned;
/// since writing only starts after the last page arrived, a fetch failure
/// leaves the vault untouched.
pub async fn sync_contacts(
    config: &Config,
    fetcher: &dyn PageFetcher,
    vault: &dyn Vault,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncResult> {
    let token = config.resolve_token();
    if token.is_empty() {
        reporter.report(SyncProgressEvent::Notice(
            "Please configure an access token first".to_string(),
        ));
        return Err(SyncError::MissingToken.into());
    }

    reporter.report(SyncProgressEvent::Notice(
        "Starting synchronization from Microsoft Graph...".to_string(),
    ));

    match fetch_and_write(config, fetcher, vault, &token, reporter).await {
        Ok(result) => {
            reporter.report(SyncProgressEvent::Finished(result));
            Ok(result)
        }
        Err(e) => {
            reporter.report(SyncProgressEvent::Notice(format!("Error: {:#}", e)));
            Err(e)
        }
    }
}

async fn fetch_and_write(
    config: &Config,
    fetcher: &dyn PageFetcher,
    vault: &dyn Vault,
    token: &str,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncResult> {
    let contacts = fetch_all_contacts(fetcher, &contacts_url(&config.graph), token, reporter).await?;
    let options = WriteOptions::from_config(config);
    write_contact_files(vault, &contacts, &options, reporter).await
}

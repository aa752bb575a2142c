//! Contact note writer.
//!
//! Turns fetched contacts into vault files: normalize, pick a file name,
//! render the template, then create the note or overwrite it in place.
//! Re-running with unchanged contacts resolves to the same paths, so a
//! re-sync never duplicates notes. Manual edits to a note are lost on the
//! next sync.

use std::collections::HashSet;

use anyhow::Result;

use crate::config::Config;
use crate::models::{NormalizedContact, RawContact, SyncResult};
use crate::normalize::normalize_contact;
use crate::progress::{SyncProgressEvent, SyncProgressReporter};
use crate::template::render_template;
use crate::vault::Vault;

/// Characters removed from note file names.
const ILLEGAL_FILENAME_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Where and how notes are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Vault-relative folder, without a trailing `/`.
    pub folder: String,
    pub prefix: String,
    pub template: String,
}

impl WriteOptions {
    /// Derive options from settings.
    ///
    /// An empty folder falls back to `People` and an empty prefix to `@`.
    pub fn from_config(config: &Config) -> Self {
        let folder = config.people_folder.trim();
        let folder = if folder.is_empty() { "People" } else { folder };
        let folder = folder.strip_suffix('/').unwrap_or(folder);

        let prefix = if config.file_prefix.is_empty() {
            "@"
        } else {
            config.file_prefix.as_str()
        };

        Self {
            folder: folder.to_string(),
            prefix: prefix.to_string(),
            template: config.template.clone(),
        }
    }
}

/// Strip characters that are illegal in file names, then trim.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Vault path of the note for `contact`.
///
/// Named after the display name, else the primary email, else `Unknown`.
/// A name that sanitizes to nothing also becomes `Unknown`.
pub fn contact_file_path(folder: &str, prefix: &str, contact: &NormalizedContact) -> String {
    let base = [&contact.display_name, &contact.primary_email]
        .into_iter()
        .find(|s| !s.is_empty())
        .map(String::as_str)
        .unwrap_or("Unknown");
    let mut name = sanitize_file_name(base);
    if name.is_empty() {
        name = "Unknown".to_string();
    }
    format!("{}/{}{}.md", folder, prefix, name)
}

/// Write one note per usable contact, in input order.
///
/// Contacts that normalize to nothing are counted as skipped. When two
/// contacts map to the same path the later one wins; a warning is reported.
pub async fn write_contact_files(
    vault: &dyn Vault,
    contacts: &[RawContact],
    options: &WriteOptions,
    reporter: &dyn SyncProgressReporter,
) -> Result<SyncResult> {
    vault.ensure_folder(&options.folder).await?;

    let mut result = SyncResult::default();
    let mut seen: HashSet<String> = HashSet::new();

    for raw in contacts {
        let Some(contact) = normalize_contact(raw) else {
            result.skipped += 1;
            continue;
        };

        let path = contact_file_path(&options.folder, &options.prefix, &contact);
        let content = render_template(&options.template, &contact);

        if !seen.insert(path.clone()) {
            reporter.report(SyncProgressEvent::Warning(format!(
                "{} matches an earlier contact; keeping the later one",
                path
            )));
        }

        let created = match vault.get_file(&path).await? {
            Some(existing) => {
                vault.modify(&existing, &content).await?;
                false
            }
            None => {
                vault.create(&path, &content).await?;
                true
            }
        };

        result.written += 1;
        reporter.report(SyncProgressEvent::Wrote { path, created });
    }

    Ok(result)
}

//! Configuration loading and persistence.
//!
//! Settings live in a TOML file (default `./config/psync.toml`). Every key is
//! optional; a missing file means "all defaults". Settings commands mutate the
//! loaded [`Config`] and write it straight back with [`save_config`].
//!
//! ```toml
//! access_token = "eyJ0eXAiOi..."
//! people_folder = "People"
//! file_prefix = "@"
//! template = """
//! #### {{displayName}}
//! 📧 {{primaryEmail}}
//! """
//!
//! [vault]
//! root = "/home/me/notes"
//!
//! [graph]
//! collection_url = "https://graph.microsoft.com/v1.0/me/contacts"
//! page_size = 50
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `access_token`.
pub const TOKEN_ENV: &str = "PEOPLE_SYNC_ACCESS_TOKEN";

pub const DEFAULT_TEMPLATE: &str = concat!(
    "#### {{displayName}} • 🧑\u{200d}💼 {{jobTitle}}\n",
    "\n",
    "📧 {{primaryEmail}}  \n",
    "📱 {{mobilePhone}}  \n",
    "🏢 {{department}} • {{companyName}} • {{officeLocation}}  \n",
    "👔 {{title}}  \n",
    "☎\u{fe0f} {{businessPhones}}",
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub access_token: String,
    pub people_folder: String,
    pub file_prefix: String,
    pub template: String,
    pub vault: VaultConfig,
    pub graph: GraphConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            people_folder: default_people_folder(),
            file_prefix: default_file_prefix(),
            template: DEFAULT_TEMPLATE.to_string(),
            vault: VaultConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_vault_root")]
    pub root: PathBuf,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: default_vault_root(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_collection_url")]
    pub collection_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            collection_url: default_collection_url(),
            page_size: default_page_size(),
        }
    }
}

fn default_people_folder() -> String {
    "People".to_string()
}
fn default_file_prefix() -> String {
    "@".to_string()
}
fn default_vault_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_collection_url() -> String {
    "https://graph.microsoft.com/v1.0/me/contacts".to_string()
}
fn default_page_size() -> u32 {
    50
}

/// Keys accepted by [`Config::set`].
pub const SETTABLE_KEYS: [&str; 7] = [
    "access_token",
    "people_folder",
    "file_prefix",
    "template",
    "vault.root",
    "graph.collection_url",
    "graph.page_size",
];

impl Config {
    /// The access token to use: the environment override if set, otherwise
    /// the configured one. Always trimmed; may be empty.
    pub fn resolve_token(&self) -> String {
        match std::env::var(TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => token.trim().to_string(),
            _ => self.access_token.trim().to_string(),
        }
    }

    /// Update a single setting by key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "access_token" => self.access_token = value.to_string(),
            "people_folder" => self.people_folder = value.to_string(),
            "file_prefix" => self.file_prefix = value.to_string(),
            "template" => self.template = value.to_string(),
            "vault.root" => self.vault.root = PathBuf::from(value),
            "graph.collection_url" => self.graph.collection_url = value.to_string(),
            "graph.page_size" => {
                self.graph.page_size = value
                    .parse()
                    .with_context(|| format!("graph.page_size must be a number, got '{}'", value))?;
            }
            other => bail!(
                "Unknown setting: '{}'. Available: {}",
                other,
                SETTABLE_KEYS.join(", ")
            ),
        }
        self.validate()
    }

    pub fn reset_template(&mut self) {
        self.template = DEFAULT_TEMPLATE.to_string();
    }

    /// Copy of this config with the token masked, for display.
    pub fn redacted(&self) -> Config {
        let mut shown = self.clone();
        if !shown.access_token.is_empty() {
            let visible: String = shown.access_token.chars().take(6).collect();
            shown.access_token = format!("{}…", visible);
        }
        shown
    }

    fn validate(&self) -> Result<()> {
        if !(1..=999).contains(&self.graph.page_size) {
            bail!("graph.page_size must be between 1 and 999");
        }
        let url = &self.graph.collection_url;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            bail!("graph.collection_url must be an http(s) URL, got '{}'", url);
        }
        Ok(())
    }
}

/// Load the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}

/// Write the config file, creating its directory if needed.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

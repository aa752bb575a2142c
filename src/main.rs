//! # People Sync CLI (`psync`)
//!
//! Syncs Microsoft Graph contacts into markdown notes and manages the
//! settings that control where and how the notes are written.
//!
//! ## Usage
//!
//! ```bash
//! psync --config ./config/psync.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `psync sync [--dry-run [--show]]` | Fetch all contacts and create/update their notes |
//! | `psync fields` | List the fields usable in templates |
//! | `psync template show\|reset\|check\|preview` | Inspect or reset the note template |
//! | `psync config show\|set\|init` | Inspect or change settings |

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use people_sync::config::{self, Config};
use people_sync::models::{Field, RawContact};
use people_sync::normalize::normalize_contact;
use people_sync::progress::ProgressMode;
use people_sync::sync::{run_sync, SyncOptions};
use people_sync::template::{render_template, template_fields};
use people_sync::writer::{contact_file_path, WriteOptions};

/// People Sync: Microsoft Graph contacts as markdown notes.
#[derive(Parser)]
#[command(
    name = "psync",
    about = "People Sync: Microsoft Graph contacts as markdown notes",
    version,
    long_about = "People Sync pages through your Microsoft Graph contacts with a pre-obtained \
    access token and writes one markdown note per contact into a vault folder, using a \
    configurable template. Re-running a sync overwrites notes in place."
)]
struct Cli {
    /// Path to the settings file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "./config/psync.toml")]
    config: PathBuf,

    /// Progress output on stderr. Defaults to `human` on a terminal, `off` otherwise.
    #[arg(long, global = true, value_enum)]
    progress: Option<ProgressMode>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every contact and create or update its note.
    Sync {
        /// Fetch and render, but do not write anything.
        #[arg(long)]
        dry_run: bool,
        /// With --dry-run, print the rendered content of each note.
        #[arg(long, requires = "dry_run")]
        show: bool,
    },

    /// List the fields available as `{{field}}` placeholders.
    Fields,

    /// Inspect, check or reset the note template.
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Inspect or change settings.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Print the configured template.
    Show,
    /// Restore the default template and save.
    Reset,
    /// List placeholders used by the template and flag unknown ones.
    Check,
    /// Render one contact from a JSON file (as returned by Graph).
    Preview {
        /// Path to a JSON file holding a single contact object.
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the settings (token masked).
    Show,
    /// Change one setting and save.
    ///
    /// Keys: access_token, people_folder, file_prefix, template,
    /// vault.root, graph.collection_url, graph.page_size.
    Set { key: String, value: String },
    /// Write a settings file with defaults if none exists.
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sync { dry_run, show } => {
            let mode = cli.progress.unwrap_or_else(ProgressMode::default_for_tty);
            let reporter = mode.reporter();
            // Failures were already reported through the reporter.
            let options = SyncOptions { dry_run, show };
            let Ok(report) = run_sync(&cfg, options, reporter.as_ref()).await else {
                std::process::exit(1);
            };

            let result = report.result;
            if dry_run {
                println!("sync people (dry-run)");
                println!("  fetched: {} contacts", result.written + result.skipped);
                println!("  would write: {}", result.written);
                println!("  skipped: {}", result.skipped);
                for path in &report.paths {
                    println!("    {}", path);
                }
                for (path, content) in &report.previews {
                    println!();
                    println!("# {}", path);
                    print!("{}", content);
                }
            } else {
                println!("sync people");
                println!("  fetched: {} contacts", result.written + result.skipped);
                println!("  written: {}", result.written);
                println!("  skipped: {}", result.skipped);
                println!("ok");
            }
        }
        Commands::Fields => {
            println!("{:<16} DESCRIPTION", "FIELD");
            for field in Field::ALL {
                println!("{:<16} {}", field.name(), field.description());
            }
        }
        Commands::Template { action } => match action {
            TemplateAction::Show => {
                println!("{}", cfg.template);
            }
            TemplateAction::Reset => {
                cfg.reset_template();
                config::save_config(&cfg, &cli.config)?;
                println!("Template reset to default.");
            }
            TemplateAction::Check => {
                check_template(&cfg);
            }
            TemplateAction::Preview { path } => {
                preview_contact(&cfg, &path)?;
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(&cfg.redacted())?);
            }
            ConfigAction::Set { key, value } => {
                cfg.set(&key, &value)?;
                config::save_config(&cfg, &cli.config)?;
                println!("Updated {}.", key);
            }
            ConfigAction::Init => {
                if cli.config.exists() {
                    println!("Config already exists: {}", cli.config.display());
                } else {
                    config::save_config(&Config::default(), &cli.config)?;
                    println!("Wrote default config to {}", cli.config.display());
                }
            }
        },
    }

    Ok(())
}

fn check_template(cfg: &Config) {
    let placeholders = template_fields(&cfg.template);
    if placeholders.is_empty() {
        println!("Template has no placeholders.");
        return;
    }
    println!("{:<20} STATUS", "PLACEHOLDER");
    for p in &placeholders {
        let status = if p.field.is_some() {
            "ok"
        } else {
            "unknown (renders empty)"
        };
        println!("{:<20} {}", p.name, status);
    }
}

fn preview_contact(cfg: &Config, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let contact: RawContact = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid contact JSON in {}", path.display()))?;

    match normalize_contact(&contact) {
        Some(normalized) => {
            let options = WriteOptions::from_config(cfg);
            println!(
                "# {}",
                contact_file_path(&options.folder, &options.prefix, &normalized)
            );
            print!("{}", render_template(&options.template, &normalized));
        }
        None => {
            println!("Contact has no usable fields; a sync would skip it.");
        }
    }
    Ok(())
}

//! # People Sync
//!
//! Sync Microsoft Graph contacts into markdown notes in a local vault.
//!
//! Each run pages through the `/me/contacts` collection with a bearer
//! token, flattens every contact into a fixed set of fields, renders it
//! through a user template, and creates or overwrites one note per contact.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   ┌─────────┐
//! │ Graph pages │──▶│  Normalize  │──▶│   Template   │──▶│  Vault  │
//! │ (nextLink)  │   │  per item   │   │   render     │   │  notes  │
//! └─────────────┘   └─────────────┘   └──────────────┘   └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! psync config init
//! psync config set access_token eyJ0eXAiOi...
//! psync config set vault.root ~/notes
//! psync sync --dry-run
//! psync sync
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML settings, load and save |
//! | [`models`] | Raw and normalized contact types |
//! | [`connector_graph`] | Paginated Graph fetch |
//! | [`normalize`] | Raw contact → flat fields |
//! | [`template`] | Placeholder rendering |
//! | [`writer`] | File naming and create/overwrite |
//! | [`vault`] | File store trait and implementations |
//! | [`sync`] | One full sync pass |
//! | [`progress`] | Notices and progress output |
//! | [`error`] | Typed sync errors |

pub mod config;
pub mod connector_graph;
pub mod error;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod sync;
pub mod template;
pub mod vault;
pub mod writer;

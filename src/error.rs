//! Typed sync failures.
//!
//! Most of the crate propagates [`anyhow::Error`]. The variants here are the
//! ones callers need to tell apart: a missing token is reported before any
//! network call, and an HTTP failure carries the status and response body.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// No access token in the config file or the environment.
    #[error("no access token configured (set `access_token` or PEOPLE_SYNC_ACCESS_TOKEN)")]
    MissingToken,

    /// The directory API answered with a non-success status.
    #[error("Graph {status}: {body}")]
    Http { status: u16, body: String },
}

impl SyncError {
    /// HTTP status code, if this is a protocol failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            SyncError::Http { status, .. } => Some(*status),
            SyncError::MissingToken => None,
        }
    }
}

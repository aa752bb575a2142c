//! Microsoft Graph contacts connector.
//!
//! Pages through the `/me/contacts` collection with a bearer token and
//! returns every contact as a [`RawContact`], in server order.
//!
//! # Pagination
//!
//! Each response carries its items in `value` and, when more pages exist,
//! an absolute `@odata.nextLink` URL. The connector follows that link until
//! a response arrives without one. Requests are strictly sequential.
//!
//! # Failure
//!
//! Any non-success status aborts the whole fetch with
//! [`SyncError::Http`]; contacts from earlier pages are discarded. There
//! are no retries and no request timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::GraphConfig;
use crate::error::SyncError;
use crate::models::{GraphPage, RawContact};
use crate::progress::{SyncProgressEvent, SyncProgressReporter};

/// Contact properties requested via `$select`.
pub const SELECT_FIELDS: [&str; 9] = [
    "displayName",
    "title",
    "jobTitle",
    "companyName",
    "department",
    "officeLocation",
    "mobilePhone",
    "businessPhones",
    "emailAddresses",
];

/// Fetches one page of a collection.
///
/// [`GraphClient`] is the HTTP implementation; tests substitute scripted
/// pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` with `Authorization: Bearer <token>` and decode the page.
    ///
    /// Must return [`SyncError::Http`] for non-success statuses.
    async fn get_page(&self, url: &str, token: &str) -> Result<GraphPage>;
}

/// reqwest-backed [`PageFetcher`].
pub struct GraphClient {
    client: reqwest::Client,
}

impl GraphClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for GraphClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for GraphClient {
    async fn get_page(&self, url: &str, token: &str) -> Result<GraphPage> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to request {}", url))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Http { status, body }.into());
        }

        let page: GraphPage = resp
            .json()
            .await
            .with_context(|| format!("Invalid JSON page from {}", url))?;
        Ok(page)
    }
}

/// First-page URL: the collection with `$top` and `$select` applied.
pub fn contacts_url(graph: &GraphConfig) -> String {
    let sep = if graph.collection_url.contains('?') {
        '&'
    } else {
        '?'
    };
    format!(
        "{}{}$top={}&$select={}",
        graph.collection_url,
        sep,
        graph.page_size,
        SELECT_FIELDS.join(",")
    )
}

/// Fetch every page starting at `start_url`.
pub async fn fetch_all_contacts(
    fetcher: &dyn PageFetcher,
    start_url: &str,
    token: &str,
    reporter: &dyn SyncProgressReporter,
) -> Result<Vec<RawContact>> {
    let mut all = Vec::new();
    let mut next = Some(start_url.to_string());
    let mut page_no = 0u64;

    while let Some(url) = next.take() {
        page_no += 1;
        let page = fetcher.get_page(&url, token).await?;
        let count = page.value.len() as u64;
        all.extend(page.value);

        reporter.report(SyncProgressEvent::Page {
            page: page_no,
            url,
            count,
            total: all.len() as u64,
        });

        next = page.next_link.filter(|link| !link.is_empty());
    }

    reporter.report(SyncProgressEvent::Loaded {
        total: all.len() as u64,
    });
    Ok(all)
}

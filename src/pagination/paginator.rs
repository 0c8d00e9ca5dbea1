//! Next-URL paginator
//!
//! Explicit cursor over every row of a paginated resource.

use super::types::{extract_rows, NextPage, PaginationState};
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::Row;
use std::collections::VecDeque;
use tracing::debug;
use url::Url;

/// Lazily walks the pages of one resource, row by row
///
/// Rows come out in API order. Each page is fetched with exactly one
/// successful request, and only once the previous page is drained.
#[derive(Debug)]
pub struct Paginator<'a> {
    client: &'a HttpClient,
    resource: String,
    next_url: Option<String>,
    buffer: VecDeque<Row>,
    state: PaginationState,
}

impl<'a> Paginator<'a> {
    /// Start at `base_url` joined with `resource`
    ///
    /// `resource` doubles as the body key holding the rows.
    pub fn new(client: &'a HttpClient, base_url: &Url, resource: &str) -> Result<Self> {
        let start = base_url.join(resource)?;
        Ok(Self::starting_at(client, start.as_str(), resource))
    }

    /// Start at an explicit URL
    pub fn starting_at(client: &'a HttpClient, url: &str, resource: &str) -> Self {
        Self {
            client,
            resource: resource.to_string(),
            next_url: Some(url.to_string()),
            buffer: VecDeque::new(),
            state: PaginationState::new(),
        }
    }

    /// Whether more rows may follow
    ///
    /// True while buffered rows remain or another page is pending. A pending
    /// page can turn out to be empty, so `next_row` may still return `None`.
    pub fn has_next(&self) -> bool {
        !self.buffer.is_empty() || self.next_url.is_some()
    }

    /// Next row, fetching the next page when the buffer runs dry
    pub async fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                self.state.add_row();
                return Ok(Some(row));
            }

            let Some(url) = self.next_url.take() else {
                self.state.mark_done();
                return Ok(None);
            };
            self.fetch_page(&url).await?;
        }
    }

    async fn fetch_page(&mut self, url: &str) -> Result<()> {
        let body = self.client.get_json(url).await?;
        self.buffer = extract_rows(&body, &self.resource)?;
        self.next_url = NextPage::from_body(&body).into_url();
        self.state.add_page();

        debug!(
            "Page {} of {}: {} rows, next page: {}",
            self.state.pages_fetched,
            self.resource,
            self.buffer.len(),
            self.next_url.as_deref().unwrap_or("none")
        );
        Ok(())
    }

    /// Pagination progress
    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    /// Resource being paginated
    pub fn resource(&self) -> &str {
        &self.resource
    }
}

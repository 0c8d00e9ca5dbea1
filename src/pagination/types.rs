//! Pagination types
//!
//! Response-body helpers shared by the paginator: where the rows live and
//! where the next page URL lives.

use crate::error::{Error, Result};
use crate::types::Row;
use serde_json::Value;
use std::collections::VecDeque;

/// Body field holding the URL of the next page
pub const NEXT_PAGE_FIELD: &str = "next_page";

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this URL
    Continue {
        /// URL of the next page, taken verbatim from the body
        url: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Read the next page URL from a response body
    ///
    /// A missing field, `null` or an empty string all end pagination.
    pub fn from_body(body: &Value) -> Self {
        match body.get(NEXT_PAGE_FIELD).and_then(Value::as_str) {
            Some(url) if !url.is_empty() => Self::Continue {
                url: url.to_string(),
            },
            _ => Self::Done,
        }
    }

    /// Take the URL out of a continuation
    pub fn into_url(self) -> Option<String> {
        match self {
            Self::Continue { url } => Some(url),
            Self::Done => None,
        }
    }
}

/// Tracks pagination progress during iteration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Pages fetched so far
    pub pages_fetched: u64,
    /// Rows handed out so far
    pub rows_yielded: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Record a yielded row
    pub fn add_row(&mut self) {
        self.rows_yielded += 1;
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Pull the rows stored under `key` out of a response body
///
/// The key must hold an array of objects; anything else is a decode error.
pub fn extract_rows(body: &Value, key: &str) -> Result<VecDeque<Row>> {
    let entries = body
        .get(key)
        .ok_or_else(|| Error::decode(format!("response has no '{key}' field")))?
        .as_array()
        .ok_or_else(|| Error::decode(format!("response field '{key}' is not an array")))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            Value::Object(row) => Ok(row.clone()),
            other => Err(Error::decode(format!(
                "entry {i} of '{key}' is not an object: {other}"
            ))),
        })
        .collect()
}

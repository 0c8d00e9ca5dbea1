//! Pagination module
//!
//! Follows the `next_page` URL that Airship embeds in each response body.
//!
//! # Overview
//!
//! A [`Paginator`] starts from the entity's resource URL and hands out rows
//! one at a time. A page is only requested once every row of the previous
//! page has been consumed, and the sequence ends on the first response that
//! carries no next-page URL.

mod paginator;
mod types;

pub use paginator::Paginator;
pub use types::{extract_rows, NextPage, PaginationState, NEXT_PAGE_FIELD};

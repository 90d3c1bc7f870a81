//! Pagination module
//!
//! Cursor pagination over the platform's list endpoints.
//!
//! # Overview
//!
//! List endpoints return a [`Page`] holding items and a [`PageInfo`] with
//! an opaque cursor. A [`Paginator`] wraps any page-fetching function and
//! yields items one at a time, fetching the next page only when the
//! current one is exhausted.

mod paginator;
mod types;

pub use paginator::{collect_all, paginate, Paginator};
pub use types::{Page, PageFuture, PageInfo};

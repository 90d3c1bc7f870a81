//! Pagination types
//!
//! Wire shape of a list response: `{ data: [...], pagination: {...} }`.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Cursor metadata attached to every page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Opaque continuation token; meaningless once `has_more` is false
    #[serde(default)]
    pub cursor: Option<String>,
    /// Whether another page follows this one
    #[serde(alias = "hasMore")]
    pub has_more: bool,
    /// Total matching items, when the server reports it
    #[serde(default)]
    pub total: Option<u64>,
}

impl PageInfo {
    /// Metadata for the final page
    pub fn last() -> Self {
        Self::default()
    }

    /// Metadata for a page followed by another at `cursor`
    pub fn next(cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            has_more: true,
            total: None,
        }
    }

    /// Cursor for the next fetch, if one should happen
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.cursor.as_deref()
        } else {
            None
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in server order
    pub data: Vec<T>,
    /// Cursor metadata
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, pagination: PageInfo) -> Self {
        Self { data, pagination }
    }

    /// Whether another page follows
    pub fn has_more(&self) -> bool {
        self.pagination.has_more
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Boxed future returned by resource page fetchers
pub type PageFuture<'a, T> = BoxFuture<'a, Result<Page<T>>>;

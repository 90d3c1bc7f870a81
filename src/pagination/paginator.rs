//! Cursor paginator
//!
//! Turns a page-fetching function into a pull-based sequence of items. No
//! page is requested until every item of the previous page has been handed
//! out and another item is asked for.

use super::types::Page;
use crate::error::{Error, Result};
use futures::Stream;
use std::collections::VecDeque;
use std::future::Future;
use tracing::debug;

/// Lazy item sequence over a cursor-paginated endpoint
///
/// The fetcher receives the cursor of the next page (`None` for the first).
/// Iteration ends once a page reports `has_more = false`; a server that
/// always reports more pages yields an endless sequence. A paginator cannot
/// be rewound: starting over means building a new one, which fetches the
/// first page again.
pub struct Paginator<T, F> {
    fetch: F,
    buffer: VecDeque<T>,
    cursor: Option<String>,
    has_more: bool,
    pages_fetched: usize,
}

impl<T, F> Paginator<T, F> {
    /// Create a paginator positioned before the first page
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            buffer: VecDeque::new(),
            cursor: None,
            has_more: true,
            pages_fetched: 0,
        }
    }

    /// Number of fetch calls issued so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once every item has been yielded and no page remains
    pub fn is_done(&self) -> bool {
        self.buffer.is_empty() && !self.has_more
    }
}

impl<T, F, Fut> Paginator<T, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    /// Pull the next item, fetching a page when the buffer runs dry
    ///
    /// A fetch error is returned once and ends the sequence.
    pub async fn next_item(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            if !self.has_more {
                return Ok(None);
            }

            let cursor = self.cursor.take();
            debug!(
                "Fetching page {} (cursor: {:?})",
                self.pages_fetched + 1,
                cursor
            );

            self.has_more = false;
            let page = (self.fetch)(cursor).await?;
            self.pages_fetched += 1;

            let Page { data, pagination } = page;
            self.cursor = pagination.next_cursor().map(str::to_string);
            self.has_more = pagination.has_more;
            self.buffer.extend(data);
        }
    }

    /// Drain the sequence into a vector, stopping at `max_items` if given
    ///
    /// Pages beyond the one holding the last wanted item are never fetched.
    pub async fn collect(mut self, max_items: Option<usize>) -> Result<Vec<T>> {
        let mut items = Vec::new();

        if max_items == Some(0) {
            return Ok(items);
        }

        while let Some(item) = self.next_item().await? {
            items.push(item);
            if max_items.is_some_and(|max| items.len() >= max) {
                break;
            }
        }

        Ok(items)
    }

    /// Convert into a `Stream` of items
    pub fn into_stream(self) -> impl Stream<Item = Result<T>> {
        futures::stream::try_unfold(self, |mut pager| async move {
            let item = pager.next_item().await?;
            Ok::<_, Error>(item.map(|item| (item, pager)))
        })
    }
}

/// Iterate every item of a paginated endpoint
pub fn paginate<T, F, Fut>(fetch: F) -> Paginator<T, F>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    Paginator::new(fetch)
}

/// Collect items of a paginated endpoint, up to `max_items` if given
pub async fn collect_all<T, F, Fut>(fetch: F, max_items: Option<usize>) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    Paginator::new(fetch).collect(max_items).await
}

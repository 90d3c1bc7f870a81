//! Bills resource

use super::{paginated, ResourcePaginator};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Lifecycle stage of a bill
    pub enum BillStatus {
        Draft => "draft",
        Submitted => "submitted",
        Review => "review",
        Voting => "voting",
        Passed => "passed",
        Rejected => "rejected",
        Enacted => "enacted",
        Sunset => "sunset",
    }
}

wire_enum! {
    /// Kind of change between two bill versions
    pub enum DiffChangeType {
        Added => "added",
        Modified => "modified",
        Removed => "removed",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillAuthor {
    pub id: String,
    pub display_name: String,
}

/// Engagement counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillMetrics {
    pub supporters: u64,
    pub opposers: u64,
    pub comments: u64,
}

/// A bill in the governance system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub status: BillStatus,
    pub category: String,
    pub region: Option<String>,
    pub version: u32,
    pub created_at: String,
    pub updated_at: String,
    pub submitted_at: Option<String>,
    pub voting_ends_at: Option<String>,
    pub author: BillAuthor,
    pub metrics: Option<BillMetrics>,
}

/// Version history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillVersion {
    pub version: u32,
    pub created_at: String,
    pub author: BillAuthor,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDiffChange {
    pub section: String,
    #[serde(rename = "type")]
    pub change_type: DiffChangeType,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Changes between two versions of a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillDiff {
    pub bill_id: String,
    pub from_version: u32,
    pub to_version: u32,
    pub changes: Vec<BillDiffChange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amendment {
    pub id: String,
    pub bill_id: String,
    pub title: String,
    pub status: String,
    pub author: BillAuthor,
    pub created_at: String,
    pub supporters: u64,
}

/// Filters for listing bills; `None` fields are not sent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillFilter {
    pub status: Option<BillStatus>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl BillFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, status: BillStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_request(&self, cursor: Option<&str>) -> RequestConfig {
        RequestConfig::new()
            .query_opt("status", self.status)
            .query_opt("category", self.category.as_deref())
            .query_opt("region", self.region.as_deref())
            .query_opt("search", self.search.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("cursor", cursor)
    }
}

/// Bills API
#[derive(Debug, Clone, Copy)]
pub struct BillsResource<'a> {
    client: &'a HttpClient,
}

impl<'a> BillsResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch one page of bills
    pub async fn list(&self, filter: &BillFilter, cursor: Option<&str>) -> Result<Page<Bill>> {
        self.client
            .get_page("/v1/bills", filter.to_request(cursor))
            .await
    }

    /// Iterate every bill matching `filter`
    pub fn list_all(&self, filter: BillFilter) -> ResourcePaginator<'a, Bill> {
        paginated(self.client, "/v1/bills", move |cursor| {
            filter.to_request(cursor)
        })
    }

    pub async fn get(&self, bill_id: &str) -> Result<Bill> {
        self.client
            .get_data(&format!("/v1/bills/{bill_id}"), RequestConfig::new())
            .await
    }

    /// Version history, oldest first as returned by the server
    pub async fn versions(&self, bill_id: &str) -> Result<Vec<BillVersion>> {
        self.client
            .get_data(&format!("/v1/bills/{bill_id}/versions"), RequestConfig::new())
            .await
    }

    /// Diff between two versions; the server picks defaults for `None`
    pub async fn diff(
        &self,
        bill_id: &str,
        from_version: Option<u32>,
        to_version: Option<u32>,
    ) -> Result<BillDiff> {
        let config = RequestConfig::new()
            .query_opt("fromVersion", from_version)
            .query_opt("toVersion", to_version);
        self.client
            .get_data(&format!("/v1/bills/{bill_id}/diff"), config)
            .await
    }

    /// Fetch one page of amendments for a bill
    pub async fn amendments(
        &self,
        bill_id: &str,
        limit: Option<u32>,
        cursor: Option<&str>,
    ) -> Result<Page<Amendment>> {
        let config = RequestConfig::new()
            .query_opt("limit", limit)
            .query_opt("cursor", cursor);
        self.client
            .get_page(&format!("/v1/bills/{bill_id}/amendments"), config)
            .await
    }

    /// Iterate every amendment for a bill
    pub fn all_amendments(&self, bill_id: &str) -> ResourcePaginator<'a, Amendment> {
        paginated(
            self.client,
            format!("/v1/bills/{bill_id}/amendments"),
            |cursor| RequestConfig::new().query_opt("cursor", cursor),
        )
    }
}

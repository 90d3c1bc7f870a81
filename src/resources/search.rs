//! Search resource

use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageInfo};
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSearchResult {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub status: String,
    pub category: String,
    #[serde(default)]
    pub region: Option<String>,
    pub relevance_score: f64,
    pub highlights: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSearchResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: String,
    #[serde(default)]
    pub parent_name: Option<String>,
    pub relevance_score: f64,
    pub metrics: BTreeMap<String, f64>,
}

/// Query echo and timing returned with search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMeta {
    pub query: String,
    pub total_results: u64,
    pub search_time: f64,
    #[serde(default)]
    pub filters: Option<JsonObject>,
}

/// A page of search results with search metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
    pub meta: SearchMeta,
}

impl<T> SearchPage<T> {
    /// Drop the metadata, keeping the plain page
    pub fn into_page(self) -> Page<T> {
        Page::new(self.data, self.pagination)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u64,
}

#[derive(Debug, Deserialize)]
struct SuggestionList {
    suggestions: Vec<Suggestion>,
}

/// Full-text bill query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillSearch {
    pub query: String,
    pub status: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<u32>,
}

impl BillSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
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

    /// Sort field and direction (`asc` or `desc`)
    #[must_use]
    pub fn sort(mut self, by: impl Into<String>, order: impl Into<String>) -> Self {
        self.sort_by = Some(by.into());
        self.sort_order = Some(order.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_request(&self, cursor: Option<&str>) -> RequestConfig {
        RequestConfig::new()
            .query("query", &self.query)
            .query_opt("status", self.status.as_deref())
            .query_opt("category", self.category.as_deref())
            .query_opt("region", self.region.as_deref())
            .query_opt("sortBy", self.sort_by.as_deref())
            .query_opt("sortOrder", self.sort_order.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("cursor", cursor)
    }
}

/// Region query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSearch {
    pub query: String,
    pub region_type: Option<String>,
    pub limit: Option<u32>,
}

impl RegionSearch {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn region_type(mut self, region_type: impl Into<String>) -> Self {
        self.region_type = Some(region_type.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_request(&self, cursor: Option<&str>) -> RequestConfig {
        RequestConfig::new()
            .query("query", &self.query)
            .query_opt("type", self.region_type.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("cursor", cursor)
    }
}

/// Search API
#[derive(Debug, Clone, Copy)]
pub struct SearchResource<'a> {
    client: &'a HttpClient,
}

impl<'a> SearchResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    pub async fn bills(
        &self,
        search: &BillSearch,
        cursor: Option<&str>,
    ) -> Result<SearchPage<BillSearchResult>> {
        self.client
            .get_json("/v1/search/bills", search.to_request(cursor))
            .await
    }

    pub async fn regions(
        &self,
        search: &RegionSearch,
        cursor: Option<&str>,
    ) -> Result<SearchPage<RegionSearchResult>> {
        self.client
            .get_json("/v1/search/regions", search.to_request(cursor))
            .await
    }

    /// Autocomplete for a partial query
    pub async fn suggestions(&self, query: &str, kind: Option<&str>) -> Result<Vec<Suggestion>> {
        let config = RequestConfig::new()
            .query("query", query)
            .query_opt("type", kind);
        let list: SuggestionList = self
            .client
            .get_data("/v1/search/suggestions", config)
            .await?;
        Ok(list.suggestions)
    }
}

//! Regions resource

use super::{paginated, ResourcePaginator};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Level of a governance region
    pub enum RegionType {
        City => "city",
        County => "county",
        State => "state",
        Federal => "federal",
    }
}

wire_enum! {
    /// Reporting window for metrics endpoints
    pub enum MetricsPeriod {
        Last7Days => "last_7_days",
        Last30Days => "last_30_days",
        Last90Days => "last_90_days",
        LastYear => "last_year",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMetrics {
    pub tbl_score: f64,
    pub participation_rate: f64,
    pub bills_active: u64,
    pub bills_passed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionChild {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: RegionType,
}

/// A governance region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub population: u64,
    pub active_citizens: u64,
    pub metrics: RegionMetrics,
    #[serde(default)]
    pub children: Option<Vec<RegionChild>>,
}

/// Triple Bottom Line scores for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTblScores {
    pub overall: f64,
    pub people: f64,
    pub planet: f64,
    pub profit: f64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationStats {
    pub rate: f64,
    pub active_users: u64,
    pub total_eligible: u64,
    pub trend: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegislationStats {
    pub bills_active: u64,
    pub bills_passed: u64,
    pub bills_rejected: u64,
    pub average_time_to_pass: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceStats {
    pub delegation_rate: f64,
    pub average_comments_per_bill: u64,
    pub citizen_proposal_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalEntry {
    pub date: String,
    pub tbl_score: f64,
    pub participation_rate: f64,
}

/// Full metrics report for a region over a period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedRegionMetrics {
    pub region_id: String,
    pub region_name: String,
    pub period: String,
    pub tbl: RegionTblScores,
    pub participation: ParticipationStats,
    pub legislation: LegislationStats,
    pub governance: GovernanceStats,
    pub historical: Vec<HistoricalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub region_id: String,
    pub region_name: String,
    pub score: f64,
    /// Rank movement since the previous period
    pub change: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentRegion {
    pub id: String,
    pub name: String,
}

/// Ranking of a region's children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub parent_region: ParentRegion,
    pub metric: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Filters for listing regions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionFilter {
    pub region_type: Option<RegionType>,
    pub parent_id: Option<String>,
    pub limit: Option<u32>,
}

impl RegionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn region_type(mut self, region_type: RegionType) -> Self {
        self.region_type = Some(region_type);
        self
    }

    #[must_use]
    pub fn parent_id(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn to_request(&self, cursor: Option<&str>) -> RequestConfig {
        RequestConfig::new()
            .query_opt("type", self.region_type)
            .query_opt("parentId", self.parent_id.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("cursor", cursor)
    }
}

/// Regions API
#[derive(Debug, Clone, Copy)]
pub struct RegionsResource<'a> {
    client: &'a HttpClient,
}

impl<'a> RegionsResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch one page of regions
    pub async fn list(&self, filter: &RegionFilter, cursor: Option<&str>) -> Result<Page<Region>> {
        self.client
            .get_page("/v1/regions", filter.to_request(cursor))
            .await
    }

    /// Iterate every region matching `filter`
    pub fn list_all(&self, filter: RegionFilter) -> ResourcePaginator<'a, Region> {
        paginated(self.client, "/v1/regions", move |cursor| {
            filter.to_request(cursor)
        })
    }

    /// A region, including its children
    pub async fn get(&self, region_id: &str) -> Result<Region> {
        self.client
            .get_data(&format!("/v1/regions/{region_id}"), RequestConfig::new())
            .await
    }

    /// Detailed metrics; `metrics` selects which groups to include
    pub async fn metrics(
        &self,
        region_id: &str,
        metrics: Option<&[&str]>,
        period: Option<MetricsPeriod>,
    ) -> Result<DetailedRegionMetrics> {
        let config = RequestConfig::new()
            .query_list("metrics", metrics)
            .query_opt("period", period);
        self.client
            .get_data(&format!("/v1/regions/{region_id}/metrics"), config)
            .await
    }

    /// Ranking of the child regions of `region_id`
    pub async fn leaderboard(&self, region_id: &str, metric: Option<&str>) -> Result<Leaderboard> {
        self.client
            .get_data(
                &format!("/v1/regions/{region_id}/leaderboard"),
                RequestConfig::new().query_opt("metric", metric),
            )
            .await
    }

    /// First page of regions under `parent_id`
    pub async fn children(&self, parent_id: &str) -> Result<Vec<Region>> {
        let filter = RegionFilter::new().parent_id(parent_id);
        Ok(self.list(&filter, None).await?.data)
    }
}

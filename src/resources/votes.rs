//! Votes resource

use super::{paginated, ResourcePaginator};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::Page;
use serde::{Deserialize, Serialize};

wire_enum! {
    /// Voting session state
    pub enum VoteSessionStatus {
        Scheduled => "scheduled",
        Active => "active",
        Ended => "ended",
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
}

impl VoteTally {
    pub fn total(&self) -> u64 {
        self.yes + self.no + self.abstain
    }
}

/// A voting session for a bill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteSession {
    pub id: String,
    pub bill_id: String,
    pub status: VoteSessionStatus,
    pub started_at: String,
    pub ends_at: String,
    pub tally: VoteTally,
    pub participation_rate: f64,
    pub quorum_met: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalTally {
    pub region_id: String,
    pub region_name: String,
    pub tally: VoteTally,
    pub participation_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeGroupTally {
    pub group: String,
    pub yes: u64,
    pub no: u64,
    pub abstain: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemographicBreakdown {
    pub age_groups: Vec<AgeGroupTally>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub timestamp: String,
    pub cumulative_votes: u64,
}

/// Tally with regional, demographic and timeline breakdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedTally {
    pub session_id: String,
    pub bill_id: String,
    pub overall: VoteTally,
    pub participation_rate: f64,
    pub quorum_met: bool,
    pub total_eligible_voters: u64,
    pub total_votes_cast: u64,
    pub by_region: Vec<RegionalTally>,
    #[serde(default)]
    pub by_demographic: Option<DemographicBreakdown>,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub sessions: u64,
    pub avg_participation: f64,
}

/// Platform-wide voting statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingStatistics {
    pub period: String,
    pub total_sessions: u64,
    pub active_sessions: u64,
    pub completed_sessions: u64,
    pub average_participation_rate: f64,
    pub average_votes_per_session: u64,
    pub pass_rate: f64,
    pub top_categories: Vec<CategoryStats>,
}

/// Filters for listing voting sessions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilter {
    pub status: Option<VoteSessionStatus>,
    pub bill_id: Option<String>,
    pub limit: Option<u32>,
}

impl SessionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn status(mut self, status: VoteSessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn bill_id(mut self, bill_id: impl Into<String>) -> Self {
        self.bill_id = Some(bill_id.into());
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
            .query_opt("billId", self.bill_id.as_deref())
            .query_opt("limit", self.limit)
            .query_opt("cursor", cursor)
    }
}

/// Votes API
#[derive(Debug, Clone, Copy)]
pub struct VotesResource<'a> {
    client: &'a HttpClient,
}

impl<'a> VotesResource<'a> {
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Fetch one page of voting sessions
    pub async fn list_sessions(
        &self,
        filter: &SessionFilter,
        cursor: Option<&str>,
    ) -> Result<Page<VoteSession>> {
        self.client
            .get_page("/v1/votes/sessions", filter.to_request(cursor))
            .await
    }

    /// Iterate every voting session matching `filter`
    pub fn list_all_sessions(&self, filter: SessionFilter) -> ResourcePaginator<'a, VoteSession> {
        paginated(self.client, "/v1/votes/sessions", move |cursor| {
            filter.to_request(cursor)
        })
    }

    pub async fn get_session(&self, session_id: &str) -> Result<VoteSession> {
        self.client
            .get_data(&format!("/v1/votes/sessions/{session_id}"), RequestConfig::new())
            .await
    }

    pub async fn tally(&self, session_id: &str) -> Result<DetailedTally> {
        self.client
            .get_data(
                &format!("/v1/votes/sessions/{session_id}/tally"),
                RequestConfig::new(),
            )
            .await
    }

    /// Overall statistics, optionally for a named period
    pub async fn statistics(&self, period: Option<&str>) -> Result<VotingStatistics> {
        self.client
            .get_data(
                "/v1/votes/statistics",
                RequestConfig::new().query_opt("period", period),
            )
            .await
    }

    /// The voting session attached to a bill, if any
    pub async fn session_for_bill(&self, bill_id: &str) -> Result<Option<VoteSession>> {
        let filter = SessionFilter::new().bill_id(bill_id).limit(1);
        let page = self.list_sessions(&filter, None).await?;
        Ok(page.data.into_iter().next())
    }
}

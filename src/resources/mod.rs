//! API resources
//!
//! Typed wrappers over the platform's REST endpoints. Each resource borrows
//! the [`HttpClient`] and builds fixed request shapes; list endpoints also
//! expose a `*_all` variant returning a [`ResourcePaginator`].

/// Declare a string-valued enum used both on the wire and as a query value
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Wire name
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(format!(
                        concat!("unknown ", stringify!($name), " '{}'"),
                        other
                    )),
                }
            }
        }
    };
}

mod bills;
mod metrics;
mod regions;
mod search;
mod votes;
mod webhooks;

pub use bills::{
    Amendment, Bill, BillAuthor, BillDiff, BillDiffChange, BillFilter, BillMetrics, BillStatus,
    BillVersion, BillsResource, DiffChangeType,
};
pub use metrics::{
    ComparisonData, ComparisonResult, GovernanceMetrics, LegislationOverview, MetricsResource,
    ParticipationOverview, PlatformOverview, PlatformStats, TblComponent, TblMetrics,
    TblOverview, TblScores, TblTrends, TopPerformer,
};
pub use regions::{
    DetailedRegionMetrics, GovernanceStats, HistoricalEntry, Leaderboard, LeaderboardEntry,
    LegislationStats, MetricsPeriod, ParentRegion, ParticipationStats, Region, RegionChild,
    RegionFilter, RegionMetrics, RegionTblScores, RegionType, RegionsResource,
};
pub use search::{
    BillSearch, BillSearchResult, RegionSearch, RegionSearchResult, SearchMeta, SearchPage,
    SearchResource, Suggestion,
};
pub use votes::{
    AgeGroupTally, CategoryStats, DemographicBreakdown, DetailedTally, RegionalTally,
    SessionFilter, TimelineEntry, VoteSession, VoteSessionStatus, VoteTally, VotesResource,
    VotingStatistics,
};
pub use webhooks::{Webhook, WebhookDelivery, WebhookEventInfo, WebhookUpdate, WebhooksResource};

use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{PageFuture, Paginator};
use serde::de::DeserializeOwned;

/// Boxed page fetcher driven by a [`ResourcePaginator`]
pub type BoxedFetcher<'a, T> = Box<dyn FnMut(Option<String>) -> PageFuture<'a, T> + Send + 'a>;

/// Paginator returned by the `*_all` resource methods
pub type ResourcePaginator<'a, T> = Paginator<T, BoxedFetcher<'a, T>>;

/// Paginate `path`, building each page's request from the cursor
pub(crate) fn paginated<'a, T, Q>(
    client: &'a HttpClient,
    path: impl Into<String>,
    request: Q,
) -> ResourcePaginator<'a, T>
where
    T: DeserializeOwned + Send + 'a,
    Q: Fn(Option<&str>) -> RequestConfig + Send + 'a,
{
    let path = path.into();
    let fetch: BoxedFetcher<'a, T> = Box::new(move |cursor: Option<String>| -> PageFuture<'a, T> {
        let config = request(cursor.as_deref());
        let path = path.clone();
        Box::pin(async move { client.get_page(&path, config).await })
    });
    Paginator::new(fetch)
}

#[cfg(test)]
mod tests;

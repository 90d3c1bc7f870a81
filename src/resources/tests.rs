//! Tests for the API resources

use super::*;
use crate::error::ErrorKind;
use crate::http::HttpClientConfig;
use crate::webhook::{signature_header, WebhookEvent};
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .backoff(Duration::from_millis(10), Duration::from_millis(50))
        .build();
    HttpClient::new(config).unwrap()
}

fn author() -> Value {
    json!({ "id": "u1", "display_name": "Ada" })
}

fn bill(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Bill {id}"),
        "summary": "A bill",
        "status": "voting",
        "category": "infrastructure",
        "region": "region-1",
        "version": 2,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "submitted_at": null,
        "voting_ends_at": null,
        "author": author(),
        "metrics": { "supporters": 10, "opposers": 2, "comments": 5 }
    })
}

fn session(id: &str, bill_id: &str) -> Value {
    json!({
        "id": id,
        "bill_id": bill_id,
        "status": "active",
        "started_at": "2024-01-01T00:00:00Z",
        "ends_at": "2024-01-08T00:00:00Z",
        "tally": { "yes": 5, "no": 3, "abstain": 1 },
        "participation_rate": 0.42,
        "quorum_met": true
    })
}

fn region(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Region {id}"),
        "type": "city",
        "parent_id": "state-1",
        "population": 1000,
        "active_citizens": 250,
        "metrics": {
            "tbl_score": 71.5,
            "participation_rate": 0.25,
            "bills_active": 3,
            "bills_passed": 9
        }
    })
}

fn webhook(active: bool) -> Value {
    json!({
        "id": "wh1",
        "url": "https://example.com/hook",
        "events": ["bill.created"],
        "secret": "whsec",
        "is_active": active,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z"
    })
}

/// Query string of the `n`th request the server received
async fn query_of(server: &MockServer, n: usize) -> Option<String> {
    let requests: Vec<Request> = server.received_requests().await.unwrap();
    requests[n].url.query().map(str::to_string)
}

// ============================================================================
// Wire enums
// ============================================================================

#[test]
fn test_wire_enum_names() {
    assert_eq!(BillStatus::Voting.as_str(), "voting");
    assert_eq!(MetricsPeriod::Last30Days.to_string(), "last_30_days");
    assert_eq!("federal".parse::<RegionType>().unwrap(), RegionType::Federal);
    assert_eq!(
        serde_json::to_value(VoteSessionStatus::Ended).unwrap(),
        json!("ended")
    );

    let err = "archived".parse::<BillStatus>().unwrap_err();
    assert!(err.contains("BillStatus"));
}

// ============================================================================
// Bills
// ============================================================================

#[tokio::test]
async fn test_bills_list_sends_only_present_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [bill("b1")],
            "pagination": { "cursor": "c1", "hasMore": true, "total": 7 }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filter = BillFilter::new().status(BillStatus::Voting).limit(10);
    let page = BillsResource::new(&client)
        .list(&filter, None)
        .await
        .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page.data[0].status, BillStatus::Voting);
    assert_eq!(page.pagination.next_cursor(), Some("c1"));
    assert_eq!(page.pagination.total, Some(7));
    assert_eq!(
        query_of(&server, 0).await.as_deref(),
        Some("status=voting&limit=10")
    );
}

#[tokio::test]
async fn test_bills_list_all_follows_cursor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills"))
        .and(query_param("cursor", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [bill("b3")],
            "pagination": { "has_more": false }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [bill("b1"), bill("b2")],
            "pagination": { "cursor": "c1", "has_more": true }
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filter = BillFilter::new().category("infrastructure");
    let mut pager = BillsResource::new(&client).list_all(filter);

    let mut ids = Vec::new();
    while let Some(bill) = pager.next_item().await.unwrap() {
        ids.push(bill.id);
    }

    assert_eq!(ids, vec!["b1", "b2", "b3"]);
    assert_eq!(pager.pages_fetched(), 2);
    assert_eq!(
        query_of(&server, 1).await.as_deref(),
        Some("category=infrastructure&cursor=c1")
    );
}

#[tokio::test]
async fn test_bills_get_unwraps_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": bill("b1") })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bill = BillsResource::new(&client).get("b1").await.unwrap();

    assert_eq!(bill.id, "b1");
    assert_eq!(bill.author.display_name, "Ada");
    assert_eq!(bill.metrics.unwrap().supporters, 10);
}

#[tokio::test]
async fn test_bills_get_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills/nope"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = BillsResource::new(&client).get("nope").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_bills_diff_versions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills/b1/diff"))
        .and(query_param("fromVersion", "1"))
        .and(query_param("toVersion", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "bill_id": "b1",
                "from_version": 1,
                "to_version": 2,
                "changes": [
                    { "section": "2.1", "type": "modified", "before": "old", "after": "new" },
                    { "section": "3", "type": "added", "before": null, "after": "text" }
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let diff = BillsResource::new(&client)
        .diff("b1", Some(1), Some(2))
        .await
        .unwrap();

    assert_eq!(diff.changes.len(), 2);
    assert_eq!(diff.changes[0].change_type, DiffChangeType::Modified);
    assert_eq!(diff.changes[1].before, None);
}

#[tokio::test]
async fn test_bills_versions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/bills/b1/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "version": 1, "created_at": "2024-01-01", "author": author(), "summary": "first" },
                { "version": 2, "created_at": "2024-02-01", "author": author(), "summary": "second" }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let versions = BillsResource::new(&client).versions("b1").await.unwrap();

    let numbers: Vec<u32> = versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[tokio::test]
async fn test_bills_all_amendments_collect() {
    let server = MockServer::start().await;
    let amendment = |id: &str| {
        json!({
            "id": id,
            "bill_id": "b1",
            "title": "Amend",
            "status": "proposed",
            "author": author(),
            "created_at": "2024-01-01",
            "supporters": 3
        })
    };
    Mock::given(method("GET"))
        .and(path("/api/v1/bills/b1/amendments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [amendment("a1"), amendment("a2")],
            "pagination": { "cursor": "next", "has_more": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items = BillsResource::new(&client)
        .all_amendments("b1")
        .collect(Some(2))
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].id, "a2");
}

// ============================================================================
// Votes
// ============================================================================

#[tokio::test]
async fn test_votes_session_for_bill() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/votes/sessions"))
        .and(query_param("billId", "b1"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [session("s1", "b1")],
            "pagination": { "has_more": false }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = VotesResource::new(&client)
        .session_for_bill("b1")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.id, "s1");
    assert_eq!(found.tally.total(), 9);
}

#[tokio::test]
async fn test_votes_session_for_bill_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/votes/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "pagination": { "has_more": false }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let found = VotesResource::new(&client)
        .session_for_bill("b9")
        .await
        .unwrap();

    assert_eq!(found, None);
}

#[tokio::test]
async fn test_votes_tally_without_demographics() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/votes/sessions/s1/tally"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "session_id": "s1",
                "bill_id": "b1",
                "overall": { "yes": 10, "no": 4, "abstain": 1 },
                "participation_rate": 0.6,
                "quorum_met": true,
                "total_eligible_voters": 25,
                "total_votes_cast": 15,
                "by_region": [{
                    "region_id": "r1",
                    "region_name": "North",
                    "tally": { "yes": 10, "no": 4, "abstain": 1 },
                    "participation_rate": 0.6
                }],
                "timeline": [{ "timestamp": "2024-01-01T00:00:00Z", "cumulative_votes": 15 }]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tally = VotesResource::new(&client).tally("s1").await.unwrap();

    assert_eq!(tally.overall.yes, 10);
    assert_eq!(tally.by_demographic, None);
    assert_eq!(tally.by_region[0].region_name, "North");
}

#[tokio::test]
async fn test_votes_list_all_sessions_stream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/votes/sessions"))
        .and(query_param("status", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [session("s1", "b1"), session("s2", "b2")],
            "pagination": { "has_more": false }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let filter = SessionFilter::new().status(VoteSessionStatus::Active);
    let sessions: Vec<VoteSession> = VotesResource::new(&client)
        .list_all_sessions(filter)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    assert_eq!(sessions.len(), 2);
}

// ============================================================================
// Regions
// ============================================================================

#[tokio::test]
async fn test_regions_metrics_joins_list_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/regions/r1/metrics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "region_id": "r1",
                "region_name": "North",
                "period": "last_30_days",
                "tbl": { "overall": 70.0, "people": 71.0, "planet": 69.0, "profit": 70.0, "trend": "up" },
                "participation": { "rate": 0.3, "active_users": 30, "total_eligible": 100, "trend": "flat" },
                "legislation": {
                    "bills_active": 2, "bills_passed": 5, "bills_rejected": 1,
                    "average_time_to_pass": "14d"
                },
                "governance": {
                    "delegation_rate": 0.1,
                    "average_comments_per_bill": 12,
                    "citizen_proposal_rate": 0.05
                },
                "historical": []
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let metrics = RegionsResource::new(&client)
        .metrics("r1", Some(&["tbl", "participation"]), Some(MetricsPeriod::Last30Days))
        .await
        .unwrap();

    assert_eq!(metrics.tbl.trend, "up");
    assert_eq!(
        query_of(&server, 0).await.as_deref(),
        Some("metrics=tbl%2Cparticipation&period=last_30_days")
    );
}

#[tokio::test]
async fn test_regions_children_filters_by_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/regions"))
        .and(query_param("parentId", "state-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [region("c1"), region("c2")],
            "pagination": { "has_more": false }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let children = RegionsResource::new(&client)
        .children("state-1")
        .await
        .unwrap();

    assert_eq!(children.len(), 2);
    assert_eq!(children[0].region_type, RegionType::City);
    assert_eq!(children[0].children, None);
}

#[tokio::test]
async fn test_regions_leaderboard() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/regions/state-1/leaderboard"))
        .and(query_param("metric", "tbl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "parent_region": { "id": "state-1", "name": "State" },
                "metric": "tbl",
                "leaderboard": [
                    { "rank": 1, "region_id": "c1", "region_name": "A", "score": 90.0, "change": 2 },
                    { "rank": 2, "region_id": "c2", "region_name": "B", "score": 80.0, "change": -1 }
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let board = RegionsResource::new(&client)
        .leaderboard("state-1", Some("tbl"))
        .await
        .unwrap();

    assert_eq!(board.parent_region.name, "State");
    assert_eq!(board.leaderboard[1].change, -1);
}

// ============================================================================
// Metrics
// ============================================================================

#[tokio::test]
async fn test_metrics_compare_joins_regions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/metrics/compare"))
        .and(query_param("regions", "r1,r2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "regions": ["r1", "r2"],
                "metrics": ["tbl"],
                "data": [
                    { "region_id": "r1", "region_name": "A", "values": { "tbl": 70.5 } },
                    { "region_id": "r2", "region_name": "B", "values": { "tbl": 65.0 } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = MetricsResource::new(&client)
        .compare(&["r1", "r2"], None)
        .await
        .unwrap();

    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[0].values["tbl"], 70.5);
    assert_eq!(query_of(&server, 0).await.as_deref(), Some("regions=r1%2Cr2"));
}

#[tokio::test]
async fn test_metrics_region_tbl_sets_region_id() {
    let server = MockServer::start().await;
    let component = json!({ "score": 70.0, "components": { "health": 72.0 } });
    Mock::given(method("GET"))
        .and(path("/api/v1/metrics/tbl"))
        .and(query_param("regionId", "r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "period": "last_7_days",
                "region_id": "r1",
                "scores": {
                    "overall": 70.0,
                    "people": component,
                    "planet": component,
                    "profit": component
                },
                "trends": { "weekly": [69.0, 70.0], "monthly": [68.0] },
                "top_performers": [{ "region_id": "r1", "name": "A", "score": 70.0 }]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tbl = MetricsResource::new(&client)
        .region_tbl("r1", None)
        .await
        .unwrap();

    assert_eq!(tbl.scores.people.components["health"], 72.0);
    assert_eq!(tbl.trends.weekly.len(), 2);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_bills_carries_meta() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search/bills"))
        .and(query_param("query", "parks"))
        .and(query_param("sortBy", "relevance"))
        .and(query_param("sortOrder", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "b1",
                "title": "Parks",
                "summary": "More parks",
                "status": "voting",
                "category": "environment",
                "relevance_score": 0.9,
                "highlights": ["<em>parks</em>"],
                "created_at": "2024-01-01"
            }],
            "pagination": { "has_more": false },
            "meta": { "query": "parks", "total_results": 1, "search_time": 0.012 }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let search = BillSearch::new("parks").sort("relevance", "desc");
    let results = SearchResource::new(&client)
        .bills(&search, None)
        .await
        .unwrap();

    assert_eq!(results.meta.total_results, 1);
    assert_eq!(results.data[0].region, None);

    let page = results.into_page();
    assert!(!page.has_more());
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_search_suggestions_unwraps_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/search/suggestions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "suggestions": [
                    { "text": "parks", "type": "bill", "count": 4 },
                    { "text": "parking", "type": "bill", "count": 2 }
                ]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let suggestions = SearchResource::new(&client)
        .suggestions("par", None)
        .await
        .unwrap();

    let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["parks", "parking"]);
    assert_eq!(query_of(&server, 0).await.as_deref(), Some("query=par"));
}

// ============================================================================
// Webhooks
// ============================================================================

#[test]
fn test_webhook_update_serializes_present_fields() {
    let update = WebhookUpdate::new().active(false);
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "isActive": false }));

    let update = WebhookUpdate::new()
        .url("https://example.com/new")
        .events([WebhookEvent::BillPassed]);
    assert_eq!(
        serde_json::to_value(&update).unwrap(),
        json!({ "url": "https://example.com/new", "events": ["bill.passed"] })
    );
}

#[tokio::test]
async fn test_webhooks_create_posts_events() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/webhooks"))
        .and(body_json(json!({
            "url": "https://example.com/hook",
            "events": ["bill.created", "vote.session_ended"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": webhook(true) })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let created = WebhooksResource::new(&client)
        .create(
            "https://example.com/hook",
            &[WebhookEvent::BillCreated, WebhookEvent::VoteSessionEnded],
        )
        .await
        .unwrap();

    assert_eq!(created.secret, "whsec");
    assert!(created.is_active);
}

#[tokio::test]
async fn test_webhooks_disable_puts_is_active() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/webhooks/wh1"))
        .and(body_json(json!({ "isActive": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": webhook(false) })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let updated = WebhooksResource::new(&client).disable("wh1").await.unwrap();

    assert!(!updated.is_active);
}

#[tokio::test]
async fn test_webhooks_delete_accepts_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/webhooks/wh1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    WebhooksResource::new(&client).delete("wh1").await.unwrap();
}

#[tokio::test]
async fn test_webhooks_deliveries_and_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/webhooks/wh1/deliveries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": "d1",
                "webhook_id": "wh1",
                "event_id": "e1",
                "status": "failed",
                "attempts": 3,
                "response": { "status": 500 }
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/webhooks/events/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "event": "bill.created", "description": "A bill was created" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let hooks = WebhooksResource::new(&client);

    let deliveries = hooks.deliveries("wh1").await.unwrap();
    assert_eq!(deliveries[0].attempts, 3);
    assert_eq!(deliveries[0].last_attempt_at, None);

    let events = hooks.list_events().await.unwrap();
    assert_eq!(events[0].event, "bill.created");
}

#[test]
fn test_webhooks_verify_signature_delegates() {
    let now = chrono::Utc::now().timestamp();
    let header = signature_header(r#"{"event":"bill.created"}"#, "whsec", now);

    assert!(WebhooksResource::verify_signature(
        r#"{"event":"bill.created"}"#,
        &header,
        "whsec",
        300
    ));
    assert!(!WebhooksResource::verify_signature(
        r#"{"event":"bill.passed"}"#,
        &header,
        "whsec",
        300
    ));
}

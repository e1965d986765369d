//! Refetches entity data from the remote API and reshapes it into a snapshot.

mod client;
pub mod transform;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use client::EntityApiClient;
pub use transform::{RawEntity, filter_relevant, transform};

use crate::error::GraphResult;
use crate::graph::Snapshot;

/// Keywords that mark a record as part of the Gilligan universe
pub const DEFAULT_KEYWORDS: [&str; 12] = [
    "pluribus",
    "breaking bad",
    "better call saul",
    "vince gilligan",
    "el camino",
    "x-files",
    "rhea seehorn",
    "carol sturka",
    "kim wexler",
    "walter white",
    "saul goodman",
    "jimmy mcgill",
];

/// A paginated source of vendor entity records
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Fetch one page. `Ok(None)` means the response carried no entity list.
    async fn fetch_page(&self, page: usize, limit: usize) -> GraphResult<Option<Vec<RawEntity>>>;
}

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    ShortPage,
    MissingEntities,
    PageError,
    PageCap,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub entities: Vec<RawEntity>,
    /// Requests made, including a failed final one
    pub pages: usize,
    pub stop: StopReason,
}

/// Page through the source until a short page, a malformed page, an error,
/// or `max_pages` pages have been read.
///
/// Errors are logged and end pagination; records from earlier pages are kept.
pub async fn fetch_all(source: &dyn EntitySource, limit: usize, max_pages: usize) -> FetchOutcome {
    let mut entities = Vec::new();
    let mut page = 1;
    let mut pages = 0;

    let stop = loop {
        if page > max_pages {
            tracing::warn!(
                "Stopped after {} pages; the API kept returning full pages",
                max_pages
            );
            break StopReason::PageCap;
        }

        let result = source.fetch_page(page, limit).await;
        pages += 1;
        match result {
            Ok(Some(batch)) => {
                let full = batch.len() == limit;
                entities.extend(batch);
                tracing::info!("Fetched {} entities so far...", entities.len());
                if !full {
                    break StopReason::ShortPage;
                }
                page += 1;
            }
            Ok(None) => break StopReason::MissingEntities,
            Err(e) => {
                tracing::error!("Error fetching page {}: {}", page, e);
                break StopReason::PageError;
            }
        }
    };

    FetchOutcome {
        entities,
        pages,
        stop,
    }
}

/// Filter, transform and assemble fetched records into a snapshot
pub fn build_snapshot(entities: Vec<RawEntity>, keywords: &[String], today: NaiveDate) -> Snapshot {
    let relevant = filter_relevant(entities, keywords);
    let (nodes, links) = transform(&relevant);
    Snapshot::new(nodes, links, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::NodeType;
    use serde_json::json;
    use std::sync::Mutex;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct ScriptedSource {
        pages: Mutex<Vec<GraphResult<Option<Vec<RawEntity>>>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new(mut pages: Vec<GraphResult<Option<Vec<RawEntity>>>>) -> Self {
            pages.reverse();
            Self {
                pages: Mutex::new(pages),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl EntitySource for ScriptedSource {
        async fn fetch_page(&self, _page: usize, limit: usize) -> GraphResult<Option<Vec<RawEntity>>> {
            *self.calls.lock().unwrap() += 1;
            self.pages
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Some(full_page(limit))))
        }
    }

    fn full_page(n: usize) -> Vec<RawEntity> {
        (0..n)
            .map(|i| RawEntity {
                name: Some(format!("Pluribus extra {}", i)),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let source = ScriptedSource::new(vec![Ok(Some(full_page(2))), Ok(Some(full_page(1)))]);
        let outcome = fetch_all(&source, 2, 50).await;
        assert_eq!(outcome.entities.len(), 3);
        assert_eq!(outcome.stop, StopReason::ShortPage);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_page_error_keeps_partial_results() {
        let source = ScriptedSource::new(vec![
            Ok(Some(full_page(2))),
            Err(GraphError::Status {
                status: 500,
                body: "boom".to_string(),
            }),
        ]);
        let outcome = fetch_all(&source, 2, 50).await;
        assert_eq!(outcome.entities.len(), 2);
        assert_eq!(outcome.stop, StopReason::PageError);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_entities_stops() {
        let source = ScriptedSource::new(vec![Ok(None)]);
        let outcome = fetch_all(&source, 2, 50).await;
        assert!(outcome.entities.is_empty());
        assert_eq!(outcome.stop, StopReason::MissingEntities);
    }

    #[tokio::test]
    async fn test_page_cap_bounds_endless_full_pages() {
        let source = ScriptedSource::new(vec![]);
        let outcome = fetch_all(&source, 3, 4).await;
        assert_eq!(outcome.stop, StopReason::PageCap);
        assert_eq!(source.calls(), 4);
        assert_eq!(outcome.pages, 4);
        assert_eq!(outcome.entities.len(), 12);
    }

    #[tokio::test]
    async fn test_api_client_paginates_against_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .and(query_param("page", "1"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [
                    {"id": "vince-gilligan", "name": "Vince Gilligan", "type": "director"},
                    {"id": "pluribus", "name": "Pluribus", "type": "tv-series"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [{"id": "cooking", "name": "Cooking Show", "type": "show"}]
            })))
            .mount(&server)
            .await;

        let client = EntityApiClient::new(&format!("{}/", server.uri()));
        let outcome = fetch_all(&client, 2, 10).await;
        assert_eq!(outcome.entities.len(), 3);
        assert_eq!(outcome.stop, StopReason::ShortPage);

        let keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let snapshot = build_snapshot(outcome.entities, &keywords, today);
        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.metadata.entity_count, 2);
        assert_eq!(snapshot.nodes[0].node_type, NodeType::Creator);
        assert_eq!(snapshot.metadata.last_updated, today);
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_drop_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [
                    {"id": 42, "name": "Pluribus pilot", "type": "episode"},
                    "stray",
                    {"id": "pluribus", "name": "Pluribus", "type": "tv-series"}
                ]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "entities": [{"id": "kim-wexler", "name": "Kim Wexler", "type": "character"}]
            })))
            .mount(&server)
            .await;

        let client = EntityApiClient::new(&server.uri());
        let outcome = fetch_all(&client, 3, 10).await;
        assert_eq!(outcome.stop, StopReason::ShortPage);
        assert_eq!(outcome.pages, 2);
        assert_eq!(outcome.entities.len(), 4);
        assert_eq!(outcome.entities[0].id.as_deref(), Some("42"));

        let keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let snapshot = build_snapshot(outcome.entities, &keywords, today);
        let ids: Vec<&str> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["42", "pluribus", "kim-wexler"]);
    }

    #[tokio::test]
    async fn test_api_client_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let client = EntityApiClient::new(&server.uri());
        let err = client.fetch_page(1, 100).await.unwrap_err();
        match err {
            GraphError::Status { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_api_client_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/entities"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = EntityApiClient::new(&server.uri());
        let err = client.fetch_page(1, 100).await.unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }
}

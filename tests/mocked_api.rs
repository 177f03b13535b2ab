//! Integration tests against a mocked INSPIRE literature endpoint.
//!
//! These tests exercise the request/response path without real API calls.

use std::time::Duration;

use inspire_client::{
    Author, InspireClient, InspireError, PublicationListOptions, PublicationType, Record,
    RecordFilter, SearchParams, Sort,
};
use serde_json::{json, Value};
use tracing_test::traced_test;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_mock_client(mock_server: &MockServer) -> InspireClient {
    InspireClient::new()
        .with_base_url(mock_server.uri())
        .with_rate_limit(100.0)
}

fn weinberg_1967() -> Value {
    json!({"metadata": {
        "texkeys": ["Weinberg:1967tq"],
        "titles": [{"title": "A Model of Leptons"}],
        "authors": [{"full_name": "Weinberg, Steven", "bai": "S.Weinberg.1"}],
        "publication_info": [{
            "journal_title": "Phys.Rev.Lett.",
            "journal_volume": "19",
            "page_start": "1264",
            "page_end": "1266",
            "year": 1967
        }],
        "dois": [{"value": "10.1103/PhysRevLett.19.1264"}],
        "document_type": ["article"],
        "earliest_date": "1967-11-20",
        "citation_count": 14000,
        "citation_count_without_self_citations": 13950
    }})
}

fn weinberg_preprint() -> Value {
    json!({"metadata": {
        "texkeys": ["Weinberg:2020xyz"],
        "titles": [{"title": "Models of Lepton and Quark Masses"}],
        "authors": [{"full_name": "Weinberg, Steven", "bai": "S.Weinberg.1"}],
        "arxiv_eprints": [{"value": "2001.06582", "categories": ["hep-th"]}],
        "document_type": ["article"],
        "earliest_date": "2020-01-17",
        "citation_count": 7,
        "citation_count_without_self_citations": 6
    }})
}

fn literature_body(hits: Vec<Value>, total: u64) -> Value {
    json!({"hits": {"hits": hits, "total": total}})
}

async fn mount_literature(mock_server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/literature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

#[tokio::test]
#[traced_test]
async fn test_author_fetch_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .and(query_param("sort", "mostrecent"))
        .and(query_param("size", "25"))
        .and(query_param("q", "a Steven.Weinberg.1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(literature_body(vec![weinberg_preprint(), weinberg_1967()], 2)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let author = Author::fetch_with_limit(&client, "Steven.Weinberg.1", 25)
        .await
        .expect("author fetch should succeed");

    assert_eq!(author.len(), 2);
    assert!(!author.is_truncated());
    assert_eq!(author.total_citations(), 14007);
    assert_eq!(author.total_citations_without_self(), 13956);

    let counts = author.publication_counts();
    assert_eq!(counts.get(PublicationType::Published), 1);
    assert_eq!(counts.get(PublicationType::Preprint), 1);
    assert_eq!(counts.total(), 2);

    // The records list the author as "S.Weinberg.1"; the query form still resolves to them.
    assert!(author.coauthors(&RecordFilter::new()).is_empty());
}

#[tokio::test]
#[traced_test]
async fn test_author_truncation_is_logged() {
    let mock_server = MockServer::start().await;
    mount_literature(&mock_server, literature_body(vec![weinberg_1967()], 340)).await;

    let client = create_mock_client(&mock_server);
    let author = Author::fetch_with_limit(&client, "Steven.Weinberg.1", 1)
        .await
        .unwrap();

    assert!(author.is_truncated());
    assert_eq!(author.total_hits(), 340);
    assert!(logs_contain("truncated"));
}

#[tokio::test]
async fn test_unknown_author_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_literature(&mock_server, literature_body(vec![], 0)).await;

    let client = create_mock_client(&mock_server);
    let err = Author::fetch(&client, "Nobody.At.All.1").await.unwrap_err();

    assert!(matches!(err, InspireError::NotFound(_)));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_record_fetch_by_texkey() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .and(query_param("q", "texkeys:Weinberg:1967tq"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(literature_body(vec![weinberg_1967()], 1)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let record = Record::fetch(&client, "Weinberg:1967tq").await.unwrap();

    assert_eq!(record.texkey(), "Weinberg:1967tq");
    assert_eq!(record.title(), Some("A Model of Leptons"));
    assert_eq!(record.citation_count(), 14000);
    assert!(record.is_peer_reviewed());
    assert_eq!(
        record.display().unwrap(),
        "Weinberg, Phys.Rev.Lett. 19 (1967), 1967."
    );

    let bibtex = record.bibtex();
    assert!(bibtex.starts_with("@article{Weinberg:1967tq,"));
    assert!(bibtex.contains("pages = {1264--1266}"));
    assert!(bibtex.contains("doi = {10.1103/PhysRevLett.19.1264}"));
}

#[tokio::test]
async fn test_unknown_texkey_is_not_found() {
    let mock_server = MockServer::start().await;
    mount_literature(&mock_server, literature_body(vec![], 0)).await;

    let client = create_mock_client(&mock_server);
    let err = Record::fetch(&client, "Nobody:2000xx").await.unwrap_err();

    assert!(matches!(err, InspireError::NotFound(_)));
}

#[tokio::test]
async fn test_server_error_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = Record::fetch(&client, "Weinberg:1967tq").await.unwrap_err();

    match &err {
        InspireError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "internal error");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    assert!(err.is_network());
}

#[tokio::test]
#[traced_test]
async fn test_rate_limited_reports_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = Author::fetch(&client, "Steven.Weinberg.1").await.unwrap_err();

    match err {
        InspireError::RateLimited { retry_after } => {
            assert_eq!(retry_after, Some(Duration::from_secs(1)));
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
}

#[tokio::test]
async fn test_garbage_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = Author::fetch(&client, "Steven.Weinberg.1").await.unwrap_err();

    assert!(matches!(err, InspireError::Parse(_)));
}

#[tokio::test]
async fn test_hit_without_texkey_fails_author_construction() {
    let mock_server = MockServer::start().await;
    let broken = json!({"metadata": {"titles": [{"title": "Untitled"}]}});
    mount_literature(&mock_server, literature_body(vec![weinberg_1967(), broken], 2)).await;

    let client = create_mock_client(&mock_server);
    let err = Author::fetch(&client, "Steven.Weinberg.1").await.unwrap_err();

    match err {
        InspireError::MissingField(field) => assert_eq!(field, "texkeys"),
        other => panic!("expected MissingField, got {:?}", other),
    }
}

#[tokio::test]
async fn test_split_publication_list_from_api() {
    let mock_server = MockServer::start().await;
    mount_literature(
        &mock_server,
        literature_body(vec![weinberg_preprint(), weinberg_1967()], 2),
    )
    .await;

    let client = create_mock_client(&mock_server);
    let author = Author::fetch(&client, "Steven.Weinberg.1").await.unwrap();

    let options = PublicationListOptions {
        split_peer_review: true,
        ..Default::default()
    };
    let list = author.nice_publication_list(&options).unwrap();

    let reviewed = list.find("Peer-reviewed publications").unwrap();
    let other = list
        .find("Under review or non-peer reviewed publications")
        .unwrap();
    let leptons = list.find("A Model of Leptons").unwrap();
    let masses = list.find("Models of Lepton and Quark Masses").unwrap();

    assert!(reviewed < leptons && leptons < other);
    assert!(other < masses);
    assert!(list.contains("[citations: 14000]"));
}

#[tokio::test]
async fn test_search_literature_with_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .and(query_param("sort", "mostcited"))
        .and(query_param("size", "5"))
        .and(query_param("q", "t \"leptons\""))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(literature_body(vec![weinberg_1967()], 812)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let params = SearchParams::new("t \"leptons\"")
        .with_sort(Sort::MostCited)
        .with_size(5);
    let response = client.search_literature(&params).await.unwrap();

    assert_eq!(response.total, 812);
    assert_eq!(response.hits.len(), 1);
}

#[tokio::test]
async fn test_fetch_bibtex_requests_bibtex_format() {
    let mock_server = MockServer::start().await;
    let body = "@article{Weinberg:1967tq,\n    author = \"Weinberg, Steven\",\n}\n";

    Mock::given(method("GET"))
        .and(path("/literature"))
        .and(query_param("q", "texkeys:Weinberg:1967tq"))
        .and(query_param("format", "bibtex"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let bibtex = client.fetch_bibtex("Weinberg:1967tq").await.unwrap();

    assert_eq!(bibtex, body);
}

#[tokio::test]
async fn test_fetch_bibtex_empty_body_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/literature"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\n"))
        .mount(&mock_server)
        .await;

    let client = create_mock_client(&mock_server);
    let err = client.fetch_bibtex("Nobody:2000xx").await.unwrap_err();

    assert!(matches!(err, InspireError::NotFound(_)));
}

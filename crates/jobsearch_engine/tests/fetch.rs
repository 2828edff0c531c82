use std::time::{Duration, Instant};

use jobsearch_engine::{FailureKind, FetchSettings, JobsClient, ReqwestJobsClient};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CORPUS: &str = r#"{
    "jobs": [
        {"id": "1", "title": "Backend Engineer", "category": "Remote", "source": "remotive"},
        {"id": "2", "title": "Driver", "category": "On-site", "source": "adzuna"}
    ],
    "stats": {"total_jobs": 2},
    "remoteAuthoritative": false
}"#;

fn client_for(server: &MockServer) -> ReqwestJobsClient {
    client_with(server, FetchSettings::default())
}

fn client_with(server: &MockServer, settings: FetchSettings) -> ReqwestJobsClient {
    ReqwestJobsClient::new(FetchSettings {
        base_url: server.uri(),
        ..settings
    })
    .expect("client")
}

#[tokio::test]
async fn master_fetch_sends_no_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .and(query_param_is_missing("query"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CORPUS, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .fetch_jobs(None, &CancellationToken::new())
        .await
        .expect("fetch ok");

    assert!(!payload.remote_authoritative);
    let titles: Vec<_> = payload.jobs.iter().map(|job| job.title.as_str()).collect();
    assert_eq!(titles, vec!["Backend Engineer", "Driver"]);
    assert_eq!(payload.stats.map(|stats| stats.total_jobs), Some(2));
}

#[tokio::test]
async fn search_sends_query_and_reads_authoritative_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .and(query_param("query", "data engineer"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"jobs": [{"dedup_key": "r-1", "title": "Data Engineer"}], "ai_powered": true}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client_for(&server)
        .fetch_jobs(Some("data engineer"), &CancellationToken::new())
        .await
        .expect("fetch ok");

    assert!(payload.remote_authoritative);
    assert_eq!(payload.jobs.len(), 1);
    assert_eq!(payload.jobs[0].id, "r-1");
}

#[tokio::test]
async fn non_success_status_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_jobs(Some("x"), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert!(!err.is_cancelled());
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw(CORPUS, "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let err = client_with(&server, settings)
        .fetch_jobs(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn cancellation_is_reported_distinctly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(3))
                .set_body_raw(CORPUS, "application/json"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = client.fetch_jobs(Some("x"), &token).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
    assert!(err.is_cancelled());
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn already_cancelled_token_short_circuits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CORPUS, "application/json"))
        .expect(0)
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    token.cancel();
    let err = client_for(&server)
        .fetch_jobs(None, &token)
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Cancelled);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CORPUS, "application/json"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let err = client_with(&server, settings)
        .fetch_jobs(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 16, .. }
    ));
}

#[tokio::test]
async fn undecodable_body_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html/>", "text/html"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .fetch_jobs(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

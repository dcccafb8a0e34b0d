// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::*;
use axum::http::StatusCode;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use weibo_search::application::use_cases::run_search::RunSearchUseCase;
use weibo_search::config::settings::Settings;
use weibo_search::infrastructure::browser::RecordingOpener;
use weibo_search::presentation::handlers::search_handler::SearchState;
use weibo_search::presentation::routes;
use wiremock::MockServer;

struct TestApp {
    server: TestServer,
    opener: Arc<RecordingOpener>,
    shutdown: Arc<Notify>,
}

fn create_test_app(settings: Settings) -> TestApp {
    let opener = Arc::new(RecordingOpener::new());
    let shutdown = Arc::new(Notify::new());
    let use_case = RunSearchUseCase::new(settings, opener.clone());
    let app = routes::routes(Arc::new(SearchState::new(use_case, shutdown.clone())));

    TestApp {
        server: TestServer::new(app).unwrap(),
        opener,
        shutdown,
    }
}

#[tokio::test]
async fn test_index_serves_form() {
    let site = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let app = create_test_app(test_settings(&site, output.path()));

    let response = app.server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("微博关键词搜索"));
    assert!(body.contains(r#"action="/run""#));
    assert!(body.contains(r#"value="2025-10-01""#));
}

#[tokio::test]
async fn test_unknown_paths_are_not_found() {
    let site = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let app = create_test_app(test_settings(&site, output.path()));

    let response = app.server.get("/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Not Found");

    app.server
        .get("/run")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_weibo_type_is_bad_request() {
    let site = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let app = create_test_app(test_settings(&site, output.path()));

    let response = app
        .server
        .post("/run")
        .form(&[("keywords", KEYWORD), ("weibo_type", "原创")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(site.received_requests().await.unwrap().is_empty());
    assert!(app.opener.opened().is_empty());
}

#[tokio::test]
async fn test_form_rejection_is_json_error() {
    let site = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();
    let app = create_test_app(test_settings(&site, output.path()));

    let response = app.server.post("/run").text("keywords=东南大学").await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(site.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_runs_do_not_overlap() {
    // 每次爬取请求两个搜索页，各延迟 DELAY
    const DELAY: Duration = Duration::from_millis(300);

    let site = MockServer::start().await;
    mount_slow_two_page_search(&site, DELAY).await;
    mount_ip_lookup(&site, "江苏").await;
    let output = tempfile::tempdir().unwrap();
    let app = create_test_app(test_settings(&site, output.path()));

    let form = [("keywords", KEYWORD), ("region", "全部")];
    let started = Instant::now();
    let (first, second) = tokio::join!(
        async { app.server.post("/run").form(&form).await },
        async { app.server.post("/run").form(&form).await },
    );
    let elapsed = started.elapsed();

    first.assert_status_ok();
    second.assert_status_ok();
    assert!(
        elapsed >= DELAY * 4,
        "crawls overlapped: both finished in {elapsed:?}"
    );

    let search_requests = site
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/weibo")
        .count();
    assert_eq!(search_requests, 4);
    assert_eq!(app.opener.opened().len(), 2);
}

#[tokio::test]
async fn test_run_crawls_opens_result_and_schedules_shutdown() {
    let site = MockServer::start().await;
    mount_two_page_search(&site).await;
    mount_ip_lookup(&site, "江苏").await;
    let output = tempfile::tempdir().unwrap();

    let mut settings = test_settings(&site, output.path());
    settings.search.keyword_list = vec!["配置中的关键词".to_string()];
    let app = create_test_app(settings);

    let response = app
        .server
        .post("/run")
        .form(&[
            ("keywords", KEYWORD),
            ("start_date", "2025-10-27"),
            ("end_date", "2025-10-28"),
            ("weibo_type", "1"),
            ("contain_type", "0"),
            ("region", "全部"),
        ])
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "爬取完成，请关闭此页面。");
    assert!(response
        .header("content-type")
        .to_str()
        .unwrap()
        .starts_with("text/plain"));

    let opened = app.opener.opened();
    assert_eq!(opened.len(), 1);
    let url = url::Url::parse(&opened[0]).unwrap();
    assert_eq!(url.scheme(), "file");
    let csv = url.to_file_path().unwrap();
    assert!(csv.ends_with("东南大学/东南大学.csv"));
    assert!(csv.is_file());

    tokio::time::timeout(Duration::from_secs(5), app.shutdown.notified())
        .await
        .expect("shutdown should be signalled after the crawl");
}

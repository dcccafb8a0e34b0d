// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::*;
use weibo_search::application::use_cases::run_search::run_crawl;
use weibo_search::infrastructure::pipelines::csv_pipeline::csv_path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_crawl_writes_csv_with_ip_location() {
    let site = MockServer::start().await;
    mount_two_page_search(&site).await;
    mount_ip_lookup(&site, "江苏").await;
    let output = tempfile::tempdir().unwrap();

    let settings = test_settings(&site, output.path());
    let summary = run_crawl(&settings).await.unwrap();

    assert_eq!(summary.requests, 2);
    assert_eq!(summary.failed_requests, 0);
    assert_eq!(summary.items_stored, 4);

    let bytes = std::fs::read(csv_path(output.path(), KEYWORD)).unwrap();
    let mut reader = csv::Reader::from_reader(&bytes[3..]);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    let ids: Vec<&str> = rows.iter().map(|r| &r[0]).collect();
    assert_eq!(ids, vec!["5001", "4999", "5002", "5003"]);
    assert!(rows.iter().all(|r| &r[17] == "江苏"));
    assert_eq!(&rows[2][16], "4999");
}

#[tokio::test]
async fn test_crawl_with_sqlite_and_without_ip_lookup() {
    let site = MockServer::start().await;
    mount_two_page_search(&site).await;
    let output = tempfile::tempdir().unwrap();

    let mut settings = test_settings(&site, output.path());
    settings.search.fetch_ip_location = false;
    let database = output.path().join("weibo.db");
    settings.pipelines.sqlite_database = Some(database.to_string_lossy().into_owned());

    let summary = run_crawl(&settings).await.unwrap();

    assert_eq!(summary.items_stored, 4);
    assert!(database.exists());
    let requests = site.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r| r.url.path() != "/ajax/statuses/show"));
}

#[tokio::test]
async fn test_truncated_results_are_split_by_day() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weibo"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .with_priority(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/weibo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_PAGE))
        .mount(&site)
        .await;
    let output = tempfile::tempdir().unwrap();

    let mut settings = test_settings(&site, output.path());
    settings.search.further_threshold = 3;
    settings.search.fetch_ip_location = false;

    let summary = run_crawl(&settings).await.unwrap();
    assert_eq!(summary.requests, 3);
    assert_eq!(summary.items_stored, 0);

    let timescopes: Vec<String> = site
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "timescope")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(
        timescopes,
        vec![
            "custom:2025-10-27-0:2025-10-29-0",
            "custom:2025-10-27-0:2025-10-28-0",
            "custom:2025-10-28-0:2025-10-29-0",
        ]
    );
}

#[tokio::test]
async fn test_limit_result() {
    let site = MockServer::start().await;
    mount_two_page_search(&site).await;
    let output = tempfile::tempdir().unwrap();

    let mut settings = test_settings(&site, output.path());
    settings.search.fetch_ip_location = false;
    settings.search.limit_result = 3;

    let summary = run_crawl(&settings).await.unwrap();
    assert_eq!(summary.items_stored, 3);
    assert!(summary.limit_reached);
}

#[tokio::test]
async fn test_invalid_date_range_is_rejected() {
    let site = MockServer::start().await;
    let output = tempfile::tempdir().unwrap();

    let mut settings = test_settings(&site, output.path());
    settings.search.start_date = Some("2025-10-29".to_string());

    let err = run_crawl(&settings).await.unwrap_err();
    assert!(err.to_string().contains("2025-10-29"));
    assert!(site.received_requests().await.unwrap().is_empty());
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::Path;
use std::time::Duration;
use weibo_search::config::settings::Settings;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SEARCH_PAGE: &str = include_str!("../fixtures/search_page.html");
pub const EMPTY_PAGE: &str = include_str!("../fixtures/empty_page.html");
pub const KEYWORD: &str = "东南大学";

/// 指向模拟站点、不等待、不重试的配置
pub fn test_settings(site: &MockServer, output_dir: &Path) -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.server.host = "127.0.0.1".to_string();
    settings.server.port = 0;
    settings.server.open_browser = false;
    settings.search.keyword_list = vec![KEYWORD.to_string()];
    settings.search.start_date = Some("2025-10-27".to_string());
    settings.search.end_date = Some("2025-10-28".to_string());
    settings.search.base_url = site.uri();
    settings.search.ip_api_base = site.uri();
    settings.http.download_delay_secs = 0.0;
    settings.http.retry_times = 0;
    settings.pipelines.output_dir = output_dir.to_string_lossy().into_owned();
    settings
}

/// 第一页有 4 条微博，第二页为空
pub async fn mount_two_page_search(site: &MockServer) {
    mount_slow_two_page_search(site, Duration::ZERO).await;
}

/// 同上，每个搜索页都延迟 `delay` 才返回
pub async fn mount_slow_two_page_search(site: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/weibo"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(EMPTY_PAGE)
                .set_delay(delay),
        )
        .with_priority(1)
        .mount(site)
        .await;
    Mock::given(method("GET"))
        .and(path("/weibo"))
        .and(query_param("q", KEYWORD))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(SEARCH_PAGE)
                .set_delay(delay),
        )
        .mount(site)
        .await;
}

pub async fn mount_ip_lookup(site: &MockServer, region: &str) {
    Mock::given(method("GET"))
        .and(path("/ajax/statuses/show"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"{{"ok":1,"region_name":"发布于 {region}"}}"#)),
        )
        .mount(site)
        .await;
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;
use crate::domain::models::region::{find_province, PROVINCES};
use crate::domain::models::search_params::{ContainType, WeiboType};

const SEARCH_PAGE: &str = include_str!("../../tests/fixtures/search_page.html");
const EMPTY_PAGE: &str = include_str!("../../tests/fixtures/empty_page.html");

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> NaiveDateTime {
    date(2025, 10, 28).and_hms_opt(12, 30, 0).unwrap()
}

fn params(threshold: usize) -> SearchParams {
    SearchParams {
        keywords: vec!["东南大学".to_string()],
        weibo_type: WeiboType::Original,
        contain_type: ContainType::Any,
        regions: PROVINCES.iter().collect(),
        filter_by_region: false,
        start_date: date(2025, 10, 27),
        end_date: date(2025, 10, 28),
        further_threshold: threshold,
        limit_result: 0,
    }
}

fn spider(threshold: usize) -> SearchSpider {
    SearchSpider::new(params(threshold), "https://s.weibo.com/")
}

const KEYWORD_URL: &str = "https://s.weibo.com/weibo?q=%E4%B8%9C%E5%8D%97%E5%A4%A7%E5%AD%A6";

#[test]
fn test_scope_formatting() {
    assert_eq!(day_scope(date(2025, 10, 1)), "2025-10-01-0");
    assert_eq!(hour_scope(date(2025, 10, 1), 7), "2025-10-01-7");
    assert_eq!(hour_scope(date(2025, 10, 31), 24), "2025-11-01-0");
}

#[test]
fn test_start_request_without_region() {
    let requests = spider(46).start_requests();

    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        format!("{KEYWORD_URL}&scope=ori&suball=1&timescope=custom:2025-10-27-0:2025-10-29-0")
    );
    assert_eq!(
        requests[0].level,
        SearchLevel::Range {
            base_url: KEYWORD_URL.to_string(),
            province: None,
        }
    );
}

#[test]
fn test_start_requests_per_province() {
    let mut params = params(46);
    let jiangsu = find_province("江苏").unwrap();
    params.regions = vec![jiangsu, find_province("上海").unwrap()];
    params.filter_by_region = true;
    let spider = SearchSpider::new(params, "https://s.weibo.com");

    let requests = spider.start_requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url,
        format!(
            "{KEYWORD_URL}&region=custom:32:1000&scope=ori&suball=1&timescope=custom:2025-10-27-0:2025-10-29-0"
        )
    );
    assert!(matches!(
        requests[0].level,
        SearchLevel::Range { province: Some(p), .. } if p.name == "江苏"
    ));
}

#[test]
fn test_empty_page_yields_nothing() {
    let spider = spider(46);
    let request = spider.start_requests().remove(0);

    let output = spider.parse(&request, EMPTY_PAGE, now());
    assert!(output.items.is_empty());
    assert!(output.requests.is_empty());
}

#[test]
fn test_complete_page_parses_items_and_next_page() {
    let spider = spider(46);
    let request = spider.start_requests().remove(0);

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.items.len(), 4);
    assert_eq!(output.requests.len(), 1);
    assert_eq!(
        output.requests[0].url,
        "https://s.weibo.com/weibo?q=%E4%B8%9C%E5%8D%97%E5%A4%A7%E5%AD%A6&page=2"
    );
    assert_eq!(output.requests[0].level, SearchLevel::Page);
}

#[test]
fn test_truncated_range_splits_into_days() {
    let spider = spider(3);
    let request = spider.start_requests().remove(0);

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert!(output.items.is_empty());
    let urls: Vec<_> = output.requests.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{KEYWORD_URL}&scope=ori&suball=1&timescope=custom:2025-10-27-0:2025-10-28-0&page=1"),
            format!("{KEYWORD_URL}&scope=ori&suball=1&timescope=custom:2025-10-28-0:2025-10-29-0&page=1"),
        ]
    );
}

#[test]
fn test_truncated_day_splits_into_hours() {
    let spider = spider(3);
    let request = SearchRequest::new(
        "unused",
        "东南大学",
        SearchLevel::Day {
            base_url: KEYWORD_URL.to_string(),
            province: None,
            date: date(2025, 10, 27),
        },
    );

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.requests.len(), 24);
    assert!(output.requests[0]
        .url
        .ends_with("&timescope=custom:2025-10-27-0:2025-10-27-1&page=1"));
    assert!(output.requests[23]
        .url
        .ends_with("&timescope=custom:2025-10-27-23:2025-10-28-0&page=1"));
    assert!(matches!(output.requests[5].level, SearchLevel::Hour { .. }));
}

#[test]
fn test_truncated_day_with_province_goes_to_city_level() {
    let spider = spider(3);
    let jiangsu = find_province("江苏").unwrap();
    let request = SearchRequest::new(
        "unused",
        "东南大学",
        SearchLevel::Day {
            base_url: format!("{KEYWORD_URL}&region=custom:32:1000"),
            province: Some(jiangsu),
            date: date(2025, 10, 27),
        },
    );

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.requests.len(), 24);
    assert!(matches!(
        output.requests[0].level,
        SearchLevel::HourProvince { province, .. } if province.code == "32"
    ));
}

#[test]
fn test_truncated_hour_splits_into_provinces() {
    let spider = spider(3);
    let request = SearchRequest::new(
        "unused",
        "东南大学",
        SearchLevel::Hour {
            start: "2025-10-27-8".to_string(),
            end: "2025-10-27-9".to_string(),
        },
    );

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.requests.len(), PROVINCES.len());
    let jiangsu = output
        .requests
        .iter()
        .find(|r| {
            matches!(
                r.level,
                SearchLevel::HourProvince { province, .. } if province.name == "江苏"
            )
        })
        .unwrap();
    assert_eq!(
        jiangsu.url,
        format!(
            "{KEYWORD_URL}&region=custom:32:1000&scope=ori&suball=1&timescope=custom:2025-10-27-8:2025-10-27-9&page=1"
        )
    );
}

#[test]
fn test_truncated_hour_province_splits_into_cities() {
    let spider = spider(3);
    let jiangsu = find_province("江苏").unwrap();
    let request = SearchRequest::new(
        "unused",
        "东南大学",
        SearchLevel::HourProvince {
            start: "2025-10-27-8".to_string(),
            end: "2025-10-27-9".to_string(),
            province: jiangsu,
        },
    );

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.requests.len(), jiangsu.cities.len());
    assert!(output.requests[0].url.contains("&region=custom:32:1&"));
    assert!(output.requests.iter().all(|r| r.level == SearchLevel::Page));
}

#[test]
fn test_truncated_province_without_cities_is_parsed() {
    let spider = spider(3);
    let other = find_province("其他").unwrap();
    let request = SearchRequest::new(
        "unused",
        "东南大学",
        SearchLevel::HourProvince {
            start: "2025-10-27-8".to_string(),
            end: "2025-10-27-9".to_string(),
            province: other,
        },
    );

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.items.len(), 4);
    assert_eq!(output.requests.len(), 1);
}

#[test]
fn test_truncated_plain_page_is_parsed() {
    let spider = spider(3);
    let request = SearchRequest::new("unused", "东南大学", SearchLevel::Page);

    let output = spider.parse(&request, SEARCH_PAGE, now());
    assert_eq!(output.items.len(), 4);
}

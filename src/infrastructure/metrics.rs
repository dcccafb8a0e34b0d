// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::describe_counter;

pub const REQUESTS_TOTAL: &str = "weibo_requests_total";
pub const REQUEST_FAILURES_TOTAL: &str = "weibo_request_failures_total";
pub const ITEMS_SCRAPED_TOTAL: &str = "weibo_items_scraped_total";
pub const ITEMS_DROPPED_TOTAL: &str = "weibo_items_dropped_total";

/// 注册爬取相关指标的说明
///
/// 未安装 recorder 时指标调用为空操作
pub fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of search page requests sent");
    describe_counter!(
        REQUEST_FAILURES_TOTAL,
        "Total number of search page requests that failed after retries"
    );
    describe_counter!(
        ITEMS_SCRAPED_TOTAL,
        "Total number of weibo items that passed all pipelines"
    );
    describe_counter!(
        ITEMS_DROPPED_TOTAL,
        "Total number of weibo items dropped by a pipeline"
    );
}

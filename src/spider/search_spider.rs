// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_params::SearchParams;
use crate::spider::parser::{next_page_href, page_state, parse_weibos, PageState};
use crate::spider::request::{ParseOutput, SearchLevel, SearchRequest};
use chrono::{Days, NaiveDate, NaiveDateTime};
use scraper::Html;
use tracing::{debug, info};

/// 按省搜索时表示不限城市的代码
const WHOLE_PROVINCE: &str = "1000";

/// 微博关键词搜索爬虫
///
/// 结果页数达到阈值时依次按天、小时、省、城市细分搜索条件，以尽量取全结果
pub struct SearchSpider {
    params: SearchParams,
    base_url: String,
}

impl SearchSpider {
    pub fn new(params: SearchParams, base_url: &str) -> Self {
        Self {
            params,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// 起始请求：每个关键词一个，按地区筛选时每个关键词每个省一个
    pub fn start_requests(&self) -> Vec<SearchRequest> {
        let start = day_scope(self.params.start_date);
        let end = day_scope(next_day(self.params.end_date));
        let mut requests = Vec::new();

        for keyword in &self.params.keywords {
            if !self.params.filter_by_region {
                let base_url = self.keyword_url(keyword);
                let url = self.scoped(&base_url, &start, &end, false);
                requests.push(SearchRequest::new(
                    url,
                    keyword,
                    SearchLevel::Range {
                        base_url,
                        province: None,
                    },
                ));
            } else {
                for &province in &self.params.regions {
                    let base_url = self.region_url(keyword, province.code, WHOLE_PROVINCE);
                    let url = self.scoped(&base_url, &start, &end, false);
                    requests.push(SearchRequest::new(
                        url,
                        keyword,
                        SearchLevel::Range {
                            base_url,
                            province: Some(province),
                        },
                    ));
                }
            }
        }
        requests
    }

    /// 解析一个搜索页
    pub fn parse(&self, request: &SearchRequest, html: &str, now: NaiveDateTime) -> ParseOutput {
        let document = Html::parse_document(html);
        let keyword = request.keyword.as_str();

        match page_state(&document, self.params.further_threshold) {
            PageState::Empty => {
                info!(keyword, url = %request.url, "当前页面搜索结果为空");
                ParseOutput::default()
            }
            PageState::Complete => self.parse_page(&document, keyword, now),
            PageState::Truncated => {
                debug!(keyword, url = %request.url, "结果页数达到阈值，细分搜索条件");
                self.subdivide(&document, request, now)
            }
        }
    }

    fn subdivide(
        &self,
        document: &Html,
        request: &SearchRequest,
        now: NaiveDateTime,
    ) -> ParseOutput {
        let keyword = request.keyword.as_str();
        let mut output = ParseOutput::default();

        match &request.level {
            SearchLevel::Range { base_url, province } => {
                let days = self
                    .params
                    .start_date
                    .iter_days()
                    .take_while(|d| *d <= self.params.end_date);
                for date in days {
                    let url =
                        self.scoped(base_url, &day_scope(date), &day_scope(next_day(date)), true);
                    output.requests.push(SearchRequest::new(
                        url,
                        keyword,
                        SearchLevel::Day {
                            base_url: base_url.clone(),
                            province: *province,
                            date,
                        },
                    ));
                }
            }
            SearchLevel::Day {
                base_url,
                province,
                date,
            } => {
                for hour in 0..24 {
                    let start = hour_scope(*date, hour);
                    let end = hour_scope(*date, hour + 1);
                    let url = self.scoped(base_url, &start, &end, true);
                    let level = match *province {
                        Some(province) => SearchLevel::HourProvince {
                            start,
                            end,
                            province,
                        },
                        None => SearchLevel::Hour { start, end },
                    };
                    output.requests.push(SearchRequest::new(url, keyword, level));
                }
            }
            SearchLevel::Hour { start, end } => {
                for &province in &self.params.regions {
                    let base_url = self.region_url(keyword, province.code, WHOLE_PROVINCE);
                    let url = self.scoped(&base_url, start, end, true);
                    output.requests.push(SearchRequest::new(
                        url,
                        keyword,
                        SearchLevel::HourProvince {
                            start: start.clone(),
                            end: end.clone(),
                            province,
                        },
                    ));
                }
            }
            SearchLevel::HourProvince {
                start,
                end,
                province,
            } if !province.cities.is_empty() => {
                for city in province.cities {
                    let base_url = self.region_url(keyword, province.code, city.code);
                    let url = self.scoped(&base_url, start, end, true);
                    output
                        .requests
                        .push(SearchRequest::new(url, keyword, SearchLevel::Page));
                }
            }
            // no finer subdivision available
            SearchLevel::HourProvince { .. } | SearchLevel::Page => {
                output = self.parse_page(document, keyword, now);
            }
        }
        output
    }

    fn parse_page(&self, document: &Html, keyword: &str, now: NaiveDateTime) -> ParseOutput {
        let items = parse_weibos(document, keyword, now);
        let requests = next_page_href(document)
            .map(|href| {
                let url = if href.starts_with("http") {
                    href
                } else {
                    format!("{}{}", self.base_url, href)
                };
                vec![SearchRequest::new(url, keyword, SearchLevel::Page)]
            })
            .unwrap_or_default();

        ParseOutput { items, requests }
    }

    fn keyword_url(&self, keyword: &str) -> String {
        format!("{}/weibo?q={}", self.base_url, urlencoding::encode(keyword))
    }

    fn region_url(&self, keyword: &str, province_code: &str, city_code: &str) -> String {
        format!(
            "{}&region=custom:{}:{}",
            self.keyword_url(keyword),
            province_code,
            city_code
        )
    }

    fn scoped(&self, base_url: &str, start: &str, end: &str, first_page: bool) -> String {
        let mut url = format!(
            "{}{}&timescope=custom:{}:{}",
            base_url,
            self.params.filter_fragment(),
            start,
            end
        );
        if first_page {
            url.push_str("&page=1");
        }
        url
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// 以天为单位的时间范围端点，形如 2025-10-27-0
pub fn day_scope(date: NaiveDate) -> String {
    format!("{}-0", date.format("%Y-%m-%d"))
}

/// 以小时为单位的时间范围端点，小时不补零；第 24 小时记为次日 0 时
pub fn hour_scope(date: NaiveDate, hour: u32) -> String {
    if hour >= 24 {
        day_scope(next_day(date))
    } else {
        format!("{}-{}", date.format("%Y-%m-%d"), hour)
    }
}

#[cfg(test)]
#[path = "search_spider_test.rs"]
mod tests;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::region::Province;
use crate::domain::models::weibo::ScrapedWeibo;
use chrono::NaiveDate;

/// 搜索请求所处的细分层级，决定结果被截断时如何继续拆分
#[derive(Debug, Clone, PartialEq)]
pub enum SearchLevel {
    /// 整个日期范围，截断时按天拆分
    Range {
        base_url: String,
        province: Option<&'static Province>,
    },
    /// 单日，截断时按小时拆分
    Day {
        base_url: String,
        province: Option<&'static Province>,
        date: NaiveDate,
    },
    /// 单小时，截断时按省拆分
    Hour { start: String, end: String },
    /// 单小时单省，截断时按城市拆分
    HourProvince {
        start: String,
        end: String,
        province: &'static Province,
    },
    /// 普通结果页，只解析和翻页
    Page,
}

/// 一个待下载的搜索页
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub url: String,
    pub keyword: String,
    pub level: SearchLevel,
}

impl SearchRequest {
    pub fn new(url: impl Into<String>, keyword: impl Into<String>, level: SearchLevel) -> Self {
        Self {
            url: url.into(),
            keyword: keyword.into(),
            level,
        }
    }
}

/// 解析一个页面的产出
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub items: Vec<ScrapedWeibo>,
    pub requests: Vec<SearchRequest>,
}

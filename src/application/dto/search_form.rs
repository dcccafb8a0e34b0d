// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::domain::models::region::ALL_REGIONS;
use crate::utils::errors::SearchError;
use serde::{Deserialize, Serialize};

/// 表单未填写起始日期时使用的日期
pub const DEFAULT_START_DATE: &str = "2025-10-01";
/// 表单未填写结束日期时使用的日期
pub const DEFAULT_END_DATE: &str = "2025-10-28";

/// 网页表单提交的搜索条件
///
/// 所有字段都是可选的，空白字段按未填写处理
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct SearchFormDto {
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub weibo_type: Option<String>,
    #[serde(default)]
    pub contain_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// 表单解析后需要覆盖到配置上的值
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOverrides {
    /// 为空时保留配置中的关键词
    pub keywords: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub weibo_type: u8,
    pub contain_type: u8,
    /// `None` 表示保留配置中的地区
    pub regions: Option<Vec<String>>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_code(field: &str, value: &Option<String>) -> Result<u8, SearchError> {
    match non_blank(value) {
        Some(v) => v
            .parse::<u8>()
            .map_err(|_| SearchError::InvalidParameter(format!("{field}={v}"))),
        None => Ok(0),
    }
}

impl SearchFormDto {
    /// 校验表单并转换为配置覆盖项
    ///
    /// 每个非空行是一个关键词，行内空格保留（表示同时包含多个词）
    pub fn into_overrides(self) -> Result<SearchOverrides, SearchError> {
        let keywords = non_blank(&self.keywords)
            .map(|raw| {
                raw.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let weibo_type = parse_code("weibo_type", &self.weibo_type)?;
        let contain_type = parse_code("contain_type", &self.contain_type)?;

        let region_list: Vec<String> = non_blank(&self.region)
            .map(|raw| {
                raw.split([',', '，'])
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let regions = match region_list.as_slice() {
            [] => None,
            [only] if only == ALL_REGIONS => None,
            _ => Some(region_list),
        };

        Ok(SearchOverrides {
            keywords,
            start_date: non_blank(&self.start_date)
                .unwrap_or(DEFAULT_START_DATE)
                .to_string(),
            end_date: non_blank(&self.end_date)
                .unwrap_or(DEFAULT_END_DATE)
                .to_string(),
            weibo_type,
            contain_type,
            regions,
        })
    }
}

impl SearchOverrides {
    /// 覆盖配置中的搜索条件
    ///
    /// 表单给出关键词时不再读取关键词文件
    pub fn apply(&self, settings: &mut Settings) {
        let search = &mut settings.search;
        if !self.keywords.is_empty() {
            search.keyword_list = self.keywords.clone();
            search.keyword_file = None;
        }
        search.start_date = Some(self.start_date.clone());
        search.end_date = Some(self.end_date.clone());
        search.weibo_type = self.weibo_type;
        search.contain_type = self.contain_type;
        if let Some(regions) = &self.regions {
            search.region = regions.clone();
        }
    }
}

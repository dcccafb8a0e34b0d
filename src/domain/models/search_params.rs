// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SearchSettings;
use crate::domain::models::region::{resolve_regions, Province, ALL_REGIONS};
use crate::domain::services::keyword_loader;
use crate::utils::errors::SearchError;
use chrono::{Local, NaiveDate};

/// 微博类型筛选
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeiboType {
    All,
    Original,
    Hot,
    Following,
    Verified,
    Media,
    Viewpoint,
}

impl WeiboType {
    /// 0 全部，1 原创，2 热门，3 关注人，4 认证用户，5 媒体，6 观点；其它值按原创处理
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::All,
            2 => Self::Hot,
            3 => Self::Following,
            4 => Self::Verified,
            5 => Self::Media,
            6 => Self::Viewpoint,
            _ => Self::Original,
        }
    }

    pub fn query_fragment(self) -> &'static str {
        match self {
            Self::All => "&typeall=1",
            Self::Original => "&scope=ori",
            Self::Hot => "&xsort=hot",
            Self::Following => "&atten=1",
            Self::Verified => "&vip=1",
            Self::Media => "&category=4",
            Self::Viewpoint => "&viewpoint=1",
        }
    }
}

/// 微博必需包含的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainType {
    Any,
    Picture,
    Video,
    Music,
    ShortLink,
}

impl ContainType {
    /// 0 不筛选，1 图片，2 视频，3 音乐，4 短链接；其它值不筛选
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::Picture,
            2 => Self::Video,
            3 => Self::Music,
            4 => Self::ShortLink,
            _ => Self::Any,
        }
    }

    pub fn query_fragment(self) -> &'static str {
        match self {
            Self::Any => "&suball=1",
            Self::Picture => "&haspic=1",
            Self::Video => "&hasvideo=1",
            Self::Music => "&hasmusic=1",
            Self::ShortLink => "&haslink=1",
        }
    }
}

/// 校验后的搜索参数
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub keywords: Vec<String>,
    pub weibo_type: WeiboType,
    pub contain_type: ContainType,
    /// 细分搜索时使用的地区
    pub regions: Vec<&'static Province>,
    /// 是否从一开始就按地区搜索
    pub filter_by_region: bool,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub further_threshold: usize,
    pub limit_result: usize,
}

impl SearchParams {
    /// 从搜索配置构建参数
    ///
    /// # Returns
    ///
    /// * `Err(SearchError)` - 关键词文件不可读、关键词为空、日期无效或起止日期颠倒
    pub fn from_settings(settings: &SearchSettings) -> Result<Self, SearchError> {
        let keywords = match settings.keyword_file.as_deref().filter(|f| !f.trim().is_empty()) {
            Some(file) => keyword_loader::load_keyword_file(file)?,
            None => settings
                .keyword_list
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
        };
        if keywords.is_empty() {
            return Err(SearchError::EmptyKeywords);
        }

        let today = Local::now().date_naive();
        let start_date = parse_date(settings.start_date.as_deref(), today)?;
        let end_date = parse_date(settings.end_date.as_deref(), today)?;
        if start_date > end_date {
            return Err(SearchError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }

        let filter_by_region = !settings.region.is_empty()
            && !settings.region.iter().any(|r| r.trim() == ALL_REGIONS);

        Ok(Self {
            keywords,
            weibo_type: WeiboType::from_code(settings.weibo_type),
            contain_type: ContainType::from_code(settings.contain_type),
            regions: resolve_regions(&settings.region),
            filter_by_region,
            start_date,
            end_date,
            further_threshold: settings.further_threshold,
            limit_result: settings.limit_result,
        })
    }

    /// 类型与包含内容的查询片段
    pub fn filter_fragment(&self) -> String {
        format!(
            "{}{}",
            self.weibo_type.query_fragment(),
            self.contain_type.query_fragment()
        )
    }
}

/// 解析 yyyy-mm-dd 日期，空值取 default
pub fn parse_date(value: Option<&str>, default: NaiveDate) -> Result<NaiveDate, SearchError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map_err(|_| SearchError::InvalidDate(v.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::Settings;
    use crate::domain::models::region::PROVINCES;
    use std::io::Write;

    fn search_settings() -> SearchSettings {
        let mut settings = Settings::defaults().unwrap().search;
        settings.start_date = Some("2025-10-27".to_string());
        settings.end_date = Some("2025-10-28".to_string());
        settings
    }

    #[test]
    fn test_type_fragments() {
        assert_eq!(WeiboType::from_code(0).query_fragment(), "&typeall=1");
        assert_eq!(WeiboType::from_code(1).query_fragment(), "&scope=ori");
        assert_eq!(WeiboType::from_code(6).query_fragment(), "&viewpoint=1");
        assert_eq!(WeiboType::from_code(42).query_fragment(), "&scope=ori");
        assert_eq!(ContainType::from_code(0).query_fragment(), "&suball=1");
        assert_eq!(ContainType::from_code(2).query_fragment(), "&hasvideo=1");
        assert_eq!(ContainType::from_code(9).query_fragment(), "&suball=1");
    }

    #[test]
    fn test_from_default_settings() {
        let params = SearchParams::from_settings(&search_settings()).unwrap();

        assert_eq!(params.keywords, vec!["东南大学"]);
        assert_eq!(params.weibo_type, WeiboType::Original);
        assert_eq!(params.contain_type, ContainType::Any);
        assert!(!params.filter_by_region);
        assert_eq!(params.regions.len(), PROVINCES.len());
        assert_eq!(params.start_date, NaiveDate::from_ymd_opt(2025, 10, 27).unwrap());
        assert_eq!(params.filter_fragment(), "&scope=ori&suball=1");
    }

    #[test]
    fn test_region_filtering() {
        let mut settings = search_settings();
        settings.region = vec!["江苏".to_string(), "上海".to_string()];

        let params = SearchParams::from_settings(&settings).unwrap();
        assert!(params.filter_by_region);
        assert_eq!(params.regions.len(), 2);
    }

    #[test]
    fn test_invalid_date_range() {
        let mut settings = search_settings();
        settings.start_date = Some("2025-10-29".to_string());

        let err = SearchParams::from_settings(&settings).unwrap_err();
        assert!(matches!(err, SearchError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_invalid_date_format() {
        let mut settings = search_settings();
        settings.end_date = Some("2025/10/28".to_string());

        let err = SearchParams::from_settings(&settings).unwrap_err();
        assert!(matches!(err, SearchError::InvalidDate(_)));
    }

    #[test]
    fn test_empty_keywords() {
        let mut settings = search_settings();
        settings.keyword_list = vec!["  ".to_string()];

        let err = SearchParams::from_settings(&settings).unwrap_err();
        assert!(matches!(err, SearchError::EmptyKeywords));
    }

    #[test]
    fn test_keyword_file_overrides_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}南京大学\n\n#东南大学#\n").unwrap();

        let mut settings = search_settings();
        settings.keyword_file = Some(file.path().to_string_lossy().into_owned());

        let params = SearchParams::from_settings(&settings).unwrap();
        assert_eq!(params.keywords, vec!["南京大学", "#东南大学#"]);
    }
}

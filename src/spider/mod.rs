// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 爬虫模块
///
/// 构建搜索请求、解析结果页并按需细分搜索条件
pub mod ip_locator;
pub mod parser;
pub mod request;
pub mod search_spider;

pub use search_spider::SearchSpider;

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::EngineError;
use thiserror::Error;

/// 搜索参数错误类型
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("关键词列表为空")]
    EmptyKeywords,

    #[error("不存在关键词文件: {0}")]
    KeywordFileNotFound(String),

    #[error("关键词文件应为utf-8编码: {0}")]
    KeywordFileEncoding(String),

    #[error("无效日期 {0}，应为 yyyy-mm-dd 形式")]
    InvalidDate(String),

    #[error("起始日期 {start} 应早于或等于终止日期 {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("无效参数: {0}")]
    InvalidParameter(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 结果输出错误类型
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV错误: {0}")]
    Csv(#[from] csv::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("下载错误: {0}")]
    Download(String),
}

/// 爬取过程错误类型
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("下载错误: {0}")]
    Engine(#[from] EngineError),

    #[error("结果输出错误: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("搜索参数错误: {0}")]
    Search(#[from] SearchError),
}

// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 驱动搜索请求的下载、解析与结果处理
pub mod crawl_worker;

pub use crawl_worker::{CrawlSummary, CrawlWorker};

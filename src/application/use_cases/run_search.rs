// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::search_form::SearchOverrides;
use crate::config::settings::Settings;
use crate::domain::models::search_params::SearchParams;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::browser::ResultOpener;
use crate::infrastructure::pipelines::csv_pipeline::csv_path;
use crate::infrastructure::pipelines::PipelineChain;
use crate::spider::ip_locator::IpLocator;
use crate::spider::SearchSpider;
use crate::utils::errors::CrawlError;
use crate::workers::{CrawlSummary, CrawlWorker};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// 按配置组装下载引擎、爬虫与管道并运行到结束
pub async fn run_crawl(settings: &Settings) -> Result<CrawlSummary, CrawlError> {
    let params = SearchParams::from_settings(&settings.search)?;
    info!(
        keywords = ?params.keywords,
        start = %params.start_date,
        end = %params.end_date,
        "开始爬取"
    );

    let fetcher: Arc<dyn PageFetcher> = Arc::new(ReqwestEngine::new(&settings.http)?);
    let spider = SearchSpider::new(params, &settings.search.base_url);
    let ip_locator = settings
        .search
        .fetch_ip_location
        .then(|| IpLocator::new(fetcher.clone(), &settings.search.ip_api_base));
    let pipelines =
        PipelineChain::from_settings(&settings.pipelines, fetcher.clone(), ip_locator).await?;

    CrawlWorker::new(spider, fetcher, pipelines)
        .with_http_settings(&settings.http)
        .run()
        .await
}

/// 查找要打开的结果文件
///
/// 优先取第一个关键词的 CSV 文件，其次是它的目录；
/// 都不存在时取结果目录下第一个（按名称排序）关键词目录中的 CSV 或目录本身
pub fn find_result_file(output_dir: &Path, keywords: &[String]) -> Option<PathBuf> {
    if let Some(keyword) = keywords.first() {
        let csv = csv_path(output_dir, keyword);
        if csv.is_file() {
            return Some(csv);
        }
        let dir = output_dir.join(keyword);
        if dir.is_dir() {
            return Some(dir);
        }
    }

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(output_dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    let first = dirs.into_iter().next()?;

    let mut csv_files: Vec<PathBuf> = std::fs::read_dir(&first)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    csv_files.sort();
    Some(csv_files.into_iter().next().unwrap_or(first))
}

/// 本地文件的 file:// 地址，路径中的 `#` 等字符按 URL 规则转义
pub fn file_url(path: &Path) -> String {
    let absolute = path
        .canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());
    Url::from_file_path(&absolute)
        .map(String::from)
        .unwrap_or_else(|_| absolute.display().to_string())
}

/// 网页表单触发的一次搜索
///
/// 以表单覆盖配置后运行爬虫，结束后在浏览器中打开结果文件
pub struct RunSearchUseCase {
    settings: Settings,
    opener: Arc<dyn ResultOpener>,
}

impl RunSearchUseCase {
    pub fn new(settings: Settings, opener: Arc<dyn ResultOpener>) -> Self {
        Self { settings, opener }
    }

    pub async fn execute(&self, overrides: &SearchOverrides) -> Result<CrawlSummary, CrawlError> {
        let mut settings = self.settings.clone();
        overrides.apply(&mut settings);

        let summary = run_crawl(&settings).await?;

        let output_dir = Path::new(&settings.pipelines.output_dir);
        let opened = match find_result_file(output_dir, &summary.keywords) {
            Some(target) => match self.opener.open(&file_url(&target)) {
                Ok(()) => true,
                Err(e) => {
                    warn!(target = %target.display(), error = %e, "无法打开结果文件");
                    false
                }
            },
            None => false,
        };
        if !opened {
            info!("未找到结果文件，请检查爬虫输出目录。");
        }
        info!("爬取完成，您可以关闭浏览器页面了。");

        Ok(summary)
    }
}

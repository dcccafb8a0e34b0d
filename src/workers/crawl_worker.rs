// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::HttpSettings;
use crate::engines::traits::{EngineError, PageFetcher, PageResponse};
use crate::infrastructure::metrics::{
    ITEMS_DROPPED_TOTAL, ITEMS_SCRAPED_TOTAL, REQUESTS_TOTAL, REQUEST_FAILURES_TOTAL,
};
use crate::infrastructure::pipelines::PipelineChain;
use crate::queue::RequestScheduler;
use crate::spider::SearchSpider;
use crate::utils::errors::CrawlError;
use crate::utils::retry_policy::RetryPolicy;
use chrono::Local;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// 一次爬取的统计
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlSummary {
    pub keywords: Vec<String>,
    /// 已发送的搜索页请求数
    pub requests: usize,
    /// 重试后仍失败的请求数
    pub failed_requests: usize,
    /// 通过全部管道的微博数
    pub items_stored: usize,
    /// 被管道丢弃或处理出错的微博数
    pub items_dropped: usize,
    pub limit_reached: bool,
}

/// 爬取工作器
///
/// 单线程地从调度器取请求、下载、解析并把结果交给管道
pub struct CrawlWorker {
    spider: SearchSpider,
    fetcher: Arc<dyn PageFetcher>,
    pipelines: PipelineChain,
    retry_policy: RetryPolicy,
    download_delay: Duration,
    randomize_delay: bool,
}

impl CrawlWorker {
    pub fn new(
        spider: SearchSpider,
        fetcher: Arc<dyn PageFetcher>,
        pipelines: PipelineChain,
    ) -> Self {
        Self {
            spider,
            fetcher,
            pipelines,
            retry_policy: RetryPolicy::default(),
            download_delay: Duration::ZERO,
            randomize_delay: false,
        }
    }

    /// 按 HTTP 配置设置下载间隔和重试策略
    pub fn with_http_settings(mut self, http: &HttpSettings) -> Self {
        self.retry_policy = RetryPolicy::from_settings(http);
        self.download_delay = Duration::from_secs_f64(http.download_delay_secs.max(0.0));
        self.randomize_delay = http.randomize_download_delay;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// 运行到请求队列为空或达到结果数量限制
    #[instrument(skip(self), fields(keywords = ?self.spider.params().keywords))]
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        self.pipelines.open().await?;

        let mut summary = CrawlSummary {
            keywords: self.spider.params().keywords.clone(),
            ..Default::default()
        };
        self.crawl(&mut summary).await;

        self.pipelines.close().await?;
        info!(
            requests = summary.requests,
            failed = summary.failed_requests,
            stored = summary.items_stored,
            dropped = summary.items_dropped,
            "爬取结束"
        );
        Ok(summary)
    }

    async fn crawl(&self, summary: &mut CrawlSummary) {
        let limit = self.spider.params().limit_result;
        let mut scheduler = RequestScheduler::new();
        scheduler.enqueue_all(self.spider.start_requests());

        while let Some(request) = scheduler.next_request() {
            if summary.requests > 0 {
                sleep(self.next_delay()).await;
            }
            summary.requests += 1;
            counter!(REQUESTS_TOTAL).increment(1);

            let response = match self.fetch_with_retry(&request.url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %request.url, error = %e, "请求失败，跳过该页");
                    summary.failed_requests += 1;
                    counter!(REQUEST_FAILURES_TOTAL).increment(1);
                    continue;
                }
            };
            debug!(
                url = %request.url,
                status = response.status_code,
                elapsed_ms = response.response_time_ms,
                "页面下载完成"
            );

            let output = self
                .spider
                .parse(&request, &response.content, Local::now().naive_local());

            for item in output.items {
                match self.pipelines.process(item).await {
                    Ok(Some(_)) => {
                        summary.items_stored += 1;
                        counter!(ITEMS_SCRAPED_TOTAL).increment(1);
                    }
                    Ok(None) => {
                        summary.items_dropped += 1;
                        counter!(ITEMS_DROPPED_TOTAL).increment(1);
                    }
                    Err(e) => {
                        warn!(error = %e, "结果处理失败");
                        summary.items_dropped += 1;
                        counter!(ITEMS_DROPPED_TOTAL).increment(1);
                    }
                }

                if limit > 0 && summary.items_stored >= limit {
                    info!(limit, "已达到爬取结果数量限制，停止爬取");
                    summary.limit_reached = true;
                    return;
                }
            }

            scheduler.enqueue_all(output.requests);
        }
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<PageResponse, EngineError> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch_text(url).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && self.retry_policy.should_retry(attempt) => {
                    attempt += 1;
                    let backoff = self.retry_policy.calculate_backoff(attempt);
                    warn!(url, attempt, error = %e, "请求失败，{:?} 后重试", backoff);
                    sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// 两次请求之间的等待时间，随机化时取 0.5 到 1.5 倍
    fn next_delay(&self) -> Duration {
        if self.randomize_delay && !self.download_delay.is_zero() {
            self.download_delay.mul_f64(rand::random_range(0.5..1.5))
        } else {
            self.download_delay
        }
    }
}

#[cfg(test)]
#[path = "crawl_worker_test.rs"]
mod tests;

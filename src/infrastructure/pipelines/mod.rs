// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 结果处理管道
//!
//! 每条微博依次经过去重、IP 属地、CSV、SQLite 和媒体下载管道，任一管道都可以丢弃它

pub mod csv_pipeline;
pub mod duplicates;
pub mod media_pipeline;
pub mod sqlite_pipeline;

use crate::config::settings::PipelineSettings;
use crate::domain::models::weibo::ScrapedWeibo;
use crate::engines::traits::PageFetcher;
use crate::spider::ip_locator::IpLocator;
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub use csv_pipeline::CsvPipeline;
pub use duplicates::DuplicatesPipeline;
pub use media_pipeline::MediaPipeline;
pub use sqlite_pipeline::SqlitePipeline;

/// 结果处理管道特质
#[async_trait]
pub trait ItemPipeline: Send + Sync {
    /// 爬取开始前调用
    async fn open(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    /// 处理一条微博，返回 `None` 表示丢弃
    async fn process_item(&self, item: ScrapedWeibo)
        -> Result<Option<ScrapedWeibo>, PipelineError>;

    /// 爬取结束后调用
    async fn close(&self) -> Result<(), PipelineError> {
        Ok(())
    }

    fn name(&self) -> &'static str;
}

/// 按顺序组合的管道
#[derive(Default)]
pub struct PipelineChain {
    pipelines: Vec<Box<dyn ItemPipeline>>,
}

impl PipelineChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, pipeline: impl ItemPipeline + 'static) -> Self {
        self.pipelines.push(Box::new(pipeline));
        self
    }

    /// 根据配置组装管道：去重总是启用，给出 `ip_locator` 时紧随其后查询属地，其余按开关启用
    pub async fn from_settings(
        settings: &PipelineSettings,
        fetcher: Arc<dyn PageFetcher>,
        ip_locator: Option<IpLocator>,
    ) -> Result<Self, PipelineError> {
        let mut chain = Self::new().with(DuplicatesPipeline::new());

        if let Some(locator) = ip_locator {
            chain = chain.with(locator);
        }

        if settings.csv {
            chain = chain.with(CsvPipeline::new(&settings.output_dir));
        }
        if let Some(database) = settings
            .sqlite_database
            .as_deref()
            .filter(|d| !d.trim().is_empty())
        {
            chain = chain.with(SqlitePipeline::connect(database).await?);
        }
        if settings.download_images || settings.download_videos {
            chain = chain.with(MediaPipeline::from_settings(settings, fetcher));
        }

        info!(pipelines = ?chain.names(), "结果处理管道已就绪");
        Ok(chain)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.pipelines.iter().map(|p| p.name()).collect()
    }

    pub async fn open(&self) -> Result<(), PipelineError> {
        for pipeline in &self.pipelines {
            pipeline.open().await?;
        }
        Ok(())
    }

    /// 让微博依次经过所有管道，被某个管道丢弃时立即返回 `None`
    pub async fn process(
        &self,
        item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        let mut current = item;
        for pipeline in &self.pipelines {
            match pipeline.process_item(current).await? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// 关闭所有管道，返回遇到的第一个错误
    pub async fn close(&self) -> Result<(), PipelineError> {
        let mut first_error = None;
        for pipeline in &self.pipelines {
            if let Err(e) = pipeline.close().await {
                tracing::warn!(pipeline = pipeline.name(), error = %e, "关闭管道失败");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

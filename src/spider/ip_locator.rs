// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::weibo::ScrapedWeibo;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::pipelines::ItemPipeline;
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const REGION_PREFIX: &str = "发布于";

#[derive(Debug, Deserialize)]
struct StatusDetail {
    #[serde(default)]
    region_name: Option<String>,
}

/// 查询微博发布时的 IP 属地
pub struct IpLocator {
    fetcher: Arc<dyn PageFetcher>,
    api_base: String,
}

impl IpLocator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, api_base: &str) -> Self {
        Self {
            fetcher,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn status_url(&self, bid: &str) -> String {
        format!(
            "{}/ajax/statuses/show?id={}&locale=zh-CN",
            self.api_base,
            urlencoding::encode(bid)
        )
    }

    /// 返回属地名称，查询失败或没有属地时返回空字符串
    pub async fn locate(&self, bid: &str) -> String {
        if bid.is_empty() {
            return String::new();
        }

        let url = self.status_url(bid);
        let response = match self.fetcher.fetch_text(&url).await {
            Ok(response) => response,
            Err(e) => {
                debug!(bid, error = %e, "IP 属地查询失败");
                return String::new();
            }
        };

        match serde_json::from_str::<StatusDetail>(&response.content) {
            Ok(detail) => detail
                .region_name
                .map(|name| region_from_label(&name))
                .unwrap_or_default(),
            Err(e) => {
                debug!(bid, error = %e, "IP 属地响应无法解析");
                String::new()
            }
        }
    }
}

/// 作为管道使用时放在去重之后，重复微博不再查询
#[async_trait]
impl ItemPipeline for IpLocator {
    async fn process_item(
        &self,
        mut item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        item.weibo.ip = self.locate(&item.weibo.bid).await;
        Ok(Some(item))
    }

    fn name(&self) -> &'static str {
        "ip_location"
    }
}

/// “发布于 江苏” -> “江苏”
pub fn region_from_label(label: &str) -> String {
    let label = label.trim();
    label
        .strip_prefix(REGION_PREFIX)
        .unwrap_or(label)
        .trim()
        .to_string()
}

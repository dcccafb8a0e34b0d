// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ItemPipeline;
use crate::domain::models::weibo::ScrapedWeibo;
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::debug;

/// 丢弃本次运行中已出现过的微博 id
#[derive(Default)]
pub struct DuplicatesPipeline {
    seen: Mutex<HashSet<String>>,
}

impl DuplicatesPipeline {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemPipeline for DuplicatesPipeline {
    async fn process_item(
        &self,
        item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        if self.seen.lock().insert(item.weibo.id.clone()) {
            Ok(Some(item))
        } else {
            debug!(id = %item.weibo.id, "过滤重复微博");
            Ok(None)
        }
    }

    fn name(&self) -> &'static str {
        "duplicates"
    }
}

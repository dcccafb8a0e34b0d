// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::HttpSettings;
use crate::engines::traits::{EngineError, PageFetcher, PageResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use std::time::{Duration, Instant};

/// 抓取引擎
///
/// 基于reqwest实现的HTTP下载引擎，所有请求共用同一组默认请求头
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 根据HTTP配置创建引擎
    ///
    /// Cookie 原样放入请求头，不启用 cookie store，与登录态保持一致
    pub fn new(settings: &HttpSettings) -> Result<Self, EngineError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, header_value(&settings.accept)?);
        headers.insert(ACCEPT_LANGUAGE, header_value(&settings.accept_language)?);
        if let Some(cookie) = settings.cookie.as_deref().filter(|c| !c.trim().is_empty()) {
            let mut value = header_value(cookie.trim())?;
            value.set_sensitive(true);
            headers.insert(COOKIE, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, EngineError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout
            } else {
                EngineError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, EngineError> {
    HeaderValue::from_str(value)
        .map_err(|e| EngineError::Other(format!("Invalid header value: {}", e)))
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    async fn fetch_text(&self, url: &str) -> Result<PageResponse, EngineError> {
        let start = Instant::now();
        let response = self.get(url).await?;
        let status_code = response.status().as_u16();
        let content = response.text().await?;

        Ok(PageResponse {
            url: url.to_string(),
            status_code,
            content,
            response_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let response = self.get(url).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;

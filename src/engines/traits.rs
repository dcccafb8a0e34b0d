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

use async_trait::async_trait;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 服务端返回非成功状态码
    #[error("Unexpected status {status} for {url}")]
    Status { status: u16, url: String },
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断错误是否可重试
    ///
    /// 超时、连接失败以及 408/429/5xx 状态码可重试
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            EngineError::Status { status, .. } => {
                matches!(status, 408 | 429) || (500..600).contains(status)
            }
            EngineError::Timeout => true,
            EngineError::Other(_) => false,
        }
    }
}

/// 抓取响应
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// 请求的URL
    pub url: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应内容
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面下载引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 下载页面文本，非 2xx 状态码返回 `EngineError::Status`
    async fn fetch_text(&self, url: &str) -> Result<PageResponse, EngineError>;

    /// 下载二进制内容（图片、视频）
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}

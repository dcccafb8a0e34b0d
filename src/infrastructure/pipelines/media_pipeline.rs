// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ItemPipeline;
use crate::config::settings::PipelineSettings;
use crate::domain::models::weibo::ScrapedWeibo;
use crate::engines::traits::PageFetcher;
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

const DEFAULT_IMAGE_EXT: &str = ".jpg";

/// 下载微博图片和视频
///
/// 图片保存为 `{images_store}/{output_dir}/{keyword}/images/{id}[_{n}]{ext}`，
/// 视频保存为 `{files_store}/{output_dir}/{keyword}/videos/{id}.mp4`。
/// 下载失败只记录日志，不影响后续管道
pub struct MediaPipeline {
    fetcher: Arc<dyn PageFetcher>,
    images_root: Option<PathBuf>,
    videos_root: Option<PathBuf>,
}

impl MediaPipeline {
    pub fn from_settings(settings: &PipelineSettings, fetcher: Arc<dyn PageFetcher>) -> Self {
        let root = |store: &str| Path::new(store).join(&settings.output_dir);
        Self {
            fetcher,
            images_root: settings
                .download_images
                .then(|| root(&settings.images_store)),
            videos_root: settings
                .download_videos
                .then(|| root(&settings.files_store)),
        }
    }

    /// 第 index 张图片的保存路径，只有多张图片时才带序号
    pub fn image_path(root: &Path, item: &ScrapedWeibo, index: usize, url: &str) -> PathBuf {
        let id = &item.weibo.id;
        let name = if item.weibo.pics.len() > 1 {
            format!("{id}_{index}{}", extension(url))
        } else {
            format!("{id}{}", extension(url))
        };
        root.join(&item.keyword).join("images").join(name)
    }

    pub fn video_path(root: &Path, item: &ScrapedWeibo) -> PathBuf {
        root.join(&item.keyword)
            .join("videos")
            .join(format!("{}.mp4", item.weibo.id))
    }

    async fn download(&self, url: &str, path: &Path) -> Result<(), PipelineError> {
        if fs::try_exists(path).await? {
            debug!(path = %path.display(), "文件已存在，跳过下载");
            return Ok(());
        }

        let data = self
            .fetcher
            .fetch_bytes(url)
            .await
            .map_err(|e| PipelineError::Download(format!("{url}: {e}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let mut file = fs::File::create(path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(())
    }
}

/// URL 路径最后一段的扩展名（含点），没有时按 .jpg 处理
fn extension(url: &str) -> String {
    let path = url::Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.split(['?', '#']).next().unwrap_or_default().to_string());
    let file_name = path.rsplit('/').next().unwrap_or_default();
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() => file_name[dot..].to_string(),
        _ => DEFAULT_IMAGE_EXT.to_string(),
    }
}

#[async_trait]
impl ItemPipeline for MediaPipeline {
    async fn process_item(
        &self,
        item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        if let Some(root) = &self.images_root {
            for (index, url) in item.weibo.pics.iter().enumerate() {
                let path = Self::image_path(root, &item, index, url);
                if let Err(e) = self.download(url, &path).await {
                    warn!(id = %item.weibo.id, url, error = %e, "图片下载失败");
                }
            }
        }

        if let Some(root) = &self.videos_root {
            if !item.weibo.video_url.is_empty() {
                let path = Self::video_path(root, &item);
                if let Err(e) = self.download(&item.weibo.video_url, &path).await {
                    warn!(id = %item.weibo.id, url = %item.weibo.video_url, error = %e, "视频下载失败");
                }
            }
        }

        Ok(Some(item))
    }

    fn name(&self) -> &'static str {
        "media"
    }
}

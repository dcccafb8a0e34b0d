// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ItemPipeline;
use crate::domain::models::weibo::{ScrapedWeibo, Weibo};
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV 表头，顺序与 [`record`] 一致
pub const HEADER: [&str; 19] = [
    "id",
    "bid",
    "user_id",
    "用户昵称",
    "微博正文",
    "头条文章url",
    "发布位置",
    "艾特用户",
    "话题",
    "转发数",
    "评论数",
    "点赞数",
    "发布时间",
    "发布工具",
    "微博图片url",
    "微博视频url",
    "retweet_id",
    "ip",
    "user_authentication",
];

/// 关键词结果文件的路径：`{output_dir}/{keyword}/{keyword}.csv`
pub fn csv_path(output_dir: impl AsRef<Path>, keyword: &str) -> PathBuf {
    output_dir
        .as_ref()
        .join(keyword)
        .join(format!("{keyword}.csv"))
}

fn record(weibo: &Weibo) -> [String; 19] {
    [
        weibo.id.clone(),
        weibo.bid.clone(),
        weibo.user_id.clone(),
        weibo.screen_name.clone(),
        weibo.text.clone(),
        weibo.article_url.clone(),
        weibo.location.clone(),
        weibo.at_users.clone(),
        weibo.topics.clone(),
        weibo.reposts_count.clone(),
        weibo.comments_count.clone(),
        weibo.attitudes_count.clone(),
        weibo.created_at.clone(),
        weibo.source.clone(),
        weibo.pics.join(","),
        weibo.video_url.clone(),
        weibo.retweet_id.clone(),
        weibo.ip.clone(),
        weibo.user_authentication.clone(),
    ]
}

/// 按关键词追加写入 CSV 文件
///
/// 新文件以 UTF-8 BOM 和表头开始，方便用 Excel 直接打开
pub struct CsvPipeline {
    output_dir: PathBuf,
}

impl CsvPipeline {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn append(&self, item: &ScrapedWeibo) -> Result<(), PipelineError> {
        let path = csv_path(&self.output_dir, &item.keyword);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let is_new = !fs::try_exists(&path).await?;

        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record(record(&item.weibo))?;
        let rows = writer.into_inner().map_err(|e| e.into_error())?;

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        if is_new {
            file.write_all(UTF8_BOM).await?;
        }
        file.write_all(&rows).await?;
        file.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl ItemPipeline for CsvPipeline {
    async fn process_item(
        &self,
        item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        self.append(&item).await?;
        Ok(Some(item))
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

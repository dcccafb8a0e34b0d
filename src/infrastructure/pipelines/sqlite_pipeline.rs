// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ItemPipeline;
use crate::domain::models::weibo::ScrapedWeibo;
use crate::utils::errors::PipelineError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

const CREATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS weibo (
    id TEXT PRIMARY KEY NOT NULL,
    bid TEXT NOT NULL,
    user_id TEXT,
    screen_name TEXT,
    text TEXT,
    article_url TEXT,
    location TEXT,
    at_users TEXT,
    topics TEXT,
    reposts_count TEXT,
    comments_count TEXT,
    attitudes_count TEXT,
    created_at TEXT,
    source TEXT,
    pics TEXT,
    video_url TEXT,
    retweet_id TEXT,
    ip TEXT,
    user_authentication TEXT,
    keyword TEXT
)
"#;

const UPSERT: &str = r#"
INSERT OR REPLACE INTO weibo (
    id, bid, user_id, screen_name, text, article_url, location, at_users,
    topics, reposts_count, comments_count, attitudes_count, created_at,
    source, pics, video_url, retweet_id, ip, user_authentication, keyword
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// 写入 SQLite 的 weibo 表，按 id 覆盖
pub struct SqlitePipeline {
    pool: SqlitePool,
}

impl SqlitePipeline {
    /// 连接数据库文件，不存在时创建
    pub async fn connect(database: &str) -> Result<Self, PipelineError> {
        if let Some(parent) = Path::new(database).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!(database, "已连接 SQLite 数据库");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ItemPipeline for SqlitePipeline {
    async fn open(&self) -> Result<(), PipelineError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn process_item(
        &self,
        item: ScrapedWeibo,
    ) -> Result<Option<ScrapedWeibo>, PipelineError> {
        let weibo = &item.weibo;
        sqlx::query(UPSERT)
            .bind(&weibo.id)
            .bind(&weibo.bid)
            .bind(&weibo.user_id)
            .bind(&weibo.screen_name)
            .bind(&weibo.text)
            .bind(&weibo.article_url)
            .bind(&weibo.location)
            .bind(&weibo.at_users)
            .bind(&weibo.topics)
            .bind(&weibo.reposts_count)
            .bind(&weibo.comments_count)
            .bind(&weibo.attitudes_count)
            .bind(&weibo.created_at)
            .bind(&weibo.source)
            .bind(weibo.pics.join(","))
            .bind(&weibo.video_url)
            .bind(&weibo.retweet_id)
            .bind(&weibo.ip)
            .bind(&weibo.user_authentication)
            .bind(&item.keyword)
            .execute(&self.pool)
            .await?;
        Ok(Some(item))
    }

    async fn close(&self) -> Result<(), PipelineError> {
        self.pool.close().await;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

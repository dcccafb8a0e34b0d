// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 一条微博
///
/// 计数字段保留页面上的原始写法（如 "1万+"），因此使用字符串
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Weibo {
    pub id: String,
    pub bid: String,
    pub user_id: String,
    pub screen_name: String,
    pub text: String,
    pub article_url: String,
    pub location: String,
    pub at_users: String,
    pub topics: String,
    pub reposts_count: String,
    pub comments_count: String,
    pub attitudes_count: String,
    pub created_at: String,
    pub source: String,
    pub pics: Vec<String>,
    pub video_url: String,
    pub retweet_id: String,
    pub ip: String,
    pub user_authentication: String,
}

/// 爬取到的微博及其所属关键词
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScrapedWeibo {
    pub keyword: String,
    pub weibo: Weibo,
}

impl ScrapedWeibo {
    pub fn new(keyword: impl Into<String>, weibo: Weibo) -> Self {
        Self {
            keyword: keyword.into(),
            weibo,
        }
    }
}
